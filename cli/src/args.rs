use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};

use splitview_common::presets::Preset;

#[derive(Debug, Parser)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the viewport region of every view as JSON
    Regions(RegionsArgs),
    /// Write a procedural texture to a PNG file
    Texture(TextureArgs),
}

#[derive(Debug, ClapArgs)]
pub struct RegionsArgs {
    /// Path to a json5 scene description
    #[arg(short, long, conflicts_with = "preset")]
    pub scene: Option<PathBuf>,
    /// Built-in demo to lay out
    #[arg(short, long, value_enum, default_value_t = PresetArg::Camera)]
    pub preset: PresetArg,
    /// Width of the container
    #[arg(long, default_value_t = 1280.0)]
    pub width: f64,
    /// Height of the container
    #[arg(long, default_value_t = 720.0)]
    pub height: f64,
    /// Pretty print the output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Debug, ClapArgs)]
pub struct TextureArgs {
    /// Texture name: checker, wall, worley or flower-1 to flower-6
    #[arg()]
    pub name: String,
    /// Edge length of the square image
    #[arg(long, default_value_t = 256)]
    pub size: u32,
    /// Path to save the texture to
    #[arg(short, long, default_value_os_t = PathBuf::from("out.png"))]
    pub output: PathBuf,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum PresetArg {
    Basic,
    Light,
    Camera,
}

impl From<PresetArg> for Preset {
    fn from(p: PresetArg) -> Self {
        match p {
            PresetArg::Basic => Self::Basic,
            PresetArg::Light => Self::Light,
            PresetArg::Camera => Self::Camera,
        }
    }
}
