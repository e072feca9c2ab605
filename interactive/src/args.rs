use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use splitview_common::presets::Preset;

#[derive(Debug, Parser)]
pub struct ArgsInteractive {
    /// Built-in demo to show when no scene file is given
    #[arg(value_enum, default_value_t = PresetArg::Camera)]
    pub preset: PresetArg,
    /// Path to a json5 scene description, overrides the preset
    #[arg(short, long)]
    pub scene: Option<PathBuf>,
    /// Initial window width
    #[arg(long, default_value_t = 1280)]
    pub width: u32,
    /// Initial window height
    #[arg(long, default_value_t = 720)]
    pub height: u32,
    /// Swap buffers without waiting for the display refresh
    #[arg(long)]
    pub no_vsync: bool,
    /// Directory F12 screenshots are saved to
    #[arg(long, default_value_os_t = PathBuf::from("."))]
    pub screenshot_dir: PathBuf,
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
