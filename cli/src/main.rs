use std::io::Write;

use clap::Parser;

use serde::Serialize;

use thiserror::Error;

use splitview::layout::Layout;
use splitview::render_loop::ViewGroup;
use splitview::texture::{Texture, MAX_TEXTURE_SIZE};

use splitview_common::image_out::{self, ImageError};
use splitview_common::presets::{named_texture, Preset};
use splitview_common::scene_loader::{LoaderError, SceneLoader};

mod args;

use args::{Args, Command, RegionsArgs, TextureArgs};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // clion needs help in trait annotation
    let args = <Args as Parser>::parse();

    let res = match args.command {
        Command::Regions(args) => regions(args),
        Command::Texture(args) => texture(args),
    };

    if let Err(e) = res {
        log::error!("{e}");
        std::process::exit(-1);
    }
}

fn regions(args: RegionsArgs) -> Result<(), CliError> {
    if !(args.width >= 0.0 && args.height >= 0.0) {
        return Err(CliError::InvalidSize);
    }

    let mut demo = match &args.scene {
        Some(path) => SceneLoader::load_from_path(path)?,
        None => Preset::from(args.preset).build(),
    };

    demo.layout.set_container_size(args.width, args.height);

    let reports = region_reports(&demo.views, &demo.layout);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if args.pretty {
        serde_json::to_writer_pretty(&mut out, &reports)?;
    } else {
        serde_json::to_writer(&mut out, &reports)?;
    }
    writeln!(out)?;

    Ok(())
}

fn texture(args: TextureArgs) -> Result<(), CliError> {
    if args.size == 0 || args.size > MAX_TEXTURE_SIZE {
        return Err(CliError::InvalidSize);
    }

    let source = named_texture(&args.name).ok_or(CliError::UnknownTexture(args.name))?;
    let image = Texture::new(source, args.size).generate();

    image_out::write_image(&args.output, &image)?;
    log::info!("wrote {}x{} texture to {:?}", image.width, image.height, args.output);

    Ok(())
}

#[derive(Debug, Serialize)]
struct RegionReport {
    id: String,
    /// `None` when the view is not laid out
    region: Option<RegionBox>,
    aspect: Option<f64>,
    drawable: bool,
}

#[derive(Debug, Serialize)]
struct RegionBox {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    y_up: f64,
}

fn region_reports<L: Layout>(views: &ViewGroup, layout: &L) -> Vec<RegionReport> {
    views
        .regions(layout)
        .into_iter()
        .map(|(id, region)| RegionReport {
            id: id.to_string(),
            region: region.map(|r| RegionBox {
                left: r.left,
                top: r.top,
                width: r.width,
                height: r.height,
                y_up: r.y_up,
            }),
            aspect: region.filter(|r| r.is_drawable()).and_then(|r| r.aspect()),
            drawable: region.map_or(false, |r| r.is_drawable()),
        })
        .collect()
}

#[derive(Debug, Error)]
enum CliError {
    #[error("could not read scene description: {0}")]
    Loader(#[from] LoaderError),
    #[error("could not write image: {0}")]
    Image(#[from] ImageError),
    #[error("no texture named {0:?}")]
    UnknownTexture(String),
    #[error("size is negative, zero or too large")]
    InvalidSize,
    #[error("could not write output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not write output: {0}")]
    Io(#[from] std::io::Error),
}
