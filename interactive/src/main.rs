use clap::Parser;

use splitview_common::presets::Preset;
use splitview_common::scene_loader::SceneLoader;

mod app;
mod args;
mod gl_scene;
mod surface;

use app::App;
use args::ArgsInteractive;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // clion needs help in trait annotation
    let args = <ArgsInteractive as Parser>::parse();

    let demo = match &args.scene {
        Some(path) => match SceneLoader::load_from_path(path) {
            Ok(demo) => {
                log::info!("read scene file from {:?}", path);
                demo
            }
            Err(e) => {
                log::error!("could not read scene description: {e}");
                std::process::exit(-1);
            }
        },
        None => {
            let preset = Preset::from(args.preset);
            log::info!("showing the {} demo", preset.name());
            preset.build()
        }
    };

    let app = match App::new(demo, &args) {
        Ok(app) => app,
        Err(e) => {
            log::error!("could not open a window: {e}");
            std::process::exit(-1);
        }
    };

    app.run();
}
