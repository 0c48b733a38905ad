//! Main application entry point.

use gridboard_core::Config;

fn main() {
    env_logger::init();
    log::info!("Starting Gridboard");

    let config = load_config();
    if let Err(e) = pollster::block_on(gridboard_app::App::run(config)) {
        log::error!("Gridboard exited with an error: {}", e);
        std::process::exit(1);
    }
}

/// Read the config file if there is one, falling back to defaults.
fn load_config() -> Config {
    let Some(path) = Config::default_path() else {
        return Config::default();
    };
    if !path.exists() {
        log::info!("No config at {}, using defaults", path.display());
        return Config::default();
    }
    match Config::load(&path) {
        Ok(config) => {
            log::info!("Loaded config from {}", path.display());
            config
        }
        Err(e) => {
            log::error!("{}; using defaults", e);
            Config::default()
        }
    }
}
