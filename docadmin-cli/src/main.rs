mod paths;
mod rule;
mod session;
mod settings;
mod store;

use std::fs::{self, File};

use simplelog::{Config, LevelFilter, WriteLogger};

fn init_logging() {
    paths::rotate_logs();
    let Some(path) = paths::log_file() else {
        eprintln!("No cache directory available, logging disabled");
        return;
    };
    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }

    match File::create(&path) {
        Ok(file) => {
            if let Err(e) = WriteLogger::init(LevelFilter::Debug, Config::default(), file) {
                eprintln!("Failed to initialize logger: {e}");
            }
        }
        Err(e) => eprintln!("Failed to create {}: {e}", path.display()),
    }
}

#[tokio::main]
async fn main() {
    init_logging();

    let config = settings::load();
    if let Err(e) = session::run(config).await {
        eprintln!("Error: {e}");
    }
}
