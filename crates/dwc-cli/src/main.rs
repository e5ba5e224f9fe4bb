use clap::Parser;
use dwc_core::storage::config::Config;
use dwc_core::utils::logging::{init_term_logger, level_for_verbosity};
use std::path::PathBuf;

mod cli;

use cli::dispatcher::Dispatcher;
use cli::main_types::Cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Err(e) = init_term_logger(level_for_verbosity(cli.verbose)) {
        eprintln!("Warning: {}", e);
    }

    // Load Config
    let config_path = cli
        .config_dir
        .as_ref()
        .map(|dir| PathBuf::from(dir).join("config.toml"));

    let config = match Config::load(config_path.clone()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error loading config: {}", err);
            std::process::exit(1);
        }
    };

    if let Some(config_dir) = &cli.config_dir {
        log::info!("using config directory: {}", config_dir);
    }

    let dispatcher = Dispatcher::new(config, config_path, cli.url);

    match dispatcher.dispatch(cli.command).await {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("{} Error: {}", e.severity().emoji(), e);
            if let Some(hint) = e.troubleshooting_hint() {
                eprintln!("💡 {}", hint);
            }
            std::process::exit(1);
        }
    }

    Ok(())
}
