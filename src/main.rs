//! Version service.
//!
//! Serves the `version` field of a configuration file over HTTP and picks up
//! edits to that file without a restart.
//!
//! # Architecture Overview
//!
//! ```text
//!   -c config.yaml
//!        │
//!        ▼
//!   ┌──────────────┐  Arc<Config>   ┌──────────────┐    GET /version
//!   │ ConfigStore  │───────────────▶│  HttpServer  │◀──────────────── Client
//!   │  (ArcSwap)   │   current()    │    (axum)    │
//!   └──────▲───────┘                └──────────────┘
//!          │ reload_or_retain()
//!   ┌──────┴───────┐   ConfigChange  ┌──────────────┐
//!   │   reloader   │◀────────────────│ ConfigWatcher│◀──── file system / SIGHUP
//!   │     task     │     (mpsc)      │   (notify)   │
//!   └──────────────┘                 └──────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use version_service::lifecycle::startup;
use version_service::observability::init_logging;

#[derive(Parser)]
#[command(name = "version-service")]
#[command(about = "Serve a hot-reloaded config file's version over HTTP", long_about = None)]
struct Cli {
    /// Path to the configuration file (.yaml, .yml, .toml or .json)
    #[arg(short = 'c', long = "config", default_value = "./config.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    tracing::info!("version-service v{} starting", env!("CARGO_PKG_VERSION"));

    match startup::run(&cli.config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            eprintln!("version-service: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_defaults_to_config_yaml() {
        let cli = Cli::try_parse_from(["version-service"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("./config.yaml"));
    }

    #[test]
    fn test_short_and_long_config_flags() {
        let cli = Cli::try_parse_from(["version-service", "-c", "/etc/app.toml"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("/etc/app.toml"));

        let cli = Cli::try_parse_from(["version-service", "-c=./xx/xx.yaml"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("./xx/xx.yaml"));

        let cli = Cli::try_parse_from(["version-service", "--config", "conf.json"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("conf.json"));
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(Cli::try_parse_from(["version-service", "--port", "80"]).is_err());
    }
}
