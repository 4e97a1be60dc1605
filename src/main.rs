use std::path::Path;
use std::process::ExitCode;

use tracing::{error, info, warn};

use noticeboard::{Config, Database, WebServer};

/// Environment variable naming the configuration file.
const CONFIG_PATH_ENV: &str = "NOTICEBOARD_CONFIG";

#[tokio::main]
async fn main() -> ExitCode {
    let config_path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config.toml".to_string());

    // Load configuration
    let mut config = if Path::new(&config_path).exists() {
        match Config::load(&config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load {config_path}: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        eprintln!("{config_path} not found. Using default configuration.");
        Config::default()
    };

    if let Err(e) = config.apply_env_overrides() {
        eprintln!("Invalid environment override: {e}");
        return ExitCode::FAILURE;
    }

    // Initialize logging
    if let Err(e) = noticeboard::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        noticeboard::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return ExitCode::FAILURE;
    }

    info!("noticeboard {}", env!("CARGO_PKG_VERSION"));

    // A failed connection is not fatal; queries fail per request until the
    // database becomes reachable.
    let db = match Database::connect(&config.database).await {
        Ok(db) => db,
        Err(e) => {
            error!("Error connecting to the database: {}", e);
            match Database::connect_lazy(&config.database) {
                Ok(db) => {
                    warn!("Continuing without a database connection");
                    db
                }
                Err(e) => {
                    error!("Failed to set up database pool: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
    };

    let server = match WebServer::new(&config.web, db.clone()) {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to create web server: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if !server.login_enabled() {
        info!("Login routes disabled");
    }

    let result = server.run().await;
    db.close().await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}
