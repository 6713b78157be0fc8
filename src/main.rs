use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info, warn};

use contact_relay::{Config, SmtpMailer, WebServer};

#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration with environment overrides.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = contact_relay::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        contact_relay::logging::init_console_only(&config.logging.level);
    }

    info!("contact-relay {}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return ExitCode::FAILURE;
    }

    let missing = config.smtp.missing_settings();
    if missing.is_empty() {
        info!(smtp = ?config.smtp, "Mail transport configured");
    } else {
        warn!(
            missing = %missing.join(", "),
            "Mail transport is incomplete; submissions will fail until it is configured"
        );
    }

    let mailer = Arc::new(SmtpMailer::new(Arc::new(config.smtp.clone())));

    let server = match WebServer::new(&config, mailer) {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to create web server: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = server.run().await {
        error!("Web server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
