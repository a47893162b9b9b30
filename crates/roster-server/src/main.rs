//! # Roster Server
//!
//! Main entry point for the Roster directory service.

use roster_config::ConfigLoader;
use roster_core::RosterResult;
use roster_server::{
    app::Application,
    startup::{init_logging, print_banner, print_startup_info},
};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        // logging may not be initialized yet
        eprintln!("Application error: {}", e);
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> RosterResult<()> {
    let config_loader = ConfigLoader::from_default_location()?;
    let config = config_loader.get().await;

    init_logging(&config.observability);
    print_banner();
    info!("Starting Roster server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.environment);

    print_startup_info(&config);
    let app = Application::build(config).await?;
    app.run().await
}
