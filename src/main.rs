use std::process;
use std::sync::Arc;

use tracing::{error, info, warn};

use meshmon::config::Config;
use meshmon::store::PgStore;
use meshmon::web::handlers::AppState;
use meshmon::web::WebServer;

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };

    // Initialize logging
    if let Err(e) = meshmon::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
    }

    info!("meshmon backend starting");
    if config.auth.has_default_secret() {
        warn!("token signing secret is the built-in default; set [auth] jwt_secret");
    }

    let store = match PgStore::connect(&config.database).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            error!("connecting to postgres: {e}");
            process::exit(1);
        }
    };

    let state = Arc::new(AppState::new(&config.auth, store.clone(), store));

    let server = match WebServer::new(&config.server, state) {
        Ok(server) => server,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };

    if let Err(e) = server.run().await {
        error!("server error: {e}");
        process::exit(1);
    }

    info!("shutdown complete");
}
