//! tablekeep development server
//!
//! Serves the tablekeep REST API from in-memory collections seeded with the
//! bundled sample data, so the `tk` client can be exercised end to end.
//! Nothing is written to disk; every restart begins from the seed.
//!
//! # Configuration
//!
//! Environment variables:
//! - `TABLEKEEP_PORT`: Port to listen on (default: 8080)
//! - `TABLEKEEP_CONFIG`: Path to config file (default: ~/.config/tablekeep-server/config.yaml)
//!
//! # Config File Format
//!
//! ```yaml
//! api_keys:
//!   - key: "your-secret-key-here"
//!     name: "back-office"
//! ```
//!
//! Without any keys the collection routes are open.
//!
//! # Endpoints
//!
//! - `GET /health`: Health check (no auth required)
//! - `GET|POST /{collection}`
//! - `GET|PUT|DELETE /{collection}/{id}`
//!
//! Collections: `inventory`, `purchase-orders`, `menus`, `suppliers`,
//! `restaurants`, and the read-only `ingredients` and `units`.

use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod server;

use server::{ApiKeyStore, AppState, Collections, Config};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tablekeep_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!("Config file: {}", config.config_path.display());

    let api_keys = ApiKeyStore::load(&config.config_path);
    let state = AppState::new(api_keys, Collections::seeded());
    let app = server::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
