//! Backend entry-point: wires REST endpoints and OpenAPI docs.

use actix_web::web;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use wardline::inbound::http::health::HealthState;
use wardline::server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = ServerConfig::from_env()?;
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, &config)?;
    info!(port = config.port(), "listening");
    server.await
}
