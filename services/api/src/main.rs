use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod config;
mod error;
mod extract;
mod middleware;
mod routes;
mod state;

use common::CommunityConfig;
use community::{CommunityService, HttpCommunityService, MockCommunityService};
use tokio::net::TcpListener;

use crate::{
    config::{Backend, ServerConfig},
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting community API service");

    let server_config = ServerConfig::from_env().map_err(anyhow::Error::msg)?;
    let community_config = CommunityConfig::from_env()?;

    let community: Arc<dyn CommunityService> = match server_config.backend {
        Backend::Fixture => {
            info!(
                "Serving fixture data with {}ms of simulated latency",
                community_config.delay_ms
            );
            Arc::new(MockCommunityService::new(&community_config))
        }
        Backend::Http => {
            info!("Forwarding to backend at {}", community_config.base_url);
            Arc::new(HttpCommunityService::new(&community_config)?)
        }
    };

    // Start the web server
    let app = routes::create_router(AppState::new(community));

    let listener = TcpListener::bind(&server_config.bind_addr).await?;
    info!("API service listening on {}", server_config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
