//! HTTP server for geocoding and distance queries.
//!
//! Exposes forward geocoding, reverse geocoding, and great-circle distance
//! endpoints backed by an external provider and an embedded record store.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use georoute::api::{self, AppState};
use georoute::geocoding::NominatimClient;
use georoute::store::AddressStore;

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Geocoding and distance server")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:3000")]
    listen: String,

    /// Geocoding provider base URL
    #[arg(long, default_value = "https://nominatim.openstreetmap.org")]
    provider_url: String,

    /// Timeout for provider requests, in seconds
    #[arg(long, default_value_t = 10)]
    provider_timeout_secs: u64,

    /// User agent sent to the provider
    #[arg(long, default_value = "GeoRoute/0.1 (geocoding service)")]
    user_agent: String,

    /// Path to the record database
    #[arg(long, default_value = "georoute_db")]
    db_path: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    info!("GeoRoute Server");
    info!("Opening record store at {}", args.db_path);

    let store = AddressStore::open(&args.db_path).context("Failed to open record store")?;
    info!("Store holds {} records", store.count());

    let geocoder = NominatimClient::new(
        &args.provider_url,
        &args.user_agent,
        Duration::from_secs(args.provider_timeout_secs),
    )
    .context("Failed to create geocoding client")?;
    info!("Using geocoding provider at {}", args.provider_url);

    let state = Arc::new(AppState {
        geocoder: Arc::new(geocoder),
        store,
    });

    let app = api::router(state);

    info!("Starting server on {}", args.listen);

    let listener = tokio::net::TcpListener::bind(&args.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
