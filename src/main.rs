use std::sync::Arc;

use hackney::api::{DynBookingStore, Providers, SessionAPI};
use hackney::config::Config;
use hackney::db::{MemoryBookingStore, PgBookingStore};
use hackney::engine::Engine;
use hackney::error::Error;
use hackney::external::{device::FixedLocation, google_maps::GoogleMaps};
use hackney::server::serve;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;

    let store: DynBookingStore = match &config.database_url {
        Some(url) => Arc::new(PgBookingStore::new(url, config.database_max_connections).await?),
        None => {
            tracing::warn!("DATABASE_URL not set, bookings are kept in memory");
            Arc::new(MemoryBookingStore::new())
        }
    };

    let maps = Arc::new(GoogleMaps::new(
        config.google_maps_api_base.clone(),
        config.google_maps_api_key.clone(),
    ));

    let providers = Providers {
        location: Arc::new(FixedLocation::new(config.pickup)),
        geocoding: maps.clone(),
        directions: maps.clone(),
        places: maps,
        store,
    };

    let engine = Engine::new(providers, config.session());
    engine.start().await?;

    serve(engine, config.bind).await
}
