use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::watch;

use crate::entities::{
    Authorization, Booking, BookingRecord, Coordinate, Directions, Place, Placemark, Region,
    Session,
};
use crate::error::Error;

#[async_trait]
pub trait LocationAPI {
    async fn request_authorization(&self) -> Authorization;
    /// A single fix. Implementations must not keep streaming after it resolves.
    async fn request_one_fix(&self) -> Result<Coordinate, Error>;
}

#[async_trait]
pub trait GeocodingAPI {
    async fn reverse_geocode(&self, coordinate: Coordinate) -> Result<Placemark, Error>;
}

#[async_trait]
pub trait DirectionsAPI {
    async fn route(&self, from: Coordinate, to: Coordinate) -> Result<Directions, Error>;
}

#[async_trait]
pub trait PlaceSearchAPI {
    async fn search(&self, query: String, region: Option<Region>) -> Result<Vec<Place>, Error>;
}

#[async_trait]
pub trait BookingStoreAPI {
    /// A fresh store-backed document id. Creating under the same id twice is a no-op,
    /// which keeps retried writes idempotent.
    fn generate_id(&self) -> String;
    async fn create(&self, record: &BookingRecord) -> Result<String, Error>;
    async fn delete(&self, id: &str) -> Result<(), Error>;
}

pub type DynLocation = Arc<dyn LocationAPI + Send + Sync>;
pub type DynGeocoding = Arc<dyn GeocodingAPI + Send + Sync>;
pub type DynDirections = Arc<dyn DirectionsAPI + Send + Sync>;
pub type DynPlaceSearch = Arc<dyn PlaceSearchAPI + Send + Sync>;
pub type DynBookingStore = Arc<dyn BookingStoreAPI + Send + Sync>;

#[derive(Clone)]
pub struct Providers {
    pub location: DynLocation,
    pub geocoding: DynGeocoding,
    pub directions: DynDirections,
    pub places: DynPlaceSearch,
    pub store: DynBookingStore,
}

/// What the view layer can do with a session. Intents resolve once the session
/// has applied them; lookups they trigger land later in the published snapshot.
#[async_trait]
pub trait SessionAPI {
    fn snapshot(&self) -> Session;
    fn subscribe(&self) -> watch::Receiver<Session>;

    async fn start(&self) -> Result<(), Error>;
    async fn authorization_changed(&self, authorization: Authorization) -> Result<(), Error>;
    async fn refresh_location(&self) -> Result<(), Error>;
    async fn dismiss_alert(&self) -> Result<(), Error>;

    async fn set_source(&self, coordinate: Coordinate) -> Result<(), Error>;
    async fn set_destination(&self, coordinate: Coordinate, name: Option<String>)
        -> Result<(), Error>;
    async fn tap_map(&self, coordinate: Coordinate) -> Result<(), Error>;
    async fn clear_destination(&self) -> Result<(), Error>;

    async fn open_search(&self) -> Result<(), Error>;
    async fn close_search(&self) -> Result<(), Error>;
    async fn set_query(&self, query: String) -> Result<(), Error>;
    async fn select_candidate(&self, id: usize) -> Result<(), Error>;

    async fn confirm_booking(&self) -> Result<Booking, Error>;
    async fn cancel_booking(&self, booking_id: String) -> Result<(), Error>;

    async fn retry(&self) -> Result<(), Error>;
}

pub type DynSession = Arc<dyn SessionAPI + Send + Sync>;
