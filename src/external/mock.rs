//! Scripted providers for exercising a session without network or database.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::{
    api::{BookingStoreAPI, DirectionsAPI, GeocodingAPI, LocationAPI, PlaceSearchAPI},
    db::MemoryBookingStore,
    entities::{
        Authorization, BookingRecord, Coordinate, Directions, Place, Placemark, Polyline, Region,
    },
    error::{lookup_failed_error, persistence_failed_error, Error},
};

#[derive(Debug)]
pub struct MockLocation {
    authorization: Mutex<Authorization>,
    fix: Coordinate,
    fix_requests: AtomicU32,
}

impl MockLocation {
    pub fn new(authorization: Authorization, fix: Coordinate) -> Self {
        Self {
            authorization: Mutex::new(authorization),
            fix,
            fix_requests: AtomicU32::new(0),
        }
    }

    pub fn set_authorization(&self, authorization: Authorization) {
        if let Ok(mut current) = self.authorization.lock() {
            *current = authorization;
        }
    }

    pub fn fix_requests(&self) -> u32 {
        self.fix_requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocationAPI for MockLocation {
    async fn request_authorization(&self) -> Authorization {
        self.authorization
            .lock()
            .map(|authorization| *authorization)
            .unwrap_or(Authorization::Denied)
    }

    async fn request_one_fix(&self) -> Result<Coordinate, Error> {
        self.fix_requests.fetch_add(1, Ordering::SeqCst);
        Ok(self.fix)
    }
}

/// Directions, geocoding and search answers scripted per destination or query,
/// each with its own latency.
#[derive(Debug, Default)]
pub struct MockMaps {
    routes: Vec<(Coordinate, Duration, Result<Directions, Error>)>,
    names: Vec<(Coordinate, Duration, Result<Placemark, Error>)>,
    places: Vec<(String, Duration, Result<Vec<Place>, Error>)>,
    route_calls: AtomicU32,
    search_calls: AtomicU32,
    last_region: Mutex<Option<Region>>,
}

impl MockMaps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_route(mut self, to: Coordinate, delay: Duration, distance_meters: f64) -> Self {
        let directions = Directions {
            polyline: Polyline("_p~iF~ps|U_ulLnnqC".into()),
            distance_meters,
            eta_seconds: distance_meters / 10.0,
        };

        self.routes.push((to, delay, Ok(directions)));
        self
    }

    pub fn with_route_failure(mut self, to: Coordinate, delay: Duration) -> Self {
        self.routes
            .push((to, delay, Err(lookup_failed_error("directions unavailable"))));
        self
    }

    pub fn with_name(mut self, at: Coordinate, delay: Duration, name: &str) -> Self {
        self.names.push((at, delay, Ok(Placemark { name: name.into() })));
        self
    }

    pub fn with_places(mut self, query: &str, delay: Duration, places: Vec<Place>) -> Self {
        self.places.push((query.into(), delay, Ok(places)));
        self
    }

    pub fn with_search_failure(mut self, query: &str, delay: Duration) -> Self {
        self.places
            .push((query.into(), delay, Err(lookup_failed_error("search unavailable"))));
        self
    }

    pub fn route_calls(&self) -> u32 {
        self.route_calls.load(Ordering::SeqCst)
    }

    pub fn search_calls(&self) -> u32 {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn last_region(&self) -> Option<Region> {
        self.last_region.lock().ok().and_then(|region| *region)
    }
}

#[async_trait]
impl DirectionsAPI for MockMaps {
    async fn route(&self, _from: Coordinate, to: Coordinate) -> Result<Directions, Error> {
        self.route_calls.fetch_add(1, Ordering::SeqCst);

        let scripted = self.routes.iter().find(|(destination, _, _)| *destination == to);

        match scripted {
            Some((_, delay, result)) => {
                tokio::time::sleep(*delay).await;
                result.clone()
            }
            None => Err(lookup_failed_error("no route scripted")),
        }
    }
}

#[async_trait]
impl GeocodingAPI for MockMaps {
    async fn reverse_geocode(&self, coordinate: Coordinate) -> Result<Placemark, Error> {
        let scripted = self.names.iter().find(|(at, _, _)| *at == coordinate);

        match scripted {
            Some((_, delay, result)) => {
                tokio::time::sleep(*delay).await;
                result.clone()
            }
            None => Ok(Placemark::default()),
        }
    }
}

#[async_trait]
impl PlaceSearchAPI for MockMaps {
    async fn search(&self, query: String, region: Option<Region>) -> Result<Vec<Place>, Error> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);

        if let Ok(mut last_region) = self.last_region.lock() {
            *last_region = region;
        }

        let scripted = self.places.iter().find(|(scripted, _, _)| *scripted == query);

        match scripted {
            Some((_, delay, result)) => {
                tokio::time::sleep(*delay).await;
                result.clone()
            }
            None => Ok(vec![]),
        }
    }
}

/// In-memory store that rejects a configurable number of calls before
/// behaving normally.
#[derive(Debug, Default)]
pub struct FlakyStore {
    pub inner: MemoryBookingStore,
    failing_creates: AtomicU32,
    failing_deletes: AtomicU32,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_creates(self, times: u32) -> Self {
        self.failing_creates.store(times, Ordering::SeqCst);
        self
    }

    pub fn fail_deletes(self, times: u32) -> Self {
        self.failing_deletes.store(times, Ordering::SeqCst);
        self
    }

    fn should_fail(counter: &AtomicU32) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl BookingStoreAPI for FlakyStore {
    fn generate_id(&self) -> String {
        self.inner.generate_id()
    }

    async fn create(&self, record: &BookingRecord) -> Result<String, Error> {
        if Self::should_fail(&self.failing_creates) {
            return Err(persistence_failed_error("create rejected"));
        }

        self.inner.create(record).await
    }

    async fn delete(&self, id: &str) -> Result<(), Error> {
        if Self::should_fail(&self.failing_deletes) {
            return Err(persistence_failed_error("delete rejected"));
        }

        self.inner.delete(id).await
    }
}
