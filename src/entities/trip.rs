use serde::{Deserialize, Serialize};

use crate::entities::{Coordinate, RouteInfo, Sequence};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UiState {
    pub searching: bool,
    pub route_preview_visible: bool,
    pub loading: bool,
    pub booked: bool,
}

/// Pickup, destination and route of a single trip attempt.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TripSession {
    pub source: Option<Coordinate>,
    pub destination: Option<Coordinate>,
    pub destination_name: String,
    pub route: Option<RouteInfo>,
    pub ui: UiState,
    #[serde(skip)]
    requests: Sequence,
    /// Request the shown route answered.
    #[serde(skip)]
    route_request: u64,
}

impl TripSession {
    pub fn set_source(&mut self, source: Coordinate) {
        self.source = Some(source);
    }

    /// Records a new destination and returns the id its lookups are tagged with.
    /// The previous route stays in place until the new one resolves.
    #[tracing::instrument(skip(self))]
    pub fn set_destination(&mut self, destination: Coordinate, name: Option<String>) -> u64 {
        self.destination = Some(destination);
        self.destination_name = name.unwrap_or_default();

        self.requests.next()
    }

    pub fn apply_route(&mut self, request_id: u64, route: RouteInfo) -> bool {
        if !self.is_current(request_id) {
            tracing::info!(request_id, "dropping stale route");
            return false;
        }

        self.route = Some(route);
        self.route_request = request_id;
        self.ui.route_preview_visible = true;
        true
    }

    /// Whether the shown route was looked up for the current destination. It
    /// goes stale as soon as another destination is picked.
    pub fn has_current_route(&self) -> bool {
        self.route.is_some() && self.is_current(self.route_request)
    }

    pub fn apply_destination_name(&mut self, request_id: u64, name: String) -> bool {
        if !self.is_current(request_id) {
            tracing::info!(request_id, "dropping stale place name");
            return false;
        }

        self.destination_name = name;
        true
    }

    pub fn clear_destination(&mut self) {
        self.requests.invalidate();
        self.destination = None;
        self.destination_name.clear();
        self.route = None;
        self.route_request = 0;
        self.ui.route_preview_visible = false;
    }

    /// A request is current while it is the latest issued and a destination is set.
    pub fn is_current(&self, request_id: u64) -> bool {
        self.destination.is_some() && self.requests.is_latest(request_id)
    }

    pub fn latest_request(&self) -> u64 {
        self.requests.latest()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Polyline;

    fn route(meters: f64) -> RouteInfo {
        RouteInfo::new(meters, 600.0, Polyline("??".into()))
    }

    #[test]
    fn source_is_last_write_wins() {
        let mut trip = TripSession::default();
        trip.set_source(Coordinate::new(1.0, 1.0));
        trip.set_source(Coordinate::new(2.0, 2.0));

        assert_eq!(trip.source, Some(Coordinate::new(2.0, 2.0)));
    }

    #[test]
    fn route_resolution_shows_the_preview() {
        let mut trip = TripSession::default();
        let id = trip.set_destination(Coordinate::new(1.0, 1.0), Some("Port".into()));

        assert!(trip.route.is_none());
        assert!(trip.apply_route(id, route(3_000.0)));
        assert!(trip.ui.route_preview_visible);
        assert_eq!(trip.route.as_ref().unwrap().distance_km, "3.0");
        assert_eq!(trip.destination_name, "Port");
    }

    #[test]
    fn late_result_for_an_older_destination_is_dropped() {
        let mut trip = TripSession::default();
        let first = trip.set_destination(Coordinate::new(1.0, 1.0), None);
        let second = trip.set_destination(Coordinate::new(2.0, 2.0), None);

        assert!(trip.apply_route(second, route(2_000.0)));
        assert!(!trip.apply_route(first, route(1_000.0)));
        assert_eq!(trip.route.as_ref().unwrap().distance_km, "2.0");

        assert!(!trip.apply_destination_name(first, "Old".into()));
        assert!(trip.apply_destination_name(second, "New".into()));
        assert_eq!(trip.destination_name, "New");
    }

    #[test]
    fn route_goes_stale_when_the_destination_changes() {
        let mut trip = TripSession::default();
        assert!(!trip.has_current_route());

        let first = trip.set_destination(Coordinate::new(1.0, 1.0), None);
        trip.apply_route(first, route(2_000.0));
        assert!(trip.has_current_route());

        let second = trip.set_destination(Coordinate::new(2.0, 2.0), None);
        assert!(trip.route.is_some());
        assert!(!trip.has_current_route());

        trip.apply_route(second, route(9_000.0));
        assert!(trip.has_current_route());
    }

    #[test]
    fn clearing_always_hides_the_preview() {
        let mut trip = TripSession::default();
        trip.clear_destination();
        assert!(trip.destination.is_none() && !trip.ui.route_preview_visible);

        let id = trip.set_destination(Coordinate::new(1.0, 1.0), None);
        trip.apply_route(id, route(1_000.0));
        trip.clear_destination();

        assert!(trip.destination.is_none());
        assert!(trip.route.is_none());
        assert!(!trip.ui.route_preview_visible);
        assert!(!trip.apply_route(id, route(1_000.0)));
    }
}
