use super::{Command, Owner};

use crate::{
    entities::{Coordinate, Directions, Placemark, RetryAction, RouteInfo},
    error::{lookup_failed_error, Error},
};

impl Owner {
    /// Points the trip at a new destination and looks up its route and, for
    /// map taps, its name. Older lookups still in flight become stale.
    #[tracing::instrument(skip(self))]
    pub(super) fn set_destination(&mut self, destination: Coordinate, name: Option<String>) {
        let request_id = self.session.trip.set_destination(destination, name.clone());

        self.session.resolve(&RetryAction::RouteLookup);
        self.session
            .map
            .mark_destination(destination, name.clone().unwrap_or_default());

        self.lookup_route(request_id, destination);

        if name.is_none() {
            let geocoding = self.providers.geocoding.clone();

            self.dispatch(async move {
                Command::PlaceNameResolved {
                    request_id,
                    result: geocoding.reverse_geocode(destination).await,
                }
            });
        }
    }

    fn lookup_route(&mut self, request_id: u64, destination: Coordinate) {
        let source = match self.session.trip.source {
            Some(source) => source,
            None => {
                tracing::warn!("no pickup location yet, route lookup deferred");

                let err = lookup_failed_error("pickup location unknown");
                self.session.surface(&err, Some(RetryAction::RouteLookup));
                return;
            }
        };

        let directions = self.providers.directions.clone();

        self.dispatch(async move {
            Command::RouteResolved {
                request_id,
                result: directions.route(source, destination).await,
            }
        });
    }

    /// Looks the current destination up again under a fresh request id.
    pub(super) fn reissue_route(&mut self) {
        let destination = match self.session.trip.destination {
            Some(destination) => destination,
            None => return,
        };

        let name = match self.session.trip.destination_name.is_empty() {
            true => None,
            false => Some(self.session.trip.destination_name.clone()),
        };

        self.set_destination(destination, name);
    }

    #[tracing::instrument(skip(self))]
    pub(super) fn clear_destination(&mut self) {
        self.session.trip.clear_destination();
        self.session.map.clear();
        self.session.resolve(&RetryAction::RouteLookup);
    }

    #[tracing::instrument(skip(self, result))]
    pub(super) fn route_resolved(&mut self, request_id: u64, result: Result<Directions, Error>) {
        if !self.session.trip.is_current(request_id) {
            tracing::info!("route lookup superseded, dropping result");
            return;
        }

        match result {
            Ok(directions) => {
                let route: RouteInfo = directions.into();
                let polyline = route.polyline.clone();

                tracing::info!(
                    distance_km = %route.distance_km,
                    eta_minutes = %route.eta_minutes,
                    "route resolved"
                );

                self.session.trip.apply_route(request_id, route);
                self.session.map.show_route(polyline);
            }
            Err(err) => {
                tracing::warn!("route lookup failed: {:?}", err);
                self.session.surface(&err, Some(RetryAction::RouteLookup));
            }
        }
    }

    #[tracing::instrument(skip(self, result))]
    pub(super) fn place_name_resolved(&mut self, request_id: u64, result: Result<Placemark, Error>) {
        match result {
            Ok(placemark) => {
                if self
                    .session
                    .trip
                    .apply_destination_name(request_id, placemark.name.clone())
                {
                    self.session.map.title_destination(placemark.name);
                }
            }
            // the name is cosmetic; the preview still works without it
            Err(err) => tracing::warn!("reverse geocoding failed: {:?}", err),
        }
    }
}
