use super::{Command, Owner};

use crate::{
    entities::{Authorization, Coordinate, RetryAction},
    error::{permission_denied_error, Error},
};

impl Owner {
    #[tracing::instrument(skip(self))]
    pub(super) fn start(&mut self) {
        let location = self.providers.location.clone();

        self.dispatch(async move {
            Command::AuthorizationResolved(location.request_authorization().await)
        });
    }

    #[tracing::instrument(skip(self))]
    pub(super) fn authorization_changed(&mut self, authorization: Authorization) {
        if self.session.location.authorization_changed(authorization) {
            self.request_fix();
        } else if authorization == Authorization::Denied {
            tracing::warn!("location permission denied");
            self.session.surface(&permission_denied_error(), None);
        }
    }

    #[tracing::instrument(skip(self))]
    pub(super) fn refresh_location(&mut self) {
        if self.session.location.refresh() {
            self.request_fix();
        }
    }

    fn request_fix(&mut self) {
        tracing::info!("requesting a single location fix");

        let location = self.providers.location.clone();

        self.dispatch(async move { Command::FixResolved(location.request_one_fix().await) });
    }

    #[tracing::instrument(skip(self))]
    pub(super) fn fix_resolved(&mut self, result: Result<Coordinate, Error>) {
        match result {
            Ok(coordinate) => {
                if !self.session.location.fix_resolved() {
                    tracing::info!("ignoring location fix nobody asked for");
                    return;
                }

                self.session.resolve(&RetryAction::LocationFix);
                self.set_source(coordinate);

                // a destination picked before the pickup was known still needs its route
                if self.session.trip.destination.is_some() && self.session.trip.route.is_none() {
                    self.reissue_route();
                }
            }
            Err(err) => {
                tracing::warn!("location fix failed: {:?}", err);

                self.session.location.fix_failed();
                self.session.surface(&err, Some(RetryAction::LocationFix));
            }
        }
    }

    #[tracing::instrument(skip(self))]
    pub(super) fn set_source(&mut self, coordinate: Coordinate) {
        self.session.trip.set_source(coordinate);
        self.session.map.center_on(coordinate);
    }
}
