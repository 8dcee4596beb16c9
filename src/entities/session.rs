use serde::{Deserialize, Serialize};

use crate::entities::{BookingFlow, LocationState, MapScene, SearchSession, TripSession};
use crate::error::{Error, ErrorKind};

/// Operation the view can offer to re-run after a surfaced failure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum RetryAction {
    LocationFix,
    RouteLookup,
    Search,
    Confirm,
    Cancel { booking_id: String },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SurfacedError {
    pub kind: ErrorKind,
    pub message: String,
    pub retry: Option<RetryAction>,
    /// Set when the store may still hold a record the user believes is gone.
    pub needs_reconciliation: bool,
}

/// Everything the view layer renders, owned by one session task.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub trip: TripSession,
    pub search: SearchSession,
    pub booking: BookingFlow,
    pub location: LocationState,
    pub map: MapScene,
    pub error: Option<SurfacedError>,
}

impl Session {
    pub fn surface(&mut self, err: &Error, retry: Option<RetryAction>) {
        let needs_reconciliation = matches!(retry, Some(RetryAction::Cancel { booking_id: _ }));

        self.error = Some(SurfacedError {
            kind: err.kind(),
            message: err.message.clone(),
            retry,
            needs_reconciliation,
        });
    }

    /// Clears the surfaced error if it offered the given retry.
    pub fn resolve(&mut self, action: &RetryAction) {
        if let Some(error) = &self.error {
            if error.retry.as_ref() == Some(action) {
                self.error = None;
            }
        }
    }

    pub fn take_retry(&mut self) -> Option<RetryAction> {
        self.error.take().and_then(|error| error.retry)
    }

    /// Derives the loading/booked flags from the booking flow.
    pub fn sync_ui(&mut self) {
        self.trip.ui.loading = self.booking.is_busy();
        self.trip.ui.booked = self.booking.visible_booking().is_some();
    }

    pub fn open_search(&mut self) {
        self.trip.ui.searching = true;
    }

    pub fn close_search(&mut self) {
        self.trip.ui.searching = false;
        self.search.reset();
    }
}
