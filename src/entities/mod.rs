mod booking;
mod coordinate;
mod location;
mod map;
mod place;
mod route;
mod search;
mod sequence;
mod session;
mod trip;

pub use booking::{fare_for, Booking, BookingFlow, BookingRecord, Status as BookingStatus};
pub use coordinate::{Coordinate, Region};
pub use location::{Authorization, Fix, LocationState};
pub use map::{Annotation, MapScene};
pub use place::{Place, PlaceCandidate, Placemark};
pub use route::{tenths, Directions, Polyline, RouteInfo};
pub use search::SearchSession;
pub use sequence::Sequence;
pub use session::{RetryAction, Session, SurfacedError};
pub use trip::{TripSession, UiState};
