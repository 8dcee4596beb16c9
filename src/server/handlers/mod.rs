pub mod bookings;
pub mod destination;
pub mod search;
pub mod session;
