use chrono::{DateTime, Utc};
use qrcode::{render::svg, QrCode};
use serde::{Deserialize, Serialize};

use crate::entities::Coordinate;
use crate::error::{invalid_input_error, invalid_state_error, unexpected_error, Error};

pub const FARE_PER_KM: f64 = 1.2;

/// Fare charged for a displayed distance string. The formatted distance is what
/// is billed, so any precision lost to formatting is lost from the fare too.
pub fn fare_for(distance_km: &str) -> f64 {
    distance_km.trim().parse::<f64>().unwrap_or(0.0) * FARE_PER_KM
}

/// The persisted booking document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub id: String,
    pub name: String,
    pub from: Coordinate,
    pub to: Coordinate,
    pub distance: String,
    // stored documents carry the field as "fair"
    #[serde(rename = "fair")]
    pub fare: f64,
    pub created_at: DateTime<Utc>,
}

impl BookingRecord {
    pub fn new(
        id: String,
        name: String,
        from: Coordinate,
        to: Coordinate,
        distance: String,
    ) -> Self {
        Self {
            fare: fare_for(&distance),
            id,
            name,
            from,
            to,
            distance,
            created_at: Utc::now(),
        }
    }
}

/// A booking as shown to the user: its identifier and the scannable code for it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub qr_svg: String,
}

impl Booking {
    pub fn new(id: String) -> Result<Self, Error> {
        if id.is_empty() || !id.is_ascii() {
            return Err(invalid_input_error());
        }

        let qr_svg = QrCode::new(id.as_bytes())
            .map_err(|err| {
                tracing::error!("qr encoding failed: {:?}", err);
                unexpected_error()
            })?
            .render::<svg::Color>()
            .min_dimensions(256, 256)
            .dark_color(svg::Color("#000000"))
            .light_color(svg::Color("#FFFFFF"))
            .build();

        Ok(Self { id, qr_svg })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Status {
    Idle,
    Confirming { booking_id: String },
    Persisted { booking: Booking },
    Cancelling { booking: Booking },
}

impl Status {
    pub fn name(&self) -> String {
        match self {
            Self::Idle => "idle".into(),
            Self::Confirming { booking_id: _ } => "confirming".into(),
            Self::Persisted { booking: _ } => "persisted".into(),
            Self::Cancelling { booking: _ } => "cancelling".into(),
        }
    }
}

/// Create/cancel state machine for the persisted ride record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BookingFlow {
    pub status: Status,
}

impl Default for BookingFlow {
    fn default() -> Self {
        Self {
            status: Status::Idle,
        }
    }
}

impl BookingFlow {
    pub fn is_idle(&self) -> bool {
        matches!(self.status, Status::Idle)
    }

    pub fn is_busy(&self) -> bool {
        matches!(
            self.status,
            Status::Confirming { booking_id: _ } | Status::Cancelling { booking: _ }
        )
    }

    pub fn visible_booking(&self) -> Option<&Booking> {
        match &self.status {
            Status::Persisted { booking } | Status::Cancelling { booking } => Some(booking),
            _ => None,
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn begin_confirm(&mut self, booking_id: String) -> Result<(), Error> {
        match self.status {
            Status::Idle => {
                self.status = Status::Confirming { booking_id };
                Ok(())
            }
            _ => Err(invalid_state_error()),
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn confirmed(&mut self, booking_id: &str) -> Result<Booking, Error> {
        match &self.status {
            Status::Confirming { booking_id: pending } if pending == booking_id => {
                let booking = Booking::new(booking_id.to_string());

                match booking {
                    Ok(booking) => {
                        self.status = Status::Persisted {
                            booking: booking.clone(),
                        };
                        Ok(booking)
                    }
                    Err(err) => {
                        self.status = Status::Idle;
                        Err(err)
                    }
                }
            }
            _ => Err(invalid_state_error()),
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn confirm_failed(&mut self, booking_id: &str) -> Result<(), Error> {
        match &self.status {
            Status::Confirming { booking_id: pending } if pending == booking_id => {
                self.status = Status::Idle;
                Ok(())
            }
            _ => Err(invalid_state_error()),
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn begin_cancel(&mut self, booking_id: &str) -> Result<(), Error> {
        match &self.status {
            Status::Persisted { booking } if booking.id == booking_id => {
                self.status = Status::Cancelling {
                    booking: booking.clone(),
                };
                Ok(())
            }
            Status::Persisted { booking: _ } => Err(invalid_input_error()),
            _ => Err(invalid_state_error()),
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn cancelled(&mut self, booking_id: &str) -> Result<(), Error> {
        match &self.status {
            Status::Cancelling { booking } if booking.id == booking_id => {
                self.status = Status::Idle;
                Ok(())
            }
            _ => Err(invalid_state_error()),
        }
    }

    /// The delete did not go through: the booking is shown again.
    #[tracing::instrument(skip(self))]
    pub fn cancel_failed(&mut self, booking_id: &str) -> Result<(), Error> {
        match &self.status {
            Status::Cancelling { booking } if booking.id == booking_id => {
                self.status = Status::Persisted {
                    booking: booking.clone(),
                };
                Ok(())
            }
            _ => Err(invalid_state_error()),
        }
    }
}
