use futures::FutureExt;

use super::{Ack, BookingReply, Command, Owner};

use crate::{
    entities::{Booking, BookingRecord, RetryAction},
    error::{invalid_state_error, Error},
};

impl Owner {
    /// Writes the booking document for the current trip. The caller hears back
    /// through `reply` once the store has answered.
    #[tracing::instrument(skip(self, reply))]
    pub(super) fn confirm(
        &mut self,
        reply: Option<BookingReply>,
    ) -> Result<(), (Option<BookingReply>, Error)> {
        let trip = &self.session.trip;

        if !trip.has_current_route() {
            tracing::info!("nothing to book: no route resolved for the current destination");
            return Err((reply, invalid_state_error()));
        }

        let (source, destination, distance) =
            match (trip.source, trip.destination, trip.route.as_ref()) {
                (Some(source), Some(destination), Some(route)) => {
                    (source, destination, route.distance_km.clone())
                }
                _ => {
                    tracing::info!("nothing to book: trip has no resolved route");
                    return Err((reply, invalid_state_error()));
                }
            };

        let store = self.providers.store.clone();
        let booking_id = store.generate_id();

        if let Err(err) = self.session.booking.begin_confirm(booking_id.clone()) {
            return Err((reply, err));
        }

        self.session.resolve(&RetryAction::Confirm);

        let record = BookingRecord::new(
            booking_id.clone(),
            self.config.app_name.clone(),
            source,
            destination,
            distance,
        );
        let retry = self.config.retry.clone();

        tracing::info!(booking_id = %record.id, fare = record.fare, "persisting booking");

        self.dispatch(async move {
            let result = retry
                .execute("create_booking", move || {
                    let store = store.clone();
                    let record = record.clone();
                    async move { store.create(&record).await }.boxed()
                })
                .await;

            Command::BookingPersisted {
                booking_id,
                result,
                reply,
            }
        });

        Ok(())
    }

    #[tracing::instrument(skip(self, result))]
    pub(super) fn booking_persisted(
        &mut self,
        booking_id: &str,
        result: Result<String, Error>,
    ) -> Result<Booking, Error> {
        match result {
            Ok(stored_id) => {
                if stored_id != booking_id {
                    tracing::warn!(%stored_id, "store answered with a different id");
                }

                let booking = self.session.booking.confirmed(booking_id)?;
                tracing::info!("booking persisted");

                Ok(booking)
            }
            Err(err) => {
                if let Err(state_err) = self.session.booking.confirm_failed(booking_id) {
                    tracing::warn!("booking flow moved on: {:?}", state_err);
                }

                self.session.surface(&err, Some(RetryAction::Confirm));
                Err(err)
            }
        }
    }

    #[tracing::instrument(skip(self, ack))]
    pub(super) fn cancel(
        &mut self,
        booking_id: String,
        ack: Option<Ack>,
    ) -> Result<(), (Option<Ack>, Error)> {
        if let Err(err) = self.session.booking.begin_cancel(&booking_id) {
            return Err((ack, err));
        }

        let cancel = RetryAction::Cancel {
            booking_id: booking_id.clone(),
        };
        self.session.resolve(&cancel);

        let store = self.providers.store.clone();
        let retry = self.config.retry.clone();
        let id = booking_id.clone();

        self.dispatch(async move {
            let result = retry
                .execute("delete_booking", move || {
                    let store = store.clone();
                    let id = id.clone();
                    async move { store.delete(&id).await }.boxed()
                })
                .await;

            Command::BookingDeleted {
                booking_id,
                result,
                reply: ack,
            }
        });

        Ok(())
    }

    #[tracing::instrument(skip(self, result))]
    pub(super) fn booking_deleted(
        &mut self,
        booking_id: &str,
        result: Result<(), Error>,
    ) -> Result<(), Error> {
        match result {
            Ok(()) => {
                self.session.booking.cancelled(booking_id)?;
                tracing::info!("booking cancelled");

                Ok(())
            }
            Err(err) => {
                // the record is still in the store, so keep showing it
                if let Err(state_err) = self.session.booking.cancel_failed(booking_id) {
                    tracing::warn!("booking flow moved on: {:?}", state_err);
                }

                self.session.surface(
                    &err,
                    Some(RetryAction::Cancel {
                        booking_id: booking_id.to_string(),
                    }),
                );
                Err(err)
            }
        }
    }
}
