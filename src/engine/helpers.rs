use std::future::Future;

use super::{Command, Owner};

use crate::{
    entities::RetryAction,
    error::{invalid_state_error, Error},
};

impl Owner {
    /// Runs a provider call off the session task and feeds its outcome back in
    /// as a command.
    pub(super) fn dispatch<F>(&self, call: F)
    where
        F: Future<Output = Command> + Send + 'static,
    {
        let completions = self.completions.clone();

        tokio::spawn(async move {
            let command = call.await;

            if completions.send(command).await.is_err() {
                tracing::warn!("session closed before a completion was delivered");
            }
        });
    }

    /// Re-runs the operation offered by the surfaced error.
    #[tracing::instrument(skip(self))]
    pub(super) fn retry(&mut self) -> Result<(), Error> {
        let action = self.session.take_retry().ok_or_else(invalid_state_error)?;

        tracing::info!("retrying {:?}", action);

        match action {
            RetryAction::LocationFix => self.refresh_location(),
            RetryAction::RouteLookup => self.reissue_route(),
            RetryAction::Search => {
                let query = self.session.search.query.clone();
                self.set_query(query);
            }
            RetryAction::Confirm => self.confirm(None).map_err(|(_, err)| err)?,
            RetryAction::Cancel { booking_id } => {
                self.cancel(booking_id, None).map_err(|(_, err)| err)?
            }
        }

        Ok(())
    }
}
