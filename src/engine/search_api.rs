use super::{Command, Owner};

use crate::{
    entities::{Place, RetryAction},
    error::{invalid_input_error, Error},
};

impl Owner {
    #[tracing::instrument(skip(self))]
    pub(super) fn set_query(&mut self, query: String) {
        self.session.resolve(&RetryAction::Search);

        let request_id = match self.session.search.set_query(query.clone()) {
            Some(request_id) => request_id,
            None => return,
        };

        let places = self.providers.places.clone();
        let region = self.session.map.region;

        self.dispatch(async move {
            Command::SearchResolved {
                request_id,
                result: places.search(query, region).await,
            }
        });
    }

    #[tracing::instrument(skip(self))]
    pub(super) fn select_candidate(&mut self, id: usize) -> Result<(), Error> {
        let candidate = self
            .session
            .search
            .candidate(id)
            .cloned()
            .ok_or_else(invalid_input_error)?;

        self.set_destination(candidate.coordinate, Some(candidate.name));
        self.session.close_search();

        Ok(())
    }

    #[tracing::instrument(skip(self, result))]
    pub(super) fn search_resolved(&mut self, request_id: u64, result: Result<Vec<Place>, Error>) {
        match result {
            Ok(places) => {
                tracing::info!(count = places.len(), "search resolved");
                self.session.search.apply_results(request_id, places);
            }
            Err(err) => {
                tracing::warn!("place search failed: {:?}", err);

                if self.session.search.apply_failure(request_id) {
                    self.session.surface(&err, Some(RetryAction::Search));
                }
            }
        }
    }
}
