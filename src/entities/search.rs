use serde::{Deserialize, Serialize};

use crate::entities::{Place, PlaceCandidate, Sequence};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchSession {
    pub query: String,
    pub candidates: Vec<PlaceCandidate>,
    pub pending: bool,
    #[serde(skip)]
    requests: Sequence,
}

impl SearchSession {
    /// Replaces the query and drops the current list. Returns the id to tag the
    /// search with, or `None` when the query is empty and nothing is searched.
    pub fn set_query(&mut self, query: String) -> Option<u64> {
        self.candidates.clear();
        self.query = query;

        if self.query.trim().is_empty() {
            self.requests.invalidate();
            self.pending = false;
            return None;
        }

        self.pending = true;
        Some(self.requests.next())
    }

    pub fn apply_results(&mut self, request_id: u64, places: Vec<Place>) -> bool {
        if !self.requests.is_latest(request_id) {
            tracing::info!(request_id, "dropping stale search results");
            return false;
        }

        self.candidates = PlaceCandidate::ranked(places);
        self.pending = false;
        true
    }

    pub fn apply_failure(&mut self, request_id: u64) -> bool {
        if !self.requests.is_latest(request_id) {
            return false;
        }

        self.candidates.clear();
        self.pending = false;
        true
    }

    /// Whether the result list is shown at all.
    pub fn is_shown(&self) -> bool {
        !self.query.trim().is_empty()
    }

    pub fn candidate(&self, id: usize) -> Option<&PlaceCandidate> {
        self.candidates.iter().find(|candidate| candidate.id == id)
    }

    pub fn reset(&mut self) {
        self.requests.invalidate();
        self.query.clear();
        self.candidates.clear();
        self.pending = false;
    }

    pub fn is_current(&self, request_id: u64) -> bool {
        self.requests.is_latest(request_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Coordinate;

    fn place(name: &str) -> Place {
        Place {
            name: name.into(),
            address: format!("{} street", name),
            coordinate: Coordinate::new(33.9, 35.5),
        }
    }

    #[test]
    fn empty_query_shows_nothing() {
        let mut search = SearchSession::default();

        assert_eq!(search.set_query("".into()), None);
        assert!(search.candidates.is_empty());
        assert!(!search.is_shown());
    }

    #[test]
    fn results_replace_the_list_with_ordinals() {
        let mut search = SearchSession::default();
        let id = search.set_query("cafe".into()).unwrap();

        assert!(search.apply_results(id, vec![place("a"), place("b")]));
        assert_eq!(search.candidates.len(), 2);
        assert_eq!(search.candidates[1].id, 1);
        assert_eq!(search.candidate(1).unwrap().name, "b");

        let id = search.set_query("cafes".into()).unwrap();
        assert!(search.candidates.is_empty());
        assert!(search.apply_results(id, vec![place("c")]));
        assert_eq!(search.candidates.len(), 1);
        assert_eq!(search.candidates[0].id, 0);
    }

    #[test]
    fn stale_results_are_dropped() {
        let mut search = SearchSession::default();
        let first = search.set_query("ca".into()).unwrap();
        let second = search.set_query("caf".into()).unwrap();

        assert!(search.apply_results(second, vec![place("cafe")]));
        assert!(!search.apply_results(first, vec![place("car wash")]));
        assert_eq!(search.candidates[0].name, "cafe");
    }

    #[test]
    fn failure_leaves_the_list_empty() {
        let mut search = SearchSession::default();
        let id = search.set_query("cafe".into()).unwrap();

        assert!(search.apply_failure(id));
        assert!(search.candidates.is_empty());
        assert!(!search.pending);
    }

    #[test]
    fn clearing_the_query_invalidates_in_flight_searches() {
        let mut search = SearchSession::default();
        let id = search.set_query("cafe".into()).unwrap();
        search.set_query("".into());

        assert!(!search.apply_results(id, vec![place("cafe")]));
        assert!(search.candidates.is_empty());
    }
}
