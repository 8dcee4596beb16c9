use serde::{Deserialize, Serialize};

/// Issues monotonically increasing request ids for one field of the session.
///
/// A completion is applied only while its id is still the latest one issued,
/// so a slow lookup can never overwrite the answer to a newer request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    latest: u64,
}

impl Sequence {
    pub fn next(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn is_latest(&self, id: u64) -> bool {
        id != 0 && id == self.latest
    }

    /// Invalidates whatever is in flight without issuing a new request.
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }

    pub fn latest(&self) -> u64 {
        self.latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_latest_id_is_current() {
        let mut sequence = Sequence::default();
        assert!(!sequence.is_latest(0));

        let first = sequence.next();
        let second = sequence.next();

        assert!(!sequence.is_latest(first));
        assert!(sequence.is_latest(second));

        sequence.invalidate();
        assert!(!sequence.is_latest(second));
    }
}
