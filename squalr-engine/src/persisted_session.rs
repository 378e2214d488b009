use serde::{Deserialize, Serialize};
use squalr_engine_api::structures::candidate::Candidate;

/// The on-disk shape of a saved session: the store list plus free-form
/// notes. The concrete JSON layout is this crate's choice; the only
/// contract is that a serialize/deserialize round-trip preserves every
/// field, matching the teacher's settings-file persistence idiom.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PersistedSession {
    pub store: Vec<Candidate>,
    pub notes: String,
}

impl PersistedSession {
    pub fn new(
        store: Vec<Candidate>,
        notes: String,
    ) -> Self {
        Self { store, notes }
    }
}
