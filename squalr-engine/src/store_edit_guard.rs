use squalr_engine_api::structures::candidate::Candidate;
use std::sync::MutexGuard;

/// Holds the store mutex for the duration of an in-progress edit. The
/// refresh loop blocks on the same mutex, so it cannot observe or clobber
/// a row mid-edit. Dropping the guard — on commit or on cancel — releases
/// the mutex; there is no separate commit/abort step to forget.
pub struct StoreEditGuard<'a> {
    guard: MutexGuard<'a, Vec<Candidate>>,
    index: usize,
}

impl<'a> StoreEditGuard<'a> {
    pub(crate) fn new(
        guard: MutexGuard<'a, Vec<Candidate>>,
        index: usize,
    ) -> Self {
        Self { guard, index }
    }

    pub fn candidate(&self) -> Option<&Candidate> {
        self.guard.get(self.index)
    }

    pub fn candidate_mut(&mut self) -> Option<&mut Candidate> {
        self.guard.get_mut(self.index)
    }
}
