use std::sync::atomic::{AtomicU64, Ordering};

/// Hands out request tokens so only the most recent lookup may apply its
/// result.
#[derive(Debug, Default)]
pub struct LookupSequencer {
    latest: AtomicU64,
}

impl LookupSequencer {
    pub fn new() -> Self {
        LookupSequencer::default()
    }

    /// Token for a new request; every earlier token becomes stale.
    pub fn next(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Make every issued token stale without starting a new request.
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }

    pub fn is_current(&self, token: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == token
    }
}
