//! Last-request-wins bookkeeping for list reloads
//!
//! Every reload takes a fresh [`RequestToken`]. When its response arrives
//! the token is compared with the latest one issued; an older token means a
//! newer reload has started and the response is dropped.

use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one issued request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Monotonic request counter for one resource
#[derive(Debug, Default)]
pub struct RequestGeneration {
    latest: AtomicU64,
}

impl RequestGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding every earlier token
    pub fn issue(&self) -> RequestToken {
        RequestToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `token` is still the most recent request
    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }

    /// Discard whatever is in flight without starting a new request
    pub fn cancel(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_token_wins() {
        let generation = RequestGeneration::new();
        let first = generation.issue();
        assert!(generation.is_current(first));

        let second = generation.issue();
        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
        assert!(second > first);
    }

    #[test]
    fn test_cancel_invalidates_in_flight() {
        let generation = RequestGeneration::new();
        let token = generation.issue();
        generation.cancel();
        assert!(!generation.is_current(token));
    }
}
