/// Coalesces update requests into at most one refresh per frame.
///
/// Holds a single pending flag. Any number of [`request_update`](Self::request_update)
/// calls before the next refresh collapse into one; [`take`](Self::take) clears
/// the flag *before* evaluation runs, so a request issued during evaluation is
/// served by the following frame.
#[derive(Clone, Debug, Default)]
pub struct RefreshScheduler {
    pending: bool,
    /// Total calls to `request_update`.
    pub requested: u64,
    /// Calls that found a refresh already pending.
    pub coalesced: u64,
    /// Refreshes actually taken.
    pub refreshes: u64,
}

impl RefreshScheduler {
    /// Schedules a refresh. Returns `false` when one was already pending.
    pub fn request_update(&mut self) -> bool {
        self.requested += 1;
        if self.pending {
            self.coalesced += 1;
            return false;
        }
        self.pending = true;
        true
    }

    /// Consumes the pending refresh, if any.
    pub fn take(&mut self) -> bool {
        if !std::mem::take(&mut self.pending) {
            return false;
        }
        self.refreshes += 1;
        true
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle() {
        let mut s = RefreshScheduler::default();
        assert!(!s.is_pending());
        assert!(!s.take());
        assert_eq!(s.refreshes, 0);
    }

    #[test]
    fn burst_of_requests_yields_one_refresh() {
        let mut s = RefreshScheduler::default();
        assert!(s.request_update());
        for _ in 0..49 {
            assert!(!s.request_update());
        }
        assert!(s.take());
        assert!(!s.take(), "second take in the same frame must be empty");
        assert_eq!((s.requested, s.coalesced, s.refreshes), (50, 49, 1));
    }

    #[test]
    fn request_during_refresh_lands_on_next_frame() {
        let mut s = RefreshScheduler::default();
        s.request_update();
        assert!(s.take());
        // Evaluation is running now; the flag is already clear.
        assert!(!s.is_pending());
        assert!(s.request_update());
        assert!(s.take());
        assert_eq!(s.refreshes, 2);
    }
}
