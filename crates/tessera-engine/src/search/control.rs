//! Search control: wall-clock and node budgets.

use std::time::{Duration, Instant};

/// Decides when a search must stop.
///
/// Checked at every negamax and quiescence node. Once a limit fires the
/// control latches, so later checks return immediately without touching the
/// clock.
#[derive(Debug)]
pub struct SearchControl {
    start: Instant,
    time_limit: Option<Duration>,
    node_limit: Option<u64>,
    stopped: bool,
}

impl SearchControl {
    /// Start the clock now with the given optional budgets.
    pub fn new(time_limit: Option<Duration>, node_limit: Option<u64>) -> Self {
        Self {
            start: Instant::now(),
            time_limit,
            node_limit,
            stopped: false,
        }
    }

    /// Return `true` if the search must abort after `nodes` visited nodes.
    pub fn should_stop(&mut self, nodes: u64) -> bool {
        if self.stopped {
            return true;
        }
        if let Some(limit) = self.node_limit
            && nodes >= limit
        {
            self.stopped = true;
        }
        if let Some(limit) = self.time_limit
            && self.start.elapsed() >= limit
        {
            self.stopped = true;
        }
        self.stopped
    }

    /// Time since the control was created.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infinite_never_stops() {
        let mut control = SearchControl::new(None, None);
        assert!(!control.should_stop(0));
        assert!(!control.should_stop(u64::MAX));
        assert!(!control.stopped);
    }

    #[test]
    fn node_limit_latches() {
        let mut control = SearchControl::new(None, Some(100));
        assert!(!control.should_stop(99));
        assert!(control.should_stop(100));
        // stays stopped even if asked with a smaller count
        assert!(control.should_stop(1));
        assert!(control.stopped);
    }

    #[test]
    fn zero_time_limit_stops_immediately() {
        let mut control = SearchControl::new(Some(Duration::ZERO), None);
        assert!(control.should_stop(0));
    }

    #[test]
    fn generous_time_limit_runs() {
        let mut control = SearchControl::new(Some(Duration::from_secs(3600)), None);
        assert!(!control.should_stop(1));
        assert!(control.elapsed() < Duration::from_secs(3600));
    }
}
