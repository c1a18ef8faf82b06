//! Concurrency instrumentation shared by the mock providers.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Records call activity across mock providers.
///
/// Tests share one gauge between the text and structure mocks to observe
/// how many pipeline invocations are in flight at once and in which order
/// files were dispatched.
#[derive(Debug, Default)]
pub struct CallGauge {
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    total: AtomicUsize,
    calls: Mutex<Vec<String>>,
}

impl CallGauge {
    /// Creates a fresh gauge.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a call as started; the returned guard ends it on drop.
    pub(crate) fn enter(&self, label: &str) -> GaugeGuard<'_> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        self.total.fetch_add(1, Ordering::SeqCst);
        self.calls
            .lock()
            .expect("gauge lock poisoned")
            .push(label.to_string());
        GaugeGuard { gauge: self }
    }

    /// Highest number of simultaneously in-flight calls observed so far.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Number of calls currently in flight.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Total number of calls started.
    pub fn total(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    /// Labels of all started calls, in start order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("gauge lock poisoned").clone()
    }
}

/// Guard that decrements the in-flight counter when dropped.
pub(crate) struct GaugeGuard<'a> {
    gauge: &'a CallGauge,
}

impl Drop for GaugeGuard<'_> {
    fn drop(&mut self) {
        self.gauge.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_in_flight_and_total() {
        let gauge = CallGauge::new();

        {
            let _a = gauge.enter("a");
            let _b = gauge.enter("b");
            assert_eq!(gauge.in_flight(), 2);
            assert_eq!(gauge.max_in_flight(), 2);
        }

        assert_eq!(gauge.in_flight(), 0);
        assert_eq!(gauge.max_in_flight(), 2);
        assert_eq!(gauge.total(), 2);
        assert_eq!(gauge.calls(), vec!["a", "b"]);
    }
}
