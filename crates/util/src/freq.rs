// Event frequency counter, e.g. for frame-rate display.

use std::sync::Arc;

use crate::clock::Clock;

/// Counts events and reports an average per second since the first
/// event. Increment the counter each time an event happens; the
/// average is recomputed lazily when read.
///
/// The average stays at `0.0` until at least one whole second has
/// elapsed between the first and the most recent event.
pub struct FreqCounter {
    clock: Arc<dyn Clock>,
    count: u64,
    start_count: u64,
    start_millis: Option<u64>,
    last_millis: u64,
    avg_per_sec: f64,
    need_update: bool,
}

impl FreqCounter {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            count: 0,
            start_count: 0,
            start_millis: None,
            last_millis: 0,
            avg_per_sec: 0.0,
            need_update: true,
        }
    }

    /// Records one event.
    pub fn increment(&mut self) {
        self.add(1);
    }

    /// Records `n` events at once (e.g. bytes received in a chunk).
    pub fn add(&mut self, n: u64) {
        self.count += n;
        self.last_millis = self.clock.now_millis();
        self.need_update = true;

        if self.start_millis.is_none() {
            // First event anchors the measurement window; it is not
            // itself part of the rate.
            self.start_millis = Some(self.last_millis);
            self.start_count = self.count;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Average events per second over whole elapsed seconds.
    pub fn avg_per_sec(&mut self) -> f64 {
        self.update_average();
        self.avg_per_sec
    }

    fn update_average(&mut self) {
        let Some(start) = self.start_millis else {
            return;
        };
        if !self.need_update {
            return;
        }

        let secs = self.last_millis.saturating_sub(start) / 1000;
        if secs > 0 {
            let events = self.count - self.start_count;
            self.avg_per_sec = events as f64 / secs as f64;
            // Only clear the flag once an average was really computed.
            self.need_update = false;
        }
    }
}
