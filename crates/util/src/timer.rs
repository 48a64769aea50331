// Checkpoint timer that reports through a log sink.

use crate::clock::Clock;
use crate::logger::LogSink;

/// Simple performance tracer. Create an instance to start timing,
/// then call [`checkpoint`](Self::checkpoint) at interesting points
/// and [`end_total`](Self::end_total) when done. Each call logs the
/// time since the previous checkpoint and since the start.
pub struct TraceTimer<'a> {
    log: &'a dyn LogSink,
    clock: &'a dyn Clock,
    name: String,
    start_millis: u64,
    point_millis: u64,
}

impl<'a> TraceTimer<'a> {
    /// Starts timing now. `name` labels every output line.
    pub fn new(name: &str, log: &'a dyn LogSink, clock: &'a dyn Clock) -> Self {
        let now = clock.now_millis();
        Self {
            log,
            clock,
            name: name.to_string(),
            start_millis: now,
            point_millis: now,
        }
    }

    /// Forces the next checkpoint comparison time without logging.
    pub fn set_point(&mut self) {
        self.point_millis = self.clock.now_millis();
    }

    /// Logs the time elapsed since the last checkpoint and since the
    /// start, then resets the checkpoint.
    pub fn checkpoint(&mut self, msg: &str) {
        let now = self.clock.now_millis();
        let from_point = now - self.point_millis;
        let from_start = now - self.start_millis;

        self.log.log(&format!(
            "[RT: {}/{}] - Last: {}ms - Total: {}ms",
            self.name, msg, from_point, from_start
        ));

        self.point_millis = now;
    }

    /// Logs the total time elapsed since the start.
    pub fn end_total(&self) {
        let from_start = self.clock.now_millis() - self.start_millis;
        self.log.log(&format!("[RT: {}/End] - Total: {}ms", self.name, from_start));
    }
}
