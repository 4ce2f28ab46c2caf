//! Monotonic stopwatch for bracketing kernel calls
//!
//! A start mark and an end mark are recorded around the measured region;
//! the elapsed time is only available once both have been recorded.

use crate::error::Result;
use crate::timer_error;
use std::time::{Duration, Instant};

/// Start/stop wall-clock timer backed by [`Instant`]
#[derive(Debug, Clone, Default)]
pub struct Stopwatch {
    started_at: Option<Instant>,
    stopped_at: Option<Instant>,
}

impl Stopwatch {
    /// Create a stopwatch with no marks recorded
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the start mark, clearing any previous end mark
    #[inline]
    pub fn start(&mut self) {
        self.stopped_at = None;
        self.started_at = Some(Instant::now());
    }

    /// Record the end mark
    #[inline]
    pub fn stop(&mut self) {
        self.stopped_at = Some(Instant::now());
    }

    /// Whether both marks have been recorded
    pub fn is_complete(&self) -> bool {
        self.started_at.is_some() && self.stopped_at.is_some()
    }

    /// Time between the start and end marks
    pub fn elapsed(&self) -> Result<Duration> {
        let start = self
            .started_at
            .ok_or_else(|| timer_error!("Stopwatch has not been started"))?;
        let end = self
            .stopped_at
            .ok_or_else(|| timer_error!("Stopwatch has not been stopped"))?;
        Ok(end.saturating_duration_since(start))
    }

    /// Time a single call of `f`, returning its value and the elapsed time
    pub fn time<T, F>(f: F) -> Result<(T, Duration)>
    where
        F: FnOnce() -> T,
    {
        let mut watch = Stopwatch::new();
        watch.start();
        let value = f();
        watch.stop();
        Ok((value, watch.elapsed()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BenchError;

    #[test]
    fn test_start_stop_elapsed() {
        let mut watch = Stopwatch::new();
        watch.start();
        std::thread::sleep(Duration::from_millis(10));
        watch.stop();

        assert!(watch.is_complete());
        assert!(watch.elapsed().unwrap() >= Duration::from_millis(5));
    }

    #[test]
    fn test_elapsed_before_marks_is_error() {
        let mut watch = Stopwatch::new();
        assert!(matches!(watch.elapsed(), Err(BenchError::Timer(_))));

        watch.start();
        assert!(!watch.is_complete());
        assert!(matches!(watch.elapsed(), Err(BenchError::Timer(_))));
    }

    #[test]
    fn test_restart_clears_end_mark() {
        let mut watch = Stopwatch::new();
        watch.start();
        watch.stop();
        watch.start();
        assert!(watch.elapsed().is_err());
    }

    #[test]
    fn test_time_closure() {
        let (value, elapsed) = Stopwatch::time(|| {
            std::thread::sleep(Duration::from_millis(2));
            42
        })
        .unwrap();
        assert_eq!(value, 42);
        assert!(elapsed >= Duration::from_millis(1));
    }
}
