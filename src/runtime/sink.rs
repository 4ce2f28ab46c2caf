//! Output sinks the harness reports through
//!
//! The harness never prints directly. Result lines, error lines and score
//! lines go to a [`ResultSink`], so the host decides where they end up.

/// Receiver for harness output
pub trait ResultSink {
    /// Per-kernel detail line (only emitted in verbose mode)
    fn notify_result(&mut self, line: &str);

    /// Sanity-check failures and kernel faults
    fn notify_error(&mut self, line: &str);

    /// Per-kernel and aggregate score lines
    fn notify_score(&mut self, line: &str);
}

/// Prints results and scores to stdout, errors to stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl ResultSink for ConsoleSink {
    fn notify_result(&mut self, line: &str) {
        println!("{}", line);
    }

    fn notify_error(&mut self, line: &str) {
        eprintln!("{}", line);
    }

    fn notify_score(&mut self, line: &str) {
        println!("{}", line);
    }
}

/// Routes every line through the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ResultSink for LogSink {
    fn notify_result(&mut self, line: &str) {
        log::info!("{}", line);
    }

    fn notify_error(&mut self, line: &str) {
        log::error!("{}", line);
    }

    fn notify_score(&mut self, line: &str) {
        log::info!("{}", line);
    }
}

/// Sink built from three callbacks
pub struct FnSink<R, E, S>
where
    R: FnMut(&str),
    E: FnMut(&str),
    S: FnMut(&str),
{
    on_result: R,
    on_error: E,
    on_score: S,
}

impl<R, E, S> FnSink<R, E, S>
where
    R: FnMut(&str),
    E: FnMut(&str),
    S: FnMut(&str),
{
    /// Create a sink from result, error and score callbacks
    pub fn new(on_result: R, on_error: E, on_score: S) -> Self {
        Self {
            on_result,
            on_error,
            on_score,
        }
    }
}

impl<R, E, S> ResultSink for FnSink<R, E, S>
where
    R: FnMut(&str),
    E: FnMut(&str),
    S: FnMut(&str),
{
    fn notify_result(&mut self, line: &str) {
        (self.on_result)(line)
    }

    fn notify_error(&mut self, line: &str) {
        (self.on_error)(line)
    }

    fn notify_score(&mut self, line: &str) {
        (self.on_score)(line)
    }
}

/// Which callback a buffered line arrived on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Result,
    Error,
    Score,
}

/// Keeps every line in memory, in arrival order
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    lines: Vec<(Channel, String)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All lines with their channel
    pub fn lines(&self) -> &[(Channel, String)] {
        &self.lines
    }

    /// Lines received on one channel
    pub fn on(&self, channel: Channel) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|(c, _)| *c == channel)
            .map(|(_, l)| l.as_str())
            .collect()
    }
}

impl ResultSink for MemorySink {
    fn notify_result(&mut self, line: &str) {
        self.lines.push((Channel::Result, line.to_string()));
    }

    fn notify_error(&mut self, line: &str) {
        self.lines.push((Channel::Error, line.to_string()));
    }

    fn notify_score(&mut self, line: &str) {
        self.lines.push((Channel::Score, line.to_string()));
    }
}
