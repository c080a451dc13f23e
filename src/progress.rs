//! Progress reporting for batch checks.
//!
//! [`Progress`] owns the `Closed → Open → Closed` lifecycle and delegates
//! drawing to a [`ProgressReporter`]. The terminal implementation is
//! [`BarReporter`], an `indicatif` bar on stderr.

use crate::error::ProgressError;
use indicatif::{ProgressBar, ProgressStyle};
use std::cell::RefCell;
use std::rc::Rc;

/// Progress handle shared between a command and its post-check callback.
pub type SharedProgress = Rc<RefCell<Progress>>;

/// Draws progress for one batch at a time.
pub trait ProgressReporter {
    fn start(&mut self, total: u64, message: &str);
    fn tick(&mut self);
    fn finish(&mut self);
}

pub struct BarReporter {
    bar: Option<ProgressBar>,
}

impl BarReporter {
    pub fn new() -> Self {
        Self { bar: None }
    }
}

impl Default for BarReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for BarReporter {
    fn start(&mut self, total: u64, message: &str) {
        let pb = ProgressBar::new(total);
        let template = "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}";
        if let Ok(style) = ProgressStyle::default_bar().template(template) {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb.set_message(message.to_string());
        self.bar = Some(pb);
    }

    fn tick(&mut self) {
        if let Some(pb) = &self.bar {
            pb.inc(1);
        }
    }

    fn finish(&mut self) {
        if let Some(pb) = self.bar.take() {
            pb.finish();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Closed,
    Open { total: u64, position: u64 },
}

pub struct Progress {
    reporter: Box<dyn ProgressReporter>,
    state: State,
}

impl Progress {
    pub fn new(reporter: Box<dyn ProgressReporter>) -> Self {
        Self {
            reporter,
            state: State::Closed,
        }
    }

    pub fn shared(reporter: Box<dyn ProgressReporter>) -> SharedProgress {
        Rc::new(RefCell::new(Self::new(reporter)))
    }

    /// Opens a bar sized to `total`.
    ///
    /// Only one bar may be open at a time; a second `open` means two batches
    /// are running through the same command and is rejected.
    pub fn open(&mut self, total: u64) -> Result<(), ProgressError> {
        if self.is_open() {
            return Err(ProgressError::AlreadyOpen);
        }

        self.reporter
            .start(total, &format!("Checking {} packages", total));
        self.state = State::Open { total, position: 0 };
        Ok(())
    }

    /// Advances an open bar by one. Returns `false` (and does nothing) when closed.
    pub fn tick(&mut self) -> bool {
        match &mut self.state {
            State::Open { position, .. } => {
                *position += 1;
                self.reporter.tick();
                true
            }
            State::Closed => false,
        }
    }

    /// Closes the bar. Closing an already closed bar is a no-op.
    pub fn finish(&mut self) {
        if self.is_open() {
            self.reporter.finish();
            self.state = State::Closed;
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, State::Open { .. })
    }

    pub fn position(&self) -> Option<u64> {
        match self.state {
            State::Open { position, .. } => Some(position),
            State::Closed => None,
        }
    }

    pub fn total(&self) -> Option<u64> {
        match self.state {
            State::Open { total, .. } => Some(total),
            State::Closed => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct Recorder {
        events: Rc<RefCell<Vec<String>>>,
    }

    impl ProgressReporter for Recorder {
        fn start(&mut self, total: u64, message: &str) {
            self.events
                .borrow_mut()
                .push(format!("start {} {}", total, message));
        }

        fn tick(&mut self) {
            self.events.borrow_mut().push("tick".to_string());
        }

        fn finish(&mut self) {
            self.events.borrow_mut().push("finish".to_string());
        }
    }

    #[test]
    fn test_open_tick_finish() {
        let recorder = Recorder::default();
        let mut progress = Progress::new(Box::new(recorder.clone()));

        progress.open(2).unwrap();
        assert!(progress.tick());
        assert!(progress.tick());
        assert_eq!(progress.position(), Some(2));
        assert_eq!(progress.total(), Some(2));
        progress.finish();

        assert!(!progress.is_open());
        assert_eq!(
            *recorder.events.borrow(),
            vec!["start 2 Checking 2 packages", "tick", "tick", "finish"]
        );
    }

    #[test]
    fn test_open_twice_is_rejected() {
        let mut progress = Progress::new(Box::new(Recorder::default()));
        progress.open(3).unwrap();
        assert_eq!(progress.open(5), Err(ProgressError::AlreadyOpen));
        assert_eq!(progress.total(), Some(3));
    }

    #[test]
    fn test_finish_twice_is_noop() {
        let recorder = Recorder::default();
        let mut progress = Progress::new(Box::new(recorder.clone()));
        progress.open(1).unwrap();
        progress.finish();
        progress.finish();

        let finishes = recorder
            .events
            .borrow()
            .iter()
            .filter(|e| *e == "finish")
            .count();
        assert_eq!(finishes, 1);
    }

    #[test]
    fn test_tick_while_closed_does_nothing() {
        let recorder = Recorder::default();
        let mut progress = Progress::new(Box::new(recorder.clone()));
        assert!(!progress.tick());
        assert!(recorder.events.borrow().is_empty());
    }

    #[test]
    fn test_reopen_after_finish() {
        let mut progress = Progress::new(Box::new(Recorder::default()));
        progress.open(1).unwrap();
        progress.finish();
        assert!(progress.open(4).is_ok());
        assert_eq!(progress.position(), Some(0));
    }

    #[test]
    fn test_bar_reporter_does_not_panic() {
        let mut reporter = BarReporter::new();
        reporter.tick();
        reporter.start(2, "Checking 2 packages");
        reporter.tick();
        reporter.finish();
        reporter.finish();
    }
}
