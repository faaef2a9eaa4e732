// src/dev_utils.rs

//! Profiling helpers for the resolution engine.

use std::time::{Duration, Instant};

/// A RAII timer for a single resolution pass.
/// It records the start time on creation and, when trace logging is enabled,
/// logs the elapsed time when dropped. A pass that suspends moves its timer
/// into the deferred work, so the report covers settling and applying too.
#[derive(Debug)]
pub struct PassTimer {
    pass: usize,
    start: Instant,
}

impl PassTimer {
    /// Starts timing pass number `pass`.
    pub fn new(pass: usize) -> Self {
        Self {
            pass,
            start: Instant::now(),
        }
    }

    /// The pass being timed.
    pub fn pass(&self) -> usize {
        self.pass
    }

    /// Time since the timer started.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for PassTimer {
    fn drop(&mut self) {
        if log::log_enabled!(log::Level::Trace) {
            log::trace!("PROFILE [pass {}]: {} µs", self.pass, self.elapsed().as_micros());
        }
    }
}
