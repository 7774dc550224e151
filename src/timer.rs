// Countdown timer boundary: whole-second countdown with pause/resume.
//
// The clock itself is a separate tool; the contract here is what the
// session composes with. `Countdown` is the plain decrementing counter
// advanced by an external tick source, matching the system's
// everything-is-a-tick event model.

use serde::{Deserialize, Serialize};

/// A countdown request: duration in whole seconds plus a display title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownRequest {
    pub seconds: u32,
    pub title: String,
}

/// Countdown collaborator contract.
pub trait CountdownTimer {
    fn start(&mut self, request: CountdownRequest);
    fn pause(&mut self);
    fn resume(&mut self);
    fn reset(&mut self);
    /// Seconds left; zero once finished.
    fn remaining(&self) -> u32;
    /// True exactly once the counter reaches zero.
    fn finished(&self) -> bool;
}

/// Minimal countdown driven by once-per-second ticks from the caller.
#[derive(Debug, Default)]
pub struct Countdown {
    request: Option<CountdownRequest>,
    remaining: u32,
    paused: bool,
}

impl Countdown {
    pub fn new() -> Self {
        Countdown::default()
    }

    pub fn title(&self) -> Option<&str> {
        self.request.as_ref().map(|r| r.title.as_str())
    }

    /// Advance by one second. Returns true when this tick finished the
    /// countdown (the completion callback moment).
    pub fn tick(&mut self) -> bool {
        if self.paused || self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }
}

impl CountdownTimer for Countdown {
    fn start(&mut self, request: CountdownRequest) {
        self.remaining = request.seconds;
        self.paused = false;
        self.request = Some(request);
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn resume(&mut self) {
        self.paused = false;
    }

    fn reset(&mut self) {
        self.remaining = self.request.as_ref().map(|r| r.seconds).unwrap_or(0);
        self.paused = false;
    }

    fn remaining(&self) -> u32 {
        self.remaining
    }

    fn finished(&self) -> bool {
        self.request.is_some() && self.remaining == 0
    }
}
