// Draw engine: random selection without replacement and one-level undo.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::protocol::BlockedReason;

use super::roster::Roster;

/// The ordered winners of one draw. Winner order is the shuffle order of
/// the underlying permutation, which is what result labels ("1.", "2.")
/// refer to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawResult {
    pub winners: Vec<String>,
}

/// Performs draws from a roster's available pool and tracks the single
/// most recent draw for undo.
///
/// The no-repeat cycle itself lives in [`Roster`] (the used set); the
/// engine mutates it on draw/undo/reset.
#[derive(Debug, Clone, Default)]
pub struct DrawEngine {
    last_draw: Option<Vec<String>>,
}

impl DrawEngine {
    pub fn new() -> Self {
        DrawEngine::default()
    }

    /// Draw up to `requested` names from the available pool.
    ///
    /// The requested count is clamped to `[1, available]`; out-of-range
    /// counts are never rejected. Winners are the first `count` elements
    /// of a uniform shuffle of the available pool. On success the winners
    /// are marked used and become the undo token, replacing any previous
    /// one.
    ///
    /// An empty roster or an exhausted pool is a reported condition, not a
    /// panic; the caller surfaces it as a recovery affordance.
    pub fn draw<R: Rng>(
        &mut self,
        roster: &mut Roster,
        requested: usize,
        rng: &mut R,
    ) -> Result<DrawResult, BlockedReason> {
        if roster.is_empty() {
            return Err(BlockedReason::EmptyRoster);
        }
        let mut pool = roster.available();
        if pool.is_empty() {
            return Err(BlockedReason::ExhaustedPool);
        }

        let count = requested.clamp(1, pool.len());
        pool.shuffle(rng);
        pool.truncate(count);

        roster.mark_used(&pool);
        self.last_draw = Some(pool.clone());
        Ok(DrawResult { winners: pool })
    }

    /// One animation tick: a uniformly random member of the available
    /// pool. Carries no state change; `None` when nothing is available.
    pub fn highlight_tick<R: Rng>(&self, roster: &Roster, rng: &mut R) -> Option<String> {
        let pool = roster.available();
        pool.choose(rng).cloned()
    }

    /// Reverse the most recent draw, returning its winners to the pool.
    ///
    /// No-op when no token exists (already undone, or cleared by a reset).
    /// Returns the undone names for reporting.
    pub fn undo(&mut self, roster: &mut Roster) -> Option<Vec<String>> {
        let names = self.last_draw.take()?;
        roster.unmark_used(&names);
        Some(names)
    }

    /// Start a fresh no-repeat cycle: clears the used set and the undo
    /// token. Roster and history are untouched.
    pub fn reset_used(&mut self, roster: &mut Roster) {
        roster.reset_used();
        self.last_draw = None;
    }

    /// Drop a name from the undo token (used when the name leaves the
    /// roster while a token is held).
    pub fn forget_name(&mut self, name: &str) {
        if let Some(last) = self.last_draw.as_mut() {
            last.retain(|n| n != name);
            if last.is_empty() {
                self.last_draw = None;
            }
        }
    }

    /// Drop the undo token without touching the roster.
    pub fn clear(&mut self) {
        self.last_draw = None;
    }

    pub fn last_draw(&self) -> Option<&[String]> {
        self.last_draw.as_deref()
    }
}
