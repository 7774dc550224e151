// Message types crossing the session facade boundary.
//
// Intents are the discrete external events of the system (user actions,
// scheduled animation ticks); UiUpdates flow the other way to whatever
// rendering layer is attached. Both sides are serde-serializable so the
// boundary can be driven over a wire as well as in-process.

use serde::{Deserialize, Serialize};

use crate::session::facade::Phase;

/// An external event applied to the session, one at a time, in arrival
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    /// Bulk-import names from raw multi-line text.
    ImportNames { raw: String },
    /// Remove one name from the roster (and the used set).
    RemoveName { name: String },
    /// Empty roster, used set, history, and any pending result.
    ClearAll,
    /// Request a draw of `count` winners (count is clamped, never rejected).
    Draw { count: usize },
    /// One scheduled animation tick. Ticks from a superseded sequence carry
    /// a stale generation and are discarded.
    AnimationTick { generation: u64 },
    /// Abandon the in-flight animation sequence without committing.
    CancelDraw,
    /// Reverse the most recent draw.
    Undo,
    /// Dismiss the shown result and return to idle.
    ChooseAgain,
    /// Clear the used set, starting a fresh no-repeat cycle.
    ResetUsed,
    /// Clear the history ledger alone.
    ClearHistory,
    /// Split the roster into `team_count` balanced teams.
    Partition { team_count: usize },
}

/// Why a requested action could not run. Reported as state for the UI to
/// surface (a disabled control plus a recovery affordance), never an
/// error crossing the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockedReason {
    /// No candidates at all.
    EmptyRoster,
    /// Every candidate has been drawn this cycle; reset to recover.
    ExhaustedPool,
}

/// State pushed to the rendering layer after each applied intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiUpdate {
    /// Full state snapshot; sent whenever anything observable changed.
    Snapshot(SessionSnapshot),
    /// An animation sequence began; the scheduler should deliver
    /// `ticks` AnimationTick intents tagged with `generation`.
    SelectionStarted { generation: u64, ticks: usize },
    /// One reveal tick: highlight this name.
    Highlight { name: String },
    /// The draw committed with these winners, in permutation order.
    DrawComplete { winners: Vec<String> },
    /// The most recent draw was reversed.
    UndoApplied { names: Vec<String> },
    /// A fresh partition of the roster.
    PartitionReady { teams: Vec<Vec<String>> },
    /// The requested action cannot run in the current state.
    Blocked { reason: BlockedReason },
}

/// Snapshot of everything the rendering layer binds to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    /// All names, insertion order.
    pub names: Vec<String>,
    /// Names drawn this cycle, draw order.
    pub used: Vec<String>,
    pub available: usize,
    /// Winners of the draw currently shown, if any.
    pub last_winners: Vec<String>,
    /// History names, newest first.
    pub history: Vec<String>,
    /// Name highlighted by the in-flight animation, if any.
    pub highlighted: Option<String>,
}
