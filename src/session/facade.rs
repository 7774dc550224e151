// Session facade: the guarded state machine that applies external intents.
//
// All mutation funnels through `apply`, one intent at a time. The facade
// owns the roster, draw engine, and history, decides which intents are
// legal in the current phase, and reports the observable result of each
// intent as UiUpdates. Persistence is the caller's job: `apply` flags
// when committed state changed and the orchestrator saves after the fact.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::protocol::{BlockedReason, Intent, SessionSnapshot, UiUpdate};

use super::draw::{DrawEngine, DrawResult};
use super::history::History;
use super::roster::Roster;
use super::teams;

/// Where the session machine currently is. There is no terminal phase;
/// the machine runs for the lifetime of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No selection in progress, no result shown.
    Idle,
    /// Animation sequence running; roster mutation and further draws are
    /// not accepted.
    Selecting,
    /// A draw result is on display; undo and choose-again are offered.
    ResultShown,
}

/// An animation sequence in flight.
#[derive(Debug, Clone)]
struct PendingDraw {
    /// Requested winner count (clamped at commit time).
    count: usize,
    /// Ticks left before the draw commits.
    remaining: usize,
}

/// The result of applying one intent.
#[derive(Debug, Default)]
pub struct Applied {
    pub updates: Vec<UiUpdate>,
    /// Whether committed state (roster / used set / history) changed and
    /// should be persisted.
    pub dirty: bool,
}

impl Applied {
    fn none() -> Self {
        Applied::default()
    }
}

pub struct SessionFacade {
    roster: Roster,
    engine: DrawEngine,
    history: History,
    phase: Phase,
    pending: Option<PendingDraw>,
    last_result: Option<DrawResult>,
    highlighted: Option<String>,
    /// Identifies the current animation sequence. Bumped whenever a new
    /// sequence starts or the in-flight one is abandoned, so ticks from a
    /// superseded sequence are discarded instead of committing anything.
    generation: u64,
    tick_count: usize,
    rng: StdRng,
}

impl SessionFacade {
    /// Create an idle session with an empty roster.
    ///
    /// `tick_count` is the length of the reveal animation; zero commits
    /// draws immediately with no animation.
    pub fn new(tick_count: usize) -> Self {
        SessionFacade::with_rng(tick_count, StdRng::from_entropy())
    }

    /// Create a session with an explicit RNG (deterministic in tests).
    pub fn with_rng(tick_count: usize, rng: StdRng) -> Self {
        SessionFacade {
            roster: Roster::new(),
            engine: DrawEngine::new(),
            history: History::new(),
            phase: Phase::Idle,
            pending: None,
            last_result: None,
            highlighted: None,
            generation: 0,
            tick_count,
            rng,
        }
    }

    /// Replace roster, used set, and history with persisted state.
    ///
    /// Input is sanitized (the used set is pruned to roster members) and
    /// the machine returns to Idle with no pending selection or undo
    /// token, as after a restart.
    pub fn restore(&mut self, names: Vec<String>, used: Vec<String>, history: Vec<String>) {
        self.roster = Roster::from_parts(names, used);
        self.history = History::from_names(history);
        self.engine = DrawEngine::new();
        self.phase = Phase::Idle;
        self.pending = None;
        self.last_result = None;
        self.highlighted = None;
        self.generation += 1;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Build the full snapshot the rendering layer binds to.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            names: self.roster.names().to_vec(),
            used: self.roster.used().to_vec(),
            available: self.roster.available_count(),
            last_winners: self
                .last_result
                .as_ref()
                .map(|r| r.winners.clone())
                .unwrap_or_default(),
            history: self.history.names(),
            highlighted: self.highlighted.clone(),
        }
    }

    /// Apply one intent and report its observable outcome.
    ///
    /// Intents that are not legal in the current phase are dropped: the
    /// UI disables the corresponding affordances, so anything arriving
    /// out of phase is a stale event, not an error.
    pub fn apply(&mut self, intent: Intent) -> Applied {
        match intent {
            Intent::ImportNames { raw } => self.handle_import(&raw),
            Intent::RemoveName { name } => self.handle_remove(&name),
            Intent::ClearAll => self.handle_clear_all(),
            Intent::Draw { count } => self.handle_draw(count),
            Intent::AnimationTick { generation } => self.handle_tick(generation),
            Intent::CancelDraw => self.handle_cancel(),
            Intent::Undo => self.handle_undo(),
            Intent::ChooseAgain => self.handle_choose_again(),
            Intent::ResetUsed => self.handle_reset_used(),
            Intent::ClearHistory => self.handle_clear_history(),
            Intent::Partition { team_count } => self.handle_partition(team_count),
        }
    }

    fn guard_idle(&self, intent: &str) -> bool {
        if self.phase != Phase::Idle {
            debug!(?intent, phase = ?self.phase, "intent dropped: only accepted when idle");
            return false;
        }
        true
    }

    fn handle_import(&mut self, raw: &str) -> Applied {
        if !self.guard_idle("import") {
            return Applied::none();
        }
        let added = self.roster.import_lines(raw);
        if added == 0 {
            return Applied::none();
        }
        Applied {
            updates: vec![UiUpdate::Snapshot(self.snapshot())],
            dirty: true,
        }
    }

    fn handle_remove(&mut self, name: &str) -> Applied {
        if !self.guard_idle("remove") {
            return Applied::none();
        }
        if !self.roster.remove(name) {
            return Applied::none();
        }
        // Keep the undo token and any shown result consistent with the
        // shrunken roster.
        self.engine.forget_name(name);
        if let Some(result) = self.last_result.as_mut() {
            result.winners.retain(|n| n != name);
        }
        Applied {
            updates: vec![UiUpdate::Snapshot(self.snapshot())],
            dirty: true,
        }
    }

    fn handle_clear_all(&mut self) -> Applied {
        if !self.guard_idle("clear") {
            return Applied::none();
        }
        if self.roster.is_empty() && self.history.is_empty() {
            return Applied::none();
        }
        self.roster.clear();
        self.history.clear();
        self.engine.clear();
        self.last_result = None;
        self.highlighted = None;
        Applied {
            updates: vec![UiUpdate::Snapshot(self.snapshot())],
            dirty: true,
        }
    }

    fn handle_draw(&mut self, count: usize) -> Applied {
        if !self.guard_idle("draw") {
            return Applied::none();
        }
        if self.roster.is_empty() {
            return Applied {
                updates: vec![UiUpdate::Blocked {
                    reason: BlockedReason::EmptyRoster,
                }],
                dirty: false,
            };
        }
        if self.roster.available_count() == 0 {
            return Applied {
                updates: vec![UiUpdate::Blocked {
                    reason: BlockedReason::ExhaustedPool,
                }],
                dirty: false,
            };
        }

        self.generation += 1;
        if self.tick_count == 0 {
            return self.commit_draw(count);
        }

        self.phase = Phase::Selecting;
        self.pending = Some(PendingDraw {
            count,
            remaining: self.tick_count,
        });
        self.last_result = None;
        Applied {
            updates: vec![
                UiUpdate::SelectionStarted {
                    generation: self.generation,
                    ticks: self.tick_count,
                },
                UiUpdate::Snapshot(self.snapshot()),
            ],
            dirty: false,
        }
    }

    fn handle_tick(&mut self, generation: u64) -> Applied {
        if self.phase != Phase::Selecting || generation != self.generation {
            debug!(generation, current = self.generation, "stale animation tick discarded");
            return Applied::none();
        }
        let Some(pending) = self.pending.as_mut() else {
            return Applied::none();
        };

        pending.remaining -= 1;
        if pending.remaining == 0 {
            let count = pending.count;
            return self.commit_draw(count);
        }

        self.highlighted = self.engine.highlight_tick(&self.roster, &mut self.rng);
        match &self.highlighted {
            Some(name) => Applied {
                updates: vec![UiUpdate::Highlight { name: name.clone() }],
                dirty: false,
            },
            None => Applied::none(),
        }
    }

    fn commit_draw(&mut self, count: usize) -> Applied {
        self.pending = None;
        self.highlighted = None;
        match self.engine.draw(&mut self.roster, count, &mut self.rng) {
            Ok(result) => {
                self.history.record(&result);
                self.last_result = Some(result.clone());
                self.phase = Phase::ResultShown;
                Applied {
                    updates: vec![
                        UiUpdate::DrawComplete {
                            winners: result.winners,
                        },
                        UiUpdate::Snapshot(self.snapshot()),
                    ],
                    dirty: true,
                }
            }
            Err(reason) => {
                self.phase = Phase::Idle;
                Applied {
                    updates: vec![
                        UiUpdate::Blocked { reason },
                        UiUpdate::Snapshot(self.snapshot()),
                    ],
                    dirty: false,
                }
            }
        }
    }

    fn handle_cancel(&mut self) -> Applied {
        if self.phase != Phase::Selecting {
            return Applied::none();
        }
        // Nothing was committed; invalidate any ticks still scheduled.
        self.generation += 1;
        self.pending = None;
        self.highlighted = None;
        self.phase = Phase::Idle;
        Applied {
            updates: vec![UiUpdate::Snapshot(self.snapshot())],
            dirty: false,
        }
    }

    fn handle_undo(&mut self) -> Applied {
        if self.phase != Phase::ResultShown {
            debug!(phase = ?self.phase, "undo dropped: no result shown");
            return Applied::none();
        }
        let undone = self.engine.undo(&mut self.roster);
        self.last_result = None;
        self.phase = Phase::Idle;
        match undone {
            Some(names) => Applied {
                updates: vec![
                    UiUpdate::UndoApplied { names },
                    UiUpdate::Snapshot(self.snapshot()),
                ],
                dirty: true,
            },
            None => Applied {
                updates: vec![UiUpdate::Snapshot(self.snapshot())],
                dirty: false,
            },
        }
    }

    fn handle_choose_again(&mut self) -> Applied {
        if self.phase != Phase::ResultShown {
            return Applied::none();
        }
        self.last_result = None;
        self.phase = Phase::Idle;
        Applied {
            updates: vec![UiUpdate::Snapshot(self.snapshot())],
            dirty: false,
        }
    }

    fn handle_reset_used(&mut self) -> Applied {
        if !self.guard_idle("reset_used") {
            return Applied::none();
        }
        if self.roster.used().is_empty() && self.engine.last_draw().is_none() {
            return Applied::none();
        }
        self.engine.reset_used(&mut self.roster);
        Applied {
            updates: vec![UiUpdate::Snapshot(self.snapshot())],
            dirty: true,
        }
    }

    fn handle_clear_history(&mut self) -> Applied {
        if !self.guard_idle("clear_history") {
            return Applied::none();
        }
        if self.history.is_empty() {
            return Applied::none();
        }
        self.history.clear();
        Applied {
            updates: vec![UiUpdate::Snapshot(self.snapshot())],
            dirty: true,
        }
    }

    fn handle_partition(&mut self, team_count: usize) -> Applied {
        if !self.guard_idle("partition") {
            return Applied::none();
        }
        match teams::partition(&self.roster, team_count, &mut self.rng) {
            Ok(partition) => Applied {
                updates: vec![UiUpdate::PartitionReady {
                    teams: partition.teams,
                }],
                // Partitions are recomputed fresh each time and never stored.
                dirty: false,
            },
            Err(reason) => Applied {
                updates: vec![UiUpdate::Blocked { reason }],
                dirty: false,
            },
        }
    }
}
