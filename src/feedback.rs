// Feedback board boundary: live audience feedback sessions.
//
// The hosted board (real-time fan-out over a third-party store) is an
// external collaborator; this module defines the contract the rest of
// the system composes with, plus a local in-memory implementation used
// in tests and offline runs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// The audience signal vocabulary. Exactly these four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    Understanding,
    Lost,
    Slower,
    Faster,
}

impl FeedbackKind {
    pub const ALL: [FeedbackKind; 4] = [
        FeedbackKind::Understanding,
        FeedbackKind::Lost,
        FeedbackKind::Slower,
        FeedbackKind::Faster,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FeedbackKind::Understanding => "I understand",
            FeedbackKind::Lost => "I'm lost",
            FeedbackKind::Slower => "Go slower",
            FeedbackKind::Faster => "Go faster",
        }
    }
}

/// A submitted feedback event as delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackEvent {
    pub kind: FeedbackKind,
    pub submitted_at: DateTime<Utc>,
}

/// Session metadata as reported by the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackSessionInfo {
    pub active: bool,
    pub expires_at: DateTime<Utc>,
}

/// Handle returned by `subscribe`; dropping it (or calling `cancel`)
/// stops delivery.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Subscription {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn cancel(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

/// The feedback board contract.
#[async_trait]
pub trait FeedbackBoard: Send + Sync {
    /// Open a new session expiring after `ttl_hours`; returns its id.
    async fn create_session(&self, ttl_hours: u32) -> anyhow::Result<String>;

    /// Submit one feedback event to a session.
    async fn submit(&self, session_id: &str, kind: FeedbackKind) -> anyhow::Result<()>;

    /// Deliver future events for a session into `updates` until the
    /// returned subscription is cancelled.
    async fn subscribe(
        &self,
        session_id: &str,
        updates: mpsc::Sender<FeedbackEvent>,
    ) -> anyhow::Result<Subscription>;

    /// Mark a session inactive.
    async fn close(&self, session_id: &str) -> anyhow::Result<()>;

    /// Metadata for a session; `None` when the id is unknown.
    async fn session_info(&self, session_id: &str) -> anyhow::Result<Option<FeedbackSessionInfo>>;
}

// ---------------------------------------------------------------------------
// Local in-memory board
// ---------------------------------------------------------------------------

struct LocalSession {
    active: bool,
    expires_at: DateTime<Utc>,
    subscribers: Vec<(u64, mpsc::Sender<FeedbackEvent>)>,
}

#[derive(Default)]
struct BoardInner {
    sessions: HashMap<String, LocalSession>,
    next_id: u64,
}

/// In-memory board: single-process, no real-time backend. Used by tests
/// and offline sessions.
#[derive(Default)]
pub struct LocalBoard {
    inner: Arc<Mutex<BoardInner>>,
}

impl LocalBoard {
    pub fn new() -> Self {
        LocalBoard::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BoardInner> {
        self.inner.lock().expect("board mutex poisoned")
    }
}

#[async_trait]
impl FeedbackBoard for LocalBoard {
    async fn create_session(&self, ttl_hours: u32) -> anyhow::Result<String> {
        let mut inner = self.lock();
        inner.next_id += 1;
        let id = format!("S{:06}", inner.next_id);
        inner.sessions.insert(
            id.clone(),
            LocalSession {
                active: true,
                expires_at: Utc::now() + Duration::hours(i64::from(ttl_hours)),
                subscribers: Vec::new(),
            },
        );
        Ok(id)
    }

    async fn submit(&self, session_id: &str, kind: FeedbackKind) -> anyhow::Result<()> {
        let event = FeedbackEvent {
            kind,
            submitted_at: Utc::now(),
        };
        let mut inner = self.lock();
        let session = inner
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| anyhow::anyhow!("unknown feedback session: {session_id}"))?;
        if !session.active {
            anyhow::bail!("feedback session is closed: {session_id}");
        }
        // Subscribers that went away are dropped on the next delivery.
        session
            .subscribers
            .retain(|(_, tx)| tx.try_send(event.clone()).is_ok());
        Ok(())
    }

    async fn subscribe(
        &self,
        session_id: &str,
        updates: mpsc::Sender<FeedbackEvent>,
    ) -> anyhow::Result<Subscription> {
        let mut inner = self.lock();
        inner.next_id += 1;
        let token = inner.next_id;
        let session = inner
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| anyhow::anyhow!("unknown feedback session: {session_id}"))?;
        session.subscribers.push((token, updates));
        drop(inner);

        let board = Arc::clone(&self.inner);
        let session_id = session_id.to_string();
        Ok(Subscription::new(move || {
            if let Ok(mut inner) = board.lock() {
                if let Some(session) = inner.sessions.get_mut(&session_id) {
                    session.subscribers.retain(|(t, _)| *t != token);
                }
            }
        }))
    }

    async fn close(&self, session_id: &str) -> anyhow::Result<()> {
        let mut inner = self.lock();
        if let Some(session) = inner.sessions.get_mut(session_id) {
            session.active = false;
            session.subscribers.clear();
        }
        Ok(())
    }

    async fn session_info(&self, session_id: &str) -> anyhow::Result<Option<FeedbackSessionInfo>> {
        let inner = self.lock();
        Ok(inner.sessions.get(session_id).map(|s| FeedbackSessionInfo {
            active: s.active && s.expires_at > Utc::now(),
            expires_at: s.expires_at,
        }))
    }
}
