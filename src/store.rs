// Persistence adapter: key-value state storage behind a trait.
//
// The engine never persists anything itself; the orchestrator saves the
// committed keys after each applied intent. Load failures and absent
// keys are treated as "no saved state" by callers, never surfaced.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("bad state value: {0}")]
    Json(#[from] serde_json::Error),
}

/// The persisted key space. Payloads are JSON arrays of names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateKey {
    Roster,
    UsedSet,
    History,
}

impl StateKey {
    pub const ALL: [StateKey; 3] = [StateKey::Roster, StateKey::UsedSet, StateKey::History];

    pub fn as_str(&self) -> &'static str {
        match self {
            StateKey::Roster => "roster",
            StateKey::UsedSet => "usedSet",
            StateKey::History => "history",
        }
    }
}

/// Storage boundary for session state.
pub trait StateStore: Send + Sync {
    /// Persist a JSON value under `key`, overwriting any previous value.
    fn save(&self, key: StateKey, value: &serde_json::Value) -> Result<(), StoreError>;

    /// Load the value saved under `key`. `None` when nothing was saved.
    fn load(&self, key: StateKey) -> Result<Option<serde_json::Value>, StoreError>;

    /// Drop every saved key.
    fn clear(&self) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// SQLite-backed store
// ---------------------------------------------------------------------------

/// SQLite-backed implementation: a single key-value table.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and ensure the schema
    /// exists. Pass `":memory:"` for an ephemeral database in tests.
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS session_state (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;

        Ok(SqliteStore {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the connection. Panics if the mutex is poisoned (another
    /// thread panicked while holding the lock).
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("store mutex poisoned")
    }
}

impl StateStore for SqliteStore {
    fn save(&self, key: StateKey, value: &serde_json::Value) -> Result<(), StoreError> {
        let json = serde_json::to_string(value)?;
        self.conn().execute(
            "INSERT OR REPLACE INTO session_state (key, value) VALUES (?1, ?2)",
            params![key.as_str(), json],
        )?;
        Ok(())
    }

    fn load(&self, key: StateKey) -> Result<Option<serde_json::Value>, StoreError> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT value FROM session_state WHERE key = ?1")?;
        let mut rows = stmt.query_map(params![key.as_str()], |row| row.get::<_, String>(0))?;

        match rows.next() {
            Some(row) => {
                let json = row?;
                Ok(Some(serde_json::from_str(&json)?))
            }
            None => Ok(None),
        }
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.conn().execute("DELETE FROM session_state", [])?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// In-memory implementation for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<&'static str, serde_json::Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

impl StateStore for MemoryStore {
    fn save(&self, key: StateKey, value: &serde_json::Value) -> Result<(), StoreError> {
        self.values
            .lock()
            .expect("store mutex poisoned")
            .insert(key.as_str(), value.clone());
        Ok(())
    }

    fn load(&self, key: StateKey) -> Result<Option<serde_json::Value>, StoreError> {
        Ok(self
            .values
            .lock()
            .expect("store mutex poisoned")
            .get(key.as_str())
            .cloned())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.values.lock().expect("store mutex poisoned").clear();
        Ok(())
    }
}
