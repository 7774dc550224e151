// Session orchestration: the event loop that owns the facade.
//
// Every mutation enters through one loop, one intent at a time, run to
// completion before the next is taken. Animation sequences are driven by
// a spawned ticker task that feeds AnimationTick intents back into the
// loop at a fixed interval; the facade's generation counter makes ticks
// from an abandoned sequence harmless. After every intent that committed
// state, the dirty keys are persisted to the store.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde_json::json;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::protocol::{Intent, UiUpdate};
use crate::session::facade::SessionFacade;
use crate::store::{StateKey, StateStore};

/// Restore roster, used set, and history from the store.
///
/// Absent keys, load failures, and unparseable payloads all restore as
/// empty defaults; nothing here is surfaced to the user.
pub fn restore_session(facade: &mut SessionFacade, store: &dyn StateStore) {
    let names = load_names(store, StateKey::Roster);
    let used = load_names(store, StateKey::UsedSet);
    let history = load_names(store, StateKey::History);
    if !names.is_empty() || !history.is_empty() {
        info!(
            roster = names.len(),
            used = used.len(),
            history = history.len(),
            "restored saved session"
        );
    }
    facade.restore(names, used, history);
}

fn load_names(store: &dyn StateStore, key: StateKey) -> Vec<String> {
    let value = match store.load(key) {
        Ok(Some(value)) => value,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!("failed to load saved {}: {e}", key.as_str());
            return Vec::new();
        }
    };
    serde_json::from_value(value).unwrap_or_else(|e| {
        warn!("ignoring corrupt saved {}: {e}", key.as_str());
        Vec::new()
    })
}

/// Persist the committed keys. Save failures are logged and swallowed;
/// the in-memory session stays authoritative.
pub fn persist_session(facade: &SessionFacade, store: &dyn StateStore) {
    let roster = facade.roster();
    let payloads = [
        (StateKey::Roster, json!(roster.names())),
        (StateKey::UsedSet, json!(roster.used())),
        (StateKey::History, json!(facade.history().names())),
    ];
    for (key, value) in payloads {
        if let Err(e) = store.save(key, &value) {
            warn!("failed to persist {}: {e}", key.as_str());
        }
    }
}

/// Run the session loop until the intent channel closes or the UI side
/// goes away.
pub async fn run(
    mut intent_rx: mpsc::Receiver<Intent>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut facade: SessionFacade,
    store: Arc<dyn StateStore>,
    tick_interval: Duration,
) -> Result<()> {
    // Ticker tasks feed animation ticks back through their own channel so
    // the loop still drains both sources one intent at a time.
    let (tick_tx, mut tick_rx) = mpsc::channel::<Intent>(64);

    loop {
        let intent = tokio::select! {
            maybe = intent_rx.recv() => match maybe {
                Some(intent) => intent,
                None => break,
            },
            Some(intent) = tick_rx.recv() => intent,
        };

        debug!(?intent, "applying intent");
        let applied = facade.apply(intent);

        if applied.dirty {
            persist_session(&facade, store.as_ref());
        }

        for update in applied.updates {
            if let UiUpdate::SelectionStarted { generation, ticks } = &update {
                spawn_ticker(tick_tx.clone(), *generation, *ticks, tick_interval);
            }
            if ui_tx.send(update).await.is_err() {
                info!("ui channel closed, shutting down session loop");
                return Ok(());
            }
        }
    }

    Ok(())
}

/// Deliver `ticks` animation ticks at a fixed interval. The sequence is
/// bounded and never outlives interest in it: a bumped generation makes
/// the remaining ticks no-ops, and a closed channel stops delivery.
fn spawn_ticker(
    tick_tx: mpsc::Sender<Intent>,
    generation: u64,
    ticks: usize,
    tick_interval: Duration,
) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick_interval);
        // The first interval tick fires immediately; consume it so ticks
        // are evenly spaced from the start of the sequence.
        interval.tick().await;
        for _ in 0..ticks {
            interval.tick().await;
            if tick_tx
                .send(Intent::AnimationTick { generation })
                .await
                .is_err()
            {
                break;
            }
        }
    });
}
