// Podium entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Open the state store, restore any saved session
// 4. Create mpsc channels
// 5. Spawn the session loop and the update printer
// 6. Read stdin commands until quit/EOF
// 7. Cleanup on exit

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::info;

use podium::app;
use podium::config;
use podium::input;
use podium::protocol::{BlockedReason, UiUpdate};
use podium::session::facade::SessionFacade;
use podium::store::{SqliteStore, StateStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file, not the terminal prompt)
    init_tracing()?;
    info!("podium starting up");

    // 2. Load config
    let cwd = std::env::current_dir().context("failed to resolve working directory")?;
    let config = config::load_config(&cwd).context("failed to load configuration")?;
    info!(
        "Config loaded: {} ticks at {}ms, database at {}",
        config.draw.ticks, config.draw.tick_interval_ms, config.database.path
    );

    // 3. Open the state store and restore any saved session
    let store: Arc<dyn StateStore> = Arc::new(
        SqliteStore::open(&config.database.path).context("failed to open state database")?,
    );
    let mut facade = SessionFacade::new(config.draw.ticks);
    app::restore_session(&mut facade, store.as_ref());
    let snapshot = facade.snapshot();
    if snapshot.names.is_empty() {
        println!("No saved roster. {}", input::USAGE);
    } else {
        println!(
            "Restored {} names ({} available). {}",
            snapshot.names.len(),
            snapshot.available,
            input::USAGE
        );
    }

    // 4. Create mpsc channels
    let (intent_tx, intent_rx) = mpsc::channel(64);
    let (ui_tx, mut ui_rx) = mpsc::channel(256);

    // 5. Spawn the session loop and the update printer
    let tick_interval = Duration::from_millis(config.draw.tick_interval_ms);
    let app_handle = tokio::spawn(app::run(intent_rx, ui_tx, facade, store, tick_interval));

    let printer = tokio::spawn(async move {
        while let Some(update) = ui_rx.recv().await {
            print_update(&update);
        }
    });

    // 6. Read stdin commands until quit/EOF
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let trimmed = line.trim();
        if trimmed == "quit" || trimmed == "exit" {
            break;
        }
        match input::parse_line(&line) {
            Some(intent) => {
                if intent_tx.send(intent).await.is_err() {
                    break;
                }
            }
            None => {
                if !trimmed.is_empty() {
                    println!("{}", input::USAGE);
                }
            }
        }
    }

    // 7. Cleanup: close the intent channel so the session loop drains and exits
    drop(intent_tx);
    let _ = tokio::time::timeout(Duration::from_secs(5), app_handle).await;
    printer.abort();

    info!("podium shut down cleanly");
    Ok(())
}

fn print_update(update: &UiUpdate) {
    match update {
        UiUpdate::SelectionStarted { .. } => println!("Choosing..."),
        UiUpdate::Highlight { name } => println!("  ~ {name}"),
        UiUpdate::DrawComplete { winners } => {
            println!("The chosen {}:", if winners.len() == 1 { "one is" } else { "are" });
            for (i, name) in winners.iter().enumerate() {
                println!("  {}. {name}", i + 1);
            }
        }
        UiUpdate::UndoApplied { names } => println!("Undid last draw: {}", names.join(", ")),
        UiUpdate::PartitionReady { teams } => {
            for (i, team) in teams.iter().enumerate() {
                println!("Team {}: {}", i + 1, team.join(", "));
            }
        }
        UiUpdate::Blocked { reason } => match reason {
            BlockedReason::EmptyRoster => println!("No names yet. Add some first."),
            BlockedReason::ExhaustedPool => {
                println!("Everyone has been chosen! Use `reset` to start over.")
            }
        },
        UiUpdate::Snapshot(snapshot) => {
            println!(
                "[{} names | {} available | {} in history]",
                snapshot.names.len(),
                snapshot.available,
                snapshot.history.len()
            );
        }
    }
}

/// Initialize tracing to log to a file (the terminal is the prompt).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("podium.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("podium=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
