mod app;
mod config;
mod error;
mod irc;
mod logging;
mod prefs;
mod sync;
mod twitch;
mod ui;

use crate::app::action::Action;
use crate::app::event::AppEvent;
use crate::app::handler;
use crate::app::rooms::RoomTable;
use crate::app::state::*;
use crate::irc::manager::ChatManager;
use crate::prefs::{FilePrefStore, Preferences};
use crate::sync::SyncEngine;
use crate::twitch::HelixClient;
use anyhow::{Context, Result};
use crossterm::{
    event::EventStream,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::prelude::*;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<()> {
    // Config, preferences, and credentials are checked before the
    // terminal is touched so configuration errors print normally and
    // loudly.
    let cfg = config::load_config()?;
    let store = FilePrefStore::open(prefs::prefs_path())
        .with_context(|| "Failed to open preference store")?;
    let prefs = Preferences::new(Arc::new(store));
    prefs.seed_defaults();

    let log_path = logging::init(&cfg.log.filter)?;

    let helix = HelixClient::new(prefs.clone()).map_err(|e| {
        anyhow::anyhow!("{} (preferences file: {})", e, prefs::prefs_path().display())
    })?;

    let rooms = Arc::new(RoomTable::default());
    let engine = Arc::new(SyncEngine::new(
        Arc::new(helix),
        rooms.clone(),
        prefs.clone(),
    ));

    tracing::info!(
        "crabwatch v{} starting, logging to {}",
        env!("CARGO_PKG_VERSION"),
        log_path.display()
    );

    // Install panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, cfg, prefs, rooms, engine).await;

    // Restore terminal
    restore_terminal()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    cfg: config::AppConfig,
    prefs: Preferences,
    rooms: Arc<RoomTable>,
    engine: Arc<SyncEngine>,
) -> Result<()> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<AppEvent>();

    // Authenticated when a nickname is configured, otherwise anonymous
    // read-only.
    let (nickname, password) = match cfg.chat.nickname.clone() {
        Some(nick) => {
            let token = prefs.get_str("api_token", "");
            (nick, Some(format!("oauth:{}", token)))
        }
        None => (config::nickname::anonymous_nickname(), None),
    };

    let mut state = AppState::new(cfg.clone(), prefs.clone(), rooms, nickname.clone());
    let mut chat = ChatManager::new(event_tx.clone());

    // Spawn terminal input task
    let term_tx = event_tx.clone();
    tokio::spawn(async move {
        let mut reader = EventStream::new();
        loop {
            match reader.next().await {
                Some(Ok(event)) => {
                    if term_tx.send(AppEvent::Terminal(event)).is_err() {
                        break;
                    }
                }
                Some(Err(_)) => break,
                None => break,
            }
        }
    });

    // Spawn tick task (20 FPS = 50ms)
    let tick_tx = event_tx.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(50));
        loop {
            interval.tick().await;
            if tick_tx.send(AppEvent::Tick).is_err() {
                break;
            }
        }
    });

    // Spawn the status-refresh timer. The rate is re-read before every
    // sleep so `/set refresh_rate` applies on the next arm.
    let timer_tx = event_tx.clone();
    let timer_prefs = prefs.clone();
    tokio::spawn(async move {
        loop {
            let secs = timer_prefs.get_u64("refresh_rate", 600).max(5);
            tokio::time::sleep(Duration::from_secs(secs)).await;
            if timer_tx.send(AppEvent::RefreshTimer).is_err() {
                break;
            }
        }
    });

    state.system_message(
        &BufferKey::Status,
        format!("crabwatch v{} loaded", env!("CARGO_PKG_VERSION")),
    );
    state.system_message(&BufferKey::Status, "/help for commands".to_string());

    // Connect to chat; configured channels are joined during
    // registration and each JOIN echo triggers its own label refresh.
    let channels: Vec<String> = cfg
        .chat
        .channels
        .iter()
        .map(|c| normalize_channel(c))
        .collect();
    state.system_message(
        &BufferKey::Status,
        format!("Connecting to {}:{} as {}...", cfg.chat.host, cfg.chat.port, nickname),
    );
    if let Err(e) = chat
        .connect(
            cfg.chat.host.clone(),
            cfg.chat.port,
            cfg.chat.tls,
            nickname,
            password,
            channels,
        )
        .await
    {
        state.error_message(&BufferKey::Status, format!("Connection failed: {}", e));
        state.status = ConnectionStatus::Disconnected;
    }

    // Initial render
    terminal.draw(|f| ui::render(f, &state))?;

    // Main event loop
    loop {
        let event = event_rx.recv().await;
        let Some(event) = event else { break };

        let actions = handler::handle_event(&mut state, event);

        for action in actions {
            match action {
                Action::SendMessage { target, text } => {
                    if let Err(e) = chat.send_privmsg(&target, &text) {
                        state.error_message(&BufferKey::Status, format!("Send failed: {}", e));
                    }
                }
                Action::JoinChannel { channel } => {
                    if let Err(e) = chat.send_join(&channel) {
                        state.error_message(&BufferKey::Status, format!("Join failed: {}", e));
                    }
                }
                Action::PartChannel { channel } => {
                    if let Err(e) = chat.send_part(&channel) {
                        state.error_message(&BufferKey::Status, format!("Part failed: {}", e));
                    }
                }
                Action::RefreshAll { manual } => {
                    spawn_refresh(engine.clone(), event_tx.clone(), manual, None);
                }
                Action::RefreshChannel { login } => {
                    spawn_refresh(engine.clone(), event_tx.clone(), false, Some(login));
                }
                Action::Quit { message } => {
                    state.quit_message = message;
                    state.should_quit = true;
                }
            }
        }

        if state.should_quit {
            chat.send_quit(state.quit_message.as_deref());
            break;
        }

        // Conditional render (only if dirty)
        if state.dirty {
            terminal.draw(|f| ui::render(f, &state))?;
            state.dirty = false;
        }
    }

    Ok(())
}

/// Run a refresh cycle off the event loop; the outcome comes back as an
/// event. The engine's single-flight guard makes concurrent spawns drop
/// out immediately.
fn spawn_refresh(
    engine: Arc<SyncEngine>,
    tx: mpsc::UnboundedSender<AppEvent>,
    manual: bool,
    login: Option<String>,
) {
    tokio::spawn(async move {
        let outcome = match login {
            Some(login) => engine.refresh_one(&login).await,
            None => engine.refresh_all().await,
        };
        let _ = tx.send(AppEvent::RefreshFinished { outcome, manual });
    });
}

fn normalize_channel(name: &str) -> String {
    let name = name.trim().to_lowercase();
    if name.starts_with('#') {
        name
    } else {
        format!("#{}", name)
    }
}
