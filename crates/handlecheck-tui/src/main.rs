// handlecheck entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, the terminal belongs to the TUI)
// 2. Load config
// 3. Build the HTTP backend and navigator
// 4. Create mpsc channels and the app state
// 5. Spawn the app loop, run the TUI until it exits
// 6. Cleanup

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{error, info};

use handlecheck_app::app::{self, AppState};
use handlecheck_app::backend::{parse_base_url, HttpBackend};
use handlecheck_app::navigator::UiNavigator;
use handlecheck_core::config;
use handlecheck_tui::Exit;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    info!("handlecheck starting up");

    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: server={}, timeout={}s, usage limit {}",
        config.server.base_url, config.server.request_timeout_secs, config.ui.usage_limit
    );
    if config.credentials.user_id.is_none() {
        info!("No user id configured; requests will carry an empty user id");
    }

    let backend = HttpBackend::new(&config.server).context("failed to build HTTP client")?;
    info!("Backend ready at {}", backend.base_url());

    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (api_tx, api_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    let navigator = UiNavigator::new(ui_tx.clone(), parse_base_url(&config.server.base_url).ok());
    let state = AppState::new(
        config,
        Arc::new(backend),
        Arc::new(navigator),
        api_tx,
        Instant::now(),
    );

    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, api_rx, ui_tx, state).await {
            error!("Application loop error: {}", e);
        }
    });

    let exit = match handlecheck_tui::run(ui_rx, cmd_tx).await {
        Ok(exit) => exit,
        Err(e) => {
            error!("TUI error: {}", e);
            Exit::Quit
        }
    };

    // The command sender is gone, so the app loop winds down on its own.
    let _ = tokio::time::timeout(Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    if let Exit::Redirect(url) = exit {
        info!("Session ended by redirect to {}", url);
        println!("Redirected to {url}");
    }

    info!("handlecheck shut down cleanly");
    Ok(())
}

/// Log to `logs/handlecheck.log`; the terminal is owned by the TUI.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("handlecheck.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(
                "handlecheck=info,handlecheck_core=info,handlecheck_app=info,handlecheck_tui=info,warn",
            )
        }))
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
