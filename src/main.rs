//! Focus Timer - A deadline-based focus countdown with break reminders
//! 
//! This is the main entry point for the focus-timer daemon.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use focus_timer::{
    config::Config,
    state::AppState,
    api::create_router,
    services::{CommandPlayer, SoundPlayer},
    tasks::focus_tick_task,
    timer::{Cue, SystemClock},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("focus_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting focus-timer v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, focus={}s, tick={}ms",
          config.host, config.port, config.focus().total_seconds(), config.tick_ms);

    let sounds = config.sounds();
    if sounds.is_empty() {
        info!("No sound files configured, notifications will be silent");
    }
    let player = Arc::new(CommandPlayer::new(config.player.clone(), sounds));

    // Create application state
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        config.focus(),
        config.break_config(),
        player,
        Arc::new(SystemClock),
        config.tick_interval(),
    ));
    state.log_initial_state();

    // Start the tick task that drives the running timer
    let tick_state = Arc::clone(&state);
    tokio::spawn(async move {
        focus_tick_task(tick_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start          - Start or resume the focus session");
    info!("  POST /pause          - Pause the focus session");
    info!("  POST /reset          - Reset to the configured duration");
    info!("  POST /break/ack      - Acknowledge a break and resume");
    info!("  POST /expiry/ack     - Close the end-of-session notice");
    info!("  POST /sound/enable   - Retry enabling sound");
    info!("  PUT  /settings/focus - Edit the focus duration");
    info!("  PUT  /settings/break - Edit the break reminder");
    info!("  GET  /status         - Current timer and display state");
    info!("  GET  /health         - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    // Silence anything still playing before exit
    for cue in Cue::ALL {
        state.player.stop(cue);
    }
    info!("Server shutdown complete");
    Ok(())
}
