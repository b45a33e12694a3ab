//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
};
use tracing::{debug, error, info, warn};

use crate::{
    services::{Gesture, UnlockOutcome},
    state::AppState,
};
use super::{
    requests::{BreakSettingsRequest, FocusSettingsRequest},
    responses::{ApiResponse, HealthResponse, StatusResponse},
};

/// Header naming the kind of user interaction behind a command
pub const GESTURE_HEADER: &str = "x-gesture";

/// Read the gesture kind from the request, defaulting to a click
fn gesture_from(headers: &HeaderMap) -> Gesture {
    headers
        .get(GESTURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(Gesture::from_name)
        .unwrap_or(Gesture::Click)
}

/// Follow up a failed immediate unlock with a deferred probe
fn spawn_deferred_unlock(state: &Arc<AppState>) {
    let state = Arc::clone(state);
    tokio::spawn(async move {
        match state.finish_audio_unlock().await {
            Ok(true) => info!("Audio enabled"),
            Ok(false) => warn!("Audio still blocked, showing enable sound prompt"),
            Err(e) => error!("Failed to finish audio unlock: {}", e),
        }
    });
}

/// Route a command's gesture through the audio unlock listeners
fn handle_gesture(state: &Arc<AppState>, headers: &HeaderMap) {
    let gesture = gesture_from(headers);
    match state.register_gesture(gesture) {
        Ok(UnlockOutcome::Deferred) => spawn_deferred_unlock(state),
        Ok(outcome) => debug!("Gesture {:?}: {:?}", gesture, outcome),
        // Audio problems never block the timer
        Err(e) => warn!("Failed to register gesture: {}", e),
    }
}

/// Build the command response from a transition result
fn respond(
    state: &AppState,
    changed: Result<bool, String>,
    applied: &str,
    ignored: &str,
) -> Result<Json<ApiResponse>, StatusCode> {
    let changed = changed.map_err(|e| {
        error!("Failed to apply command: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    match state.snapshot() {
        Ok(timer) => Ok(Json(ApiResponse::from_transition(changed, applied, ignored, timer))),
        Err(e) => {
            error!("Failed to read timer state: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /start - Start or resume the focus session
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse>, StatusCode> {
    // Unlock inside the same gesture that starts the timer
    handle_gesture(&state, &headers);
    let changed = state.start();
    respond(&state, changed, "Focus session running", "Timer already running or no duration set")
}

/// Handle POST /pause - Pause the focus session
pub async fn pause_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse>, StatusCode> {
    handle_gesture(&state, &headers);
    let changed = state.pause();
    respond(&state, changed, "Focus session paused", "Timer is not running")
}

/// Handle POST /reset - Reset to the configured duration
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse>, StatusCode> {
    handle_gesture(&state, &headers);
    let changed = state.reset().map(|()| true);
    respond(&state, changed, "Timer reset", "Timer reset")
}

/// Handle POST /break/ack - Acknowledge the break and resume
pub async fn break_ack_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse>, StatusCode> {
    handle_gesture(&state, &headers);
    let changed = state.acknowledge_break();
    respond(&state, changed, "Break acknowledged, focus resumed", "Break acknowledged, nothing to resume")
}

/// Handle POST /expiry/ack - Close the end-of-session notice
pub async fn expiry_ack_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse>, StatusCode> {
    handle_gesture(&state, &headers);
    let changed = state.acknowledge_expiry();
    respond(&state, changed, "Session closed, timer ready", "No finished session to close")
}

/// Handle POST /sound/enable - Manually retry the audio unlock
pub async fn enable_sound_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    let changed = match state.enable_sound() {
        Ok(UnlockOutcome::Unlocked) => Ok(true),
        Ok(UnlockOutcome::Deferred) => {
            spawn_deferred_unlock(&state);
            Ok(false)
        }
        Ok(_) => Ok(false),
        Err(e) => Err(e),
    };
    respond(&state, changed, "Sound enabled", "Sound already enabled or still being verified")
}

/// Handle PUT /settings/focus - Edit the focus duration inputs
pub async fn focus_settings_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FocusSettingsRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.update_focus_settings(request.into()) {
        Ok(true) => respond(&state, Ok(true), "Focus duration updated", ""),
        Ok(false) => {
            info!("Focus settings edit rejected while timer is running");
            Err(StatusCode::CONFLICT)
        }
        Err(e) => {
            error!("Failed to update focus settings: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle PUT /settings/break - Edit the break reminder inputs
pub async fn break_settings_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BreakSettingsRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.update_break_settings(request.into()) {
        Ok(true) => respond(&state, Ok(true), "Break reminder updated", ""),
        Ok(false) => {
            info!("Break settings edit rejected while timer is running");
            Err(StatusCode::CONFLICT)
        }
        Err(e) => {
            error!("Failed to update break settings: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /status - Return the timer and presentation state
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match state.snapshot() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to get timer state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
