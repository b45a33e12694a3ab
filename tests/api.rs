use std::{sync::Arc, time::Duration};

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use futures::future::BoxFuture;
use serde_json::{json, Value};
use tower::ServiceExt;

use focus_timer::{
    api::create_router,
    services::SoundPlayer,
    state::{AppState, BreakConfig, FocusConfig},
    timer::{Cue, ManualClock, TICK_INTERVAL},
};

/// Player that accepts every request without making noise
struct SilentPlayer;

impl SoundPlayer for SilentPlayer {
    fn play(&self, _cue: Cue) -> Result<(), String> {
        Ok(())
    }
    fn stop(&self, _cue: Cue) {}
    fn probe(&self, _cue: Cue) -> Result<(), String> {
        Ok(())
    }
    fn verify(&self, _cue: Cue) -> BoxFuture<'static, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }
}

fn setup(focus: FocusConfig, breaks: BreakConfig) -> (Router, Arc<AppState>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new());
    let state = Arc::new(AppState::new(
        0,
        "127.0.0.1".to_string(),
        focus,
        breaks,
        Arc::new(SilentPlayer),
        clock.clone(),
        TICK_INTERVAL,
    ));
    (create_router(Arc::clone(&state)), state, clock)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn status_reports_idle_timer() {
    let (app, _, _) = setup(FocusConfig::new(0, 25, 0), BreakConfig::disabled());

    let (status, body) = send(&app, "GET", "/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["phase"], "idle");
    assert_eq!(body["timer"]["remaining_seconds"], 1500);
    assert_eq!(body["timer"]["panel"]["display"], "00:25:00");
    assert_eq!(body["timer"]["panel"]["status"], "Ready to focus");
}

#[tokio::test]
async fn start_pause_and_resume() {
    let (app, _, clock) = setup(FocusConfig::new(0, 0, 10), BreakConfig::disabled());

    let (status, body) = send(&app, "POST", "/start", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "applied");
    assert_eq!(body["timer"]["phase"], "running");
    assert_eq!(body["timer"]["audio_unlocked"], true);
    assert_eq!(body["timer"]["panel"]["inputs_enabled"], false);

    let (_, body) = send(&app, "POST", "/start", None).await;
    assert_eq!(body["status"], "ignored");

    clock.advance(Duration::from_secs(4));
    let (_, body) = send(&app, "POST", "/pause", None).await;
    assert_eq!(body["status"], "applied");
    assert_eq!(body["timer"]["phase"], "paused");
    assert_eq!(body["timer"]["remaining_seconds"], 6);
    assert_eq!(body["timer"]["panel"]["display"], "00:00:06");

    let (_, body) = send(&app, "POST", "/pause", None).await;
    assert_eq!(body["status"], "ignored");
}

#[tokio::test]
async fn zero_duration_start_is_ignored() {
    let (app, _, _) = setup(FocusConfig::default(), BreakConfig::disabled());

    let (status, body) = send(&app, "POST", "/start", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ignored");
    assert_eq!(body["timer"]["phase"], "idle");
}

#[tokio::test]
async fn settings_edits_follow_input_state() {
    let (app, _, _) = setup(FocusConfig::new(0, 0, 30), BreakConfig::disabled());

    let (status, body) = send(
        &app,
        "PUT",
        "/settings/focus",
        Some(json!({"hours": 0, "minutes": "2", "seconds": "oops"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["remaining_seconds"], 120);
    assert_eq!(body["timer"]["panel"]["display"], "00:02:00");

    send(&app, "POST", "/start", None).await;
    let (status, _) = send(&app, "PUT", "/settings/break", Some(json!({"enabled": true, "seconds": 5}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = send(&app, "PUT", "/settings/focus", Some(json!({"minutes": 5}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn break_prompt_round_trip() {
    let (app, state, clock) = setup(FocusConfig::new(0, 0, 10), BreakConfig::new(true, 0, 0, 3));

    send(&app, "POST", "/start", None).await;
    clock.advance(Duration::from_secs(3));
    state.evaluate().unwrap();

    let (_, body) = send(&app, "GET", "/status", None).await;
    assert_eq!(body["timer"]["phase"], "paused");
    assert_eq!(body["timer"]["break_prompt"], true);
    assert_eq!(body["timer"]["panel"]["break_modal"], true);
    assert_eq!(body["timer"]["remaining_seconds"], 7);

    clock.advance(Duration::from_secs(30));
    let (_, body) = send(&app, "POST", "/break/ack", None).await;
    assert_eq!(body["status"], "applied");
    assert_eq!(body["timer"]["phase"], "running");
    assert_eq!(body["timer"]["panel"]["break_modal"], false);
    assert_eq!(body["timer"]["remaining_seconds"], 7);
}

#[tokio::test]
async fn expiry_then_acknowledge_and_reset() {
    let (app, state, clock) = setup(FocusConfig::new(0, 0, 2), BreakConfig::disabled());

    send(&app, "POST", "/start", None).await;
    clock.advance(Duration::from_secs(5));
    state.evaluate().unwrap();

    let (_, body) = send(&app, "GET", "/status", None).await;
    assert_eq!(body["timer"]["phase"], "expired");
    assert_eq!(body["timer"]["remaining_seconds"], 0);
    assert_eq!(body["timer"]["panel"]["expiry_modal"], true);
    assert_eq!(body["timer"]["panel"]["status"], "Time's up!");

    let (_, body) = send(&app, "POST", "/expiry/ack", None).await;
    assert_eq!(body["status"], "applied");
    assert_eq!(body["timer"]["phase"], "idle");
    assert_eq!(body["timer"]["remaining_seconds"], 2);

    send(&app, "POST", "/start", None).await;
    let (_, body) = send(&app, "POST", "/reset", None).await;
    assert_eq!(body["timer"]["phase"], "idle");
    assert_eq!(body["timer"]["panel"]["inputs_enabled"], true);

    let (_, body) = send(&app, "GET", "/status", None).await;
    assert_eq!(body["last_action"], "reset");
}

#[tokio::test]
async fn health_and_sound_enable() {
    let (app, _, _) = setup(FocusConfig::new(0, 1, 0), BreakConfig::disabled());

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (_, body) = send(&app, "POST", "/sound/enable", None).await;
    assert_eq!(body["status"], "applied");
    assert_eq!(body["timer"]["audio_unlocked"], true);

    let (_, body) = send(&app, "POST", "/sound/enable", None).await;
    assert_eq!(body["status"], "ignored");
}

#[tokio::test]
async fn break_ack_without_pending_break_is_ignored() {
    let (app, _, clock) = setup(FocusConfig::new(0, 0, 10), BreakConfig::new(true, 0, 5, 0));

    let (_, body) = send(&app, "POST", "/break/ack", None).await;
    assert_eq!(body["status"], "ignored");
    assert_eq!(body["timer"]["phase"], "idle");

    send(&app, "POST", "/start", None).await;
    let (_, body) = send(&app, "POST", "/break/ack", None).await;
    assert_eq!(body["status"], "ignored");
    assert_eq!(body["timer"]["phase"], "running");

    // Countdown keeps moving after the stray acknowledgement
    clock.advance(Duration::from_secs(4));
    let (_, body) = send(&app, "POST", "/pause", None).await;
    assert_eq!(body["timer"]["remaining_seconds"], 6);
}

#[tokio::test]
async fn reset_during_break_prompt_clears_it() {
    let (app, state, clock) = setup(FocusConfig::new(0, 0, 10), BreakConfig::new(true, 0, 0, 3));

    send(&app, "POST", "/start", None).await;
    clock.advance(Duration::from_secs(3));
    state.evaluate().unwrap();

    let (_, body) = send(&app, "POST", "/reset", None).await;
    assert_eq!(body["timer"]["phase"], "idle");
    assert_eq!(body["timer"]["break_prompt"], false);
    assert_eq!(body["timer"]["panel"]["break_modal"], false);

    send(&app, "POST", "/start", None).await;
    let (_, body) = send(&app, "POST", "/break/ack", None).await;
    assert_eq!(body["status"], "ignored");
    assert_eq!(body["timer"]["phase"], "running");
}
