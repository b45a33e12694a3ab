//! Focus tick background task

use std::sync::Arc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::{state::AppState, timer::TickOutcome};

/// Background task that re-evaluates the focus timer while it is running.
///
/// This is the only tick source in the process: it idles until the ticking
/// flag turns on, evaluates the timer every tick interval, and drops back to
/// idle as soon as the flag turns off.
pub async fn focus_tick_task(state: Arc<AppState>) {
    info!("Starting focus tick task");

    let mut ticking_rx = state.ticking_tx.subscribe();

    loop {
        if !*ticking_rx.borrow_and_update() {
            // Wait for the timer to start
            if ticking_rx.changed().await.is_err() {
                info!("Ticking channel closed, stopping focus tick task");
                return;
            }
            continue;
        }

        debug!("Timer running, evaluating every {:?}", state.tick_interval);
        let mut ticker = interval(state.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; the first evaluation is one interval out
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match state.evaluate() {
                        Ok(TickOutcome::Expired) => debug!("Tick expired the session"),
                        Ok(TickOutcome::BreakDue { remaining_seconds }) => {
                            debug!("Tick raised a break with {}s left", remaining_seconds);
                        }
                        Ok(_) => {}
                        Err(e) => error!("Failed to evaluate timer: {}", e),
                    }
                }

                changed = ticking_rx.changed() => {
                    if changed.is_err() {
                        info!("Ticking channel closed, stopping focus tick task");
                        return;
                    }
                    if !*ticking_rx.borrow_and_update() {
                        debug!("Timer stopped, idling tick task");
                        break;
                    }
                }
            }
        }
    }
}
