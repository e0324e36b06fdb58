//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};

use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};

use super::responses::{ApiResponse, HealthResponse, SettingsResponse, StatusResponse};
use crate::{settings::TimerSettings, state::AppState, timer::format_clock};

/// Handle POST /start - Begin a work session from the stored settings
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.start_timer() {
        Ok(frame) => {
            info!("Start endpoint called - work session running");
            Ok(Json(ApiResponse::active(
                "Work session started".to_string(),
                frame,
            )))
        }
        Err(e) => {
            error!("Failed to start timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /stop - Return the timer to idle
pub async fn stop_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.stop_timer() {
        Ok(frame) => {
            info!("Stop endpoint called - timer idle");
            Ok(Json(ApiResponse::inactive(
                "Timer stopped".to_string(),
                frame,
            )))
        }
        Err(e) => {
            error!("Failed to stop timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /status - Return the full timer and server status
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match state.get_timer() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to get timer state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let settings = match state.get_settings() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to get settings: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        phase: timer.phase,
        clock: format_clock(timer.remaining_seconds),
        running: timer.is_running(),
        remaining_seconds: timer.remaining_seconds,
        work_elapsed_seconds: timer.work_elapsed_seconds,
        settings,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /settings - Return the stored settings
pub async fn settings_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SettingsResponse>, StatusCode> {
    match state.get_settings() {
        Ok(settings) => Ok(Json(SettingsResponse::current(settings))),
        Err(e) => {
            error!("Failed to get settings: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle PUT /settings - Store new settings, stopping any running session
pub async fn save_settings_handler(
    State(state): State<Arc<AppState>>,
    Json(new_settings): Json<TimerSettings>,
) -> Result<Json<SettingsResponse>, StatusCode> {
    match state.save_settings(new_settings) {
        Ok((saved, stopped_timer)) => {
            info!("Settings endpoint called - settings updated");
            Ok(Json(SettingsResponse::saved(saved, stopped_timer)))
        }
        Err(e) => {
            error!("Failed to save settings: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /events - Stream display frames and cues as server-sent events
///
/// Emits a `tick` event for every display frame, starting with the current
/// one, and a `cue` event for every notification.
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!("Events endpoint called - streaming timer events");

    let display_rx = state.display_tx.subscribe();
    let ticks = stream::unfold((display_rx, true), |(mut rx, first)| async move {
        if !first && rx.changed().await.is_err() {
            return None;
        }
        let frame = rx.borrow_and_update().clone();
        let event = encode_event("tick", &frame)?;
        Some((Ok(event), (rx, false)))
    });

    let cue_rx = state.notifier.subscribe();
    let cues = stream::unfold(cue_rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(cue_event) => {
                    let event = encode_event("cue", &cue_event)?;
                    return Some((Ok(event), rx));
                }
                Err(RecvError::Lagged(missed)) => {
                    warn!("Cue stream lagged by {} events", missed);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(stream::select(ticks, cues)).keep_alive(KeepAlive::default())
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// Encode a payload as a named SSE event
fn encode_event(name: &str, payload: &impl Serialize) -> Option<Event> {
    match serde_json::to_string(payload) {
        Ok(json) => Some(Event::default().event(name).data(json)),
        Err(e) => {
            warn!("Failed to encode {} event: {}", name, e);
            None
        }
    }
}
