use crate::attendance::action::{AttendanceAction, LabelSet};
use crate::attendance::location::{self, LocationReading};
use crate::attendance::machine::derive_next_action;
use crate::attendance::record::StoredRecord;
use crate::error::SubmissionError;
use crate::server::AppState;
use crate::server::response::ApiResponse;
use crate::server::session::CurrentSession;
use crate::utils::format;
use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ActionView {
    pub code: &'static str,
    pub label: &'static str,
}

impl ActionView {
    fn new(action: AttendanceAction, labels: LabelSet) -> Self {
        Self {
            code: action.as_str(),
            label: action.label(labels),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub email: String,
    pub next_action: ActionView,
    /// Every action, for the manual re-punch menu.
    pub actions: Vec<ActionView>,
    pub recent: Vec<StoredRecord>,
    pub warning: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PunchRequest {
    #[serde(default)]
    pub location: Option<LocationReading>,
    /// Omitted: perform the suggested next action. Present: manual correction.
    #[serde(default)]
    pub action: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PunchResponse {
    pub record: StoredRecord,
    pub manual: bool,
    /// Set when the suggested action fell back to CLOCK_IN because the
    /// history could not be read.
    pub warning: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LocationCheckRequest {
    #[serde(default)]
    pub location: Option<LocationReading>,
}

#[derive(Debug, Serialize)]
pub struct LocationCheckResponse {
    pub ready: bool,
    pub location: Option<String>,
}

/// POST /api/session
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> (StatusCode, Json<ApiResponse<LoginResponse>>) {
    match state.gate.authenticate(&body.email) {
        Ok(identity) => {
            let email = identity.email().to_string();
            let token = state.sessions.open(identity).await;
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    LoginResponse { token, email },
                    format::login_success(state.labels),
                )),
            )
        }
        Err(_) => (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error(format::login_rejected(
                state.labels,
                state.gate.domain(),
            ))),
        ),
    }
}

/// DELETE /api/session
pub async fn logout(
    State(state): State<AppState>,
    session: CurrentSession,
) -> (StatusCode, Json<ApiResponse<()>>) {
    state.sessions.close(&session.token).await;
    tracing::info!("Logged out {}", session.identity.email());

    (
        StatusCode::OK,
        Json(ApiResponse::success((), format::logged_out(state.labels))),
    )
}

/// GET /api/attendance
pub async fn status(
    State(state): State<AppState>,
    session: CurrentSession,
) -> (StatusCode, Json<ApiResponse<StatusResponse>>) {
    let labels = state.labels;
    let snapshot = state.history.snapshot(session.identity.email()).await;
    let next_action = derive_next_action(&snapshot.latest);

    let warning = (!snapshot.store_reachable).then(|| format::history_unavailable(labels));
    let message = format::status_message(labels, snapshot.recent.len());

    let response = StatusResponse {
        email: session.identity.email().to_string(),
        next_action: ActionView::new(next_action, labels),
        actions: AttendanceAction::ALL
            .into_iter()
            .map(|action| ActionView::new(action, labels))
            .collect(),
        recent: snapshot.recent,
        warning,
    };

    (StatusCode::OK, Json(ApiResponse::success(response, message)))
}

/// POST /api/attendance
pub async fn punch(
    State(state): State<AppState>,
    session: CurrentSession,
    Json(body): Json<PunchRequest>,
) -> (StatusCode, Json<ApiResponse<PunchResponse>>) {
    let labels = state.labels;

    let (action, manual, warning) = match body.action.as_deref() {
        Some(requested) => match AttendanceAction::from_label(requested) {
            Some(action) => (action, true, None),
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::error(format::unknown_action(labels, requested))),
                );
            }
        },
        None => {
            let next = state.machine.next_action(&session.identity).await;
            let warning = (!next.store_reachable).then(|| {
                tracing::warn!(
                    "History unavailable for {}, defaulting to {}",
                    session.identity.email(),
                    next.action.as_str()
                );
                format::history_unavailable(labels)
            });
            (next.action, false, warning)
        }
    };

    match state
        .machine
        .submit(&session.identity, action, body.location.as_ref())
        .await
    {
        Ok(record) => {
            let stored = record.to_stored(labels);
            let message = format::punch_success(labels, action, &stored.time);
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(
                    PunchResponse {
                        record: stored,
                        manual,
                        warning,
                    },
                    message,
                )),
            )
        }
        Err(SubmissionError::LocationNotReady(e)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::error(format::location_not_ready(
                labels,
                &e.to_string(),
            ))),
        ),
        Err(SubmissionError::StoreUnavailable(e)) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse::error(format::punch_failed(labels, &e.to_string()))),
        ),
    }
}

/// POST /api/location
///
/// Readiness flag the kiosk uses to enable its punch buttons.
pub async fn check_location(
    State(state): State<AppState>,
    _session: CurrentSession,
    Json(body): Json<LocationCheckRequest>,
) -> (StatusCode, Json<ApiResponse<LocationCheckResponse>>) {
    let reading = body.location.as_ref();
    let ready = location::is_ready(reading);

    let (resolved, message) = match location::resolve(reading) {
        Ok(resolved) => {
            let text = resolved.to_string();
            let message = format::location_locked(state.labels, &text);
            (Some(text), message)
        }
        Err(e) => (None, format::location_not_ready(state.labels, &e.to_string())),
    };

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            LocationCheckResponse {
                ready,
                location: resolved,
            },
            message,
        )),
    )
}

/// GET /health
pub async fn health() -> &'static str {
    "ok"
}
