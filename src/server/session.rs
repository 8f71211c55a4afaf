use crate::attendance::identity::SessionIdentity;
use crate::server::AppState;
use crate::server::response::ApiResponse;
use crate::utils::format;
use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

struct SessionEntry {
    identity: SessionIdentity,
    last_seen: Instant,
}

/// Live kiosk sessions keyed by bearer token. A session is created at
/// login, refreshed on every use and dropped at logout or once it has been
/// idle for longer than the TTL.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<String, SessionEntry>>>,
    ttl: Duration,
}

impl SessionRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub async fn open(&self, identity: SessionIdentity) -> String {
        let token = Uuid::new_v4().to_string();
        let now = Instant::now();

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_seen) < self.ttl);
        if sessions.len() < before {
            tracing::debug!("Evicted {} expired sessions", before - sessions.len());
        }

        sessions.insert(
            token.clone(),
            SessionEntry {
                identity,
                last_seen: now,
            },
        );
        token
    }

    pub async fn get(&self, token: &str) -> Option<SessionIdentity> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(token)?;

        let now = Instant::now();
        if now.duration_since(entry.last_seen) >= self.ttl {
            tracing::info!("Session expired for {}", entry.identity.email());
            sessions.remove(token);
            return None;
        }

        entry.last_seen = now;
        Some(entry.identity.clone())
    }

    pub async fn close(&self, token: &str) -> Option<SessionIdentity> {
        self.sessions
            .write()
            .await
            .remove(token)
            .map(|entry| entry.identity)
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// The caller's session, resolved from `Authorization: Bearer <token>`.
pub struct CurrentSession {
    pub token: String,
    pub identity: SessionIdentity,
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = (StatusCode, Json<ApiResponse<()>>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let unauthorized = || {
            (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::error(format::session_required(state.labels))),
            )
        };

        let token = bearer_token(parts).ok_or_else(unauthorized)?;
        let identity = state.sessions.get(token).await.ok_or_else(unauthorized)?;

        Ok(CurrentSession {
            token: token.to_string(),
            identity,
        })
    }
}
