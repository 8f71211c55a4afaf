pub mod handlers;
pub mod response;
pub mod session;


use crate::attendance::action::LabelSet;
use crate::attendance::history::HistoryQuery;
use crate::attendance::identity::IdentityGate;
use crate::attendance::machine::AttendanceMachine;
use crate::config::Config;
use crate::store::{self, RecordStore};
use crate::utils::time::{Clock, SystemClock, utc_offset_from_hours};
use anyhow::Result;
use axum::{
    Router,
    routing::{get, post},
};
use session::SessionRegistry;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Clone)]
pub struct AppState {
    pub gate: IdentityGate,
    pub machine: AttendanceMachine,
    pub history: HistoryQuery,
    pub sessions: SessionRegistry,
    pub labels: LabelSet,
}

impl AppState {
    pub fn new(
        config: &Config,
        store: Arc<dyn RecordStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let history = HistoryQuery::new(store.clone(), config.recent_limit);
        let machine = AttendanceMachine::new(store, history.clone(), clock, config.labels);

        Self {
            gate: IdentityGate::new(&config.corporate_domain),
            machine,
            history,
            sessions: SessionRegistry::new(Duration::from_secs(config.session_ttl_secs)),
            labels: config.labels,
        }
    }
}

pub fn routes(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/session",
            post(handlers::login).delete(handlers::logout),
        )
        .route(
            "/attendance",
            get(handlers::status).post(handlers::punch),
        )
        .route("/location", post(handlers::check_location));

    Router::new()
        .nest("/api", api)
        .route("/health", get(handlers::health))
        .with_state(state)
}

pub async fn serve(config: Config) -> Result<()> {
    let store = store::build_store(&config.store).await?;
    let clock = Arc::new(SystemClock::new(utc_offset_from_hours(
        config.utc_offset_hours,
    )?));
    let state = AppState::new(&config, store, clock);

    let app = routes(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive());

    let listener = tokio::net::TcpListener::bind(&config.server_addr).await?;
    tracing::info!("Kiosk service listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
