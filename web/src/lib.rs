//! HTTP layer for the noticeboard: REST controllers, session auth, and the
//! SSE endpoint that connects browser sessions to the broadcast channel.

use axum_login::{
    tower_sessions::{Expiry, MemoryStore, SessionManagerLayer},
    AuthManagerLayerBuilder,
};
use events::EventPublisher;
use log::*;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use time::Duration;

mod controller;
mod error;
mod extractors;
mod middleware;
mod router;
mod sse_endpoint;

pub use error::{Error, Result};

/// Web-layer state: infrastructure state plus the broadcast channel handles.
/// The SSE manager and event publisher are constructed once at startup and
/// passed here explicitly; nothing in this crate reaches for a global.
#[derive(Clone)]
pub struct AppState {
    pub service: service::AppState,
    pub sse_manager: Arc<sse::Manager>,
    pub event_publisher: EventPublisher,
}

impl AppState {
    pub fn new(
        service: service::AppState,
        sse_manager: Arc<sse::Manager>,
        event_publisher: EventPublisher,
    ) -> Self {
        Self {
            service,
            sse_manager,
            event_publisher,
        }
    }

    pub fn db_conn_ref(&self) -> &DatabaseConnection {
        self.service.db_conn_ref()
    }
}

/// Builds the session/auth layers and the router, then serves until shutdown.
pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let config = app_state.service.config.clone();

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_expiry(Expiry::OnInactivity(Duration::hours(
            config.session_expiry_hours,
        )));

    let backend = domain::user::Backend::new(&app_state.service.database_connection);
    let auth_layer = AuthManagerLayerBuilder::new(backend, session_layer).build();

    let router = router::define_routes(app_state).layer(auth_layer);

    let listen_addr = format!("{}:{}", config.interface, config.port);
    info!("Server starting... listening on {listen_addr}");

    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    axum::serve(listener, router).await
}
