pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use crate::config::Settings;
use crate::service::ReputationService;

pub use routes::router;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ReputationService>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(service: ReputationService, settings: Settings) -> Self {
        Self {
            service: Arc::new(service),
            settings: Arc::new(settings),
        }
    }
}

/// Bind `addr` and serve the API until the process exits.
pub async fn serve(state: AppState, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
