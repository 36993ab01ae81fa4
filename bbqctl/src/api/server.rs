//! Router assembly and the listening server.

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use super::v0;
use crate::api_client::types::ControllerState;
use crate::control::SharedSettings;
use crate::error::Result;
use crate::tracing::prelude::*;

/// State handed to every handler.
#[derive(Clone)]
pub struct SharedState {
    /// Same handle the controller reads from.
    pub settings: SharedSettings,
    /// Latest report from the sampler.
    pub state_rx: watch::Receiver<ControllerState>,
}

impl SharedState {
    pub fn controller_state(&self) -> ControllerState {
        self.state_rx.borrow().clone()
    }
}

#[derive(OpenApi)]
#[openapi(info(title = "bbqctl", description = "Smoker fan controller API"))]
struct ApiDoc;

/// Build the full application router.
pub fn router(state: SharedState) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/api/v0", v0::routes())
        .split_for_parts();

    router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the API until `cancellation` fires.
pub async fn serve(
    addr: SocketAddr,
    state: SharedState,
    cancellation: CancellationToken,
) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "API server listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { cancellation.cancelled().await })
        .await?;

    info!("API server stopped");
    Ok(())
}
