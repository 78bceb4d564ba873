//! JSON API over the dApp core.
//!
//! # Data Flow
//! ```text
//! HTTP request
//!     → request id (x-request-id, UUID v4), trace, timeout layers
//!     → handlers.rs (read signals, drive session / switcher / workflow)
//!     → JSON response
//! ```

pub mod handlers;
pub mod state;

use std::time::Duration;

use axum::{
    http::HeaderName,
    routing::{get, post},
    Router,
};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::blockchain::chain::ChainClient;
use self::handlers::*;
pub use self::state::AppState;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Build the API router with all middleware layers.
#[allow(deprecated)]
pub fn setup_router<C: ChainClient>(state: AppState<C>, request_timeout: Duration) -> Router {
    let request_id = HeaderName::from_static(X_REQUEST_ID);

    Router::new()
        .route("/api/status", get(get_status::<C>))
        .route("/api/account", get(get_account::<C>))
        .route("/api/session/connect", post(connect_session::<C>))
        .route("/api/session/disconnect", post(disconnect_session::<C>))
        .route("/api/network/switch", post(switch_network::<C>))
        .route("/api/modal", post(open_modal::<C>))
        .route("/api/transfer", get(get_transfer::<C>).post(submit_transfer::<C>))
        .route("/api/transfer/reset", post(reset_transfer::<C>))
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
}
