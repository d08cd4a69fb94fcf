use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::{domains::notification_email::rest::notification_email_routes, state::SharedAppState};

pub fn create_app(state: SharedAppState) -> Router {
  Router::new()
    .route("/health", get(health_handler))
    .nest("/api/v1", notification_email_routes())
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

pub async fn health_handler() -> &'static str {
  "ok"
}
