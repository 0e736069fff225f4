use crate::webserver::{middleware::capture_webhook, state::AppState};
use axum::{middleware::from_fn_with_state, Router};
use std::sync::Arc;

pub mod analysis;
pub mod status;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(analysis::routes())
        .merge(status::routes())
        .layer(from_fn_with_state(state.clone(), capture_webhook))
        .with_state(state)
}
