use axum::{middleware, routing::get, Router};
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

use crate::cors;
use crate::handlers::*;
use crate::security::{authorize, Gate};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub gate: Gate,
}

/// Every request passes the gate before routing reaches a handler; CORS
/// preflights are answered outside it.
pub fn router(state: AppState) -> Router {
    let gate = state.gate.clone();

    Router::new()
        .route("/", get(handler_health))
        .route("/api/s/account/login-user", get(handler_account_list))
        .route("/api/s/account/:number", get(handler_account_detail))
        .with_state(state)
        .layer(middleware::from_fn_with_state(gate, authorize))
        .layer(cors::layer())
        .layer(TraceLayer::new_for_http())
}
