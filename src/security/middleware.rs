use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};

use crate::views::ResponseDto;

use super::{AuthorizationPolicy, Caller, Decision, TokenVerifier};

pub const DENIED_MESSAGE: &str = "권한없음";

/// The fixed 403 body every denial renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Denied;

impl IntoResponse for Denied {
    fn into_response(self) -> Response {
        (
            StatusCode::FORBIDDEN,
            Json(ResponseDto::<()>::failure(DENIED_MESSAGE)),
        )
            .into_response()
    }
}

/// Policy and token verifier, built once at startup.
#[derive(Debug, Clone)]
pub struct Gate {
    policy: Arc<AuthorizationPolicy>,
    tokens: Arc<TokenVerifier>,
}

impl Gate {
    pub fn new(policy: AuthorizationPolicy, tokens: TokenVerifier) -> Self {
        Self {
            policy: Arc::new(policy),
            tokens: Arc::new(tokens),
        }
    }

    fn caller(&self, request: &Request) -> Option<Caller> {
        let header = request.headers().get(AUTHORIZATION)?.to_str().ok()?;

        match self.tokens.verify_header(header) {
            Ok(caller) => Some(caller),
            Err(error) => {
                tracing::debug!(%error, "ignoring bearer credential");
                None
            }
        }
    }
}

/// Runs before every handler. Allowed requests from a known caller carry a
/// [`Caller`] extension.
pub async fn authorize(State(gate): State<Gate>, mut request: Request, next: Next) -> Response {
    let caller = gate.caller(&request);
    let path = request.uri().path();

    match gate.policy.evaluate(path, caller.as_ref()) {
        Decision::Allow => {
            if let Some(caller) = caller {
                request.extensions_mut().insert(caller);
            }
            next.run(request).await
        }
        Decision::DenyUnauthenticated { reason } => {
            tracing::debug!(
                path,
                reason = reason.as_str(),
                user_id = caller.map(|caller| caller.user_id()),
                "request denied"
            );
            Denied.into_response()
        }
    }
}
