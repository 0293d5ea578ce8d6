//! Auth Middleware
//!
//! Bearer-token authentication for protected routes. The resolved
//! [`Actor`] is stored in request extensions for the handlers.

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::application::IdentityResolver;
use crate::domain::notification::NotificationGateway;
use crate::domain::repository::AuthStore;
use crate::error::AuthError;
use crate::presentation::handlers::AuthAppState;

/// Middleware that requires a valid bearer token
pub async fn require_bearer_token<S, N>(
    State(state): State<AuthAppState<S, N>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    S: AuthStore,
    N: NotificationGateway + Send + Sync + 'static,
{
    let token = bearer_token(&req)
        .ok_or_else(|| AuthError::unauthorized("Missing bearer token").into_response())?
        .to_string();

    let resolver = IdentityResolver::new(state.store.clone(), state.services.clone());
    let actor = resolver
        .resolve_bearer(&token)
        .await
        .map_err(IntoResponse::into_response)?;

    req.extensions_mut().insert(actor);

    Ok(next.run(req).await)
}

fn bearer_token(req: &Request<Body>) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
