//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, patch, post},
};

use crate::domain::notification::NotificationGateway;
use crate::domain::repository::AuthStore;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::require_bearer_token;

/// Routes mounted under `/api/auth`
pub fn auth_router<S, N>(state: AuthAppState<S, N>) -> Router
where
    S: AuthStore,
    N: NotificationGateway + Send + Sync + 'static,
{
    let protected = Router::new()
        .route(
            "/register-business",
            post(handlers::register_business::<S, N>),
        )
        .route("/invite", post(handlers::invite_user::<S, N>))
        .route(
            "/resend-credentials/{user_id}",
            post(handlers::resend_credentials::<S, N>),
        )
        .route("/change-password", post(handlers::change_password::<S, N>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_bearer_token::<S, N>,
        ));

    Router::new()
        .route("/login", post(handlers::login::<S, N>))
        .route("/set-password", post(handlers::set_password::<S, N>))
        .merge(protected)
        .with_state(state)
}

/// Routes mounted under `/api/business`
pub fn business_router<S, N>(state: AuthAppState<S, N>) -> Router
where
    S: AuthStore,
    N: NotificationGateway + Send + Sync + 'static,
{
    Router::new()
        .route("/team", get(handlers::list_team::<S, N>))
        .route(
            "/team/{user_id}/status",
            patch(handlers::toggle_member_status::<S, N>),
        )
        .route(
            "/team/{user_id}/role",
            patch(handlers::change_member_role::<S, N>),
        )
        .route("/{business_id}", get(handlers::get_business::<S, N>))
        .route(
            "/{business_id}/audit-logs",
            get(handlers::list_audit_logs::<S, N>),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_bearer_token::<S, N>,
        ))
        .with_state(state)
}

/// Routes mounted under `/api/users`
pub fn user_router<S, N>(state: AuthAppState<S, N>) -> Router
where
    S: AuthStore,
    N: NotificationGateway + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/me",
            get(handlers::get_profile::<S, N>).patch(handlers::update_profile::<S, N>),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_bearer_token::<S, N>,
        ))
        .with_state(state)
}

/// Routes mounted under `/api/admin`; platform administrators only
pub fn admin_router<S, N>(state: AuthAppState<S, N>) -> Router
where
    S: AuthStore,
    N: NotificationGateway + Send + Sync + 'static,
{
    Router::new()
        .route("/audit-logs", get(handlers::system_audit_logs::<S, N>))
        .route("/users", get(handlers::list_users::<S, N>))
        .route("/admins", get(handlers::list_admins::<S, N>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_bearer_token::<S, N>,
        ))
        .with_state(state)
}
