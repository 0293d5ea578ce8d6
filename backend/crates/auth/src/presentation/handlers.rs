//! HTTP Handlers

use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{
    Actor, AuditTrailUseCase, AuthServices, BusinessDetailsUseCase, ChangePasswordInput,
    ChangePasswordUseCase, InviteUserInput, InviteUserUseCase, LoginInput, LoginUseCase,
    PageRequest, ProfileUseCase, RegisterBusinessInput, RegisterBusinessUseCase,
    ResendCredentialsUseCase, SetPasswordInput, SetPasswordUseCase, TeamUseCase,
    UpdateProfileInput, UserDirectoryUseCase,
};
use crate::domain::notification::NotificationGateway;
use crate::domain::repository::AuthStore;
use crate::domain::value_object::ids::{BusinessId, UserId};
use crate::error::AuthResult;
use crate::domain::entity::user::User;
use crate::presentation::dto::{
    AuditLogResponse, BusinessResponse, ChangePasswordRequest, ChangeRoleRequest,
    InviteUserRequest, InviteUserResponse, LoginRequest, LoginResponse, MembershipResponse,
    MessageResponse, PageQuery, PageResponse, ProfileResponse, RegisterBusinessRequest,
    RegisterBusinessResponse, ResendCredentialsResponse, SearchQuery, SetPasswordRequest,
    StatusQuery, TeamMemberResponse, UpdateProfileRequest, UserListQuery, UserResponse,
};

/// Shared state for auth handlers
pub struct AuthAppState<S, N> {
    pub store: Arc<S>,
    pub gateway: Arc<N>,
    pub services: AuthServices,
}

impl<S, N> AuthAppState<S, N> {
    pub fn new(store: S, gateway: N, services: AuthServices) -> Self {
        Self {
            store: Arc::new(store),
            gateway: Arc::new(gateway),
            services,
        }
    }
}

impl<S, N> Clone for AuthAppState<S, N> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            gateway: self.gateway.clone(),
            services: self.services.clone(),
        }
    }
}

// ============================================================================
// Public
// ============================================================================

/// POST /api/auth/login
pub async fn login<S, N>(
    State(state): State<AuthAppState<S, N>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Json<LoginResponse>>
where
    S: AuthStore,
    N: NotificationGateway + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(state.store.clone(), state.services.clone());

    let output = use_case
        .execute(LoginInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(output.into()))
}

/// POST /api/auth/set-password
pub async fn set_password<S, N>(
    State(state): State<AuthAppState<S, N>>,
    Json(req): Json<SetPasswordRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    S: AuthStore,
    N: NotificationGateway + Send + Sync + 'static,
{
    let use_case = SetPasswordUseCase::new(state.store.clone(), state.services.clone());

    use_case
        .execute(SetPasswordInput {
            user_id: UserId::from_uuid(req.user_id),
            token: req.token,
            new_password: req.new_password,
        })
        .await?;

    Ok(Json(MessageResponse::new(
        "Password set successfully. You can now log in.",
    )))
}

// ============================================================================
// Credentials (bearer)
// ============================================================================

/// POST /api/auth/register-business
pub async fn register_business<S, N>(
    State(state): State<AuthAppState<S, N>>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<RegisterBusinessRequest>,
) -> AuthResult<(StatusCode, Json<RegisterBusinessResponse>)>
where
    S: AuthStore,
    N: NotificationGateway + Send + Sync + 'static,
{
    let use_case = RegisterBusinessUseCase::new(
        state.store.clone(),
        state.gateway.clone(),
        state.services.clone(),
    );

    let input = RegisterBusinessInput {
        business_name: req.business_name,
        business_email: req.business_email,
        business_address: req.business_address,
        business_phone: req.business_phone,
        owner_full_name: req.owner_full_name,
        owner_email: req.owner_email,
        owner_phone: req.owner_phone,
    };

    let result = use_case.execute(&actor, input).await?;

    Ok((StatusCode::CREATED, Json(result.into())))
}

/// POST /api/auth/invite
pub async fn invite_user<S, N>(
    State(state): State<AuthAppState<S, N>>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<InviteUserRequest>,
) -> AuthResult<(StatusCode, Json<InviteUserResponse>)>
where
    S: AuthStore,
    N: NotificationGateway + Send + Sync + 'static,
{
    let use_case = InviteUserUseCase::new(
        state.store.clone(),
        state.gateway.clone(),
        state.services.clone(),
    );

    let output = use_case
        .execute(
            &actor,
            InviteUserInput {
                full_name: req.full_name,
                email: req.email,
                phone: req.phone,
                role: req.role,
            },
        )
        .await?;

    let message = if output.email_sent {
        "User invited. A set-password link has been emailed."
    } else {
        "User invited, but the email could not be sent. Use resend credentials to try again."
    };

    Ok((
        StatusCode::CREATED,
        Json(InviteUserResponse {
            user_id: output.user_id.into_uuid(),
            email_sent: output.email_sent,
            message: message.to_string(),
        }),
    ))
}

/// POST /api/auth/resend-credentials/{user_id}
pub async fn resend_credentials<S, N>(
    State(state): State<AuthAppState<S, N>>,
    Extension(actor): Extension<Actor>,
    Path(user_id): Path<Uuid>,
) -> AuthResult<Json<ResendCredentialsResponse>>
where
    S: AuthStore,
    N: NotificationGateway + Send + Sync + 'static,
{
    let use_case = ResendCredentialsUseCase::new(
        state.store.clone(),
        state.gateway.clone(),
        state.services.clone(),
    );

    let output = use_case
        .execute(&actor, UserId::from_uuid(user_id))
        .await?;

    let message = if output.email_sent {
        "A new set-password link has been emailed."
    } else {
        "A new set-password link was issued, but the email could not be sent."
    };

    Ok(Json(ResendCredentialsResponse {
        email_sent: output.email_sent,
        message: message.to_string(),
    }))
}

/// POST /api/auth/change-password
pub async fn change_password<S, N>(
    State(state): State<AuthAppState<S, N>>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<ChangePasswordRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    S: AuthStore,
    N: NotificationGateway + Send + Sync + 'static,
{
    let use_case = ChangePasswordUseCase::new(state.store.clone(), state.services.clone());

    use_case
        .execute(
            &actor,
            ChangePasswordInput {
                current_password: req.current_password,
                new_password: req.new_password,
            },
        )
        .await?;

    Ok(Json(MessageResponse::new(
        "Password changed. Please log in again.",
    )))
}

// ============================================================================
// Business team and audit trail (bearer)
// ============================================================================

/// GET /api/business/team?page=&pageSize=&search=
pub async fn list_team<S, N>(
    State(state): State<AuthAppState<S, N>>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<SearchQuery>,
) -> AuthResult<Json<PageResponse<TeamMemberResponse>>>
where
    S: AuthStore,
    N: NotificationGateway + Send + Sync + 'static,
{
    let page = TeamUseCase::new(state.store.clone())
        .list_team(
            &actor,
            PageRequest::new(query.page, query.page_size),
            query.search.as_deref(),
        )
        .await?;

    Ok(Json(page.into()))
}

/// PATCH /api/business/team/{user_id}/status?activate=
pub async fn toggle_member_status<S, N>(
    State(state): State<AuthAppState<S, N>>,
    Extension(actor): Extension<Actor>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<StatusQuery>,
) -> AuthResult<Json<MembershipResponse>>
where
    S: AuthStore,
    N: NotificationGateway + Send + Sync + 'static,
{
    let membership = TeamUseCase::new(state.store.clone())
        .toggle_status(&actor, UserId::from_uuid(user_id), query.activate)
        .await?;

    Ok(Json(membership.into()))
}

/// PATCH /api/business/team/{user_id}/role
pub async fn change_member_role<S, N>(
    State(state): State<AuthAppState<S, N>>,
    Extension(actor): Extension<Actor>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<ChangeRoleRequest>,
) -> AuthResult<Json<MembershipResponse>>
where
    S: AuthStore,
    N: NotificationGateway + Send + Sync + 'static,
{
    let membership = TeamUseCase::new(state.store.clone())
        .change_role(&actor, UserId::from_uuid(user_id), req.role)
        .await?;

    Ok(Json(membership.into()))
}

/// GET /api/business/{business_id}/audit-logs?page=&pageSize=
pub async fn list_audit_logs<S, N>(
    State(state): State<AuthAppState<S, N>>,
    Extension(actor): Extension<Actor>,
    Path(business_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> AuthResult<Json<PageResponse<AuditLogResponse>>>
where
    S: AuthStore,
    N: NotificationGateway + Send + Sync + 'static,
{
    let page = AuditTrailUseCase::new(state.store.clone())
        .list(
            &actor,
            BusinessId::from_uuid(business_id),
            PageRequest::new(query.page, query.page_size),
        )
        .await?;

    Ok(Json(page.into()))
}

/// GET /api/business/{business_id}
pub async fn get_business<S, N>(
    State(state): State<AuthAppState<S, N>>,
    Extension(actor): Extension<Actor>,
    Path(business_id): Path<Uuid>,
) -> AuthResult<Json<BusinessResponse>>
where
    S: AuthStore,
    N: NotificationGateway + Send + Sync + 'static,
{
    let business = BusinessDetailsUseCase::new(state.store.clone())
        .get(&actor, BusinessId::from_uuid(business_id))
        .await?;

    Ok(Json(business.into()))
}

// ============================================================================
// Own profile (bearer)
// ============================================================================

fn profile_response(actor: &Actor, user: User) -> ProfileResponse {
    ProfileResponse {
        user: user.into(),
        business_id: actor.identity.business_id().map(|id| id.into_uuid()),
        business_role: actor.identity.tenant_role(),
    }
}

/// GET /api/users/me
pub async fn get_profile<S, N>(
    State(state): State<AuthAppState<S, N>>,
    Extension(actor): Extension<Actor>,
) -> AuthResult<Json<ProfileResponse>>
where
    S: AuthStore,
    N: NotificationGateway + Send + Sync + 'static,
{
    let user = ProfileUseCase::new(state.store.clone()).get(&actor).await?;

    Ok(Json(profile_response(&actor, user)))
}

/// PATCH /api/users/me
pub async fn update_profile<S, N>(
    State(state): State<AuthAppState<S, N>>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<UpdateProfileRequest>,
) -> AuthResult<Json<ProfileResponse>>
where
    S: AuthStore,
    N: NotificationGateway + Send + Sync + 'static,
{
    let user = ProfileUseCase::new(state.store.clone())
        .update(
            &actor,
            UpdateProfileInput {
                full_name: req.full_name,
                email: req.email,
                phone: req.phone,
            },
        )
        .await?;

    Ok(Json(profile_response(&actor, user)))
}

// ============================================================================
// Platform administration (bearer, system identity)
// ============================================================================

/// GET /api/admin/audit-logs?page=&pageSize=
pub async fn system_audit_logs<S, N>(
    State(state): State<AuthAppState<S, N>>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<PageQuery>,
) -> AuthResult<Json<PageResponse<AuditLogResponse>>>
where
    S: AuthStore,
    N: NotificationGateway + Send + Sync + 'static,
{
    let page = AuditTrailUseCase::new(state.store.clone())
        .list_system(&actor, PageRequest::new(query.page, query.page_size))
        .await?;

    Ok(Json(page.into()))
}

/// GET /api/admin/users?page=&pageSize=&search=&role=
pub async fn list_users<S, N>(
    State(state): State<AuthAppState<S, N>>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<UserListQuery>,
) -> AuthResult<Json<PageResponse<UserResponse>>>
where
    S: AuthStore,
    N: NotificationGateway + Send + Sync + 'static,
{
    let page = UserDirectoryUseCase::new(state.store.clone())
        .list_users(
            &actor,
            PageRequest::new(query.page, query.page_size),
            query.search.as_deref(),
            query.role,
        )
        .await?;

    Ok(Json(page.into()))
}

/// GET /api/admin/admins?page=&pageSize=&search=
pub async fn list_admins<S, N>(
    State(state): State<AuthAppState<S, N>>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<SearchQuery>,
) -> AuthResult<Json<PageResponse<UserResponse>>>
where
    S: AuthStore,
    N: NotificationGateway + Send + Sync + 'static,
{
    let page = UserDirectoryUseCase::new(state.store.clone())
        .list_admins(
            &actor,
            PageRequest::new(query.page, query.page_size),
            query.search.as_deref(),
        )
        .await?;

    Ok(Json(page.into()))
}
