use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::{
    AppState,
    error::{AppError, AuthError},
    models::Role,
    repository::RepositoryState,
    token::{TokenService, bearer_token},
};

/// AuthUser
///
/// The resolved identity of an admitted request. The role guard attaches it to
/// the request extensions; handlers take it as an argument to learn who is
/// calling without trusting anything in the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
    pub role: Role,
}

/// AuthUser Extractor Implementation
///
/// 1. Reuse: if the role guard already resolved the caller, return that.
/// 2. Token: extract the bearer token and verify it (`Unauthenticated → TokenVerified`).
/// 3. Lookup: load the user and its role (`TokenVerified → IdentityResolved`).
///    Tokens older than the user's last password change are refused.
///
/// Rejection: 401 for every failure. A role name outside `Role` is a 403, since
/// the caller is authenticated but can never be admitted.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    TokenService: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let repo = RepositoryState::from_ref(state);
        let tokens = TokenService::from_ref(state);

        let token = bearer_token(&parts.headers)?;
        let identity = tokens.verify(token)?;

        let user = repo
            .find_user(identity.user_id)
            .await?
            .ok_or(AuthError::UnknownAccount)?;

        if let Some(changed_at) = user.password_changed_at {
            if identity.issued_at < changed_at.timestamp() {
                return Err(AuthError::Revoked.into());
            }
        }

        let role = Role::from_name(&user.role_name).ok_or_else(|| {
            AppError::Forbidden(format!("role '{}' is not recognised", user.role_name))
        })?;

        Ok(AuthUser { id: user.id, role })
    }
}

/// authorize
///
/// `IdentityResolved → Admitted | Rejected`. Admin takes precedence over any
/// allow-list; every other role must be listed.
pub fn authorize(role: Role, allowed: &[Role]) -> Result<(), AppError> {
    if role == Role::Admin || allowed.contains(&role) {
        return Ok(());
    }
    Err(AppError::Forbidden(format!(
        "role '{}' cannot access this route",
        role.name()
    )))
}

/// RoleGuard
///
/// State for the role-gating middleware: the application state plus the route
/// group's declared allow-list.
#[derive(Clone)]
pub struct RoleGuard {
    pub app: AppState,
    pub allowed: &'static [Role],
}

impl RoleGuard {
    pub fn new(app: AppState, allowed: &'static [Role]) -> Self {
        Self { app, allowed }
    }
}

/// require_role
///
/// Middleware applied with `from_fn_with_state(RoleGuard, require_role)`.
/// Rejected requests never reach the handler. Admitted requests carry the
/// resolved `AuthUser` in their extensions.
pub async fn require_role(
    State(guard): State<RoleGuard>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = request.into_parts();

    let user = AuthUser::from_request_parts(&mut parts, &guard.app).await?;

    if let Err(rejection) = authorize(user.role, guard.allowed) {
        tracing::info!(
            user_id = user.id,
            role = user.role.name(),
            path = %parts.uri.path(),
            "request rejected: role not permitted"
        );
        return Err(rejection);
    }

    parts.extensions.insert(user);
    Ok(next.run(Request::from_parts(parts, body)).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_bypasses_any_allow_list() {
        assert!(authorize(Role::Admin, &[Role::User]).is_ok());
        assert!(authorize(Role::Admin, &[]).is_ok());
    }

    #[test]
    fn listed_role_is_admitted() {
        assert!(authorize(Role::User, &[Role::User]).is_ok());
    }

    #[test]
    fn unlisted_role_is_forbidden() {
        let err = authorize(Role::User, &[Role::Admin]).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
