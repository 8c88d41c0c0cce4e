use axum::{
    extract::FromRequestParts,
    http::{Request, StatusCode, header, request::Parts},
    response::IntoResponse,
};
use car_zone::{
    AppConfig, AppError, AppState, AuthUser, MemoryRepository,
    error::AuthError,
    models::{NewUser, Role},
    repository::{Repository, RepositoryState},
};
use chrono::{Duration, Utc};
use std::sync::Arc;

// --- Fixtures ---

fn test_state() -> (AppState, Arc<MemoryRepository>) {
    let repo = Arc::new(MemoryRepository::new());
    let config = AppConfig {
        jwt_secret: "auth-tests-secret".to_string(),
        ..AppConfig::default()
    };
    let state = AppState::new(config, repo.clone() as RepositoryState);
    (state, repo)
}

async fn seed_user(repo: &MemoryRepository, username: &str, role_id: i64) -> i64 {
    repo.create_user(NewUser {
        username: username.to_string(),
        email: format!("{username}@carzone.test"),
        password: "not-a-real-digest".to_string(),
        role_id,
    })
    .await
    .unwrap()
    .id
}

fn parts_with(authorization: Option<&str>) -> Parts {
    let mut builder = Request::builder().uri("/api/orders/mine");
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(()).unwrap().into_parts().0
}

async fn extract(state: &AppState, authorization: Option<&str>) -> Result<AuthUser, AppError> {
    let mut parts = parts_with(authorization);
    AuthUser::from_request_parts(&mut parts, state).await
}

fn unauthenticated_reason(result: Result<AuthUser, AppError>) -> AuthError {
    match result {
        Err(AppError::Auth(reason)) => reason,
        other => panic!("expected an authentication failure, got {other:?}"),
    }
}

// --- Tests ---

#[tokio::test]
async fn valid_token_resolves_identity_and_role() {
    let (state, repo) = test_state();
    let id = seed_user(&repo, "alice", Role::USER_ID).await;
    let token = state.tokens.issue(id, Role::USER_ID).unwrap();

    let user = extract(&state, Some(&format!("Bearer {token}"))).await.unwrap();

    assert_eq!(user, AuthUser { id, role: Role::User });
}

#[tokio::test]
async fn role_comes_from_the_store_not_the_token() {
    let (state, repo) = test_state();
    let id = seed_user(&repo, "root", Role::ADMIN_ID).await;
    // The claim says `user`; the account is an admin.
    let token = state.tokens.issue(id, Role::USER_ID).unwrap();

    let user = extract(&state, Some(&format!("Bearer {token}"))).await.unwrap();

    assert_eq!(user.role, Role::Admin);
}

#[tokio::test]
async fn missing_header_is_rejected_with_401() {
    let (state, _) = test_state();

    let result = extract(&state, None).await;
    let response = result.unwrap_err().into_response();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn non_bearer_scheme_is_malformed() {
    let (state, _) = test_state();

    let reason = unauthenticated_reason(extract(&state, Some("Basic YWxpY2U6cHc=")).await);

    assert_eq!(reason, AuthError::Malformed);
}

#[tokio::test]
async fn token_for_deleted_account_is_unknown() {
    let (state, _) = test_state();
    let token = state.tokens.issue(999, Role::USER_ID).unwrap();

    let reason = unauthenticated_reason(extract(&state, Some(&format!("Bearer {token}"))).await);

    assert_eq!(reason, AuthError::UnknownAccount);
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let (state, repo) = test_state();
    let id = seed_user(&repo, "bob", Role::USER_ID).await;
    let token = state
        .tokens
        .issue_at(id, Role::USER_ID, Utc::now() - Duration::hours(25))
        .unwrap();

    let reason = unauthenticated_reason(extract(&state, Some(&format!("Bearer {token}"))).await);

    assert_eq!(reason, AuthError::Expired);
}

#[tokio::test]
async fn token_older_than_password_change_is_revoked() {
    let (state, repo) = test_state();
    let id = seed_user(&repo, "carol", Role::USER_ID).await;
    let stale = state
        .tokens
        .issue_at(id, Role::USER_ID, Utc::now() - Duration::minutes(5))
        .unwrap();

    repo.update_password(id, "new-digest".to_string()).await.unwrap();

    let reason = unauthenticated_reason(extract(&state, Some(&format!("Bearer {stale}"))).await);
    assert_eq!(reason, AuthError::Revoked);

    // A token issued after the change is fine.
    let fresh = state.tokens.issue(id, Role::USER_ID).unwrap();
    assert!(extract(&state, Some(&format!("Bearer {fresh}"))).await.is_ok());
}

#[tokio::test]
async fn identity_already_in_extensions_is_reused() {
    let (state, _) = test_state();
    let mut parts = parts_with(None);
    parts.extensions.insert(AuthUser {
        id: 5,
        role: Role::Admin,
    });

    let user = AuthUser::from_request_parts(&mut parts, &state).await.unwrap();

    assert_eq!(user.id, 5);
    assert_eq!(user.role, Role::Admin);
}
