use axum::{Router, extract::FromRef, http::HeaderName, middleware};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Identity and access control.
pub mod auth;
pub mod password;
pub mod token;

// Sales pipeline and its persistence.
pub mod lifecycle;
pub mod memory;
pub mod repository;

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod validation;

// Route groups, one per allow-list.
pub mod routes;
use routes::{admin, authenticated, public};

// --- Public Re-exports ---

pub use auth::{AuthUser, RoleGuard};
pub use config::AppConfig;
pub use error::AppError;
pub use lifecycle::LifecycleManager;
pub use memory::MemoryRepository;
pub use models::Role;
pub use password::{Argon2Hasher, HasherState};
pub use repository::{PostgresRepository, RepositoryState};
pub use token::TokenService;

/// Route groups guarded by the `user` allow-list. Admin is admitted implicitly.
const USER_ROUTES: &[Role] = &[Role::User];
/// Route groups guarded by the `admin` allow-list.
const ADMIN_ROUTES: &[Role] = &[Role::Admin];

/// ApiDoc
///
/// Aggregates every `#[utoipa::path]` handler and `ToSchema` model into the
/// OpenAPI document served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::register, handlers::login, handlers::get_me, handlers::update_me,
        handlers::change_password, handlers::list_users, handlers::get_user,
        handlers::create_user, handlers::update_user, handlers::delete_user,
        handlers::list_roles, handlers::get_role, handlers::create_order, handlers::my_orders,
        handlers::list_orders, handlers::get_order, handlers::update_order,
        handlers::update_order_status, handlers::delete_order, handlers::create_transaction,
        handlers::list_transactions, handlers::get_transaction, handlers::update_transaction,
        handlers::delete_transaction, handlers::create_invoice, handlers::list_invoices,
        handlers::get_invoice, handlers::delete_invoice
    ),
    components(
        schemas(
            models::Role, models::UserProfile, models::Car, models::Order, models::Transaction,
            models::Invoice, models::CarSummary, models::OwnerSummary, models::OrderView,
            models::TransactionView, models::InvoiceView, models::RegisterRequest,
            models::LoginRequest, models::LoginResponse, models::ChangePasswordRequest,
            models::UpdateProfileRequest, models::CreateOrderRequest,
            models::CreateTransactionRequest, models::CreateInvoiceRequest,
            models::UpdateOrderStatusRequest, models::RoleRecord, models::CreateUserRequest,
            models::UpdateUserRequest, models::UpdateOrderRequest,
            models::UpdateTransactionRequest, error::ErrorBody,
        )
    ),
    tags(
        (name = "car-zone", description = "Car Zone sales administration API")
    )
)]
struct ApiDoc;

/// AppState
///
/// Unified State Pattern: one cloneable container for every shared service.
/// Handlers pull only the component they need through `FromRef`.
#[derive(Clone)]
pub struct AppState {
    /// Store handle (Postgres in production, in-memory in tests).
    pub repo: RepositoryState,
    /// Token issuer/verifier holding the process-wide signing secret.
    pub tokens: TokenService,
    pub hasher: HasherState,
    /// Order → Transaction → Invoice rules over the same store handle.
    pub lifecycle: LifecycleManager,
    pub config: AppConfig,
}

impl AppState {
    /// Wires the services from configuration around an existing store.
    pub fn new(config: AppConfig, repo: RepositoryState) -> Self {
        let tokens = TokenService::new(
            &config.jwt_secret,
            chrono::Duration::hours(config.token_ttl_hours),
        );
        Self {
            lifecycle: LifecycleManager::new(repo.clone()),
            hasher: Arc::new(Argon2Hasher::default()),
            tokens,
            repo,
            config,
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for TokenService {
    fn from_ref(app_state: &AppState) -> TokenService {
        app_state.tokens.clone()
    }
}

impl FromRef<AppState> for HasherState {
    fn from_ref(app_state: &AppState) -> HasherState {
        app_state.hasher.clone()
    }
}

impl FromRef<AppState> for LifecycleManager {
    fn from_ref(app_state: &AppState) -> LifecycleManager {
        app_state.lifecycle.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles every route group, applies the role guard per group, and wraps
/// the result in the observability stack.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public: no guard.
        .merge(public::public_routes())
        // Customer routes. `route_layer` only guards matched routes, so an
        // unknown path is still a 404 rather than a 401.
        .merge(
            authenticated::authenticated_routes().route_layer(middleware::from_fn_with_state(
                RoleGuard::new(state.clone(), USER_ROUTES),
                auth::require_role,
            )),
        )
        // Back office.
        .nest(
            "/api/cms",
            admin::admin_routes().route_layer(middleware::from_fn_with_state(
                RoleGuard::new(state.clone(), ADMIN_ROUTES),
                auth::require_role,
            )),
        )
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span factory for `TraceLayer`: method, URI and the request id, so every
/// log line of one request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
