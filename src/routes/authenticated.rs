use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Authenticated Router Module
///
/// Routes for any signed-in customer. Mounted behind the role guard with the
/// allow-list `[Role::User]`; admins pass through by precedence.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET/PUT /api/auth/me
        // Read or partially edit the caller's own profile.
        .route("/api/auth/me", get(handlers::get_me).put(handlers::update_me))
        // POST /api/auth/change-password
        // Verifies the old password; earlier tokens stop working afterwards.
        .route("/api/auth/change-password", post(handlers::change_password))
        // POST /api/orders
        // Places an order owned by the caller.
        .route("/api/orders", post(handlers::create_order))
        // GET /api/orders/mine
        .route("/api/orders/mine", get(handlers::my_orders))
        // POST /api/transactions
        // Records a payment against one of the caller's own orders.
        .route("/api/transactions", post(handlers::create_transaction))
}
