use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, put},
};

/// Admin Router Module
///
/// The back-office surface, nested under `/api/cms` and mounted behind the
/// role guard with the allow-list `[Role::Admin]`.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // --- Accounts ---
        .route(
            "/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route(
            "/users/{id}",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        // Roles are reference data: read-only.
        .route("/roles", get(handlers::list_roles))
        .route("/roles/{id}", get(handlers::get_role))
        // --- Orders ---
        .route("/orders", get(handlers::list_orders))
        .route(
            "/orders/{id}",
            get(handlers::get_order)
                .put(handlers::update_order)
                .delete(handlers::delete_order),
        )
        // PUT /orders/{id}/status
        // Settlement confirmation; repeating the same value is a no-op. This is
        // the only route that writes the settlement flag.
        .route("/orders/{id}/status", put(handlers::update_order_status))
        // --- Transactions ---
        .route("/transactions", get(handlers::list_transactions))
        .route(
            "/transactions/{id}",
            get(handlers::get_transaction)
                .put(handlers::update_transaction)
                .delete(handlers::delete_transaction),
        )
        // --- Invoices ---
        // GET lists only invoices whose order is settled.
        .route(
            "/invoices",
            get(handlers::list_invoices).post(handlers::create_invoice),
        )
        .route(
            "/invoices/{id}",
            get(handlers::get_invoice).delete(handlers::delete_invoice),
        )
}
