use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;

// --- Identity ---

/// Role
///
/// The closed set of roles the authorization layer understands. The store maps
/// numeric role ids to these names; only the names cross the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// Store-level identifier for the admin role.
    pub const ADMIN_ID: i64 = 10101;
    /// Store-level identifier for the user role.
    pub const USER_ID: i64 = 20202;

    pub fn id(self) -> i64 {
        match self {
            Self::Admin => Self::ADMIN_ID,
            Self::User => Self::USER_ID,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    /// Parses a stored role name. Unknown names yield `None` and are never admitted.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "admin" => Some(Self::Admin),
            "user" => Some(Self::User),
            _ => None,
        }
    }
}

/// RoleRecord
///
/// Row of the `roles` table. Static reference data, read-only over the admin API.
#[derive(Debug, Clone, PartialEq, Serialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct RoleRecord {
    pub id: i64,
    pub role_name: String,
}

/// User
///
/// A `users` row joined with its role name. Internal only: it carries the
/// password digest, so responses use `UserProfile` instead.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub role_id: i64,
    pub role_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Tokens issued before this instant are rejected.
    pub password_changed_at: Option<DateTime<Utc>>,
}

/// UserProfile
///
/// Output schema for `GET /api/auth/me` and registration.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub role: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            phone_number: user.phone_number.clone(),
            address: user.address.clone(),
            role: user.role_name.clone(),
            created_at: user.created_at,
        }
    }
}

/// NewUser
///
/// Insert payload for the `users` table, already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role_id: i64,
}

/// ProfileChanges
///
/// Partial account edit; `None` keeps the stored value. `username` and
/// `role_id` are only ever set by the admin account endpoints.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub username: Option<String>,
    pub role_id: Option<i64>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
}

// --- Catalog (referenced only) ---

/// Car
///
/// Catalog entry an order points at. The catalog itself is managed elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct Car {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image_url: String,
    pub type_id: i64,
    pub brand_id: i64,
    pub is_second: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

// --- Sales lifecycle ---

/// Order
///
/// `status` is the settlement flag: false until payment is confirmed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub car_id: i64,
    pub total_price: f64,
    pub status: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: i64,
    pub car_id: i64,
    pub total_price: f64,
}

/// OrderChanges
///
/// Administrative edit of an order. The settlement flag is deliberately absent:
/// it only moves through the status endpoint.
#[derive(Debug, Clone, Default)]
pub struct OrderChanges {
    pub car_id: Option<i64>,
    pub total_price: Option<f64>,
}

/// Transaction
///
/// One payment attempt against an order. Several may exist per order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct Transaction {
    pub id: i64,
    pub order_id: i64,
    pub payment_provider: String,
    /// Receiving account reference.
    pub account_number: String,
    pub amount: f64,
    #[ts(type = "string")]
    pub transaction_date: DateTime<Utc>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub order_id: i64,
    pub payment_provider: String,
    pub account_number: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Default)]
pub struct TransactionChanges {
    pub payment_provider: Option<String>,
    pub account_number: Option<String>,
    pub amount: Option<f64>,
}

/// Invoice
///
/// Only meaningful once its order is settled; listings hide the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct Invoice {
    pub id: i64,
    pub order_id: i64,
    pub transaction_id: i64,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub order_id: i64,
    pub transaction_id: i64,
}

// --- Denormalized read models ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CarSummary {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub image_url: String,
    pub is_second: bool,
}

impl From<&Car> for CarSummary {
    fn from(car: &Car) -> Self {
        Self {
            id: car.id,
            name: car.name.clone(),
            price: car.price,
            image_url: car.image_url.clone(),
            is_second: car.is_second,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct OwnerSummary {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<&User> for OwnerSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

/// OrderView
///
/// An order with its car and owner embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    pub car: CarSummary,
    pub user: OwnerSummary,
}

/// TransactionView
///
/// A transaction with its order (and that order's car and owner) embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct TransactionView {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub order: OrderView,
}

/// InvoiceView
///
/// Output of the invoice listing: invoice, order view and payment side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct InvoiceView {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub order: OrderView,
    pub transaction: Transaction,
}

// --- Request payloads ---

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// UpdateProfileRequest
///
/// Partial update of the caller's own profile. Absent fields are left untouched.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// CreateOrderRequest
///
/// The owner is never taken from the body; it is the admitted caller.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CreateOrderRequest {
    pub car_id: i64,
    pub total_price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CreateTransactionRequest {
    pub order_id: i64,
    pub payment_provider: String,
    pub account_number: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CreateInvoiceRequest {
    pub order_id: i64,
    pub transaction_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UpdateOrderStatusRequest {
    pub status: bool,
}

/// CreateUserRequest
///
/// Admin-side account creation. Unlike registration, the role is chosen by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// UpdateUserRequest
///
/// Admin-side account edit. A new `password` is hashed and revokes the
/// account's earlier tokens, exactly like a self-service change.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateOrderRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_price: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateTransactionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}
