use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::{
    error::AppError,
    models::{
        ChangePasswordRequest, CreateInvoiceRequest, CreateOrderRequest, CreateTransactionRequest,
        CreateUserRequest, LoginRequest, RegisterRequest, UpdateOrderRequest,
        UpdateOrderStatusRequest, UpdateProfileRequest, UpdateTransactionRequest,
        UpdateUserRequest,
    },
};

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.0)
    }
}

/// Validate
///
/// Structural checks on an inbound payload, run after deserialization and
/// before any store access.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// ValidJson
///
/// Drop-in replacement for `Json<T>` that also runs `T::validate`. Both a body
/// that fails to parse and one that fails validation are rejected with 400.
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// ValidPath
///
/// `Path<T>` whose rejection goes through the JSON error envelope: a segment
/// that does not parse (`/orders/abc`) is a 400 `VALIDATION_ERROR`.
pub struct ValidPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;
        Ok(Self(value))
    }
}

fn required(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError(format!("{field} is required")));
    }
    Ok(())
}

fn positive_id(field: &str, value: i64) -> Result<(), ValidationError> {
    if value <= 0 {
        return Err(ValidationError(format!("{field} must be a positive identifier")));
    }
    Ok(())
}

fn positive_amount(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError(format!("{field} must be greater than zero")));
    }
    Ok(())
}

fn email(value: &str) -> Result<(), ValidationError> {
    required("email", value)?;
    if !value.contains('@') {
        return Err(ValidationError("email must contain '@'".to_string()));
    }
    Ok(())
}

fn password(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError(format!(
            "{field} must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        required("username", &self.username)?;
        email(&self.email)?;
        password("password", &self.password)
    }
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        required("username", &self.username)?;
        required("password", &self.password)
    }
}

impl Validate for ChangePasswordRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        required("old_password", &self.old_password)?;
        password("new_password", &self.new_password)
    }
}

impl Validate for UpdateProfileRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(value) = &self.email {
            email(value)?;
        }
        Ok(())
    }
}

impl Validate for CreateUserRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        required("username", &self.username)?;
        email(&self.email)?;
        password("password", &self.password)
    }
}

impl Validate for UpdateUserRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(value) = &self.username {
            required("username", value)?;
        }
        if let Some(value) = &self.email {
            email(value)?;
        }
        if let Some(value) = &self.password {
            password("password", value)?;
        }
        Ok(())
    }
}

impl Validate for CreateOrderRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        positive_id("car_id", self.car_id)?;
        positive_amount("total_price", self.total_price)
    }
}

impl Validate for CreateTransactionRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        positive_id("order_id", self.order_id)?;
        required("payment_provider", &self.payment_provider)?;
        required("account_number", &self.account_number)?;
        positive_amount("amount", self.amount)
    }
}

impl Validate for CreateInvoiceRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        positive_id("order_id", self.order_id)?;
        positive_id("transaction_id", self.transaction_id)
    }
}

impl Validate for UpdateOrderRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(car_id) = self.car_id {
            positive_id("car_id", car_id)?;
        }
        if let Some(total_price) = self.total_price {
            positive_amount("total_price", total_price)?;
        }
        Ok(())
    }
}

impl Validate for UpdateTransactionRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(value) = &self.payment_provider {
            required("payment_provider", value)?;
        }
        if let Some(value) = &self.account_number {
            required("account_number", value)?;
        }
        if let Some(amount) = self.amount {
            positive_amount("amount", amount)?;
        }
        Ok(())
    }
}

// A bare boolean; the body shape is the only thing to check.
impl Validate for UpdateOrderStatusRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}
