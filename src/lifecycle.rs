//! Order → Transaction → Invoice.
//!
//! Every operation here assumes the caller was already admitted by the role
//! guard; the lifecycle enforces the cross-entity rules and order ownership.

use std::fmt;
use thiserror::Error;

use crate::{
    auth::AuthUser,
    error::{AppError, StoreError},
    models::{
        Invoice, InvoiceView, NewInvoice, NewOrder, NewTransaction, Order, OrderChanges,
        OrderView, Role, Transaction, TransactionChanges, TransactionView,
    },
    repository::RepositoryState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRef {
    Car(i64),
    Order(i64),
    Transaction(i64),
    Invoice(i64),
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Car(id) => write!(f, "car {id}"),
            Self::Order(id) => write!(f, "order {id}"),
            Self::Transaction(id) => write!(f, "transaction {id}"),
            Self::Invoice(id) => write!(f, "invoice {id}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("{0} does not exist")]
    NotFound(EntityRef),

    #[error("transaction {transaction_id} belongs to order {actual}, not order {expected}")]
    TransactionOrderMismatch {
        transaction_id: i64,
        expected: i64,
        actual: i64,
    },

    #[error("order {order_id} belongs to another user")]
    NotOwner { order_id: i64 },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LifecycleError {
    /// Use when `path` was addressed by the request path: a miss on it is 404.
    /// A miss on anything the body referenced stays 400.
    pub fn on_path(self, path: EntityRef) -> AppError {
        match self {
            Self::NotFound(entity) if entity == path => AppError::NotFound(entity.to_string()),
            other => other.into(),
        }
    }
}

impl From<LifecycleError> for AppError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::NotFound(entity) => AppError::UnknownReference(entity.to_string()),
            mismatch @ LifecycleError::TransactionOrderMismatch { .. } => {
                AppError::Validation(mismatch.to_string())
            }
            not_owner @ LifecycleError::NotOwner { .. } => {
                AppError::Forbidden(not_owner.to_string())
            }
            LifecycleError::Store(e) => e.into(),
        }
    }
}

/// StatusChange
///
/// Result of a settlement update. `changed` is false when the order already
/// carried the requested flag, so repeating the call is a no-op.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    pub order: Order,
    pub changed: bool,
}

/// LifecycleManager
///
/// Business logic for the sales pipeline. Holds only an injected store handle,
/// so it is cheap to clone into every request.
#[derive(Clone)]
pub struct LifecycleManager {
    repo: RepositoryState,
}

impl LifecycleManager {
    pub fn new(repo: RepositoryState) -> Self {
        Self { repo }
    }

    /// Places an unsettled order owned by `user_id`.
    ///
    /// The car must exist; stock is not checked.
    pub async fn create_order(
        &self,
        user_id: i64,
        car_id: i64,
        total_price: f64,
    ) -> Result<Order, LifecycleError> {
        if self.repo.find_car(car_id).await?.is_none() {
            return Err(LifecycleError::NotFound(EntityRef::Car(car_id)));
        }

        let order = self
            .repo
            .insert_order(NewOrder {
                user_id,
                car_id,
                total_price,
            })
            .await?;

        tracing::info!(order_id = order.id, user_id, car_id, total_price, "order placed");
        Ok(order)
    }

    /// Records a payment attempt. Never touches the order's settlement flag.
    ///
    /// Only the order's owner may pay for it; an admin may record a payment
    /// against any order.
    pub async fn create_transaction(
        &self,
        caller: &AuthUser,
        order_id: i64,
        payment_provider: String,
        account_number: String,
        amount: f64,
    ) -> Result<Transaction, LifecycleError> {
        let order = self
            .repo
            .find_order(order_id)
            .await?
            .ok_or(LifecycleError::NotFound(EntityRef::Order(order_id)))?;

        if caller.role != Role::Admin && order.user_id != caller.id {
            tracing::warn!(
                order_id,
                caller_id = caller.id,
                owner_id = order.user_id,
                "transaction refused for foreign order"
            );
            return Err(LifecycleError::NotOwner { order_id });
        }

        let transaction = self
            .repo
            .insert_transaction(NewTransaction {
                order_id: order.id,
                payment_provider,
                account_number,
                amount,
            })
            .await?;

        tracing::info!(
            transaction_id = transaction.id,
            order_id,
            amount,
            order_total = order.total_price,
            "transaction recorded"
        );
        Ok(transaction)
    }

    /// Issues an invoice for an order and one of its transactions.
    ///
    /// Settlement is not required at write time; unsettled invoices are simply
    /// hidden from `list_invoices` until the order is settled.
    pub async fn create_invoice(
        &self,
        order_id: i64,
        transaction_id: i64,
    ) -> Result<Invoice, LifecycleError> {
        let order = self
            .repo
            .find_order(order_id)
            .await?
            .ok_or(LifecycleError::NotFound(EntityRef::Order(order_id)))?;
        let transaction = self
            .repo
            .find_transaction(transaction_id)
            .await?
            .ok_or(LifecycleError::NotFound(EntityRef::Transaction(transaction_id)))?;

        if transaction.order_id != order.id {
            return Err(LifecycleError::TransactionOrderMismatch {
                transaction_id,
                expected: order.id,
                actual: transaction.order_id,
            });
        }

        let invoice = self
            .repo
            .insert_invoice(NewInvoice {
                order_id,
                transaction_id,
            })
            .await?;

        tracing::info!(
            invoice_id = invoice.id,
            order_id,
            transaction_id,
            settled = order.status,
            "invoice issued"
        );
        Ok(invoice)
    }

    /// Invoices of settled orders only, newest first.
    pub async fn list_invoices(&self) -> Result<Vec<InvoiceView>, LifecycleError> {
        let views = self.repo.list_invoice_views().await?;
        Ok(views.into_iter().filter(|v| v.order.order.status).collect())
    }

    /// Sets the settlement flag. Repeating the same value changes nothing.
    pub async fn update_order_status(
        &self,
        order_id: i64,
        status: bool,
    ) -> Result<StatusChange, LifecycleError> {
        if let Some(order) = self.repo.set_order_status(order_id, status).await? {
            tracing::info!(order_id, status, "order settlement flag changed");
            return Ok(StatusChange {
                order,
                changed: true,
            });
        }

        // The conditional write matched nothing: either the order is gone or
        // it already carries `status` (possibly set by a concurrent caller).
        let order = self
            .repo
            .find_order(order_id)
            .await?
            .ok_or(LifecycleError::NotFound(EntityRef::Order(order_id)))?;

        tracing::debug!(order_id, status, "order settlement flag unchanged");
        Ok(StatusChange {
            order,
            changed: false,
        })
    }

    // --- Reads and administrative overrides ---

    pub async fn list_orders(&self) -> Result<Vec<OrderView>, LifecycleError> {
        Ok(self.repo.list_order_views(None).await?)
    }

    pub async fn orders_of(&self, user_id: i64) -> Result<Vec<OrderView>, LifecycleError> {
        Ok(self.repo.list_order_views(Some(user_id)).await?)
    }

    pub async fn get_order(&self, order_id: i64) -> Result<OrderView, LifecycleError> {
        self.repo
            .find_order_view(order_id)
            .await?
            .ok_or(LifecycleError::NotFound(EntityRef::Order(order_id)))
    }

    pub async fn list_transactions(&self) -> Result<Vec<TransactionView>, LifecycleError> {
        Ok(self.repo.list_transaction_views().await?)
    }

    /// Edits an order's car or price. The car, when given, must exist.
    pub async fn update_order(
        &self,
        order_id: i64,
        changes: OrderChanges,
    ) -> Result<Order, LifecycleError> {
        if let Some(car_id) = changes.car_id {
            if self.repo.find_car(car_id).await?.is_none() {
                return Err(LifecycleError::NotFound(EntityRef::Car(car_id)));
            }
        }
        let order = self
            .repo
            .update_order(order_id, changes)
            .await?
            .ok_or(LifecycleError::NotFound(EntityRef::Order(order_id)))?;

        tracing::info!(order_id, "order edited by administrative override");
        Ok(order)
    }

    pub async fn get_transaction(&self, id: i64) -> Result<TransactionView, LifecycleError> {
        self.repo
            .find_transaction_view(id)
            .await?
            .ok_or(LifecycleError::NotFound(EntityRef::Transaction(id)))
    }

    pub async fn update_transaction(
        &self,
        id: i64,
        changes: TransactionChanges,
    ) -> Result<Transaction, LifecycleError> {
        let transaction = self
            .repo
            .update_transaction(id, changes)
            .await?
            .ok_or(LifecycleError::NotFound(EntityRef::Transaction(id)))?;

        tracing::info!(transaction_id = id, "transaction edited by administrative override");
        Ok(transaction)
    }

    /// A single invoice, under the same visibility rule as `list_invoices`:
    /// an invoice of an unsettled order does not exist yet as far as readers go.
    pub async fn get_invoice(&self, id: i64) -> Result<InvoiceView, LifecycleError> {
        self.repo
            .find_invoice_view(id)
            .await?
            .filter(|v| v.order.order.status)
            .ok_or(LifecycleError::NotFound(EntityRef::Invoice(id)))
    }

    pub async fn delete(&self, entity: EntityRef) -> Result<(), LifecycleError> {
        let removed = match entity {
            EntityRef::Order(id) => self.repo.delete_order(id).await?,
            EntityRef::Transaction(id) => self.repo.delete_transaction(id).await?,
            EntityRef::Invoice(id) => self.repo.delete_invoice(id).await?,
            // The catalog is not administered through the lifecycle.
            EntityRef::Car(_) => false,
        };
        if !removed {
            return Err(LifecycleError::NotFound(entity));
        }
        tracing::warn!(%entity, "deleted by administrative override");
        Ok(())
    }
}
