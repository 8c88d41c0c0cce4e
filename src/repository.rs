use crate::{
    error::StoreError,
    models::{
        CarSummary, Car, Invoice, InvoiceView, NewInvoice, NewOrder, NewTransaction, NewUser,
        Order, OrderChanges, OrderView, OwnerSummary, ProfileChanges, RoleRecord, Transaction,
        TransactionChanges, TransactionView, User,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

/// Repository Trait
///
/// The credential and sales store contract: point lookups, inserts, updates and
/// deletes per entity, plus the joined reads the lifecycle listings need.
///
/// **Send + Sync + async_trait** are required so `Arc<dyn Repository>` can be
/// shared across Axum's task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Users & Roles ---
    async fn find_user(&self, id: i64) -> Result<Option<User>, StoreError>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    /// Newest first.
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;
    async fn find_role(&self, id: i64) -> Result<Option<RoleRecord>, StoreError>;
    async fn find_role_by_name(&self, name: &str) -> Result<Option<RoleRecord>, StoreError>;
    async fn list_roles(&self) -> Result<Vec<RoleRecord>, StoreError>;
    /// Fails with `StoreError::Duplicate` when the username is taken.
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;
    async fn update_profile(
        &self,
        id: i64,
        changes: ProfileChanges,
    ) -> Result<Option<User>, StoreError>;
    /// Stores a new digest and stamps `password_changed_at`.
    async fn update_password(&self, id: i64, digest: String) -> Result<Option<User>, StoreError>;
    /// Fails with `StoreError::InUse` while the user still owns orders.
    async fn delete_user(&self, id: i64) -> Result<bool, StoreError>;

    // --- Catalog ---
    async fn find_car(&self, id: i64) -> Result<Option<Car>, StoreError>;

    // --- Orders ---
    async fn insert_order(&self, order: NewOrder) -> Result<Order, StoreError>;
    async fn find_order(&self, id: i64) -> Result<Option<Order>, StoreError>;
    async fn find_order_view(&self, id: i64) -> Result<Option<OrderView>, StoreError>;
    /// Newest first. `owner` restricts the listing to one user's orders.
    async fn list_order_views(&self, owner: Option<i64>) -> Result<Vec<OrderView>, StoreError>;
    /// Conditional write: only touches the row when the flag actually changes.
    /// `None` means either the order is missing or it already had `status`.
    async fn set_order_status(&self, id: i64, status: bool) -> Result<Option<Order>, StoreError>;
    async fn update_order(
        &self,
        id: i64,
        changes: OrderChanges,
    ) -> Result<Option<Order>, StoreError>;
    /// Fails with `StoreError::InUse` while transactions or invoices reference the order.
    async fn delete_order(&self, id: i64) -> Result<bool, StoreError>;

    // --- Transactions ---
    async fn insert_transaction(&self, tx: NewTransaction) -> Result<Transaction, StoreError>;
    async fn find_transaction(&self, id: i64) -> Result<Option<Transaction>, StoreError>;
    async fn find_transaction_view(&self, id: i64) -> Result<Option<TransactionView>, StoreError>;
    async fn list_transaction_views(&self) -> Result<Vec<TransactionView>, StoreError>;
    async fn update_transaction(
        &self,
        id: i64,
        changes: TransactionChanges,
    ) -> Result<Option<Transaction>, StoreError>;
    /// Fails with `StoreError::InUse` while an invoice references the transaction.
    async fn delete_transaction(&self, id: i64) -> Result<bool, StoreError>;

    // --- Invoices ---
    async fn insert_invoice(&self, invoice: NewInvoice) -> Result<Invoice, StoreError>;
    async fn find_invoice_view(&self, id: i64) -> Result<Option<InvoiceView>, StoreError>;
    /// Every invoice, settled or not, newest first. Filtering is the caller's job.
    async fn list_invoice_views(&self) -> Result<Vec<InvoiceView>, StoreError>;
    async fn delete_invoice(&self, id: i64) -> Result<bool, StoreError>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;

// --- Joined row shapes ---

const USER_SELECT: &str = r#"
    SELECT u.id, u.username, u.email, u.password, u.phone_number, u.address,
           u.role_id, r.role_name, u.created_at, u.updated_at, u.password_changed_at
    FROM users u
    JOIN roles r ON r.id = u.role_id
"#;

const ORDER_COLUMNS: &str = "id, user_id, car_id, total_price, status, created_at, updated_at";

const TRANSACTION_COLUMNS: &str =
    "id, order_id, payment_provider, account_number, amount, transaction_date, created_at, updated_at";

const INVOICE_COLUMNS: &str = "id, order_id, transaction_id, created_at, updated_at";

/// Columns every joined order read carries, prefixed so they can sit next to
/// another entity's columns in one row.
const JOINED_ORDER_COLUMNS: &str = r#"
    o.user_id AS order_user_id, o.car_id AS order_car_id, o.total_price AS order_total_price,
    o.status AS order_status, o.created_at AS order_created_at, o.updated_at AS order_updated_at,
    c.name AS car_name, c.price AS car_price, c.image_url AS car_image_url,
    c.is_second AS car_is_second, u.username AS owner_username, u.email AS owner_email
"#;

const ORDER_JOINS: &str = "JOIN cars c ON c.id = o.car_id JOIN users u ON u.id = o.user_id";

const TRANSACTION_VIEW_SELECT: &str = r#"
    SELECT t.id, t.order_id, t.payment_provider, t.account_number, t.amount,
           t.transaction_date, t.created_at, t.updated_at,
"#;

const INVOICE_VIEW_SELECT: &str = r#"
    SELECT i.id, i.order_id, i.transaction_id, i.created_at, i.updated_at,
           t.payment_provider AS tx_payment_provider, t.account_number AS tx_account_number,
           t.amount AS tx_amount, t.transaction_date AS tx_transaction_date,
           t.created_at AS tx_created_at, t.updated_at AS tx_updated_at,
"#;

const INVOICE_VIEW_FROM: &str = "FROM invoices i \
     JOIN orders o ON o.id = i.order_id \
     JOIN cars c ON c.id = o.car_id JOIN users u ON u.id = o.user_id \
     JOIN transactions t ON t.id = i.transaction_id";

/// Outcome of a delete that refuses to orphan dependent rows.
#[derive(FromRow)]
struct GuardedDelete {
    found: bool,
    blocked: bool,
}

#[derive(FromRow)]
struct JoinedOrder {
    order_user_id: i64,
    order_car_id: i64,
    order_total_price: f64,
    order_status: bool,
    order_created_at: DateTime<Utc>,
    order_updated_at: DateTime<Utc>,
    car_name: String,
    car_price: f64,
    car_image_url: String,
    car_is_second: bool,
    owner_username: String,
    owner_email: String,
}

impl JoinedOrder {
    fn into_view(self, order_id: i64) -> OrderView {
        OrderView {
            order: Order {
                id: order_id,
                user_id: self.order_user_id,
                car_id: self.order_car_id,
                total_price: self.order_total_price,
                status: self.order_status,
                created_at: self.order_created_at,
                updated_at: self.order_updated_at,
            },
            car: CarSummary {
                id: self.order_car_id,
                name: self.car_name,
                price: self.car_price,
                image_url: self.car_image_url,
                is_second: self.car_is_second,
            },
            user: OwnerSummary {
                id: self.order_user_id,
                username: self.owner_username,
                email: self.owner_email,
            },
        }
    }
}

#[derive(FromRow)]
struct OrderViewRow {
    id: i64,
    #[sqlx(flatten)]
    joined: JoinedOrder,
}

#[derive(FromRow)]
struct TransactionViewRow {
    #[sqlx(flatten)]
    transaction: Transaction,
    #[sqlx(flatten)]
    joined: JoinedOrder,
}

#[derive(FromRow)]
struct JoinedPayment {
    tx_payment_provider: String,
    tx_account_number: String,
    tx_amount: f64,
    tx_transaction_date: DateTime<Utc>,
    tx_created_at: DateTime<Utc>,
    tx_updated_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct InvoiceViewRow {
    #[sqlx(flatten)]
    invoice: Invoice,
    #[sqlx(flatten)]
    joined: JoinedOrder,
    #[sqlx(flatten)]
    payment: JoinedPayment,
}

impl From<TransactionViewRow> for TransactionView {
    fn from(row: TransactionViewRow) -> Self {
        let order = row.joined.into_view(row.transaction.order_id);
        TransactionView {
            transaction: row.transaction,
            order,
        }
    }
}

impl From<InvoiceViewRow> for InvoiceView {
    fn from(row: InvoiceViewRow) -> Self {
        let order = row.joined.into_view(row.invoice.order_id);
        let transaction = Transaction {
            id: row.invoice.transaction_id,
            order_id: row.invoice.order_id,
            payment_provider: row.payment.tx_payment_provider,
            account_number: row.payment.tx_account_number,
            amount: row.payment.tx_amount,
            transaction_date: row.payment.tx_transaction_date,
            created_at: row.payment.tx_created_at,
            updated_at: row.payment.tx_updated_at,
        };
        InvoiceView {
            invoice: row.invoice,
            order,
            transaction,
        }
    }
}

/// PostgresRepository
///
/// The production implementation of `Repository`, backed by PostgreSQL.
/// Queries are checked at runtime (`query_as`) so the crate builds without a live database.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_user(&self, filter: &str, bind: UserKey<'_>) -> Result<Option<User>, StoreError> {
        let sql = format!("{USER_SELECT} WHERE {filter}");
        let query = sqlx::query_as::<_, User>(&sql);
        let query = match bind {
            UserKey::Id(id) => query.bind(id),
            UserKey::Username(name) => query.bind(name),
        };
        Ok(query.fetch_optional(&self.pool).await?)
    }

    /// guarded_delete
    ///
    /// Deletes `table.id = $1` unless a row in one of `dependents` (table, column)
    /// still points at it. The check and the delete run as one statement; a
    /// foreign key violation from a concurrent insert still surfaces as `InUse`.
    async fn guarded_delete(
        &self,
        table: &str,
        id: i64,
        dependents: &[(&str, &str)],
    ) -> Result<bool, StoreError> {
        let blocked = dependents
            .iter()
            .map(|(dep, column)| format!("EXISTS (SELECT 1 FROM {dep} WHERE {column} = $1)"))
            .collect::<Vec<_>>()
            .join(" OR ");
        let sql = format!(
            r#"
            WITH guard AS (SELECT ({blocked}) AS blocked),
                 deleted AS (
                     DELETE FROM {table}
                     WHERE id = $1 AND NOT (SELECT blocked FROM guard)
                     RETURNING id
                 )
            SELECT EXISTS (SELECT 1 FROM {table} WHERE id = $1) AS found,
                   (SELECT blocked FROM guard) AS blocked
            "#
        );
        let outcome = sqlx::query_as::<_, GuardedDelete>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        match outcome {
            GuardedDelete { found: false, .. } => Ok(false),
            GuardedDelete { blocked: true, .. } => Err(StoreError::InUse(format!("{table} {id}"))),
            GuardedDelete { .. } => Ok(true),
        }
    }

    /// Re-reads a user after a write so the role name is joined in.
    async fn reload_user(&self, id: Option<i64>) -> Result<Option<User>, StoreError> {
        match id {
            Some(id) => self.find_user(id).await,
            None => Ok(None),
        }
    }
}

enum UserKey<'a> {
    Id(i64),
    Username(&'a str),
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn find_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        self.fetch_user("u.id = $1", UserKey::Id(id)).await
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        self.fetch_user("u.username = $1", UserKey::Username(username))
            .await
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let sql = format!("{USER_SELECT} ORDER BY u.created_at DESC, u.id DESC");
        let users = sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?;
        Ok(users)
    }

    async fn find_role(&self, id: i64) -> Result<Option<RoleRecord>, StoreError> {
        let role = sqlx::query_as::<_, RoleRecord>("SELECT id, role_name FROM roles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(role)
    }

    async fn list_roles(&self) -> Result<Vec<RoleRecord>, StoreError> {
        let roles = sqlx::query_as::<_, RoleRecord>("SELECT id, role_name FROM roles ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(roles)
    }

    async fn find_role_by_name(&self, name: &str) -> Result<Option<RoleRecord>, StoreError> {
        let role = sqlx::query_as::<_, RoleRecord>(
            "SELECT id, role_name FROM roles WHERE role_name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(role)
    }

    /// create_user
    ///
    /// Inserts the account and joins the role name in the same statement.
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let created = sqlx::query_as::<_, User>(
            r#"
            WITH inserted AS (
                INSERT INTO users (username, email, password, role_id, created_at, updated_at)
                VALUES ($1, $2, $3, $4, NOW(), NOW())
                RETURNING *
            )
            SELECT i.id, i.username, i.email, i.password, i.phone_number, i.address,
                   i.role_id, r.role_name, i.created_at, i.updated_at, i.password_changed_at
            FROM inserted i
            JOIN roles r ON r.id = i.role_id
            "#,
        )
        .bind(user.username)
        .bind(user.email)
        .bind(user.password)
        .bind(user.role_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    /// update_profile
    ///
    /// Uses `COALESCE` so absent fields keep their stored value.
    async fn update_profile(
        &self,
        id: i64,
        changes: ProfileChanges,
    ) -> Result<Option<User>, StoreError> {
        let updated: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE users
            SET email = COALESCE($2, email),
                phone_number = COALESCE($3, phone_number),
                address = COALESCE($4, address),
                username = COALESCE($5, username),
                role_id = COALESCE($6, role_id),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(changes.email)
        .bind(changes.phone_number)
        .bind(changes.address)
        .bind(changes.username)
        .bind(changes.role_id)
        .fetch_optional(&self.pool)
        .await?;
        self.reload_user(updated).await
    }

    async fn update_password(&self, id: i64, digest: String) -> Result<Option<User>, StoreError> {
        let updated: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE users
            SET password = $2, password_changed_at = NOW(), updated_at = NOW()
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(digest)
        .fetch_optional(&self.pool)
        .await?;
        self.reload_user(updated).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool, StoreError> {
        self.guarded_delete("users", id, &[("orders", "user_id")]).await
    }

    async fn find_car(&self, id: i64) -> Result<Option<Car>, StoreError> {
        let car = sqlx::query_as::<_, Car>(
            r#"SELECT id, name, description, price, image_url, type_id, brand_id, is_second,
                      created_at, updated_at
               FROM cars WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(car)
    }

    /// insert_order
    ///
    /// New orders always start unsettled.
    async fn insert_order(&self, order: NewOrder) -> Result<Order, StoreError> {
        let sql = format!(
            "INSERT INTO orders (user_id, car_id, total_price, status, created_at, updated_at) \
             VALUES ($1, $2, $3, false, NOW(), NOW()) RETURNING {ORDER_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Order>(&sql)
            .bind(order.user_id)
            .bind(order.car_id)
            .bind(order.total_price)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn find_order(&self, id: i64) -> Result<Option<Order>, StoreError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1");
        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(order)
    }

    async fn find_order_view(&self, id: i64) -> Result<Option<OrderView>, StoreError> {
        let sql = format!(
            "SELECT o.id, {JOINED_ORDER_COLUMNS} FROM orders o {ORDER_JOINS} WHERE o.id = $1"
        );
        let row = sqlx::query_as::<_, OrderViewRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.joined.into_view(r.id)))
    }

    async fn list_order_views(&self, owner: Option<i64>) -> Result<Vec<OrderView>, StoreError> {
        let sql = format!(
            "SELECT o.id, {JOINED_ORDER_COLUMNS} FROM orders o {ORDER_JOINS} \
             WHERE ($1::BIGINT IS NULL OR o.user_id = $1) \
             ORDER BY o.created_at DESC, o.id DESC"
        );
        let rows = sqlx::query_as::<_, OrderViewRow>(&sql)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|r| r.joined.into_view(r.id)).collect())
    }

    /// set_order_status
    ///
    /// A single conditional UPDATE: two concurrent settlements cannot both
    /// observe the old flag, so exactly one of them gets a row back.
    async fn set_order_status(&self, id: i64, status: bool) -> Result<Option<Order>, StoreError> {
        let sql = format!(
            "UPDATE orders SET status = $2, updated_at = NOW() \
             WHERE id = $1 AND status IS DISTINCT FROM $2 RETURNING {ORDER_COLUMNS}"
        );
        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await?;
        Ok(order)
    }

    async fn update_order(
        &self,
        id: i64,
        changes: OrderChanges,
    ) -> Result<Option<Order>, StoreError> {
        let sql = format!(
            "UPDATE orders SET car_id = COALESCE($2, car_id), \
             total_price = COALESCE($3, total_price), updated_at = NOW() \
             WHERE id = $1 RETURNING {ORDER_COLUMNS}"
        );
        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .bind(changes.car_id)
            .bind(changes.total_price)
            .fetch_optional(&self.pool)
            .await?;
        Ok(order)
    }

    async fn delete_order(&self, id: i64) -> Result<bool, StoreError> {
        self.guarded_delete(
            "orders",
            id,
            &[("transactions", "order_id"), ("invoices", "order_id")],
        )
        .await
    }

    async fn insert_transaction(&self, tx: NewTransaction) -> Result<Transaction, StoreError> {
        let sql = format!(
            "INSERT INTO transactions \
             (order_id, payment_provider, account_number, amount, transaction_date, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, NOW(), NOW(), NOW()) RETURNING {TRANSACTION_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Transaction>(&sql)
            .bind(tx.order_id)
            .bind(tx.payment_provider)
            .bind(tx.account_number)
            .bind(tx.amount)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn find_transaction(&self, id: i64) -> Result<Option<Transaction>, StoreError> {
        let sql = format!("SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = $1");
        let tx = sqlx::query_as::<_, Transaction>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(tx)
    }

    async fn find_transaction_view(&self, id: i64) -> Result<Option<TransactionView>, StoreError> {
        let sql = format!(
            "{TRANSACTION_VIEW_SELECT} {JOINED_ORDER_COLUMNS} \
             FROM transactions t JOIN orders o ON o.id = t.order_id {ORDER_JOINS} \
             WHERE t.id = $1"
        );
        let row = sqlx::query_as::<_, TransactionViewRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(TransactionView::from))
    }

    async fn list_transaction_views(&self) -> Result<Vec<TransactionView>, StoreError> {
        let sql = format!(
            "{TRANSACTION_VIEW_SELECT} {JOINED_ORDER_COLUMNS} \
             FROM transactions t JOIN orders o ON o.id = t.order_id {ORDER_JOINS} \
             ORDER BY t.created_at DESC, t.id DESC"
        );
        let rows = sqlx::query_as::<_, TransactionViewRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(TransactionView::from).collect())
    }

    async fn update_transaction(
        &self,
        id: i64,
        changes: TransactionChanges,
    ) -> Result<Option<Transaction>, StoreError> {
        let sql = format!(
            "UPDATE transactions SET payment_provider = COALESCE($2, payment_provider), \
             account_number = COALESCE($3, account_number), amount = COALESCE($4, amount), \
             updated_at = NOW() WHERE id = $1 RETURNING {TRANSACTION_COLUMNS}"
        );
        let tx = sqlx::query_as::<_, Transaction>(&sql)
            .bind(id)
            .bind(changes.payment_provider)
            .bind(changes.account_number)
            .bind(changes.amount)
            .fetch_optional(&self.pool)
            .await?;
        Ok(tx)
    }

    async fn delete_transaction(&self, id: i64) -> Result<bool, StoreError> {
        self.guarded_delete("transactions", id, &[("invoices", "transaction_id")])
            .await
    }

    async fn insert_invoice(&self, invoice: NewInvoice) -> Result<Invoice, StoreError> {
        let sql = format!(
            "INSERT INTO invoices (order_id, transaction_id, created_at, updated_at) \
             VALUES ($1, $2, NOW(), NOW()) RETURNING {INVOICE_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Invoice>(&sql)
            .bind(invoice.order_id)
            .bind(invoice.transaction_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn find_invoice_view(&self, id: i64) -> Result<Option<InvoiceView>, StoreError> {
        let sql = format!(
            "{INVOICE_VIEW_SELECT} {JOINED_ORDER_COLUMNS} {INVOICE_VIEW_FROM} WHERE i.id = $1"
        );
        let row = sqlx::query_as::<_, InvoiceViewRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(InvoiceView::from))
    }

    async fn list_invoice_views(&self) -> Result<Vec<InvoiceView>, StoreError> {
        let sql = format!(
            "{INVOICE_VIEW_SELECT} {JOINED_ORDER_COLUMNS} {INVOICE_VIEW_FROM} \
             ORDER BY i.created_at DESC, i.id DESC"
        );
        let rows = sqlx::query_as::<_, InvoiceViewRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(InvoiceView::from).collect())
    }

    async fn delete_invoice(&self, id: i64) -> Result<bool, StoreError> {
        let res = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
