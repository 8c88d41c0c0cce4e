use async_trait::async_trait;
use chrono::Utc;
use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard},
};

use crate::{
    error::StoreError,
    models::{
        Car, CarSummary, Invoice, InvoiceView, NewInvoice, NewOrder, NewTransaction, NewUser,
        Order, OrderChanges, OrderView, OwnerSummary, ProfileChanges, Role, RoleRecord,
        Transaction, TransactionChanges, TransactionView, User,
    },
    repository::Repository,
};

#[derive(Default)]
struct Tables {
    next_id: i64,
    roles: BTreeMap<i64, RoleRecord>,
    users: BTreeMap<i64, User>,
    cars: BTreeMap<i64, Car>,
    orders: BTreeMap<i64, Order>,
    transactions: BTreeMap<i64, Transaction>,
    invoices: BTreeMap<i64, Invoice>,
}

impl Tables {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn order_view(&self, order: &Order) -> Option<OrderView> {
        let car = self.cars.get(&order.car_id)?;
        let owner = self.users.get(&order.user_id)?;
        Some(OrderView {
            order: order.clone(),
            car: CarSummary::from(car),
            user: OwnerSummary::from(owner),
        })
    }

    fn transaction_view(&self, transaction: &Transaction) -> Option<TransactionView> {
        let order = self.orders.get(&transaction.order_id)?;
        Some(TransactionView {
            transaction: transaction.clone(),
            order: self.order_view(order)?,
        })
    }

    fn invoice_view(&self, invoice: &Invoice) -> Option<InvoiceView> {
        let order = self.orders.get(&invoice.order_id)?;
        let transaction = self.transactions.get(&invoice.transaction_id)?;
        Some(InvoiceView {
            invoice: invoice.clone(),
            order: self.order_view(order)?,
            transaction: transaction.clone(),
        })
    }

    fn username_taken(&self, username: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| u.username == username && Some(u.id) != except)
    }
}

/// MemoryRepository
///
/// A `Repository` held entirely in process memory behind a mutex. Used by the
/// test suite and for running the service without PostgreSQL. Joined reads
/// behave like inner joins: rows with dangling references are skipped.
#[derive(Default)]
pub struct MemoryRepository {
    tables: Mutex<Tables>,
}

impl MemoryRepository {
    /// An empty store seeded with the two built-in roles.
    pub fn new() -> Self {
        let repo = Self::default();
        {
            let mut tables = repo.lock();
            for role in [Role::Admin, Role::User] {
                let id = role.id();
                tables.roles.insert(
                    id,
                    RoleRecord {
                        id,
                        role_name: role.name().to_string(),
                    },
                );
            }
        }
        repo
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        // A panic while holding the lock leaves plain data behind; keep serving it.
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Inserts a catalog entry and returns it.
    pub fn seed_car(&self, name: &str, price: f64) -> Car {
        let mut tables = self.lock();
        let now = Utc::now();
        let car = Car {
            id: tables.allocate_id(),
            name: name.to_string(),
            description: format!("{name} (seeded)"),
            price,
            image_url: format!("https://cdn.example.com/cars/{}.jpg", name.to_lowercase()),
            type_id: 1,
            brand_id: 1,
            is_second: false,
            created_at: now,
            updated_at: now,
        };
        tables.cars.insert(car.id, car.clone());
        car
    }

    pub fn transaction_count(&self) -> usize {
        self.lock().transactions.len()
    }

    pub fn invoice_count(&self) -> usize {
        self.lock().invoices.len()
    }

    pub fn order_count(&self) -> usize {
        self.lock().orders.len()
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn find_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.lock().users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let mut users: Vec<User> = self.lock().users.values().cloned().collect();
        users.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(users)
    }

    async fn find_role(&self, id: i64) -> Result<Option<RoleRecord>, StoreError> {
        Ok(self.lock().roles.get(&id).cloned())
    }

    async fn list_roles(&self) -> Result<Vec<RoleRecord>, StoreError> {
        Ok(self.lock().roles.values().cloned().collect())
    }

    async fn find_role_by_name(&self, name: &str) -> Result<Option<RoleRecord>, StoreError> {
        Ok(self
            .lock()
            .roles
            .values()
            .find(|r| r.role_name == name)
            .cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.lock();
        let role_name = tables
            .roles
            .get(&user.role_id)
            .map(|r| r.role_name.clone())
            .ok_or_else(|| StoreError::InUse(format!("role {}", user.role_id)))?;
        if tables.username_taken(&user.username, None) {
            return Err(StoreError::Duplicate(format!("username {}", user.username)));
        }
        let now = Utc::now();
        let created = User {
            id: tables.allocate_id(),
            username: user.username,
            email: user.email,
            password: user.password,
            phone_number: None,
            address: None,
            role_id: user.role_id,
            role_name,
            created_at: now,
            updated_at: now,
            password_changed_at: None,
        };
        tables.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_profile(
        &self,
        id: i64,
        changes: ProfileChanges,
    ) -> Result<Option<User>, StoreError> {
        let mut tables = self.lock();
        if !tables.users.contains_key(&id) {
            return Ok(None);
        }
        if let Some(username) = &changes.username {
            if tables.username_taken(username, Some(id)) {
                return Err(StoreError::Duplicate(format!("username {username}")));
            }
        }
        let role_name = match changes.role_id {
            Some(role_id) => Some(
                tables
                    .roles
                    .get(&role_id)
                    .map(|r| r.role_name.clone())
                    .ok_or_else(|| StoreError::InUse(format!("role {role_id}")))?,
            ),
            None => None,
        };
        let Some(user) = tables.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(username) = changes.username {
            user.username = username;
        }
        if let (Some(role_id), Some(role_name)) = (changes.role_id, role_name) {
            user.role_id = role_id;
            user.role_name = role_name;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(phone) = changes.phone_number {
            user.phone_number = Some(phone);
        }
        if let Some(address) = changes.address {
            user.address = Some(address);
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn update_password(&self, id: i64, digest: String) -> Result<Option<User>, StoreError> {
        let mut tables = self.lock();
        let Some(user) = tables.users.get_mut(&id) else {
            return Ok(None);
        };
        let now = Utc::now();
        user.password = digest;
        user.password_changed_at = Some(now);
        user.updated_at = now;
        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, id: i64) -> Result<bool, StoreError> {
        let mut tables = self.lock();
        if !tables.users.contains_key(&id) {
            return Ok(false);
        }
        if tables.orders.values().any(|o| o.user_id == id) {
            return Err(StoreError::InUse(format!("users {id}")));
        }
        Ok(tables.users.remove(&id).is_some())
    }

    async fn find_car(&self, id: i64) -> Result<Option<Car>, StoreError> {
        Ok(self.lock().cars.get(&id).cloned())
    }

    async fn insert_order(&self, order: NewOrder) -> Result<Order, StoreError> {
        let mut tables = self.lock();
        let now = Utc::now();
        let created = Order {
            id: tables.allocate_id(),
            user_id: order.user_id,
            car_id: order.car_id,
            total_price: order.total_price,
            status: false,
            created_at: now,
            updated_at: now,
        };
        tables.orders.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_order(&self, id: i64) -> Result<Option<Order>, StoreError> {
        Ok(self.lock().orders.get(&id).cloned())
    }

    async fn find_order_view(&self, id: i64) -> Result<Option<OrderView>, StoreError> {
        let tables = self.lock();
        Ok(tables.orders.get(&id).and_then(|o| tables.order_view(o)))
    }

    async fn list_order_views(&self, owner: Option<i64>) -> Result<Vec<OrderView>, StoreError> {
        let tables = self.lock();
        let mut views: Vec<OrderView> = tables
            .orders
            .values()
            .filter(|o| owner.is_none_or(|id| o.user_id == id))
            .filter_map(|o| tables.order_view(o))
            .collect();
        views.sort_by(|a, b| {
            (b.order.created_at, b.order.id).cmp(&(a.order.created_at, a.order.id))
        });
        Ok(views)
    }

    async fn set_order_status(&self, id: i64, status: bool) -> Result<Option<Order>, StoreError> {
        let mut tables = self.lock();
        match tables.orders.get_mut(&id) {
            Some(order) if order.status != status => {
                order.status = status;
                order.updated_at = Utc::now();
                Ok(Some(order.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn update_order(
        &self,
        id: i64,
        changes: OrderChanges,
    ) -> Result<Option<Order>, StoreError> {
        let mut tables = self.lock();
        let Some(order) = tables.orders.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(car_id) = changes.car_id {
            order.car_id = car_id;
        }
        if let Some(total_price) = changes.total_price {
            order.total_price = total_price;
        }
        order.updated_at = Utc::now();
        Ok(Some(order.clone()))
    }

    async fn delete_order(&self, id: i64) -> Result<bool, StoreError> {
        let mut tables = self.lock();
        if !tables.orders.contains_key(&id) {
            return Ok(false);
        }
        let referenced = tables.transactions.values().any(|t| t.order_id == id)
            || tables.invoices.values().any(|i| i.order_id == id);
        if referenced {
            return Err(StoreError::InUse(format!("orders {id}")));
        }
        Ok(tables.orders.remove(&id).is_some())
    }

    async fn insert_transaction(&self, tx: NewTransaction) -> Result<Transaction, StoreError> {
        let mut tables = self.lock();
        let now = Utc::now();
        let created = Transaction {
            id: tables.allocate_id(),
            order_id: tx.order_id,
            payment_provider: tx.payment_provider,
            account_number: tx.account_number,
            amount: tx.amount,
            transaction_date: now,
            created_at: now,
            updated_at: now,
        };
        tables.transactions.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_transaction(&self, id: i64) -> Result<Option<Transaction>, StoreError> {
        Ok(self.lock().transactions.get(&id).cloned())
    }

    async fn find_transaction_view(&self, id: i64) -> Result<Option<TransactionView>, StoreError> {
        let tables = self.lock();
        Ok(tables
            .transactions
            .get(&id)
            .and_then(|t| tables.transaction_view(t)))
    }

    async fn list_transaction_views(&self) -> Result<Vec<TransactionView>, StoreError> {
        let tables = self.lock();
        let mut views: Vec<TransactionView> = tables
            .transactions
            .values()
            .filter_map(|t| tables.transaction_view(t))
            .collect();
        views.sort_by(|a, b| {
            (b.transaction.created_at, b.transaction.id)
                .cmp(&(a.transaction.created_at, a.transaction.id))
        });
        Ok(views)
    }

    async fn update_transaction(
        &self,
        id: i64,
        changes: TransactionChanges,
    ) -> Result<Option<Transaction>, StoreError> {
        let mut tables = self.lock();
        let Some(tx) = tables.transactions.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(provider) = changes.payment_provider {
            tx.payment_provider = provider;
        }
        if let Some(account) = changes.account_number {
            tx.account_number = account;
        }
        if let Some(amount) = changes.amount {
            tx.amount = amount;
        }
        tx.updated_at = Utc::now();
        Ok(Some(tx.clone()))
    }

    async fn delete_transaction(&self, id: i64) -> Result<bool, StoreError> {
        let mut tables = self.lock();
        if !tables.transactions.contains_key(&id) {
            return Ok(false);
        }
        if tables.invoices.values().any(|i| i.transaction_id == id) {
            return Err(StoreError::InUse(format!("transactions {id}")));
        }
        Ok(tables.transactions.remove(&id).is_some())
    }

    async fn insert_invoice(&self, invoice: NewInvoice) -> Result<Invoice, StoreError> {
        let mut tables = self.lock();
        let now = Utc::now();
        let created = Invoice {
            id: tables.allocate_id(),
            order_id: invoice.order_id,
            transaction_id: invoice.transaction_id,
            created_at: now,
            updated_at: now,
        };
        tables.invoices.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_invoice_view(&self, id: i64) -> Result<Option<InvoiceView>, StoreError> {
        let tables = self.lock();
        Ok(tables.invoices.get(&id).and_then(|i| tables.invoice_view(i)))
    }

    async fn list_invoice_views(&self) -> Result<Vec<InvoiceView>, StoreError> {
        let tables = self.lock();
        let mut views: Vec<InvoiceView> = tables
            .invoices
            .values()
            .filter_map(|i| tables.invoice_view(i))
            .collect();
        views.sort_by(|a, b| {
            (b.invoice.created_at, b.invoice.id).cmp(&(a.invoice.created_at, a.invoice.id))
        });
        Ok(views)
    }

    async fn delete_invoice(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.lock().invoices.remove(&id).is_some())
    }
}
