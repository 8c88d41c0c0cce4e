use crate::{
    AppState,
    auth::AuthUser,
    error::AppError,
    lifecycle::{EntityRef, LifecycleManager},
    models::{
        ChangePasswordRequest, CreateInvoiceRequest, CreateOrderRequest, CreateTransactionRequest,
        CreateUserRequest, Invoice, InvoiceView, LoginRequest, LoginResponse, NewUser, Order,
        OrderChanges, OrderView, ProfileChanges, RegisterRequest, Role, RoleRecord, Transaction,
        TransactionChanges, TransactionView, UpdateOrderRequest, UpdateOrderStatusRequest,
        UpdateProfileRequest, UpdateTransactionRequest, UpdateUserRequest, User, UserProfile,
    },
    password::DUMMY_DIGEST,
    validation::{ValidJson, ValidPath},
};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
};

// --- Identity ---

/// register
///
/// [Public Route] Creates an account with the `user` role.
/// The password is hashed before it reaches the store; usernames are unique.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registered", body = UserProfile),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Username taken")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserProfile>), AppError> {
    let user = create_account(
        &state,
        payload.username,
        payload.email,
        &payload.password,
        Role::User,
    )
    .await?;

    tracing::info!(user_id = user.id, "account registered");
    Ok((StatusCode::CREATED, Json(UserProfile::from(&user))))
}

/// Shared by self-registration and admin account creation.
///
/// The username pre-check gives the common case a friendly message; the
/// store's unique constraint still decides a race, surfacing as 409.
async fn create_account(
    state: &AppState,
    username: String,
    email: String,
    password: &str,
    role: Role,
) -> Result<User, AppError> {
    if state.repo.find_user_by_username(&username).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "username '{username}' is already taken"
        )));
    }

    let role = state
        .repo
        .find_role_by_name(role.name())
        .await?
        .ok_or_else(|| AppError::Internal(format!("role '{}' is not provisioned", role.name())))?;

    let digest = state.hasher.hash(password)?;

    Ok(state
        .repo
        .create_user(NewUser {
            username,
            email,
            password: digest,
            role_id: role.id,
        })
        .await?)
}

/// login
///
/// [Public Route] Exchanges username and password for a bearer token.
/// Unknown usernames and wrong passwords are indistinguishable to the caller.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let Some(user) = state.repo.find_user_by_username(&payload.username).await? else {
        // Same hashing cost as a wrong password, so timing does not reveal the username.
        let _ = state.hasher.verify(&payload.password, DUMMY_DIGEST);
        return Err(AppError::InvalidCredentials);
    };

    if !state.hasher.verify(&payload.password, &user.password) {
        tracing::info!(user_id = user.id, "login rejected: wrong password");
        return Err(AppError::InvalidCredentials);
    }

    let token = state.tokens.issue(user.id, user.role_id)?;
    Ok(Json(LoginResponse { token }))
}

/// get_me
///
/// [Authenticated Route] The caller's own profile.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses((status = 200, description = "Profile", body = UserProfile))
)]
pub async fn get_me(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<UserProfile>, AppError> {
    let user = state
        .repo
        .find_user(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {id}")))?;
    Ok(Json(UserProfile::from(&user)))
}

/// update_me
///
/// [Authenticated Route] Partial edit of the caller's own profile.
#[utoipa::path(
    put,
    path = "/api/auth/me",
    request_body = UpdateProfileRequest,
    responses((status = 200, description = "Updated", body = UserProfile))
)]
pub async fn update_me(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<UpdateProfileRequest>,
) -> Result<Json<UserProfile>, AppError> {
    let changes = ProfileChanges {
        email: payload.email,
        phone_number: payload.phone_number,
        address: payload.address,
        ..Default::default()
    };
    let user = state
        .repo
        .update_profile(id, changes)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {id}")))?;
    Ok(Json(UserProfile::from(&user)))
}

/// change_password
///
/// [Authenticated Route] Replaces the caller's password. Tokens issued before
/// the change stop being accepted.
#[utoipa::path(
    post,
    path = "/api/auth/change-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 401, description = "Old password does not match")
    )
)]
pub async fn change_password(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<ChangePasswordRequest>,
) -> Result<StatusCode, AppError> {
    let user = state
        .repo
        .find_user(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {id}")))?;

    if !state.hasher.verify(&payload.old_password, &user.password) {
        return Err(AppError::InvalidCredentials);
    }

    let digest = state.hasher.hash(&payload.new_password)?;
    state
        .repo
        .update_password(id, digest)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {id}")))?;

    tracing::info!(user_id = id, "password changed; earlier tokens revoked");
    Ok(StatusCode::NO_CONTENT)
}

// --- Accounts (admin) ---

/// list_users
///
/// [Admin Route] Every account, newest first. Digests never leave the store.
#[utoipa::path(
    get,
    path = "/api/cms/users",
    responses((status = 200, description = "All users", body = [UserProfile]))
)]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserProfile>>, AppError> {
    let users = state.repo.list_users().await?;
    Ok(Json(users.iter().map(UserProfile::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/cms/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Found", body = UserProfile),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i64>,
) -> Result<Json<UserProfile>, AppError> {
    let user = state
        .repo
        .find_user(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {id}")))?;
    Ok(Json(UserProfile::from(&user)))
}

/// create_user
///
/// [Admin Route] Creates an account with an explicit role.
#[utoipa::path(
    post,
    path = "/api/cms/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Created", body = UserProfile),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Username taken")
    )
)]
pub async fn create_user(
    AuthUser { id: admin_id, .. }: AuthUser,
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserProfile>), AppError> {
    let user = create_account(
        &state,
        payload.username,
        payload.email,
        &payload.password,
        payload.role,
    )
    .await?;

    tracing::info!(user_id = user.id, admin_id, role = %user.role_name, "account created");
    Ok((StatusCode::CREATED, Json(UserProfile::from(&user))))
}

/// update_user
///
/// [Admin Route] Partial edit of any account. A new password is hashed and
/// revokes the account's earlier tokens.
#[utoipa::path(
    put,
    path = "/api/cms/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated", body = UserProfile),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Username taken")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i64>,
    ValidJson(payload): ValidJson<UpdateUserRequest>,
) -> Result<Json<UserProfile>, AppError> {
    let changes = ProfileChanges {
        username: payload.username,
        role_id: payload.role.map(Role::id),
        email: payload.email,
        phone_number: payload.phone_number,
        address: payload.address,
    };
    let mut user = state
        .repo
        .update_profile(id, changes)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {id}")))?;

    if let Some(password) = payload.password {
        let digest = state.hasher.hash(&password)?;
        user = state
            .repo
            .update_password(id, digest)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {id}")))?;
        tracing::info!(user_id = id, "password reset by admin; earlier tokens revoked");
    }

    Ok(Json(UserProfile::from(&user)))
}

#[utoipa::path(
    delete,
    path = "/api/cms/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "The user still owns orders")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i64>,
) -> Result<StatusCode, AppError> {
    if !state.repo.delete_user(id).await? {
        return Err(AppError::NotFound(format!("user {id}")));
    }
    tracing::warn!(user_id = id, "account deleted by administrative override");
    Ok(StatusCode::NO_CONTENT)
}

/// list_roles
///
/// [Admin Route] The role reference table. Read-only.
#[utoipa::path(
    get,
    path = "/api/cms/roles",
    responses((status = 200, description = "All roles", body = [RoleRecord]))
)]
pub async fn list_roles(State(state): State<AppState>) -> Result<Json<Vec<RoleRecord>>, AppError> {
    Ok(Json(state.repo.list_roles().await?))
}

#[utoipa::path(
    get,
    path = "/api/cms/roles/{id}",
    params(("id" = i64, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Found", body = RoleRecord),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_role(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i64>,
) -> Result<Json<RoleRecord>, AppError> {
    let role = state
        .repo
        .find_role(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("role {id}")))?;
    Ok(Json(role))
}

// --- Orders ---

/// create_order
///
/// [Authenticated Route] Places an order owned by the caller. The owner comes
/// from the resolved identity, never from the body.
#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = Order),
        (status = 400, description = "Invalid payload or unknown car")
    )
)]
pub async fn create_order(
    AuthUser { id, .. }: AuthUser,
    State(lifecycle): State<LifecycleManager>,
    ValidJson(payload): ValidJson<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    let order = lifecycle
        .create_order(id, payload.car_id, payload.total_price)
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// my_orders
///
/// [Authenticated Route] The caller's orders, newest first.
#[utoipa::path(
    get,
    path = "/api/orders/mine",
    responses((status = 200, description = "My orders", body = [OrderView]))
)]
pub async fn my_orders(
    AuthUser { id, .. }: AuthUser,
    State(lifecycle): State<LifecycleManager>,
) -> Result<Json<Vec<OrderView>>, AppError> {
    Ok(Json(lifecycle.orders_of(id).await?))
}

/// list_orders
///
/// [Admin Route] Every order with its car and owner embedded.
#[utoipa::path(
    get,
    path = "/api/cms/orders",
    responses((status = 200, description = "All orders", body = [OrderView]))
)]
pub async fn list_orders(
    State(lifecycle): State<LifecycleManager>,
) -> Result<Json<Vec<OrderView>>, AppError> {
    Ok(Json(lifecycle.list_orders().await?))
}

#[utoipa::path(
    get,
    path = "/api/cms/orders/{id}",
    params(("id" = i64, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Found", body = OrderView),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_order(
    State(lifecycle): State<LifecycleManager>,
    ValidPath(id): ValidPath<i64>,
) -> Result<Json<OrderView>, AppError> {
    let order = lifecycle
        .get_order(id)
        .await
        .map_err(|e| e.on_path(EntityRef::Order(id)))?;
    Ok(Json(order))
}

/// update_order_status
///
/// [Admin Route] Settlement confirmation. Idempotent: sending the current
/// value again returns the order unchanged.
#[utoipa::path(
    put,
    path = "/api/cms/orders/{id}/status",
    params(("id" = i64, Path, description = "Order ID")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Current order state", body = Order),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_order_status(
    State(lifecycle): State<LifecycleManager>,
    ValidPath(id): ValidPath<i64>,
    ValidJson(payload): ValidJson<UpdateOrderStatusRequest>,
) -> Result<Json<Order>, AppError> {
    let change = lifecycle
        .update_order_status(id, payload.status)
        .await
        .map_err(|e| e.on_path(EntityRef::Order(id)))?;
    Ok(Json(change.order))
}

/// update_order
///
/// [Admin Route] Edits an order's car or price. The settlement flag is not
/// writable here; it only moves through `/status`.
#[utoipa::path(
    put,
    path = "/api/cms/orders/{id}",
    params(("id" = i64, Path, description = "Order ID")),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Updated", body = Order),
        (status = 400, description = "Invalid payload or unknown car"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_order(
    State(lifecycle): State<LifecycleManager>,
    ValidPath(id): ValidPath<i64>,
    ValidJson(payload): ValidJson<UpdateOrderRequest>,
) -> Result<Json<Order>, AppError> {
    let changes = OrderChanges {
        car_id: payload.car_id,
        total_price: payload.total_price,
    };
    let order = lifecycle
        .update_order(id, changes)
        .await
        .map_err(|e| e.on_path(EntityRef::Order(id)))?;
    Ok(Json(order))
}

#[utoipa::path(
    delete,
    path = "/api/cms/orders/{id}",
    params(("id" = i64, Path, description = "Order ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Transactions or invoices still reference the order")
    )
)]
pub async fn delete_order(
    State(lifecycle): State<LifecycleManager>,
    ValidPath(id): ValidPath<i64>,
) -> Result<StatusCode, AppError> {
    lifecycle
        .delete(EntityRef::Order(id))
        .await
        .map_err(|e| e.on_path(EntityRef::Order(id)))?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Transactions ---

/// create_transaction
///
/// [Authenticated Route] Records a payment against one of the caller's own
/// orders. Admins may record against any order.
#[utoipa::path(
    post,
    path = "/api/transactions",
    request_body = CreateTransactionRequest,
    responses(
        (status = 201, description = "Recorded", body = Transaction),
        (status = 400, description = "Invalid payload or unknown order"),
        (status = 403, description = "The order belongs to another user")
    )
)]
pub async fn create_transaction(
    caller: AuthUser,
    State(lifecycle): State<LifecycleManager>,
    ValidJson(payload): ValidJson<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<Transaction>), AppError> {
    let transaction = lifecycle
        .create_transaction(
            &caller,
            payload.order_id,
            payload.payment_provider,
            payload.account_number,
            payload.amount,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

#[utoipa::path(
    get,
    path = "/api/cms/transactions",
    responses((status = 200, description = "All transactions", body = [TransactionView]))
)]
pub async fn list_transactions(
    State(lifecycle): State<LifecycleManager>,
) -> Result<Json<Vec<TransactionView>>, AppError> {
    Ok(Json(lifecycle.list_transactions().await?))
}

#[utoipa::path(
    get,
    path = "/api/cms/transactions/{id}",
    params(("id" = i64, Path, description = "Transaction ID")),
    responses(
        (status = 200, description = "Found", body = TransactionView),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_transaction(
    State(lifecycle): State<LifecycleManager>,
    ValidPath(id): ValidPath<i64>,
) -> Result<Json<TransactionView>, AppError> {
    let transaction = lifecycle
        .get_transaction(id)
        .await
        .map_err(|e| e.on_path(EntityRef::Transaction(id)))?;
    Ok(Json(transaction))
}

#[utoipa::path(
    put,
    path = "/api/cms/transactions/{id}",
    params(("id" = i64, Path, description = "Transaction ID")),
    request_body = UpdateTransactionRequest,
    responses(
        (status = 200, description = "Updated", body = Transaction),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_transaction(
    State(lifecycle): State<LifecycleManager>,
    ValidPath(id): ValidPath<i64>,
    ValidJson(payload): ValidJson<UpdateTransactionRequest>,
) -> Result<Json<Transaction>, AppError> {
    let changes = TransactionChanges {
        payment_provider: payload.payment_provider,
        account_number: payload.account_number,
        amount: payload.amount,
    };
    let transaction = lifecycle
        .update_transaction(id, changes)
        .await
        .map_err(|e| e.on_path(EntityRef::Transaction(id)))?;
    Ok(Json(transaction))
}

#[utoipa::path(
    delete,
    path = "/api/cms/transactions/{id}",
    params(("id" = i64, Path, description = "Transaction ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "An invoice still references the transaction")
    )
)]
pub async fn delete_transaction(
    State(lifecycle): State<LifecycleManager>,
    ValidPath(id): ValidPath<i64>,
) -> Result<StatusCode, AppError> {
    lifecycle
        .delete(EntityRef::Transaction(id))
        .await
        .map_err(|e| e.on_path(EntityRef::Transaction(id)))?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Invoices ---

/// create_invoice
///
/// [Admin Route] Issues an invoice for an order and one of its transactions.
#[utoipa::path(
    post,
    path = "/api/cms/invoices",
    request_body = CreateInvoiceRequest,
    responses(
        (status = 201, description = "Issued", body = Invoice),
        (status = 400, description = "Unknown order or transaction, or mismatched pair")
    )
)]
pub async fn create_invoice(
    State(lifecycle): State<LifecycleManager>,
    ValidJson(payload): ValidJson<CreateInvoiceRequest>,
) -> Result<(StatusCode, Json<Invoice>), AppError> {
    let invoice = lifecycle
        .create_invoice(payload.order_id, payload.transaction_id)
        .await?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

/// list_invoices
///
/// [Admin Route] Invoices whose order is settled, newest first.
#[utoipa::path(
    get,
    path = "/api/cms/invoices",
    responses((status = 200, description = "Settled invoices", body = [InvoiceView]))
)]
pub async fn list_invoices(
    State(lifecycle): State<LifecycleManager>,
) -> Result<Json<Vec<InvoiceView>>, AppError> {
    Ok(Json(lifecycle.list_invoices().await?))
}

/// get_invoice
///
/// [Admin Route] One invoice with its order and payment. An invoice whose
/// order is not settled yet is reported as 404, as it is absent from the listing.
#[utoipa::path(
    get,
    path = "/api/cms/invoices/{id}",
    params(("id" = i64, Path, description = "Invoice ID")),
    responses(
        (status = 200, description = "Found", body = InvoiceView),
        (status = 404, description = "Not Found or not settled")
    )
)]
pub async fn get_invoice(
    State(lifecycle): State<LifecycleManager>,
    ValidPath(id): ValidPath<i64>,
) -> Result<Json<InvoiceView>, AppError> {
    let invoice = lifecycle
        .get_invoice(id)
        .await
        .map_err(|e| e.on_path(EntityRef::Invoice(id)))?;
    Ok(Json(invoice))
}

#[utoipa::path(
    delete,
    path = "/api/cms/invoices/{id}",
    params(("id" = i64, Path, description = "Invoice ID")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete_invoice(
    State(lifecycle): State<LifecycleManager>,
    ValidPath(id): ValidPath<i64>,
) -> Result<StatusCode, AppError> {
    lifecycle
        .delete(EntityRef::Invoice(id))
        .await
        .map_err(|e| e.on_path(EntityRef::Invoice(id)))?;
    Ok(StatusCode::NO_CONTENT)
}
