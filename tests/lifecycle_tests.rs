use car_zone::{
    AuthUser, LifecycleManager, MemoryRepository,
    error::StoreError,
    lifecycle::{EntityRef, LifecycleError},
    models::{NewUser, OrderChanges, Role},
    repository::{Repository, RepositoryState},
};
use std::sync::Arc;

struct Fixture {
    repo: Arc<MemoryRepository>,
    lifecycle: LifecycleManager,
    buyer: i64,
    car: i64,
}

async fn fixture() -> Fixture {
    let repo = Arc::new(MemoryRepository::new());
    let buyer = repo
        .create_user(NewUser {
            username: "buyer".to_string(),
            email: "buyer@carzone.test".to_string(),
            password: "digest".to_string(),
            role_id: Role::USER_ID,
        })
        .await
        .unwrap()
        .id;
    let car = repo.seed_car("Civic", 25_000.0).id;
    let lifecycle = LifecycleManager::new(repo.clone() as RepositoryState);

    Fixture {
        repo,
        lifecycle,
        buyer,
        car,
    }
}

impl Fixture {
    fn caller(&self) -> AuthUser {
        AuthUser {
            id: self.buyer,
            role: Role::User,
        }
    }

    async fn other_user(&self, username: &str) -> i64 {
        self.repo
            .create_user(NewUser {
                username: username.to_string(),
                email: format!("{username}@carzone.test"),
                password: "digest".to_string(),
                role_id: Role::USER_ID,
            })
            .await
            .unwrap()
            .id
    }
}

#[tokio::test]
async fn invoice_is_hidden_until_the_order_is_settled() {
    let f = fixture().await;

    let order = f.lifecycle.create_order(f.buyer, f.car, 25_000.0).await.unwrap();
    assert!(!order.status);

    let tx = f
        .lifecycle
        .create_transaction(&f.caller(), order.id, "BCA".into(), "1234567890".into(), 25_000.0)
        .await
        .unwrap();
    assert_eq!(tx.order_id, order.id);

    let invoice = f.lifecycle.create_invoice(order.id, tx.id).await.unwrap();
    assert!(f.lifecycle.list_invoices().await.unwrap().is_empty());

    let change = f.lifecycle.update_order_status(order.id, true).await.unwrap();
    assert!(change.changed);
    assert!(change.order.status);

    let listed = f.lifecycle.list_invoices().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].invoice.id, invoice.id);
    assert_eq!(listed[0].order.order.id, order.id);
    assert_eq!(listed[0].order.car.name, "Civic");
    assert_eq!(listed[0].order.user.username, "buyer");
    assert_eq!(listed[0].transaction.id, tx.id);
}

#[tokio::test]
async fn transaction_does_not_settle_the_order() {
    let f = fixture().await;
    let order = f.lifecycle.create_order(f.buyer, f.car, 10.0).await.unwrap();

    f.lifecycle
        .create_transaction(&f.caller(), order.id, "BNI".into(), "42".into(), 10.0)
        .await
        .unwrap();

    let stored = f.repo.find_order(order.id).await.unwrap().unwrap();
    assert!(!stored.status);
}

#[tokio::test]
async fn repeated_settlement_is_a_no_op() {
    let f = fixture().await;
    let order = f.lifecycle.create_order(f.buyer, f.car, 10.0).await.unwrap();

    let first = f.lifecycle.update_order_status(order.id, true).await.unwrap();
    let second = f.lifecycle.update_order_status(order.id, true).await.unwrap();

    assert!(first.changed);
    assert!(!second.changed);
    assert_eq!(first.order, second.order);
    assert_eq!(f.repo.order_count(), 1);
    assert_eq!(f.repo.transaction_count(), 0);
    assert_eq!(f.repo.invoice_count(), 0);
}

#[tokio::test]
async fn settling_a_missing_order_is_not_found() {
    let f = fixture().await;

    let err = f.lifecycle.update_order_status(404, true).await.unwrap_err();

    assert!(matches!(err, LifecycleError::NotFound(EntityRef::Order(404))));
}

#[tokio::test]
async fn transaction_for_unknown_order_persists_nothing() {
    let f = fixture().await;

    let err = f
        .lifecycle
        .create_transaction(&f.caller(), 77, "BCA".into(), "1".into(), 5.0)
        .await
        .unwrap_err();

    assert!(matches!(err, LifecycleError::NotFound(EntityRef::Order(77))));
    assert_eq!(f.repo.transaction_count(), 0);
}

#[tokio::test]
async fn order_for_unknown_car_is_refused() {
    let f = fixture().await;

    let err = f.lifecycle.create_order(f.buyer, 9_999, 1.0).await.unwrap_err();

    assert!(matches!(err, LifecycleError::NotFound(EntityRef::Car(9_999))));
    assert_eq!(f.repo.order_count(), 0);
}

#[tokio::test]
async fn invoice_requires_both_references() {
    let f = fixture().await;
    let order = f.lifecycle.create_order(f.buyer, f.car, 10.0).await.unwrap();

    let err = f.lifecycle.create_invoice(order.id, 555).await.unwrap_err();
    assert!(matches!(err, LifecycleError::NotFound(EntityRef::Transaction(555))));

    let err = f.lifecycle.create_invoice(556, 555).await.unwrap_err();
    assert!(matches!(err, LifecycleError::NotFound(EntityRef::Order(556))));

    assert_eq!(f.repo.invoice_count(), 0);
}

#[tokio::test]
async fn invoice_rejects_a_transaction_of_another_order() {
    let f = fixture().await;
    let first = f.lifecycle.create_order(f.buyer, f.car, 10.0).await.unwrap();
    let second = f.lifecycle.create_order(f.buyer, f.car, 20.0).await.unwrap();
    let tx = f
        .lifecycle
        .create_transaction(&f.caller(), first.id, "BCA".into(), "1".into(), 10.0)
        .await
        .unwrap();

    let err = f.lifecycle.create_invoice(second.id, tx.id).await.unwrap_err();

    assert!(matches!(
        err,
        LifecycleError::TransactionOrderMismatch { expected, actual, .. }
            if expected == second.id && actual == first.id
    ));
    assert_eq!(f.repo.invoice_count(), 0);
}

#[tokio::test]
async fn listings_are_newest_first() {
    let f = fixture().await;
    let older = f.lifecycle.create_order(f.buyer, f.car, 1.0).await.unwrap();
    let newer = f.lifecycle.create_order(f.buyer, f.car, 2.0).await.unwrap();

    let ids: Vec<i64> = f
        .lifecycle
        .list_orders()
        .await
        .unwrap()
        .iter()
        .map(|v| v.order.id)
        .collect();

    assert_eq!(ids, vec![newer.id, older.id]);
}

#[tokio::test]
async fn orders_of_filters_by_owner() {
    let f = fixture().await;
    let other = f.other_user("other").await;
    let mine = f.lifecycle.create_order(f.buyer, f.car, 1.0).await.unwrap();
    f.lifecycle.create_order(other, f.car, 2.0).await.unwrap();

    let views = f.lifecycle.orders_of(f.buyer).await.unwrap();

    assert_eq!(views.len(), 1);
    assert_eq!(views[0].order.id, mine.id);
    assert_eq!(views[0].user.id, f.buyer);
}

#[tokio::test]
async fn administrative_delete_reports_missing_rows() {
    let f = fixture().await;
    let order = f.lifecycle.create_order(f.buyer, f.car, 1.0).await.unwrap();

    f.lifecycle.delete(EntityRef::Order(order.id)).await.unwrap();
    let err = f.lifecycle.delete(EntityRef::Order(order.id)).await.unwrap_err();

    assert!(matches!(err, LifecycleError::NotFound(EntityRef::Order(_))));
    assert_eq!(f.repo.order_count(), 0);
}

#[tokio::test]
async fn transaction_on_a_foreign_order_is_refused() {
    let f = fixture().await;
    let order = f.lifecycle.create_order(f.buyer, f.car, 10.0).await.unwrap();
    let intruder = AuthUser {
        id: f.other_user("mallory").await,
        role: Role::User,
    };

    let err = f
        .lifecycle
        .create_transaction(&intruder, order.id, "BCA".into(), "1".into(), 10.0)
        .await
        .unwrap_err();

    assert!(matches!(err, LifecycleError::NotOwner { order_id } if order_id == order.id));
    assert_eq!(f.repo.transaction_count(), 0);
}

#[tokio::test]
async fn admin_may_record_a_transaction_on_any_order() {
    let f = fixture().await;
    let order = f.lifecycle.create_order(f.buyer, f.car, 10.0).await.unwrap();
    let admin = AuthUser {
        id: f.other_user("root").await,
        role: Role::Admin,
    };

    let tx = f
        .lifecycle
        .create_transaction(&admin, order.id, "BCA".into(), "1".into(), 10.0)
        .await
        .unwrap();

    assert_eq!(tx.order_id, order.id);
}

#[tokio::test]
async fn invoices_are_listed_newest_first() {
    let f = fixture().await;
    let first = f.lifecycle.create_order(f.buyer, f.car, 1.0).await.unwrap();
    let second = f.lifecycle.create_order(f.buyer, f.car, 2.0).await.unwrap();
    let mut issued = Vec::new();
    for order in [&first, &second] {
        let tx = f
            .lifecycle
            .create_transaction(&f.caller(), order.id, "BCA".into(), "1".into(), 1.0)
            .await
            .unwrap();
        issued.push(f.lifecycle.create_invoice(order.id, tx.id).await.unwrap().id);
        f.lifecycle.update_order_status(order.id, true).await.unwrap();
    }

    let ids: Vec<i64> = f
        .lifecycle
        .list_invoices()
        .await
        .unwrap()
        .iter()
        .map(|v| v.invoice.id)
        .collect();

    assert_eq!(ids, vec![issued[1], issued[0]]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_settlement_changes_the_order_once() {
    let f = fixture().await;
    let order = f.lifecycle.create_order(f.buyer, f.car, 10.0).await.unwrap();
    let id = order.id;
    let (a, b) = (f.lifecycle.clone(), f.lifecycle.clone());

    let (left, right) = tokio::join!(
        tokio::spawn(async move { a.update_order_status(id, true).await }),
        tokio::spawn(async move { b.update_order_status(id, true).await }),
    );
    let left = left.unwrap().unwrap();
    let right = right.unwrap().unwrap();

    assert!(left.changed ^ right.changed);
    assert!(left.order.status && right.order.status);
}

#[tokio::test]
async fn delete_refuses_to_orphan_payments_and_invoices() {
    let f = fixture().await;
    let order = f.lifecycle.create_order(f.buyer, f.car, 10.0).await.unwrap();
    let tx = f
        .lifecycle
        .create_transaction(&f.caller(), order.id, "BCA".into(), "1".into(), 10.0)
        .await
        .unwrap();
    let invoice = f.lifecycle.create_invoice(order.id, tx.id).await.unwrap();

    let err = f.lifecycle.delete(EntityRef::Order(order.id)).await.unwrap_err();
    assert!(matches!(err, LifecycleError::Store(StoreError::InUse(_))));
    let err = f
        .lifecycle
        .delete(EntityRef::Transaction(tx.id))
        .await
        .unwrap_err();
    assert!(matches!(err, LifecycleError::Store(StoreError::InUse(_))));
    assert_eq!(f.repo.order_count(), 1);
    assert_eq!(f.repo.transaction_count(), 1);

    // Dependents first, then the order goes.
    f.lifecycle.delete(EntityRef::Invoice(invoice.id)).await.unwrap();
    f.lifecycle.delete(EntityRef::Transaction(tx.id)).await.unwrap();
    f.lifecycle.delete(EntityRef::Order(order.id)).await.unwrap();
    assert_eq!(f.repo.order_count(), 0);
}

#[tokio::test]
async fn single_invoice_is_hidden_until_settled() {
    let f = fixture().await;
    let order = f.lifecycle.create_order(f.buyer, f.car, 10.0).await.unwrap();
    let tx = f
        .lifecycle
        .create_transaction(&f.caller(), order.id, "BCA".into(), "1".into(), 10.0)
        .await
        .unwrap();
    let invoice = f.lifecycle.create_invoice(order.id, tx.id).await.unwrap();

    let err = f.lifecycle.get_invoice(invoice.id).await.unwrap_err();
    assert!(matches!(err, LifecycleError::NotFound(EntityRef::Invoice(_))));

    f.lifecycle.update_order_status(order.id, true).await.unwrap();
    let view = f.lifecycle.get_invoice(invoice.id).await.unwrap();
    assert_eq!(view.order.order.id, order.id);
    assert_eq!(view.transaction.id, tx.id);
}

#[tokio::test]
async fn single_transaction_embeds_its_order() {
    let f = fixture().await;
    let order = f.lifecycle.create_order(f.buyer, f.car, 10.0).await.unwrap();
    let tx = f
        .lifecycle
        .create_transaction(&f.caller(), order.id, "BNI".into(), "9".into(), 10.0)
        .await
        .unwrap();

    let view = f.lifecycle.get_transaction(tx.id).await.unwrap();

    assert_eq!(view.transaction, tx);
    assert_eq!(view.order.car.name, "Civic");
    assert_eq!(view.order.user.id, f.buyer);
}

#[tokio::test]
async fn order_edit_keeps_the_settlement_flag() {
    let f = fixture().await;
    let order = f.lifecycle.create_order(f.buyer, f.car, 10.0).await.unwrap();
    f.lifecycle.update_order_status(order.id, true).await.unwrap();

    let edited = f
        .lifecycle
        .update_order(
            order.id,
            OrderChanges {
                car_id: None,
                total_price: Some(12.5),
            },
        )
        .await
        .unwrap();
    assert_eq!(edited.total_price, 12.5);
    assert!(edited.status);

    let err = f
        .lifecycle
        .update_order(
            order.id,
            OrderChanges {
                car_id: Some(9_999),
                total_price: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, LifecycleError::NotFound(EntityRef::Car(9_999))));
}
