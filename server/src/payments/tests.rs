//! Payment reconciliation tests over an in-memory database

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_decimal::Decimal;

use shared::order::{
    AcceptOrderRequest, ConfirmCashRequest, ItemStatus, OrderStatus, PaymentMethod, PaymentStatus,
    TableStatus, event,
};

use super::provider::{CardProvider, IntentStatus, PaymentIntent};
use super::service::PaymentService;
use crate::db::repository::DiningTableRepository;
use crate::orders::tests::fixtures::{TestContext, line, request, setup};
use crate::orders::{OrderError, OrderResult, TableLocks};

struct FakeProvider {
    fail_create: bool,
    status: IntentStatus,
    amounts: Arc<Mutex<Vec<i64>>>,
}

#[async_trait]
impl CardProvider for FakeProvider {
    async fn create_intent(
        &self,
        amount_minor: i64,
        _currency: &str,
        order_number: &str,
    ) -> OrderResult<PaymentIntent> {
        if self.fail_create {
            return Err(OrderError::PaymentProvider("provider down".to_string()));
        }
        self.amounts.lock().unwrap().push(amount_minor);
        Ok(PaymentIntent {
            id: format!("pi_{}", order_number),
            client_secret: format!("pi_{}_secret", order_number),
        })
    }

    async fn intent_status(&self, _intent_id: &str) -> OrderResult<IntentStatus> {
        Ok(self.status)
    }
}

struct PayContext {
    ctx: TestContext,
    payments: PaymentService,
    amounts: Arc<Mutex<Vec<i64>>>,
}

async fn setup_with(status: IntentStatus, fail_create: bool) -> PayContext {
    let ctx = setup().await;
    let amounts = Arc::new(Mutex::new(Vec::new()));
    let provider = Arc::new(FakeProvider {
        fail_create,
        status,
        amounts: amounts.clone(),
    });
    let payments = PaymentService::new(
        &ctx.db,
        ctx.notifier.clone(),
        TableLocks::new(),
        provider,
        "eur".to_string(),
    );
    PayContext {
        ctx,
        payments,
        amounts,
    }
}

/// Open an order for 2x salmon (total 36) and walk it to SERVED
async fn served_order(ctx: &TestContext) -> String {
    let order = ctx
        .engine
        .create_order(request(ctx, vec![line(&ctx.salmon, 2)]))
        .await
        .unwrap();
    let id = order.id.unwrap().to_string();
    ctx.engine
        .accept_order(
            &id,
            AcceptOrderRequest {
                waiter: "employee:w1".to_string(),
            },
        )
        .await
        .unwrap();
    ctx.engine
        .update_status(&id, OrderStatus::Served)
        .await
        .unwrap();
    id
}

async fn table_of(ctx: &TestContext) -> crate::db::models::DiningTable {
    DiningTableRepository::new(ctx.db.db.clone())
        .find_by_id(&ctx.table_id.parse().unwrap())
        .await
        .unwrap()
        .unwrap()
}

// ========== Cash ==========

#[tokio::test]
async fn cash_request_marks_pending_cash_without_touching_the_table() {
    let pay = setup_with(IntentStatus::Succeeded, false).await;
    let id = served_order(&pay.ctx).await;

    let order = pay.payments.request_cash_payment(&id).await.unwrap();
    assert_eq!(order.payment_status, PaymentStatus::PendingCash);
    assert_eq!(order.payment_method, Some(PaymentMethod::Cash));
    assert_eq!(order.status, OrderStatus::Served);

    let table = table_of(&pay.ctx).await;
    assert_eq!(table.status, TableStatus::Occupied);
    assert!(table.current_order.is_some());
}

#[tokio::test]
async fn cash_request_notifies_staff_with_the_table_number() {
    let pay = setup_with(IntentStatus::Succeeded, false).await;
    let id = served_order(&pay.ctx).await;

    let mut rx = pay.ctx.notifier.subscribe();
    pay.payments.request_cash_payment(&id).await.unwrap();

    let mut found = false;
    while let Ok(notification) = rx.try_recv() {
        if notification.event == event::CASH_REQUESTED {
            assert!(notification.topic.ends_with(":staff"));
            assert_eq!(notification.data["table_number"], 1);
            found = true;
        }
    }
    assert!(found);
}

#[tokio::test]
async fn cash_settlement_completes_a_served_order_and_frees_the_table() {
    let pay = setup_with(IntentStatus::Succeeded, false).await;
    let id = served_order(&pay.ctx).await;
    pay.payments.request_cash_payment(&id).await.unwrap();

    let order = pay
        .payments
        .confirm_cash_payment(
            &id,
            ConfirmCashRequest {
                amount_received: Decimal::from(40),
                tip_amount: Decimal::from(4),
            },
        )
        .await
        .unwrap();

    assert_eq!(order.payment_status, PaymentStatus::Paid);
    assert_eq!(order.status, OrderStatus::Completed);
    assert_eq!(order.amount_received, Some(Decimal::from(40)));
    assert_eq!(order.tip_amount, Decimal::from(4));
    // Tip never enters the total
    assert_eq!(order.total, Decimal::from(36));
    assert!(order.paid_at.is_some());
    assert!(order.completed_at.is_some());

    let table = table_of(&pay.ctx).await;
    assert_eq!(table.status, TableStatus::Available);
    assert!(table.current_order.is_none());
}

#[tokio::test]
async fn cash_confirm_mid_service_pays_but_does_not_complete() {
    let pay = setup_with(IntentStatus::Succeeded, false).await;
    let order = pay
        .ctx
        .engine
        .create_order(request(&pay.ctx, vec![line(&pay.ctx.salmon, 1)]))
        .await
        .unwrap();
    let id = order.id.unwrap().to_string();
    pay.ctx
        .engine
        .accept_order(
            &id,
            AcceptOrderRequest {
                waiter: "employee:w1".to_string(),
            },
        )
        .await
        .unwrap();

    pay.payments.request_cash_payment(&id).await.unwrap();
    let paid = pay
        .payments
        .confirm_cash_payment(
            &id,
            ConfirmCashRequest {
                amount_received: Decimal::from(18),
                tip_amount: Decimal::ZERO,
            },
        )
        .await
        .unwrap();

    // Paid, but the kitchen status is not rewritten
    assert_eq!(paid.payment_status, PaymentStatus::Paid);
    assert_eq!(paid.status, OrderStatus::Accepted);
    assert!(paid.completed_at.is_none());

    // The table is released regardless
    let table = table_of(&pay.ctx).await;
    assert_eq!(table.status, TableStatus::Available);
}

#[tokio::test]
async fn cash_confirm_without_a_request_is_invalid() {
    let pay = setup_with(IntentStatus::Succeeded, false).await;
    let id = served_order(&pay.ctx).await;

    assert!(matches!(
        pay.payments
            .confirm_cash_payment(
                &id,
                ConfirmCashRequest {
                    amount_received: Decimal::from(36),
                    tip_amount: Decimal::ZERO,
                },
            )
            .await,
        Err(OrderError::InvalidOperation(_))
    ));
}

#[tokio::test]
async fn short_cash_payment_fails_validation() {
    let pay = setup_with(IntentStatus::Succeeded, false).await;
    let id = served_order(&pay.ctx).await;
    pay.payments.request_cash_payment(&id).await.unwrap();

    assert!(matches!(
        pay.payments
            .confirm_cash_payment(
                &id,
                ConfirmCashRequest {
                    amount_received: Decimal::from(30),
                    tip_amount: Decimal::ZERO,
                },
            )
            .await,
        Err(OrderError::Validation(_))
    ));
}

// ========== Card ==========

#[tokio::test]
async fn card_intent_is_sized_in_minor_units_and_recorded() {
    let pay = setup_with(IntentStatus::Succeeded, false).await;
    let id = served_order(&pay.ctx).await;

    let response = pay.payments.create_card_intent(&id).await.unwrap();
    assert_eq!(response.client_secret, "pi_ORD-00001_secret");
    assert_eq!(*pay.amounts.lock().unwrap(), vec![3600]);

    let order = pay.ctx.engine.get_order(&id).await.unwrap();
    assert_eq!(order.payment_method, Some(PaymentMethod::Card));
    assert_eq!(order.payment_intent_id.as_deref(), Some("pi_ORD-00001"));
    assert_eq!(order.payment_status, PaymentStatus::Pending);
}

#[tokio::test]
async fn provider_failure_on_intent_marks_failed_and_nothing_else() {
    let pay = setup_with(IntentStatus::Succeeded, true).await;
    let id = served_order(&pay.ctx).await;

    assert!(matches!(
        pay.payments.create_card_intent(&id).await,
        Err(OrderError::PaymentProvider(_))
    ));

    let order = pay.ctx.engine.get_order(&id).await.unwrap();
    assert_eq!(order.payment_status, PaymentStatus::Failed);
    assert_eq!(order.status, OrderStatus::Served);
    assert!(order.payment_intent_id.is_none());

    let table = table_of(&pay.ctx).await;
    assert_eq!(table.status, TableStatus::Occupied);
}

#[tokio::test]
async fn card_settlement_completes_from_any_prior_status() {
    let pay = setup_with(IntentStatus::Succeeded, false).await;
    let order = pay
        .ctx
        .engine
        .create_order(request(&pay.ctx, vec![line(&pay.ctx.salmon, 1)]))
        .await
        .unwrap();
    let id = order.id.unwrap().to_string();
    pay.ctx
        .engine
        .accept_order(
            &id,
            AcceptOrderRequest {
                waiter: "employee:w1".to_string(),
            },
        )
        .await
        .unwrap();

    pay.payments.create_card_intent(&id).await.unwrap();
    let settled = pay
        .payments
        .confirm_card_payment("pi_ORD-00001")
        .await
        .unwrap();

    // Card capture is final: completion does not wait for SERVED
    assert_eq!(settled.payment_status, PaymentStatus::Paid);
    assert_eq!(settled.status, OrderStatus::Completed);
    assert!(settled.paid_at.is_some());
    assert!(
        settled
            .items
            .iter()
            .all(|i| i.status == ItemStatus::Served)
    );

    let table = table_of(&pay.ctx).await;
    assert_eq!(table.status, TableStatus::Available);
    assert!(table.current_order.is_none());
}

#[tokio::test]
async fn failed_capture_marks_failed_and_keeps_the_table() {
    let pay = setup_with(IntentStatus::Failed, false).await;
    let id = served_order(&pay.ctx).await;
    pay.payments.create_card_intent(&id).await.unwrap();

    assert!(matches!(
        pay.payments.confirm_card_payment("pi_ORD-00001").await,
        Err(OrderError::PaymentProvider(_))
    ));

    let order = pay.ctx.engine.get_order(&id).await.unwrap();
    assert_eq!(order.payment_status, PaymentStatus::Failed);
    assert_eq!(order.status, OrderStatus::Served);

    let table = table_of(&pay.ctx).await;
    assert_eq!(table.status, TableStatus::Occupied);
}

#[tokio::test]
async fn unknown_intent_is_not_found() {
    let pay = setup_with(IntentStatus::Succeeded, false).await;
    assert!(matches!(
        pay.payments.confirm_card_payment("pi_nope").await,
        Err(OrderError::NotFound(_))
    ));
}

#[tokio::test]
async fn reconfirming_a_settled_intent_is_idempotent() {
    let pay = setup_with(IntentStatus::Succeeded, false).await;
    let id = served_order(&pay.ctx).await;
    pay.payments.create_card_intent(&id).await.unwrap();

    let first = pay
        .payments
        .confirm_card_payment("pi_ORD-00001")
        .await
        .unwrap();
    let second = pay
        .payments
        .confirm_card_payment("pi_ORD-00001")
        .await
        .unwrap();
    assert_eq!(second.payment_status, PaymentStatus::Paid);
    assert_eq!(second.revision, first.revision);
}
