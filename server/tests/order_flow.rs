//! End-to-end order flows over an in-memory database
//!
//! Exercises the full stack the way a service would: open and merge
//! rounds, approve, progress, then settle in cash or by card.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;

use server::db::DbService;
use server::db::models::{DiningTable, MenuItem, MenuItemStatus};
use server::db::repository::DiningTableRepository;
use server::db::repository::MenuItemRepository;
use server::notify::Notifier;
use server::orders::{OrderEngine, OrderResult, TableLocks};
use server::payments::{CardProvider, IntentStatus, PaymentIntent, PaymentService};
use shared::order::{
    AcceptOrderRequest, ConfirmCashRequest, CreateOrderRequest, ItemStatus, OrderItemInput,
    OrderStatus, PaymentStatus, RejectOrderRequest, TableStatus,
};

struct AlwaysCaptured;

#[async_trait]
impl CardProvider for AlwaysCaptured {
    async fn create_intent(
        &self,
        _amount_minor: i64,
        _currency: &str,
        order_number: &str,
    ) -> OrderResult<PaymentIntent> {
        Ok(PaymentIntent {
            id: format!("pi_{}", order_number),
            client_secret: format!("pi_{}_secret", order_number),
        })
    }

    async fn intent_status(&self, _intent_id: &str) -> OrderResult<IntentStatus> {
        Ok(IntentStatus::Succeeded)
    }
}

struct Stack {
    db: DbService,
    engine: OrderEngine,
    payments: PaymentService,
    table_id: String,
    salmon: String,
    soup: String,
}

async fn stack() -> Stack {
    let db = DbService::in_memory().await.unwrap();
    let notifier = Notifier::new();
    let locks = TableLocks::new();
    let engine = OrderEngine::new(&db, notifier.clone(), locks.clone());
    let payments = PaymentService::new(
        &db,
        notifier,
        locks,
        Arc::new(AlwaysCaptured),
        "eur".to_string(),
    );

    let table = DiningTableRepository::new(db.db.clone())
        .create(DiningTable {
            id: None,
            number: 7,
            capacity: 4,
            location: Some("Terrace".to_string()),
            status: TableStatus::Available,
            current_order: None,
        })
        .await
        .unwrap();

    let menu = MenuItemRepository::new(db.db.clone());
    let salmon = menu
        .create(MenuItem {
            id: None,
            name: "Grilled Salmon".to_string(),
            price: Decimal::from(18),
            status: MenuItemStatus::Available,
            modifiers: vec![],
            total_orders: 0,
        })
        .await
        .unwrap();
    let soup = menu
        .create(MenuItem {
            id: None,
            name: "Miso Soup".to_string(),
            price: Decimal::from(6),
            status: MenuItemStatus::Available,
            modifiers: vec![],
            total_orders: 0,
        })
        .await
        .unwrap();

    Stack {
        table_id: table.id.unwrap().to_string(),
        salmon: salmon.id.unwrap().to_string(),
        soup: soup.id.unwrap().to_string(),
        db,
        engine,
        payments,
    }
}

fn line(menu_item: &str, quantity: u32) -> OrderItemInput {
    OrderItemInput {
        menu_item: menu_item.to_string(),
        quantity,
        modifiers: vec![],
        special_instructions: None,
    }
}

fn round(stack: &Stack, items: Vec<OrderItemInput>) -> CreateOrderRequest {
    CreateOrderRequest {
        restaurant: "restaurant:main".to_string(),
        table: stack.table_id.clone(),
        customer: None,
        guest_name: Some("Alex".to_string()),
        items,
    }
}

fn waiter() -> AcceptOrderRequest {
    AcceptOrderRequest {
        waiter: "employee:w1".to_string(),
    }
}

async fn table_state(stack: &Stack) -> DiningTable {
    DiningTableRepository::new(stack.db.db.clone())
        .find_by_id(&stack.table_id.parse().unwrap())
        .await
        .unwrap()
        .unwrap()
}

#[tokio::test]
async fn two_rounds_merge_and_reapprove() {
    let s = stack().await;

    let first = s
        .engine
        .create_order(round(&s, vec![line(&s.salmon, 2)]))
        .await
        .unwrap();
    let id = first.id.clone().unwrap().to_string();
    s.engine.accept_order(&id, waiter()).await.unwrap();
    s.engine
        .update_status(&id, OrderStatus::Ready)
        .await
        .unwrap();

    let merged = s
        .engine
        .create_order(round(&s, vec![line(&s.soup, 1)]))
        .await
        .unwrap();
    assert_eq!(merged.id, first.id);
    assert_eq!(merged.status, OrderStatus::Pending);
    assert_eq!(merged.subtotal, Decimal::from(42));

    // First round items keep their kitchen progress across the merge
    assert_eq!(merged.items[0].status, ItemStatus::Ready);
    assert_eq!(merged.items[1].status, ItemStatus::Pending);

    let accepted = s.engine.accept_order(&id, waiter()).await.unwrap();
    assert_eq!(accepted.status, OrderStatus::Accepted);
}

#[tokio::test]
async fn partial_rejection_then_cash_settlement() {
    let s = stack().await;

    let first = s
        .engine
        .create_order(round(&s, vec![line(&s.salmon, 2)]))
        .await
        .unwrap();
    let id = first.id.clone().unwrap().to_string();
    s.engine.accept_order(&id, waiter()).await.unwrap();
    s.engine
        .update_status(&id, OrderStatus::Ready)
        .await
        .unwrap();
    s.engine
        .create_order(round(&s, vec![line(&s.soup, 1)]))
        .await
        .unwrap();

    let outcome = s
        .engine
        .reject_order(
            &id,
            RejectOrderRequest {
                waiter: "employee:w1".to_string(),
                reason: "Soup ran out".to_string(),
            },
        )
        .await
        .unwrap();
    assert!(!outcome.full);
    assert_eq!(outcome.order.status, OrderStatus::Served);
    assert_eq!(outcome.order.total, Decimal::from(36));

    s.payments.request_cash_payment(&id).await.unwrap();
    let settled = s
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

    assert_eq!(settled.status, OrderStatus::Completed);
    assert_eq!(settled.payment_status, PaymentStatus::Paid);
    assert_eq!(settled.total, Decimal::from(36));

    let table = table_state(&s).await;
    assert_eq!(table.status, TableStatus::Available);
    assert!(table.current_order.is_none());
}

#[tokio::test]
async fn card_settlement_closes_the_tab_early() {
    let s = stack().await;

    let order = s
        .engine
        .create_order(round(&s, vec![line(&s.salmon, 1), line(&s.soup, 2)]))
        .await
        .unwrap();
    let id = order.id.clone().unwrap().to_string();
    s.engine.accept_order(&id, waiter()).await.unwrap();

    let intent = s.payments.create_card_intent(&id).await.unwrap();
    assert_eq!(intent.client_secret, "pi_ORD-00001_secret");

    let settled = s
        .payments
        .confirm_card_payment("pi_ORD-00001")
        .await
        .unwrap();

    // Card capture settles the tab even though it was never SERVED
    assert_eq!(settled.status, OrderStatus::Completed);
    assert_eq!(settled.payment_status, PaymentStatus::Paid);
    assert!(settled.items.iter().all(|i| i.status == ItemStatus::Served));

    let table = table_state(&s).await;
    assert_eq!(table.status, TableStatus::Available);

    // The table is free for the next party
    let next = s
        .engine
        .create_order(round(&s, vec![line(&s.soup, 1)]))
        .await
        .unwrap();
    assert_eq!(next.order_number, "ORD-00002");
    assert_ne!(next.id, settled.id);
}
