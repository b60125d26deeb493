//! Payment reconciliation
//!
//! Settlement is the only place besides order creation that touches the
//! table: a settled order always clears the table's cart and reverts the
//! table to `AVAILABLE`.
//!
//! Cash is two-phase: the customer requests, the waiter collects and
//! confirms. Cash confirmation advances the order to `COMPLETED` only when
//! it was already `SERVED`. Card confirmation completes the order from any
//! prior status once the provider reports capture; the two flows are
//! deliberately asymmetric, since the card capture is the provider's final
//! word while a cash confirm may arrive mid-service.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::json;

use shared::order::{
    CardIntentResponse, ConfirmCashRequest, OrderStatus, PaymentMethod, PaymentStatus, TableStatus,
    Topic, event,
};

use super::provider::{CardProvider, IntentStatus};
use crate::db::DbService;
use crate::db::models::Order;
use crate::db::repository::{CartRepository, DiningTableRepository, OrderRepository};
use crate::notify::Notifier;
use crate::orders::engine::cascade_items;
use crate::orders::{OrderError, OrderResult, TableLocks};

#[derive(Clone)]
pub struct PaymentService {
    orders: OrderRepository,
    tables: DiningTableRepository,
    carts: CartRepository,
    notifier: Notifier,
    locks: TableLocks,
    provider: Arc<dyn CardProvider>,
    currency: String,
}

impl PaymentService {
    pub fn new(
        db: &DbService,
        notifier: Notifier,
        locks: TableLocks,
        provider: Arc<dyn CardProvider>,
        currency: String,
    ) -> Self {
        Self {
            orders: OrderRepository::new(db.db.clone()),
            tables: DiningTableRepository::new(db.db.clone()),
            carts: CartRepository::new(db.db.clone()),
            notifier,
            locks,
            provider,
            currency,
        }
    }

    // ========== Cash ==========

    /// Customer asks to pay cash. Marks the order `PENDING_CASH` and pings
    /// the staff channel with the table number; nothing else moves until
    /// the waiter confirms.
    pub async fn request_cash_payment(&self, order_id: &str) -> OrderResult<Order> {
        let current = self.get_order(order_id).await?;
        let _lease = self.locks.acquire(&current.table.to_string()).await;
        let mut order = self.get_order(order_id).await?;

        self.ensure_payable(&order)?;

        order.payment_method = Some(PaymentMethod::Cash);
        order.payment_status = PaymentStatus::PendingCash;
        order.revision += 1;
        let saved = self.orders.save(&order).await?;

        tracing::info!(order = %saved.order_number, "Cash payment requested");
        self.notify_staff_with_table(&saved, event::CASH_REQUESTED)
            .await;
        Ok(saved)
    }

    /// Waiter collected the cash. Records the amounts, completes the order
    /// if it was served, and releases the table either way.
    pub async fn confirm_cash_payment(
        &self,
        order_id: &str,
        req: ConfirmCashRequest,
    ) -> OrderResult<Order> {
        let current = self.get_order(order_id).await?;
        let _lease = self.locks.acquire(&current.table.to_string()).await;
        let mut order = self.get_order(order_id).await?;

        if order.payment_status == PaymentStatus::Paid {
            return Err(OrderError::InvalidOperation(format!(
                "Order {} is already paid",
                order.order_number
            )));
        }
        if order.payment_status != PaymentStatus::PendingCash {
            return Err(OrderError::InvalidOperation(format!(
                "Cash payment was not requested for order {}",
                order.order_number
            )));
        }
        if req.amount_received < order.total {
            return Err(OrderError::Validation(format!(
                "Amount received {} is less than the total {}",
                req.amount_received, order.total
            )));
        }

        let now = Utc::now();
        order.payment_status = PaymentStatus::Paid;
        order.amount_received = Some(req.amount_received);
        order.tip_amount = req.tip_amount;
        order.paid_at = Some(now);
        // A tab paid mid-service keeps its kitchen status; only a served
        // tab is closed out here
        if order.status == OrderStatus::Served {
            order.status = OrderStatus::Completed;
            order.stamp(OrderStatus::Completed, now);
            cascade_items(&mut order, OrderStatus::Completed);
        }
        order.revision += 1;
        let saved = self.orders.save(&order).await?;

        self.release_table(&saved).await?;
        tracing::info!(
            order = %saved.order_number,
            amount = %req.amount_received,
            tip = %req.tip_amount,
            "Cash payment confirmed"
        );

        self.notify_table(&saved, event::PAYMENT_CONFIRMED);
        self.notify_staff_with_table(&saved, event::TABLE_PAYMENT_COMPLETED)
            .await;
        Ok(saved)
    }

    // ========== Card ==========

    /// Size a provider intent to the order total and hand back the client
    /// secret. A provider failure marks the payment `FAILED` and changes
    /// nothing else.
    pub async fn create_card_intent(&self, order_id: &str) -> OrderResult<CardIntentResponse> {
        let current = self.get_order(order_id).await?;
        let _lease = self.locks.acquire(&current.table.to_string()).await;
        let mut order = self.get_order(order_id).await?;

        self.ensure_payable(&order)?;

        let amount_minor = to_minor_units(order.total)?;
        match self
            .provider
            .create_intent(amount_minor, &self.currency, &order.order_number)
            .await
        {
            Ok(intent) => {
                order.payment_method = Some(PaymentMethod::Card);
                order.payment_intent_id = Some(intent.id);
                order.revision += 1;
                self.orders.save(&order).await?;
                tracing::info!(order = %order.order_number, "Card intent created");
                Ok(CardIntentResponse {
                    client_secret: intent.client_secret,
                })
            }
            Err(e) => {
                order.payment_status = PaymentStatus::Failed;
                order.revision += 1;
                if let Err(save_err) = self.orders.save(&order).await {
                    tracing::error!(
                        order = %order.order_number,
                        error = %save_err,
                        "Failed to record provider failure"
                    );
                }
                Err(e)
            }
        }
    }

    /// Settle a card payment once the provider reports capture.
    ///
    /// Completes the order regardless of its prior status. A confirmed
    /// intent re-confirmed (webhook retry) returns the settled order
    /// unchanged.
    pub async fn confirm_card_payment(&self, intent_id: &str) -> OrderResult<Order> {
        let current = self
            .orders
            .find_by_intent(intent_id)
            .await?
            .ok_or_else(|| {
                OrderError::NotFound(format!("No order for payment intent {}", intent_id))
            })?;
        let _lease = self.locks.acquire(&current.table.to_string()).await;
        let order_id = current
            .id
            .as_ref()
            .map(|id| id.to_string())
            .ok_or_else(|| OrderError::NotFound("Order has no id".to_string()))?;
        let mut order = self.get_order(&order_id).await?;

        if order.payment_status == PaymentStatus::Paid {
            return Ok(order);
        }

        match self.provider.intent_status(intent_id).await? {
            IntentStatus::Succeeded => {
                let now = Utc::now();
                order.payment_status = PaymentStatus::Paid;
                order.paid_at = Some(now);
                order.status = OrderStatus::Completed;
                order.stamp(OrderStatus::Completed, now);
                cascade_items(&mut order, OrderStatus::Completed);
                order.revision += 1;
                let saved = self.orders.save(&order).await?;

                self.release_table(&saved).await?;
                tracing::info!(order = %saved.order_number, "Card payment settled");

                self.notify_table(&saved, event::PAYMENT_CONFIRMED);
                self.notify_staff_with_table(&saved, event::TABLE_PAYMENT_COMPLETED)
                    .await;
                Ok(saved)
            }
            IntentStatus::Processing => Err(OrderError::InvalidOperation(format!(
                "Payment for order {} has not been captured yet",
                order.order_number
            ))),
            IntentStatus::Failed => {
                order.payment_status = PaymentStatus::Failed;
                order.revision += 1;
                self.orders.save(&order).await?;
                tracing::warn!(order = %order.order_number, "Card payment failed");
                Err(OrderError::PaymentProvider(format!(
                    "Payment for order {} failed",
                    order.order_number
                )))
            }
        }
    }

    // ========== Internals ==========

    async fn get_order(&self, id: &str) -> OrderResult<Order> {
        self.orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| OrderError::NotFound(format!("Order {} not found", id)))
    }

    fn ensure_payable(&self, order: &Order) -> OrderResult<()> {
        if order.payment_status == PaymentStatus::Paid {
            return Err(OrderError::InvalidOperation(format!(
                "Order {} is already paid",
                order.order_number
            )));
        }
        if matches!(
            order.status,
            OrderStatus::Rejected | OrderStatus::Cancelled
        ) {
            return Err(OrderError::InvalidOperation(format!(
                "Order {} is {:?} and cannot be paid",
                order.order_number, order.status
            )));
        }
        Ok(())
    }

    /// Settlement cleanup: drop the cart (best-effort) and free the table
    async fn release_table(&self, order: &Order) -> OrderResult<()> {
        if let Err(e) = self.carts.delete_by_table(&order.table).await {
            tracing::warn!(table = %order.table, error = %e, "Failed to clear cart on settlement");
        }
        self.tables
            .set_status(&order.table, TableStatus::Available, None)
            .await?;
        Ok(())
    }

    fn notify_table(&self, order: &Order, notice: &str) {
        let topic = Topic::Table {
            table: order.table.to_string(),
        };
        self.notifier.publish(
            &topic,
            notice,
            json!({
                "order_number": order.order_number,
                "status": order.status,
                "payment_status": order.payment_status,
                "payment_method": order.payment_method,
                "total": order.total,
                "tip_amount": order.tip_amount,
            }),
        );
    }

    /// Staff notifications carry the physical table number; a failed table
    /// lookup is logged and the notification skipped, settlement never
    /// depends on it
    async fn notify_staff_with_table(&self, order: &Order, notice: &str) {
        let table_number = match self.tables.find_by_id(&order.table).await {
            Ok(Some(table)) => Some(table.number),
            Ok(None) => {
                tracing::warn!(table = %order.table, "Table missing, staff notification skipped");
                return;
            }
            Err(e) => {
                tracing::warn!(table = %order.table, error = %e, "Table lookup failed, staff notification skipped");
                return;
            }
        };
        let topic = Topic::Staff {
            restaurant: order.restaurant.to_string(),
        };
        self.notifier.publish(
            &topic,
            notice,
            json!({
                "order_number": order.order_number,
                "table_number": table_number,
                "payment_status": order.payment_status,
                "total": order.total,
            }),
        );
    }
}

fn to_minor_units(total: Decimal) -> OrderResult<i64> {
    (total * Decimal::from(100))
        .round()
        .to_i64()
        .ok_or_else(|| OrderError::Validation(format!("Total {} cannot be charged", total)))
}
