//! Order engine
//!
//! Owns the order lifecycle: open/merge, waiter approval (accept/reject
//! with partial rejection), kitchen status progression with the item
//! cascade, and admin removal. Every mutation runs under the table's lease
//! and ends with a full-document save followed by fire-and-forget
//! notifications.

use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use surrealdb::RecordId;
use validator::Validate;

use shared::order::{
    AcceptOrderRequest, CreateOrderRequest, ItemStatus, ModifierSelectionInput, OrderItemInput,
    OrderStatus, RejectOrderRequest, TableStatus, Topic, event,
};

use super::error::{OrderError, OrderResult};
use super::locks::TableLocks;
use super::money;
use crate::db::DbService;
use crate::db::models::{MenuItem, ModifierOption, ModifierSelection, Order, OrderItem};
use crate::db::repository::{
    CartRepository, DiningTableRepository, MenuItemRepository, OrderRepository, SequenceRepository,
};
use crate::notify::Notifier;

/// Result of a reject call: full rejection kills the order, partial
/// rejection drops only the pending items and the tab proceeds.
#[derive(Debug, serde::Serialize)]
pub struct RejectOutcome {
    pub order: Order,
    pub full: bool,
    /// Names of the items that were rejected by this call
    pub rejected_items: Vec<String>,
}

#[derive(Clone)]
pub struct OrderEngine {
    orders: OrderRepository,
    tables: DiningTableRepository,
    menu_items: MenuItemRepository,
    carts: CartRepository,
    sequences: SequenceRepository,
    notifier: Notifier,
    locks: TableLocks,
}

impl OrderEngine {
    pub fn new(db: &DbService, notifier: Notifier, locks: TableLocks) -> Self {
        Self {
            orders: OrderRepository::new(db.db.clone()),
            tables: DiningTableRepository::new(db.db.clone()),
            menu_items: MenuItemRepository::new(db.db.clone()),
            carts: CartRepository::new(db.db.clone()),
            sequences: SequenceRepository::new(db.db.clone()),
            notifier,
            locks,
        }
    }

    // ========== Reads ==========

    pub async fn get_order(&self, id: &str) -> OrderResult<Order> {
        self.orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| OrderError::NotFound(format!("Order {} not found", id)))
    }

    pub async fn list_orders(&self, limit: i64, offset: i64) -> OrderResult<Vec<Order>> {
        Ok(self.orders.find_all(limit, offset).await?)
    }

    /// The unsettled order currently attached to a table, if any
    pub async fn active_order_for_table(&self, table_id: &str) -> OrderResult<Order> {
        let table = parse_record(table_id, "table")?;
        self.orders
            .find_active_for_table(&table)
            .await?
            .ok_or_else(|| OrderError::NotFound(format!("No active order for table {}", table_id)))
    }

    // ========== Create / merge ==========

    /// Open a new order for a table, or merge a new submission round into
    /// the table's open order.
    ///
    /// All menu items are resolved and snapshot-priced before any write, so
    /// an unavailable item fails the whole call without side effects. The
    /// merge path appends the new lines and drops the order back to
    /// `PENDING` for re-approval; item-level statuses are untouched. The
    /// table's cart is cleared only after the successful save.
    pub async fn create_order(&self, req: CreateOrderRequest) -> OrderResult<Order> {
        req.validate()
            .map_err(|e| OrderError::Validation(e.to_string()))?;
        let restaurant = parse_record(&req.restaurant, "restaurant")?;
        let table_id = parse_record(&req.table, "table")?;
        let customer = match &req.customer {
            Some(raw) => Some(parse_record(raw, "customer")?),
            None => None,
        };

        let _lease = self.locks.acquire(&table_id.to_string()).await;

        let table = self
            .tables
            .find_by_id(&table_id)
            .await?
            .ok_or_else(|| OrderError::NotFound(format!("Table {} not found", table_id)))?;

        let new_items = self.build_items(&req.items).await?;

        let order = match self.orders.find_mergeable_for_table(&table_id).await? {
            Some(mut existing) => {
                existing.items.extend(new_items);
                // A new round reopens the approval gate
                existing.status = OrderStatus::Pending;
                if existing.guest_name.is_none() {
                    existing.guest_name = req.guest_name.clone();
                }
                money::recalculate_totals(&mut existing);
                existing.revision += 1;
                let saved = self.orders.save(&existing).await?;
                tracing::info!(
                    order = %saved.order_number,
                    table = table.number,
                    items = saved.items.len(),
                    "Merged new round into open order"
                );
                saved
            }
            None => {
                let order_number = self.sequences.next_order_number().await?;
                let mut order = Order::new(
                    order_number,
                    restaurant,
                    table_id.clone(),
                    customer,
                    req.guest_name.clone(),
                    new_items,
                );
                money::recalculate_totals(&mut order);
                let saved = self.orders.create(order).await?;
                self.tables
                    .set_status(&table_id, TableStatus::Occupied, saved.id.clone())
                    .await?;
                tracing::info!(
                    order = %saved.order_number,
                    table = table.number,
                    total = %saved.total,
                    "Opened order"
                );
                saved
            }
        };

        // Best-effort: the order is already persisted, a stale cart must
        // not fail the submission
        if let Err(e) = self.carts.delete_by_table(&table_id).await {
            tracing::warn!(table = %table_id, error = %e, "Failed to clear cart after order save");
        }

        self.notify_staff(&order, event::ORDER_UPDATE);
        self.notify_order_channels(&order, event::ORDER_UPDATE, order_payload(&order));
        Ok(order)
    }

    // ========== Approval ==========

    /// Waiter accepts a pending order. Legal only from `PENDING`; a second
    /// accept fails `InvalidState` and changes nothing.
    pub async fn accept_order(&self, id: &str, req: AcceptOrderRequest) -> OrderResult<Order> {
        let waiter = parse_record(&req.waiter, "waiter")?;
        let current = self.get_order(id).await?;
        let _lease = self.locks.acquire(&current.table.to_string()).await;
        let mut order = self.get_order(id).await?;

        if order.status != OrderStatus::Pending {
            return Err(OrderError::InvalidState {
                from: order.status,
                to: OrderStatus::Accepted,
            });
        }

        order.status = OrderStatus::Accepted;
        order.waiter = Some(waiter);
        order.stamp(OrderStatus::Accepted, Utc::now());
        order.revision += 1;
        let saved = self.orders.save(&order).await?;

        tracing::info!(order = %saved.order_number, waiter = %req.waiter, "Order accepted");
        self.notify_order_channels(&saved, event::ORDER_UPDATE, order_payload(&saved));
        self.notify_staff(&saved, event::ORDER_UPDATE);
        Ok(saved)
    }

    /// Waiter rejects the pending items of an order.
    ///
    /// Items already with the kitchen or on the table are never rejected.
    /// When nothing is pending the call fails `InvalidOperation`; when
    /// nothing is working the whole order is rejected; otherwise the
    /// pending items are rejected individually, totals are recomputed over
    /// the survivors and the tab is forced to `SERVED` so it proceeds to
    /// payment.
    pub async fn reject_order(
        &self,
        id: &str,
        req: RejectOrderRequest,
    ) -> OrderResult<RejectOutcome> {
        req.validate()
            .map_err(|e| OrderError::Validation(e.to_string()))?;
        let waiter = parse_record(&req.waiter, "waiter")?;
        let current = self.get_order(id).await?;
        let _lease = self.locks.acquire(&current.table.to_string()).await;
        let mut order = self.get_order(id).await?;

        if order.status.is_terminal() {
            return Err(OrderError::InvalidState {
                from: order.status,
                to: OrderStatus::Rejected,
            });
        }

        let rejected_items: Vec<String> = order
            .items
            .iter()
            .filter(|item| item.status == ItemStatus::Pending)
            .map(|item| item.name.clone())
            .collect();
        if rejected_items.is_empty() {
            return Err(OrderError::InvalidOperation(
                "No pending items to reject".to_string(),
            ));
        }
        let has_working = order
            .items
            .iter()
            .any(|item| item.status.rank().is_some_and(|rank| rank > 0));

        let now = Utc::now();
        order.waiter = Some(waiter);

        let full = !has_working;
        if full {
            // Order-level rejection: items and totals stay as ordered, so
            // the receipt still shows what was asked for
            order.status = OrderStatus::Rejected;
            order.rejection_reason = Some(req.reason.clone());
            order.stamp(OrderStatus::Rejected, now);
        } else {
            for item in order
                .items
                .iter_mut()
                .filter(|item| item.status == ItemStatus::Pending)
            {
                item.status = ItemStatus::Rejected;
                item.rejection_reason = Some(req.reason.clone());
                item.rejected_at = Some(now);
            }
            money::recalculate_totals(&mut order);
            // The survivors are already with the kitchen or on the table;
            // the tab moves straight on to payment
            order.status = OrderStatus::Served;
            order.stamp(OrderStatus::Served, now);
        }
        order.revision += 1;
        let saved = self.orders.save(&order).await?;

        tracing::info!(
            order = %saved.order_number,
            full,
            rejected = rejected_items.len(),
            reason = %req.reason,
            "Order items rejected"
        );

        let data = json!({
            "order_number": saved.order_number,
            "reason": req.reason,
            "rejected_items": rejected_items,
            "status": saved.status,
            "total": saved.total,
        });
        let notice = if full {
            event::ORDER_REJECTED
        } else {
            event::ORDER_PARTIALLY_REJECTED
        };
        self.notify_order_channels(&saved, notice, data);
        self.notify_staff(&saved, event::ORDER_UPDATE);

        Ok(RejectOutcome {
            order: saved,
            full,
            rejected_items,
        })
    }

    // ========== Status progression ==========

    /// Move an order along the status pipeline.
    ///
    /// `PENDING` and `REJECTED` are unreachable from here; they belong to
    /// creation and the reject call. Every other edge is checked against
    /// the transition table. Reaching `READY`/`SERVED`/`COMPLETED` drags
    /// items still in the kitchen pipeline forward (never backwards, never
    /// touching rejected lines); `COMPLETED` also bumps the popularity
    /// counters in the background.
    pub async fn update_status(&self, id: &str, target: OrderStatus) -> OrderResult<Order> {
        if matches!(target, OrderStatus::Pending | OrderStatus::Rejected) {
            return Err(OrderError::InvalidOperation(format!(
                "Status {:?} cannot be set through the status endpoint",
                target
            )));
        }
        let current = self.get_order(id).await?;
        let _lease = self.locks.acquire(&current.table.to_string()).await;
        let mut order = self.get_order(id).await?;

        if !order.status.can_transition_to(target) {
            return Err(OrderError::InvalidState {
                from: order.status,
                to: target,
            });
        }

        order.status = target;
        order.stamp(target, Utc::now());
        cascade_items(&mut order, target);
        order.revision += 1;
        let saved = self.orders.save(&order).await?;

        tracing::info!(order = %saved.order_number, status = ?target, "Order status updated");

        if target == OrderStatus::Completed {
            self.spawn_popularity_updates(&saved);
        }

        self.notify_order_channels(&saved, event::ORDER_UPDATE, order_payload(&saved));
        self.notify_staff(&saved, event::ORDER_UPDATE);
        Ok(saved)
    }

    // ========== Admin ==========

    /// Hard-delete an order, freeing the table if it still points at it
    pub async fn delete_order(&self, id: &str) -> OrderResult<()> {
        let order = self.get_order(id).await?;
        let _lease = self.locks.acquire(&order.table.to_string()).await;

        if let Some(table) = self.tables.find_by_id(&order.table).await? {
            let points_here = match (&table.current_order, &order.id) {
                (Some(current), Some(own)) => current == own,
                _ => false,
            };
            if points_here {
                if let Some(table_id) = &table.id {
                    self.tables
                        .set_status(table_id, TableStatus::Available, None)
                        .await?;
                }
            }
        }

        self.orders.delete(id).await?;
        tracing::info!(order = %order.order_number, "Order deleted");
        Ok(())
    }

    // ========== Internals ==========

    /// Resolve and snapshot-price every requested line before any write
    async fn build_items(&self, inputs: &[OrderItemInput]) -> OrderResult<Vec<OrderItem>> {
        let mut items = Vec::with_capacity(inputs.len());
        for input in inputs {
            let menu_ref = parse_record(&input.menu_item, "menu item")?;
            let menu_item = self.menu_items.find_available(&menu_ref).await?;
            let modifiers = resolve_modifiers(&menu_item, &input.modifiers)?;
            let mut item = OrderItem {
                menu_item: menu_ref,
                name: menu_item.name.clone(),
                price: menu_item.price,
                quantity: input.quantity,
                modifiers,
                special_instructions: input.special_instructions.clone(),
                subtotal: Decimal::ZERO,
                status: ItemStatus::Pending,
                rejection_reason: None,
                rejected_at: None,
            };
            item.recompute_subtotal();
            items.push(item);
        }
        Ok(items)
    }

    fn spawn_popularity_updates(&self, order: &Order) {
        let repo = self.menu_items.clone();
        let order_number = order.order_number.clone();
        let counts: Vec<(RecordId, i64)> = order
            .items
            .iter()
            .filter(|item| item.status != ItemStatus::Rejected)
            .map(|item| (item.menu_item.clone(), i64::from(item.quantity)))
            .collect();
        tokio::spawn(async move {
            for (menu_item, quantity) in counts {
                if let Err(e) = repo.increment_total_orders(&menu_item, quantity).await {
                    tracing::warn!(
                        order = %order_number,
                        item = %menu_item,
                        error = %e,
                        "Failed to bump popularity counter"
                    );
                }
            }
        });
    }

    fn notify_staff(&self, order: &Order, notice: &str) {
        let topic = Topic::Staff {
            restaurant: order.restaurant.to_string(),
        };
        self.notifier.publish(&topic, notice, order_payload(order));
    }

    fn notify_order_channels(&self, order: &Order, notice: &str, data: Value) {
        let table_topic = Topic::Table {
            table: order.table.to_string(),
        };
        self.notifier.publish(&table_topic, notice, data.clone());
        if let Some(id) = &order.id {
            let order_topic = Topic::Order {
                order: id.to_string(),
            };
            self.notifier.publish(&order_topic, notice, data);
        }
    }
}

/// Standard payload for order lifecycle events
fn order_payload(order: &Order) -> Value {
    json!({
        "id": order.id.as_ref().map(|id| id.to_string()),
        "order_number": order.order_number,
        "status": order.status,
        "payment_status": order.payment_status,
        "subtotal": order.subtotal,
        "total": order.total,
        "revision": order.revision,
    })
}

/// Drag items still in the kitchen pipeline up to the floor implied by the
/// order-level status. Forward-only; rejected and served lines are never
/// touched.
pub(crate) fn cascade_items(order: &mut Order, target: OrderStatus) {
    let floor = match target {
        OrderStatus::Ready => ItemStatus::Ready,
        OrderStatus::Served | OrderStatus::Completed => ItemStatus::Served,
        _ => return,
    };
    let Some(floor_rank) = floor.rank() else {
        return;
    };
    for item in &mut order.items {
        if let Some(rank) = item.status.rank() {
            if rank < floor_rank {
                item.status = floor;
            }
        }
    }
}

/// Match each requested modifier group/option against the menu item and
/// snapshot the price adjustments
pub(crate) fn resolve_modifiers(
    menu_item: &MenuItem,
    inputs: &[ModifierSelectionInput],
) -> OrderResult<Vec<ModifierSelection>> {
    let mut selections = Vec::with_capacity(inputs.len());
    for input in inputs {
        let group = menu_item
            .modifiers
            .iter()
            .find(|g| g.name == input.name)
            .ok_or_else(|| {
                OrderError::Validation(format!(
                    "Menu item {} has no modifier group {}",
                    menu_item.name, input.name
                ))
            })?;
        let mut options = Vec::with_capacity(input.options.len());
        for wanted in &input.options {
            let option = group
                .options
                .iter()
                .find(|o| o.name == wanted.name)
                .ok_or_else(|| {
                    OrderError::Validation(format!(
                        "Modifier group {} has no option {}",
                        group.name, wanted.name
                    ))
                })?;
            options.push(ModifierOption {
                name: option.name.clone(),
                price_adjustment: option.price_adjustment,
            });
        }
        selections.push(ModifierSelection {
            name: group.name.clone(),
            options,
        });
    }
    Ok(selections)
}

pub(crate) fn parse_record(raw: &str, what: &str) -> OrderResult<RecordId> {
    raw.parse()
        .map_err(|_| OrderError::Validation(format!("Invalid {} id: {}", what, raw)))
}
