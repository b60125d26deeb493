//! Order repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::Order;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// List orders, newest first
    pub async fn find_all(&self, limit: i64, offset: i64) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order ORDER BY ordered_at DESC LIMIT $limit START $offset")
            .bind(("limit", limit))
            .bind(("offset", offset))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid order ID: {}", id)))?;
        let order: Option<Order> = self.base.db().select(thing).await?;
        Ok(order)
    }

    /// Find the mergeable order for a table: payment still pending and the
    /// status has not reached a terminal state. At most one such order
    /// exists per table; this lookup is the only creation gate.
    pub async fn find_mergeable_for_table(&self, table: &RecordId) -> RepoResult<Option<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query(
                "SELECT * FROM order WHERE table = $table \
                 AND payment_status = 'PENDING' \
                 AND status IN ['PENDING', 'ACCEPTED', 'PREPARING', 'READY', 'SERVED'] \
                 ORDER BY ordered_at ASC LIMIT 1",
            )
            // Record links are persisted as "table:id" strings
            .bind(("table", table.to_string()))
            .await?
            .take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Find an unsettled order for a table (any payment status). Used by
    /// the active-order view.
    pub async fn find_active_for_table(&self, table: &RecordId) -> RepoResult<Option<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query(
                "SELECT * FROM order WHERE table = $table \
                 AND status NOT IN ['COMPLETED', 'REJECTED', 'CANCELLED'] \
                 ORDER BY ordered_at ASC LIMIT 1",
            )
            .bind(("table", table.to_string()))
            .await?
            .take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Find the order holding a card payment intent
    pub async fn find_by_intent(&self, intent_id: &str) -> RepoResult<Option<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE payment_intent_id = $intent LIMIT 1")
            .bind(("intent", intent_id.to_string()))
            .await?
            .take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Persist a new order
    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Replace the whole aggregate. The items list and totals are always
    /// written together so the money invariant can never be half-persisted.
    pub async fn save(&self, order: &Order) -> RepoResult<Order> {
        let thing = order
            .id
            .clone()
            .ok_or_else(|| RepoError::Validation("Order has no id".to_string()))?;
        // SurrealDB rejects content that carries a changed id field
        let mut doc = order.clone();
        doc.id = None;
        let updated: Option<Order> = self.base.db().update(thing).content(doc).await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Order {} not found", order.order_number)))
    }

    /// Hard delete (explicit admin operation only)
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid order ID: {}", id)))?;
        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }
}
