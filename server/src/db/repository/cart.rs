//! Cart repository
//!
//! The write path enforces the cart key invariant: a cart must be owned by
//! a session or a customer. Carts idle for longer than the expiry window
//! are removed by the background sweep.

use chrono::{TimeDelta, Utc};

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::Cart;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "cart";

#[derive(Clone)]
pub struct CartRepository {
    base: BaseRepository,
}

impl CartRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find the cart for a table
    pub async fn find_by_table(&self, table: &RecordId) -> RepoResult<Option<Cart>> {
        let carts: Vec<Cart> = self
            .base
            .db()
            .query("SELECT * FROM cart WHERE table = $table LIMIT 1")
            // Record links are persisted as "table:id" strings
            .bind(("table", table.to_string()))
            .await?
            .take(0)?;
        Ok(carts.into_iter().next())
    }

    /// Find the cart for a session
    pub async fn find_by_session(&self, session_id: &str) -> RepoResult<Option<Cart>> {
        let carts: Vec<Cart> = self
            .base
            .db()
            // $session is a protected built-in variable in SurrealDB
            .query("SELECT * FROM cart WHERE session_id = $sid LIMIT 1")
            .bind(("sid", session_id.to_string()))
            .await?
            .take(0)?;
        Ok(carts.into_iter().next())
    }

    /// Find the cart for a customer
    pub async fn find_by_customer(&self, customer: &RecordId) -> RepoResult<Option<Cart>> {
        let carts: Vec<Cart> = self
            .base
            .db()
            .query("SELECT * FROM cart WHERE customer = $customer LIMIT 1")
            .bind(("customer", customer.to_string()))
            .await?
            .take(0)?;
        Ok(carts.into_iter().next())
    }

    /// Persist a new cart
    pub async fn create(&self, cart: Cart) -> RepoResult<Cart> {
        if !cart.has_owner() {
            return Err(RepoError::Validation(
                "Cart requires a session or customer".to_string(),
            ));
        }
        let created: Option<Cart> = self.base.db().create(TABLE).content(cart).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create cart".to_string()))
    }

    /// Replace a cart document, refreshing its activity timestamp
    pub async fn save(&self, cart: &Cart) -> RepoResult<Cart> {
        if !cart.has_owner() {
            return Err(RepoError::Validation(
                "Cart requires a session or customer".to_string(),
            ));
        }
        let thing = cart
            .id
            .clone()
            .ok_or_else(|| RepoError::Validation("Cart has no id".to_string()))?;
        let mut doc = cart.clone();
        doc.id = None;
        doc.updated_at = Utc::now();
        let updated: Option<Cart> = self.base.db().update(thing).content(doc).await?;
        updated.ok_or_else(|| RepoError::NotFound("Cart not found".to_string()))
    }

    /// Remove every cart attached to a table. The order engine calls this
    /// after a successful order save so cart and order never both hold the
    /// same items.
    pub async fn delete_by_table(&self, table: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query("DELETE cart WHERE table = $table")
            .bind(("table", table.to_string()))
            .await?;
        Ok(())
    }

    /// Delete carts idle for longer than `ttl`. Returns the number removed.
    pub async fn delete_expired(&self, ttl: TimeDelta) -> RepoResult<usize> {
        let cutoff = Utc::now() - ttl;
        let deleted: Vec<Cart> = self
            .base
            .db()
            .query("DELETE cart WHERE updated_at < $cutoff RETURN BEFORE")
            .bind(("cutoff", cutoff))
            .await?
            .take(0)?;
        Ok(deleted.len())
    }
}
