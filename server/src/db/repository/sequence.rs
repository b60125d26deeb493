//! Order number sequence
//!
//! Sequential order numbers with a fixed prefix, zero-padded to five
//! digits ("ORD-00042"). The counter lives in the database so numbers
//! survive restarts and never repeat.

use serde::Deserialize;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

use super::{BaseRepository, RepoError, RepoResult};

const COUNTER_TABLE: &str = "counter";
const ORDER_COUNTER: &str = "order_number";
const ORDER_PREFIX: &str = "ORD-";

#[derive(Debug, Deserialize)]
struct CounterRow {
    value: i64,
}

#[derive(Clone)]
pub struct SequenceRepository {
    base: BaseRepository,
}

impl SequenceRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Atomically advance the order counter and return the next number
    pub async fn next_order_number(&self) -> RepoResult<String> {
        let thing = RecordId::from_table_key(COUNTER_TABLE, ORDER_COUNTER);
        let rows: Vec<CounterRow> = self
            .base
            .db()
            .query("UPSERT $thing SET value = (value ?? 0) + 1 RETURN AFTER")
            .bind(("thing", thing))
            .await?
            .take(0)?;
        let value = rows
            .into_iter()
            .next()
            .map(|r| r.value)
            .ok_or_else(|| RepoError::Database("Order counter update returned nothing".into()))?;
        Ok(format!("{}{:05}", ORDER_PREFIX, value))
    }
}
