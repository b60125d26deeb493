//! Dining table repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::DiningTable;
use shared::order::TableStatus;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "dining_table";

#[derive(Clone)]
pub struct DiningTableRepository {
    base: BaseRepository,
}

impl DiningTableRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find table by id
    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<DiningTable>> {
        let table: Option<DiningTable> = self.base.db().select(id.clone()).await?;
        Ok(table)
    }

    /// Flip a table's occupancy and current-order back-reference.
    ///
    /// Only the order engine and payment reconciliation call this, at the
    /// two defined transition points (order open, payment settled).
    pub async fn set_status(
        &self,
        id: &RecordId,
        status: TableStatus,
        current_order: Option<RecordId>,
    ) -> RepoResult<DiningTable> {
        self.base
            .db()
            .query("UPDATE $thing SET status = $status, current_order = $current_order")
            .bind(("thing", id.clone()))
            .bind(("status", status))
            // Stored as a "table:id" string, matching the model serialization
            .bind(("current_order", current_order.map(|id| id.to_string())))
            .await?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Table {} not found", id)))
    }

    /// Seed helper for tests and fixtures
    pub async fn create(&self, table: DiningTable) -> RepoResult<DiningTable> {
        let created: Option<DiningTable> = self.base.db().create(TABLE).content(table).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create dining table".to_string()))
    }
}
