//! Menu item repository
//!
//! Read-only lookups for the engine, plus the best-effort popularity
//! counter increment used when an order completes.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{MenuItem, MenuItemStatus};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "menu_item";

#[derive(Clone)]
pub struct MenuItemRepository {
    base: BaseRepository,
}

impl MenuItemRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find menu item by id
    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<MenuItem>> {
        let item: Option<MenuItem> = self.base.db().select(id.clone()).await?;
        Ok(item)
    }

    /// Resolve an item for ordering: it must exist and be available
    pub async fn find_available(&self, id: &RecordId) -> RepoResult<MenuItem> {
        let item = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))?;
        if item.status != MenuItemStatus::Available {
            return Err(RepoError::NotFound(format!(
                "Menu item {} is not available",
                id
            )));
        }
        Ok(item)
    }

    /// Bump the lifetime ordered-quantity counter
    pub async fn increment_total_orders(&self, id: &RecordId, by: i64) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $thing SET total_orders += $by")
            .bind(("thing", id.clone()))
            .bind(("by", by))
            .await?;
        Ok(())
    }

    /// Seed helper for tests and fixtures
    pub async fn create(&self, item: MenuItem) -> RepoResult<MenuItem> {
        let created: Option<MenuItem> = self.base.db().create(TABLE).content(item).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create menu item".to_string()))
    }
}
