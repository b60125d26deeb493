//! Database module
//!
//! Embedded SurrealDB: RocksDB-backed on disk in production, in-memory for
//! tests. Whole documents are read and written; there is no partial-update
//! change tracking, so mutations reassign the aggregate and persist it.

pub mod models;
pub mod repository;

use std::path::Path;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use crate::utils::AppError;

const NAMESPACE: &str = "dinein";
const DATABASE: &str = "dinein";

/// Database service, owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk database
    pub async fn new(db_path: &Path) -> Result<Self, AppError> {
        let db: Surreal<Db> = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database: {e}")))?;
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::Database(format!("Failed to select namespace: {e}")))?;

        tracing::info!(path = %db_path.display(), "Database opened (SurrealDB/RocksDB)");
        Ok(Self { db })
    }

    /// Open an in-memory database (tests only)
    pub async fn in_memory() -> Result<Self, AppError> {
        let db: Surreal<Db> = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::Database(format!("Failed to open in-memory db: {e}")))?;
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::Database(format!("Failed to select namespace: {e}")))?;
        Ok(Self { db })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn opens_an_on_disk_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db");

        let service = DbService::new(&path).await.unwrap();
        let created: Option<serde_json::Value> = service
            .db
            .create(("probe", "one"))
            .content(serde_json::json!({ "ok": true }))
            .await
            .unwrap();
        assert!(created.is_some());

        let found: Option<serde_json::Value> = service.db.select(("probe", "one")).await.unwrap();
        assert!(found.is_some());
    }
}
