//! Dining table model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use shared::order::TableStatus;

use super::serde_helpers;

/// Dining table entity
///
/// The order engine mutates a table at exactly two points: occupation when
/// a tab opens, release when payment settles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTable {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub number: i32,
    #[serde(default)]
    pub capacity: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub status: TableStatus,
    /// Back-reference to the currently open order, if any
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub current_order: Option<RecordId>,
}
