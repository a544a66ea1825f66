use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a dining table.
///
/// Tables with reservation history are archived rather than deleted so the
/// history keeps pointing at a real row; archived tables never appear in
/// availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableStatus {
    Active,
    Archived,
}

impl TableStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableStatus::Active => "active",
            TableStatus::Archived => "archived",
        }
    }
}

impl std::str::FromStr for TableStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(TableStatus::Active),
            "archived" => Ok(TableStatus::Archived),
            other => Err(format!("unknown table status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableType {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub capacity: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTable {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub table_type_id: Uuid,
    pub name: String,
    pub status: TableStatus,
    pub created_at: DateTime<Utc>,
}

/// A table joined with its type, the unit the availability resolver works on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableWithType {
    pub table: DiningTable,
    pub table_type: TableType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTableTypeRequest {
    pub name: String,
    pub capacity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTableRequest {
    pub name: String,
    pub table_type_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTableRequest {
    pub name: Option<String>,
    pub table_type_id: Option<Uuid>,
    pub status: Option<TableStatus>,
}

/// Outcome of a table delete: rows with history are archived instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteTableResponse {
    pub id: Uuid,
    pub deleted: bool,
    pub archived: bool,
}
