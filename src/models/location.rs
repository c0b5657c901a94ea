use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use chrono::{DateTime, Utc};

use super::Warehouse;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: Uuid,
    pub code: String,
    pub description: Option<String>,
    pub warehouse_id: Uuid,
    pub created_at: DateTime<Utc>,
}

// Location as listed, with its owning warehouse embedded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationWithWarehouse {
    #[serde(flatten)]
    pub location: Location,
    pub warehouse: Warehouse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLocation {
    pub code: String,
    pub description: Option<String>,
    pub warehouse_id: Uuid,
}
