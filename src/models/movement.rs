use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use chrono::{DateTime, Utc};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementType {
    Placement,
    Retrieval,
    Transfer,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Placement => "PLACEMENT",
            MovementType::Retrieval => "RETRIEVAL",
            MovementType::Transfer => "TRANSFER",
        }
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown movement type: {0}")]
pub struct UnknownMovementType(pub String);

impl TryFrom<String> for MovementType {
    type Error = UnknownMovementType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "PLACEMENT" => Ok(MovementType::Placement),
            "RETRIEVAL" => Ok(MovementType::Retrieval),
            "TRANSFER" => Ok(MovementType::Transfer),
            _ => Err(UnknownMovementType(value)),
        }
    }
}

/// Audit record of a single placement, retrieval or transfer. Never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    pub id: Uuid,
    #[serde(rename = "type")]
    #[sqlx(try_from = "String")]
    pub movement_type: MovementType,
    pub item_id: Uuid,
    pub from_location_id: Option<Uuid>,
    pub to_location_id: Option<Uuid>,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
}

impl Movement {
    pub fn placement(item_id: Uuid, location_id: Uuid, quantity: i64) -> Self {
        Self::new(MovementType::Placement, item_id, None, Some(location_id), quantity)
    }

    pub fn retrieval(item_id: Uuid, location_id: Uuid, quantity: i64) -> Self {
        Self::new(MovementType::Retrieval, item_id, Some(location_id), None, quantity)
    }

    pub fn transfer(item_id: Uuid, from: Uuid, to: Uuid, quantity: i64) -> Self {
        Self::new(MovementType::Transfer, item_id, Some(from), Some(to), quantity)
    }

    fn new(
        movement_type: MovementType,
        item_id: Uuid,
        from_location_id: Option<Uuid>,
        to_location_id: Option<Uuid>,
        quantity: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            movement_type,
            item_id,
            from_location_id,
            to_location_id,
            quantity,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementQuery {
    pub item_id: Option<Uuid>,
    pub limit: Option<i64>,
}
