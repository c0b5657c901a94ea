use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Insufficient quantity")]
    InsufficientQuantity,

    #[error("Source and destination cannot be the same")]
    InvalidTransfer,

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} already exists")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::InsufficientQuantity
            | AppError::InvalidTransfer => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Constraint names come from migrations/20250101000000_init.sql
fn unique_subject(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("warehouses_code_key") => "Warehouse with this code",
        Some("locations_code_warehouse_id_key") => "Location with this code in the warehouse",
        Some("items_sku_key") => "Item with this SKU",
        _ => "Record",
    }
}

fn reference_subject(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("locations_warehouse_id_fkey") => "Warehouse",
        Some("inventory_item_id_fkey") | Some("movements_item_id_fkey") => "Item",
        Some("inventory_location_id_fkey")
        | Some("movements_from_location_id_fkey")
        | Some("movements_to_location_id_fkey") => "Location",
        _ => "Referenced record",
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint();
            match db_err.code().as_deref() {
                Some("23505") => return AppError::Conflict(unique_subject(constraint).to_string()),
                Some("23503") => return AppError::NotFound(reference_subject(constraint).to_string()),
                Some("22003") => return AppError::Validation("Quantity out of range".to_string()),
                _ => {}
            }
        }
        AppError::Database(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Database(err) => {
                log::error!("Storage failure: {}", err);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
