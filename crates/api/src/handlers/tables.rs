use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tably_core::{
    errors::BookingError,
    models::table::{
        CreateTableRequest, CreateTableTypeRequest, DeleteTableResponse, DiningTable, TableType,
        TableWithType, UpdateTableRequest,
    },
};
use tably_db::repositories::table::TableRemoval;
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

#[axum::debug_handler]
pub async fn create_table_type(
    State(state): State<Arc<ApiState>>,
    Path(restaurant_id): Path<Uuid>,
    Json(payload): Json<CreateTableTypeRequest>,
) -> Result<Json<TableType>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError(BookingError::Validation(
            "Table type name must not be empty".to_string(),
        )));
    }
    if payload.capacity < 1 {
        return Err(AppError(BookingError::Validation(
            "Capacity must be at least 1".to_string(),
        )));
    }

    let table_type = tably_db::repositories::table::create_table_type(
        &state.db_pool,
        restaurant_id,
        payload.name.trim(),
        payload.capacity,
    )
    .await
    .map_err(BookingError::Database)?;

    Ok(Json(table_type.into_model()))
}

#[axum::debug_handler]
pub async fn list_table_types(
    State(state): State<Arc<ApiState>>,
    Path(restaurant_id): Path<Uuid>,
) -> Result<Json<Vec<TableType>>, AppError> {
    let table_types =
        tably_db::repositories::table::get_table_types_by_restaurant(&state.db_pool, restaurant_id)
            .await
            .map_err(BookingError::Database)?;

    Ok(Json(
        table_types.into_iter().map(|t| t.into_model()).collect(),
    ))
}

#[axum::debug_handler]
pub async fn delete_table_type(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    // Friendly pre-check; the FK RESTRICT backs it up either way
    let in_use = tably_db::repositories::table::count_tables_for_type(&state.db_pool, id)
        .await
        .map_err(BookingError::Database)?;

    if in_use > 0 {
        return Err(AppError(BookingError::Validation(format!(
            "Table type is still used by {} table(s)",
            in_use
        ))));
    }

    let deleted = tably_db::repositories::table::delete_table_type(&state.db_pool, id)
        .await
        .map_err(BookingError::Database)?;

    if !deleted {
        return Err(AppError(BookingError::NotFound(format!(
            "Table type with ID {} not found",
            id
        ))));
    }

    Ok(Json(serde_json::json!({ "id": id, "deleted": true })))
}

#[axum::debug_handler]
pub async fn create_table(
    State(state): State<Arc<ApiState>>,
    Path(restaurant_id): Path<Uuid>,
    Json(payload): Json<CreateTableRequest>,
) -> Result<Json<DiningTable>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError(BookingError::Validation(
            "Table name must not be empty".to_string(),
        )));
    }

    // The type must exist and belong to this restaurant
    let table_type =
        tably_db::repositories::table::get_table_type_by_id(&state.db_pool, payload.table_type_id)
            .await
            .map_err(BookingError::Database)?
            .ok_or_else(|| {
                BookingError::NotFound(format!(
                    "Table type with ID {} not found",
                    payload.table_type_id
                ))
            })?;

    if table_type.restaurant_id != restaurant_id {
        return Err(AppError(BookingError::Validation(
            "Table type belongs to a different restaurant".to_string(),
        )));
    }

    let created = tably_db::repositories::table::create_table(
        &state.db_pool,
        restaurant_id,
        payload.table_type_id,
        payload.name.trim(),
    )
    .await;

    let table = match created {
        Ok(table) => table,
        Err(e) if tably_db::constraint_name(&e) == Some("uniq_active_table_name") => {
            return Err(AppError(BookingError::Validation(format!(
                "An active table named {} already exists",
                payload.name.trim()
            ))));
        }
        Err(e) => return Err(AppError(BookingError::Database(e))),
    };

    Ok(Json(table.into_model().map_err(BookingError::Database)?))
}

#[derive(Debug, Deserialize)]
pub struct ListTablesQuery {
    pub include_archived: Option<bool>,
}

#[axum::debug_handler]
pub async fn list_tables(
    State(state): State<Arc<ApiState>>,
    Path(restaurant_id): Path<Uuid>,
    Query(query): Query<ListTablesQuery>,
) -> Result<Json<Vec<TableWithType>>, AppError> {
    let rows = tably_db::repositories::table::get_tables_with_types(
        &state.db_pool,
        restaurant_id,
        query.include_archived.unwrap_or(false),
    )
    .await
    .map_err(BookingError::Database)?;

    let tables = rows
        .into_iter()
        .map(|r| r.into_model())
        .collect::<Result<Vec<_>, _>>()
        .map_err(BookingError::Database)?;

    Ok(Json(tables))
}

#[axum::debug_handler]
pub async fn update_table(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTableRequest>,
) -> Result<Json<DiningTable>, AppError> {
    let updated = tably_db::repositories::table::update_table(
        &state.db_pool,
        id,
        payload.name.as_deref(),
        payload.table_type_id,
        payload.status.map(|s| s.as_str()),
    )
    .await;

    let table = match updated {
        Ok(Some(table)) => table,
        Ok(None) => {
            return Err(AppError(BookingError::NotFound(format!(
                "Table with ID {} not found",
                id
            ))));
        }
        Err(e) if tably_db::constraint_name(&e) == Some("uniq_active_table_name") => {
            return Err(AppError(BookingError::Validation(
                "An active table with this name already exists".to_string(),
            )));
        }
        Err(e) => return Err(AppError(BookingError::Database(e))),
    };

    Ok(Json(table.into_model().map_err(BookingError::Database)?))
}

#[axum::debug_handler]
pub async fn delete_table(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteTableResponse>, AppError> {
    let removal = tably_db::repositories::table::delete_or_archive_table(&state.db_pool, id)
        .await
        .map_err(BookingError::Database)?
        .ok_or_else(|| BookingError::NotFound(format!("Table with ID {} not found", id)))?;

    let response = DeleteTableResponse {
        id,
        deleted: removal == TableRemoval::Deleted,
        archived: removal == TableRemoval::Archived,
    };

    Ok(Json(response))
}
