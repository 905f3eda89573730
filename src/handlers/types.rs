use crate::errors::ApiError;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{DateTime, Utc};
use model::entities::inventory_type;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for creating an inventory type
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateTypeRequest {
    /// Type name (must be unique)
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

/// Request body for renaming an inventory type
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateTypeRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TypeResponse {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<inventory_type::Model> for TypeResponse {
    fn from(model: inventory_type::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Create a new inventory type
#[utoipa::path(
    post,
    path = "/api/v1/inventory-types",
    tag = "inventory-types",
    request_body = CreateTypeRequest,
    responses(
        (status = 201, description = "Type created successfully", body = ApiResponse<TypeResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Type name already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn create_type(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateTypeRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<TypeResponse>>), ApiError> {
    trace!("Entering create_type function");
    debug!("Creating type with name: {}", request.name);

    let new_type = inventory_type::ActiveModel {
        name: Set(request.name.clone()),
        ..Default::default()
    };

    let type_model = new_type
        .insert(&state.db)
        .await
        .map_err(|e| ApiError::from_write(e, &format!("Type '{}'", request.name)))?;

    info!("Type created successfully with ID: {}, name: {}", type_model.id, type_model.name);
    let response = ApiResponse {
        data: TypeResponse::from(type_model),
        message: "Type created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Get all inventory types
#[utoipa::path(
    get,
    path = "/api/v1/inventory-types",
    tag = "inventory-types",
    responses(
        (status = 200, description = "Types retrieved successfully", body = ApiResponse<Vec<TypeResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_types(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<TypeResponse>>>, ApiError> {
    trace!("Entering get_types function");

    let types = inventory_type::Entity::find()
        .order_by_asc(inventory_type::Column::Name)
        .all(&state.db)
        .await?;

    info!("Successfully retrieved {} types", types.len());
    let response = ApiResponse {
        data: types.into_iter().map(TypeResponse::from).collect(),
        message: "Types retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get a specific inventory type by ID
#[utoipa::path(
    get,
    path = "/api/v1/inventory-types/{type_id}",
    tag = "inventory-types",
    params(
        ("type_id" = i32, Path, description = "Type ID"),
    ),
    responses(
        (status = 200, description = "Type retrieved successfully", body = ApiResponse<TypeResponse>),
        (status = 404, description = "Type not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_type(
    Path(type_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<TypeResponse>>, ApiError> {
    trace!("Entering get_type function for type_id: {}", type_id);

    let type_model = inventory_type::Entity::find_by_id(type_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            warn!("Type with ID {} not found", type_id);
            ApiError::NotFound { entity: "Type", id: type_id }
        })?;

    let response = ApiResponse {
        data: TypeResponse::from(type_model),
        message: "Type retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Update an inventory type
#[utoipa::path(
    put,
    path = "/api/v1/inventory-types/{type_id}",
    tag = "inventory-types",
    params(
        ("type_id" = i32, Path, description = "Type ID"),
    ),
    request_body = UpdateTypeRequest,
    responses(
        (status = 200, description = "Type updated successfully", body = ApiResponse<TypeResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Type not found", body = ErrorResponse),
        (status = 409, description = "Type name already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn update_type(
    Path(type_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdateTypeRequest>>,
) -> Result<Json<ApiResponse<TypeResponse>>, ApiError> {
    trace!("Entering update_type function for type_id: {}", type_id);

    let existing = inventory_type::Entity::find_by_id(type_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            warn!("Type with ID {} not found for update", type_id);
            ApiError::NotFound { entity: "Type", id: type_id }
        })?;

    let mut type_model: inventory_type::ActiveModel = existing.into();
    if let Some(name) = request.name.clone() {
        debug!("Updating type name to: {}", name);
        type_model.name = Set(name);
    }

    let updated = type_model
        .update(&state.db)
        .await
        .map_err(|e| ApiError::from_write(e, "Type"))?;

    info!("Type with ID {} updated successfully", type_id);
    let response = ApiResponse {
        data: TypeResponse::from(updated),
        message: "Type updated successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Delete an inventory type together with its inventories
#[utoipa::path(
    delete,
    path = "/api/v1/inventory-types/{type_id}",
    tag = "inventory-types",
    params(
        ("type_id" = i32, Path, description = "Type ID"),
    ),
    responses(
        (status = 200, description = "Type deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Type not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_type(
    Path(type_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    trace!("Entering delete_type function for type_id: {}", type_id);

    let delete_result = inventory_type::Entity::delete_by_id(type_id)
        .exec(&state.db)
        .await?;
    debug!("Delete operation completed. Rows affected: {}", delete_result.rows_affected);

    if delete_result.rows_affected == 0 {
        warn!("Type with ID {} not found for deletion (no rows affected)", type_id);
        return Err(ApiError::NotFound { entity: "Type", id: type_id });
    }

    info!("Type with ID {} deleted successfully", type_id);
    let response = ApiResponse {
        data: format!("Type {} deleted", type_id),
        message: "Type and its inventories deleted successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
