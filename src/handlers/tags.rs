use crate::errors::ApiError;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{DateTime, Utc};
use model::entities::inventory_tag;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Request body for creating an inventory tag
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateTagRequest {
    /// Tag name (must be unique)
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Defaults to true
    pub is_active: Option<bool>,
}

/// Request body for updating an inventory tag
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateTagRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

/// Query parameters for listing tags
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct TagQuery {
    /// Only return active (`true`) or inactive (`false`) tags
    pub active: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TagResponse {
    pub id: i32,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<inventory_tag::Model> for TagResponse {
    fn from(model: inventory_tag::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Create a new inventory tag
#[utoipa::path(
    post,
    path = "/api/v1/inventory-tags",
    tag = "inventory-tags",
    request_body = CreateTagRequest,
    responses(
        (status = 201, description = "Tag created successfully", body = ApiResponse<TagResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Tag name already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn create_tag(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateTagRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<TagResponse>>), ApiError> {
    trace!("Entering create_tag function");
    debug!("Creating tag: name={}, is_active={:?}", request.name, request.is_active);

    let new_tag = inventory_tag::ActiveModel {
        name: Set(request.name.clone()),
        is_active: Set(request.is_active.unwrap_or(true)),
        ..Default::default()
    };

    let tag = new_tag
        .insert(&state.db)
        .await
        .map_err(|e| ApiError::from_write(e, &format!("Tag '{}'", request.name)))?;

    info!("Tag created successfully with ID: {}, name: {}", tag.id, tag.name);
    let response = ApiResponse {
        data: TagResponse::from(tag),
        message: "Tag created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Get all inventory tags, optionally filtered by their active flag
#[utoipa::path(
    get,
    path = "/api/v1/inventory-tags",
    tag = "inventory-tags",
    params(TagQuery),
    responses(
        (status = 200, description = "Tags retrieved successfully", body = ApiResponse<Vec<TagResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_tags(
    Query(query): Query<TagQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<TagResponse>>>, ApiError> {
    trace!("Entering get_tags function");

    let mut select = inventory_tag::Entity::find();
    if let Some(active) = query.active {
        debug!("Filtering tags by is_active = {}", active);
        select = select.filter(inventory_tag::Column::IsActive.eq(active));
    }

    let tags = select
        .order_by_asc(inventory_tag::Column::Name)
        .all(&state.db)
        .await?;

    info!("Successfully retrieved {} tags", tags.len());
    let response = ApiResponse {
        data: tags.into_iter().map(TagResponse::from).collect(),
        message: "Tags retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get a specific inventory tag by ID
#[utoipa::path(
    get,
    path = "/api/v1/inventory-tags/{tag_id}",
    tag = "inventory-tags",
    params(
        ("tag_id" = i32, Path, description = "Tag ID"),
    ),
    responses(
        (status = 200, description = "Tag retrieved successfully", body = ApiResponse<TagResponse>),
        (status = 404, description = "Tag not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_tag(
    Path(tag_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<TagResponse>>, ApiError> {
    trace!("Entering get_tag function for tag_id: {}", tag_id);

    let tag = inventory_tag::Entity::find_by_id(tag_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            warn!("Tag with ID {} not found", tag_id);
            ApiError::NotFound { entity: "Tag", id: tag_id }
        })?;

    let response = ApiResponse {
        data: TagResponse::from(tag),
        message: "Tag retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Update an inventory tag
#[utoipa::path(
    put,
    path = "/api/v1/inventory-tags/{tag_id}",
    tag = "inventory-tags",
    params(
        ("tag_id" = i32, Path, description = "Tag ID"),
    ),
    request_body = UpdateTagRequest,
    responses(
        (status = 200, description = "Tag updated successfully", body = ApiResponse<TagResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Tag not found", body = ErrorResponse),
        (status = 409, description = "Tag name already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn update_tag(
    Path(tag_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdateTagRequest>>,
) -> Result<Json<ApiResponse<TagResponse>>, ApiError> {
    trace!("Entering update_tag function for tag_id: {}", tag_id);

    let existing = inventory_tag::Entity::find_by_id(tag_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            warn!("Tag with ID {} not found for update", tag_id);
            ApiError::NotFound { entity: "Tag", id: tag_id }
        })?;

    let mut tag: inventory_tag::ActiveModel = existing.into();
    let mut updated_fields = Vec::new();

    if let Some(name) = request.name.clone() {
        updated_fields.push(format!("name: {}", name));
        tag.name = Set(name);
    }
    if let Some(is_active) = request.is_active {
        updated_fields.push(format!("is_active: {}", is_active));
        tag.is_active = Set(is_active);
    }

    if updated_fields.is_empty() {
        debug!("No fields to update for tag ID: {}", tag_id);
    } else {
        debug!("Updating fields: {}", updated_fields.join(", "));
    }

    let updated = tag
        .update(&state.db)
        .await
        .map_err(|e| ApiError::from_write(e, "Tag"))?;

    info!("Tag with ID {} updated successfully", tag_id);
    let response = ApiResponse {
        data: TagResponse::from(updated),
        message: "Tag updated successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Delete an inventory tag. Inventories carrying it only lose the tag.
#[utoipa::path(
    delete,
    path = "/api/v1/inventory-tags/{tag_id}",
    tag = "inventory-tags",
    params(
        ("tag_id" = i32, Path, description = "Tag ID"),
    ),
    responses(
        (status = 200, description = "Tag deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Tag not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_tag(
    Path(tag_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    trace!("Entering delete_tag function for tag_id: {}", tag_id);

    let delete_result = inventory_tag::Entity::delete_by_id(tag_id)
        .exec(&state.db)
        .await?;

    if delete_result.rows_affected == 0 {
        warn!("Tag with ID {} not found for deletion", tag_id);
        return Err(ApiError::NotFound { entity: "Tag", id: tag_id });
    }

    info!("Tag with ID {} deleted successfully", tag_id);
    let response = ApiResponse {
        data: format!("Tag {} deleted", tag_id),
        message: "Tag deleted successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
