use crate::errors::ApiError;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{DateTime, Utc};
use model::entities::inventory_language;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for creating an inventory language
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateLanguageRequest {
    /// Language name (must be unique)
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

/// Request body for renaming an inventory language
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateLanguageRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LanguageResponse {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<inventory_language::Model> for LanguageResponse {
    fn from(model: inventory_language::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Create a new inventory language
#[utoipa::path(
    post,
    path = "/api/v1/inventory-languages",
    tag = "inventory-languages",
    request_body = CreateLanguageRequest,
    responses(
        (status = 201, description = "Language created successfully", body = ApiResponse<LanguageResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Language name already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn create_language(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateLanguageRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<LanguageResponse>>), ApiError> {
    trace!("Entering create_language function");
    debug!("Creating language with name: {}", request.name);

    let new_language = inventory_language::ActiveModel {
        name: Set(request.name.clone()),
        ..Default::default()
    };

    let language = new_language
        .insert(&state.db)
        .await
        .map_err(|e| ApiError::from_write(e, &format!("Language '{}'", request.name)))?;

    info!("Language created successfully with ID: {}, name: {}", language.id, language.name);
    let response = ApiResponse {
        data: LanguageResponse::from(language),
        message: "Language created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Get all inventory languages
#[utoipa::path(
    get,
    path = "/api/v1/inventory-languages",
    tag = "inventory-languages",
    responses(
        (status = 200, description = "Languages retrieved successfully", body = ApiResponse<Vec<LanguageResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_languages(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<LanguageResponse>>>, ApiError> {
    trace!("Entering get_languages function");

    let languages = inventory_language::Entity::find()
        .order_by_asc(inventory_language::Column::Name)
        .all(&state.db)
        .await?;

    info!("Successfully retrieved {} languages", languages.len());
    let response = ApiResponse {
        data: languages.into_iter().map(LanguageResponse::from).collect(),
        message: "Languages retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get a specific inventory language by ID
#[utoipa::path(
    get,
    path = "/api/v1/inventory-languages/{language_id}",
    tag = "inventory-languages",
    params(
        ("language_id" = i32, Path, description = "Language ID"),
    ),
    responses(
        (status = 200, description = "Language retrieved successfully", body = ApiResponse<LanguageResponse>),
        (status = 404, description = "Language not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_language(
    Path(language_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<LanguageResponse>>, ApiError> {
    trace!("Entering get_language function for language_id: {}", language_id);

    let language = inventory_language::Entity::find_by_id(language_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            warn!("Language with ID {} not found", language_id);
            ApiError::NotFound { entity: "Language", id: language_id }
        })?;

    let response = ApiResponse {
        data: LanguageResponse::from(language),
        message: "Language retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Update an inventory language
#[utoipa::path(
    put,
    path = "/api/v1/inventory-languages/{language_id}",
    tag = "inventory-languages",
    params(
        ("language_id" = i32, Path, description = "Language ID"),
    ),
    request_body = UpdateLanguageRequest,
    responses(
        (status = 200, description = "Language updated successfully", body = ApiResponse<LanguageResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Language not found", body = ErrorResponse),
        (status = 409, description = "Language name already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn update_language(
    Path(language_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdateLanguageRequest>>,
) -> Result<Json<ApiResponse<LanguageResponse>>, ApiError> {
    trace!("Entering update_language function for language_id: {}", language_id);

    let existing = inventory_language::Entity::find_by_id(language_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            warn!("Language with ID {} not found for update", language_id);
            ApiError::NotFound { entity: "Language", id: language_id }
        })?;

    let mut language: inventory_language::ActiveModel = existing.into();
    if let Some(name) = request.name.clone() {
        debug!("Updating language name to: {}", name);
        language.name = Set(name);
    }

    let updated = language
        .update(&state.db)
        .await
        .map_err(|e| ApiError::from_write(e, "Language"))?;

    info!("Language with ID {} updated successfully", language_id);
    let response = ApiResponse {
        data: LanguageResponse::from(updated),
        message: "Language updated successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Delete an inventory language together with its inventories
#[utoipa::path(
    delete,
    path = "/api/v1/inventory-languages/{language_id}",
    tag = "inventory-languages",
    params(
        ("language_id" = i32, Path, description = "Language ID"),
    ),
    responses(
        (status = 200, description = "Language deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Language not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_language(
    Path(language_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    trace!("Entering delete_language function for language_id: {}", language_id);

    let delete_result = inventory_language::Entity::delete_by_id(language_id)
        .exec(&state.db)
        .await?;
    debug!("Delete operation completed. Rows affected: {}", delete_result.rows_affected);

    if delete_result.rows_affected == 0 {
        warn!("Language with ID {} not found for deletion (no rows affected)", language_id);
        return Err(ApiError::NotFound { entity: "Language", id: language_id });
    }

    info!("Language with ID {} deleted successfully", language_id);
    let response = ApiResponse {
        data: format!("Language {} deleted", language_id),
        message: "Language and its inventories deleted successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
