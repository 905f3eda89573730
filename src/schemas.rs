use crate::handlers::{
    inventories::{CreateInventoryRequest, CreatedSinceQuery, InventoryQuery, InventoryResponse, UpdateInventoryRequest},
    languages::{CreateLanguageRequest, LanguageResponse, UpdateLanguageRequest},
    profiles::{CreateProfileRequest, ProfileQuery, ProfileResponse, UpdateProfileRequest},
    tags::{CreateTagRequest, TagQuery, TagResponse, UpdateTagRequest},
    types::{CreateTypeRequest, TypeResponse, UpdateTypeRequest},
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection pool
    pub db: DatabaseConnection,
}

/// API response wrapper
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Machine-readable error code, e.g. `NOT_FOUND` or `INVALID_CREATED_AT`
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::languages::create_language,
        crate::handlers::languages::get_languages,
        crate::handlers::languages::get_language,
        crate::handlers::languages::update_language,
        crate::handlers::languages::delete_language,
        crate::handlers::tags::create_tag,
        crate::handlers::tags::get_tags,
        crate::handlers::tags::get_tag,
        crate::handlers::tags::update_tag,
        crate::handlers::tags::delete_tag,
        crate::handlers::types::create_type,
        crate::handlers::types::get_types,
        crate::handlers::types::get_type,
        crate::handlers::types::update_type,
        crate::handlers::types::delete_type,
        crate::handlers::inventories::create_inventory,
        crate::handlers::inventories::get_inventories,
        crate::handlers::inventories::get_inventories_by_date,
        crate::handlers::inventories::get_inventory,
        crate::handlers::inventories::update_inventory,
        crate::handlers::inventories::delete_inventory,
        crate::handlers::profiles::create_profile,
        crate::handlers::profiles::get_profiles,
        crate::handlers::profiles::get_profile,
        crate::handlers::profiles::get_profile_by_email,
        crate::handlers::profiles::update_profile,
        crate::handlers::profiles::delete_profile,
    ),
    components(
        schemas(
            ApiResponse<LanguageResponse>,
            ApiResponse<TagResponse>,
            ApiResponse<TypeResponse>,
            ApiResponse<InventoryResponse>,
            ApiResponse<ProfileResponse>,
            ErrorResponse,
            HealthResponse,
            CreateLanguageRequest,
            UpdateLanguageRequest,
            LanguageResponse,
            CreateTagRequest,
            UpdateTagRequest,
            TagQuery,
            TagResponse,
            CreateTypeRequest,
            UpdateTypeRequest,
            TypeResponse,
            CreateInventoryRequest,
            UpdateInventoryRequest,
            InventoryQuery,
            CreatedSinceQuery,
            InventoryResponse,
            CreateProfileRequest,
            UpdateProfileRequest,
            ProfileQuery,
            ProfileResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "inventory-languages", description = "Inventory language management"),
        (name = "inventory-tags", description = "Inventory tag management"),
        (name = "inventory-types", description = "Inventory type management"),
        (name = "inventories", description = "Inventory records and the creation date filter"),
        (name = "profiles", description = "User profile management"),
    ),
    info(
        title = "Inventory API",
        description = "Inventory records with languages, types and tags, plus user profiles",
        version = "0.1.0",
    )
)]
pub struct ApiDoc;
