use crate::errors::ApiError;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{DateTime, Utc};
use model::authorization;
use model::entities::user_profile::{self, normalize_email};
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Request body for creating a new profile
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateProfileRequest {
    /// Login identifier (must be unique)
    #[validate(email, length(max = 254))]
    pub email: String,
    /// Display handle (must be unique)
    #[validate(length(min = 1, max = 254))]
    pub username: String,
    #[validate(length(max = 254))]
    pub first_name: Option<String>,
    #[validate(length(max = 254))]
    pub last_name: Option<String>,
    pub is_admin: Option<bool>,
    pub is_active: Option<bool>,
    /// Path of the avatar image
    #[validate(length(max = 255))]
    pub avatar: Option<String>,
}

/// Request body for updating a profile
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateProfileRequest {
    #[validate(email, length(max = 254))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 254))]
    pub username: Option<String>,
    /// An empty string clears the stored name
    #[validate(length(max = 254))]
    pub first_name: Option<String>,
    /// An empty string clears the stored name
    #[validate(length(max = 254))]
    pub last_name: Option<String>,
    pub is_admin: Option<bool>,
    pub is_active: Option<bool>,
    pub last_login: Option<DateTime<Utc>>,
    /// An empty string removes the avatar
    #[validate(length(max = 255))]
    pub avatar: Option<String>,
}

fn non_empty(value: String) -> Option<String> {
    Some(value).filter(|v| !v.is_empty())
}

/// Query parameters for listing profiles
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct ProfileQuery {
    /// Page number (default: 1)
    #[validate(range(min = 1, max = 10000))]
    pub page: Option<u64>,
    /// Page size (default: 50)
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// First and last name joined by a space
    pub full_name: String,
    pub is_admin: bool,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub avatar: Option<String>,
    /// What this profile is allowed to do
    pub capabilities: Vec<String>,
}

impl From<user_profile::Model> for ProfileResponse {
    fn from(model: user_profile::Model) -> Self {
        let full_name = model.full_name();
        let capabilities = authorization::capabilities(&model)
            .into_iter()
            .map(|capability| capability.as_str().to_string())
            .collect();

        Self {
            id: model.id,
            email: model.email,
            username: model.username,
            first_name: model.first_name,
            last_name: model.last_name,
            full_name,
            is_admin: model.is_admin,
            is_active: model.is_active,
            date_joined: model.date_joined,
            last_login: model.last_login,
            avatar: model.avatar,
            capabilities,
        }
    }
}

/// Create a new profile
#[utoipa::path(
    post,
    path = "/api/v1/profiles",
    tag = "profiles",
    request_body = CreateProfileRequest,
    responses(
        (status = 201, description = "Profile created successfully", body = ApiResponse<ProfileResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Email or username already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn create_profile(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateProfileRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<ProfileResponse>>), ApiError> {
    trace!("Entering create_profile function");

    let email = normalize_email(&request.email);
    debug!("Creating profile with email: {}, username: {}", email, request.username);

    let new_profile = user_profile::ActiveModel {
        email: Set(email.clone()),
        username: Set(request.username.clone()),
        first_name: Set(request.first_name.clone()),
        last_name: Set(request.last_name.clone()),
        is_admin: Set(request.is_admin.unwrap_or(false)),
        is_active: Set(request.is_active.unwrap_or(true)),
        avatar: Set(request.avatar.clone()),
        ..Default::default()
    };

    let profile = new_profile
        .insert(&state.db)
        .await
        .map_err(|e| ApiError::from_write(e, &format!("Profile '{}'", email)))?;

    info!("Profile created successfully with ID: {}, email: {}", profile.id, profile.email);
    let response = ApiResponse {
        data: ProfileResponse::from(profile),
        message: "Profile created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Get profiles, paginated
#[utoipa::path(
    get,
    path = "/api/v1/profiles",
    tag = "profiles",
    params(ProfileQuery),
    responses(
        (status = 200, description = "Profiles retrieved successfully", body = ApiResponse<Vec<ProfileResponse>>),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_profiles(
    Valid(Query(query)): Valid<Query<ProfileQuery>>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ProfileResponse>>>, ApiError> {
    trace!("Entering get_profiles function");

    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(50);
    debug!("Fetching profiles - page: {}, limit: {}", page, limit);

    let profiles = user_profile::Entity::find()
        .order_by_asc(user_profile::Column::Id)
        .paginate(&state.db, limit)
        .fetch_page(page - 1)
        .await?;

    info!("Successfully retrieved {} profiles", profiles.len());
    let response = ApiResponse {
        data: profiles.into_iter().map(ProfileResponse::from).collect(),
        message: "Profiles retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get a specific profile by ID
#[utoipa::path(
    get,
    path = "/api/v1/profiles/{profile_id}",
    tag = "profiles",
    params(
        ("profile_id" = i32, Path, description = "Profile ID"),
    ),
    responses(
        (status = 200, description = "Profile retrieved successfully", body = ApiResponse<ProfileResponse>),
        (status = 404, description = "Profile not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_profile(
    Path(profile_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ProfileResponse>>, ApiError> {
    trace!("Entering get_profile function for profile_id: {}", profile_id);

    let profile = user_profile::Entity::find_by_id(profile_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            warn!("Profile with ID {} not found", profile_id);
            ApiError::NotFound { entity: "Profile", id: profile_id }
        })?;

    let response = ApiResponse {
        data: ProfileResponse::from(profile),
        message: "Profile retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Look a profile up by its email address
#[utoipa::path(
    get,
    path = "/api/v1/profiles/by-email/{email}",
    tag = "profiles",
    params(
        ("email" = String, Path, description = "Email address; the domain is matched case-insensitively"),
    ),
    responses(
        (status = 200, description = "Profile retrieved successfully", body = ApiResponse<ProfileResponse>),
        (status = 404, description = "Profile not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_profile_by_email(
    Path(email): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ProfileResponse>>, ApiError> {
    trace!("Entering get_profile_by_email function for email: {}", email);

    let profile = user_profile::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| {
            warn!("Profile with email {} not found", email);
            ApiError::NotFoundBy(format!("Profile with email {} not found", email))
        })?;

    let response = ApiResponse {
        data: ProfileResponse::from(profile),
        message: "Profile retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Update a profile
#[utoipa::path(
    put,
    path = "/api/v1/profiles/{profile_id}",
    tag = "profiles",
    params(
        ("profile_id" = i32, Path, description = "Profile ID"),
    ),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated successfully", body = ApiResponse<ProfileResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Profile not found", body = ErrorResponse),
        (status = 409, description = "Email or username already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn update_profile(
    Path(profile_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdateProfileRequest>>,
) -> Result<Json<ApiResponse<ProfileResponse>>, ApiError> {
    trace!("Entering update_profile function for profile_id: {}", profile_id);

    let existing = user_profile::Entity::find_by_id(profile_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            warn!("Profile with ID {} not found for update", profile_id);
            ApiError::NotFound { entity: "Profile", id: profile_id }
        })?;

    let mut profile: user_profile::ActiveModel = existing.clone().into();
    let mut updated_fields = Vec::new();

    if let Some(email) = request.email.as_deref() {
        updated_fields.push("email");
        profile.email = Set(normalize_email(email));
    }
    if let Some(username) = request.username.clone() {
        updated_fields.push("username");
        profile.username = Set(username);
    }
    if let Some(first_name) = request.first_name.clone() {
        updated_fields.push("first_name");
        profile.first_name = Set(non_empty(first_name));
    }
    if let Some(last_name) = request.last_name.clone() {
        updated_fields.push("last_name");
        profile.last_name = Set(non_empty(last_name));
    }
    if let Some(is_admin) = request.is_admin {
        updated_fields.push("is_admin");
        profile.is_admin = Set(is_admin);
    }
    if let Some(is_active) = request.is_active {
        updated_fields.push("is_active");
        profile.is_active = Set(is_active);
    }
    if let Some(last_login) = request.last_login {
        updated_fields.push("last_login");
        profile.last_login = Set(Some(last_login));
    }
    if let Some(avatar) = request.avatar.clone() {
        updated_fields.push("avatar");
        profile.avatar = Set(non_empty(avatar));
    }

    if updated_fields.is_empty() {
        debug!("No fields to update for profile ID: {}", profile_id);
        return Ok(Json(ApiResponse {
            data: ProfileResponse::from(existing),
            message: "Profile updated successfully".to_string(),
            success: true,
        }));
    }
    debug!("Updating profile {} fields: {:?}", profile_id, updated_fields);

    let updated = profile
        .update(&state.db)
        .await
        .map_err(|e| ApiError::from_write(e, "Profile"))?;

    info!("Profile with ID {} updated successfully", profile_id);
    let response = ApiResponse {
        data: ProfileResponse::from(updated),
        message: "Profile updated successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Delete a profile
#[utoipa::path(
    delete,
    path = "/api/v1/profiles/{profile_id}",
    tag = "profiles",
    params(
        ("profile_id" = i32, Path, description = "Profile ID"),
    ),
    responses(
        (status = 200, description = "Profile deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Profile not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_profile(
    Path(profile_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    trace!("Entering delete_profile function for profile_id: {}", profile_id);

    let delete_result = user_profile::Entity::delete_by_id(profile_id)
        .exec(&state.db)
        .await?;

    if delete_result.rows_affected == 0 {
        warn!("Profile with ID {} not found for deletion", profile_id);
        return Err(ApiError::NotFound { entity: "Profile", id: profile_id });
    }

    info!("Profile with ID {} deleted successfully", profile_id);
    let response = ApiResponse {
        data: format!("Profile {} deleted", profile_id),
        message: "Profile deleted successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
