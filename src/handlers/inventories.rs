use crate::errors::ApiError;
use crate::helpers::timestamp::parse_aware_timestamp;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{DateTime, Utc};
use model::entities::{inventory, inventory_language, inventory_tag, inventory_tag_link, inventory_type};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, LoaderTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, QueryTrait, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Request body for creating a new inventory
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateInventoryRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Free-form JSON document, stored as-is. Defaults to `{}`.
    #[serde(default = "empty_metadata")]
    pub metadata: serde_json::Value,
    pub language_id: i32,
    pub type_id: i32,
    /// IDs of the tags to attach
    #[serde(default)]
    pub tags: Vec<i32>,
}

/// Request body for updating an inventory
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateInventoryRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub language_id: Option<i32>,
    pub type_id: Option<i32>,
    /// Replaces the whole tag set when present
    pub tags: Option<Vec<i32>>,
}

/// Query parameters for listing inventories
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct InventoryQuery {
    /// Page number (default: 1)
    #[validate(range(min = 1, max = 10000))]
    pub page: Option<u64>,
    /// Page size (default: 50)
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<u64>,
    /// Filter by language ID
    pub language_id: Option<i32>,
    /// Filter by type ID
    pub type_id: Option<i32>,
    /// Only inventories carrying this tag
    pub tag_id: Option<i32>,
}

/// Query parameters for the creation date filter
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct CreatedSinceQuery {
    /// Timezone-aware ISO-8601 timestamp, e.g. `2023-08-08T17:21:00+00:00`
    pub created_at: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InventoryResponse {
    pub id: i32,
    pub name: String,
    pub metadata: serde_json::Value,
    pub language_id: i32,
    pub type_id: i32,
    /// IDs of the attached tags, ascending
    pub tags: Vec<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryResponse {
    fn new(model: inventory::Model, tags: Vec<inventory_tag::Model>) -> Self {
        let mut tags: Vec<i32> = tags.into_iter().map(|tag| tag.id).collect();
        tags.sort_unstable();

        Self {
            id: model.id,
            name: model.name,
            metadata: model.metadata,
            language_id: model.language_id,
            type_id: model.type_id,
            tags,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }

    /// Load the tags of one inventory and build its response.
    pub async fn with_tags<C>(model: inventory::Model, db: &C) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let tags = model.find_related(inventory_tag::Entity).all(db).await?;
        Ok(Self::new(model, tags))
    }

    /// Build responses for a page of inventories with one extra query for
    /// all of their tags.
    pub async fn many_with_tags<C>(models: Vec<inventory::Model>, db: &C) -> Result<Vec<Self>, DbErr>
    where
        C: ConnectionTrait,
    {
        let tags = models
            .load_many_to_many(inventory_tag::Entity, inventory_tag_link::Entity, db)
            .await?;

        Ok(models
            .into_iter()
            .zip(tags)
            .map(|(model, tags)| Self::new(model, tags))
            .collect())
    }
}

fn empty_metadata() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// Reject writes pointing at a language, type or tag that does not exist.
async fn ensure_references<C>(
    db: &C,
    language_id: Option<i32>,
    type_id: Option<i32>,
    tag_ids: Option<&BTreeSet<i32>>,
) -> Result<(), ApiError>
where
    C: ConnectionTrait,
{
    if let Some(language_id) = language_id {
        if inventory_language::Entity::find_by_id(language_id).one(db).await?.is_none() {
            warn!("Language with ID {} does not exist", language_id);
            return Err(ApiError::InvalidReference(format!(
                "Language with ID {} does not exist",
                language_id
            )));
        }
    }

    if let Some(type_id) = type_id {
        if inventory_type::Entity::find_by_id(type_id).one(db).await?.is_none() {
            warn!("Type with ID {} does not exist", type_id);
            return Err(ApiError::InvalidReference(format!(
                "Type with ID {} does not exist",
                type_id
            )));
        }
    }

    if let Some(tag_ids) = tag_ids.filter(|ids| !ids.is_empty()) {
        let found: BTreeSet<i32> = inventory_tag::Entity::find()
            .filter(inventory_tag::Column::Id.is_in(tag_ids.iter().copied()))
            .all(db)
            .await?
            .into_iter()
            .map(|tag| tag.id)
            .collect();

        if let Some(missing) = tag_ids.difference(&found).next() {
            warn!("Tag with ID {} does not exist", missing);
            return Err(ApiError::InvalidReference(format!(
                "Tag with ID {} does not exist",
                missing
            )));
        }
    }

    Ok(())
}

/// Make `tag_ids` the exact tag set of the inventory.
async fn replace_tags<C>(db: &C, inventory_id: i32, tag_ids: &BTreeSet<i32>) -> Result<(), ApiError>
where
    C: ConnectionTrait,
{
    let removed = inventory_tag_link::Entity::delete_many()
        .filter(inventory_tag_link::Column::InventoryId.eq(inventory_id))
        .exec(db)
        .await?;
    trace!("Removed {} tag links from inventory {}", removed.rows_affected, inventory_id);

    for tag_id in tag_ids {
        inventory_tag_link::ActiveModel {
            inventory_id: Set(inventory_id),
            tag_id: Set(*tag_id),
        }
        .insert(db)
        .await
        .map_err(|e| ApiError::from_write(e, "Inventory tag"))?;
    }

    debug!("Inventory {} now has tags {:?}", inventory_id, tag_ids);
    Ok(())
}

/// Create a new inventory
#[utoipa::path(
    post,
    path = "/api/v1/inventories",
    tag = "inventories",
    request_body = CreateInventoryRequest,
    responses(
        (status = 201, description = "Inventory created successfully", body = ApiResponse<InventoryResponse>),
        (status = 400, description = "Invalid request or unknown language, type or tag", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn create_inventory(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateInventoryRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<InventoryResponse>>), ApiError> {
    trace!("Entering create_inventory function");
    debug!(
        "Creating inventory '{}' with language_id={}, type_id={}, tags={:?}",
        request.name, request.language_id, request.type_id, request.tags
    );

    let tag_ids: BTreeSet<i32> = request.tags.iter().copied().collect();

    let txn = state.db.begin().await?;
    ensure_references(&txn, Some(request.language_id), Some(request.type_id), Some(&tag_ids)).await?;

    let new_inventory = inventory::ActiveModel {
        name: Set(request.name.clone()),
        metadata: Set(request.metadata.clone()),
        language_id: Set(request.language_id),
        type_id: Set(request.type_id),
        ..Default::default()
    };

    let inventory = new_inventory
        .insert(&txn)
        .await
        .map_err(|e| ApiError::from_write(e, "Inventory"))?;

    replace_tags(&txn, inventory.id, &tag_ids).await?;
    let response_data = InventoryResponse::with_tags(inventory, &txn).await?;
    txn.commit().await?;

    info!("Inventory created successfully with ID: {}, name: {}", response_data.id, response_data.name);
    let response = ApiResponse {
        data: response_data,
        message: "Inventory created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Get inventories, paginated and optionally filtered
#[utoipa::path(
    get,
    path = "/api/v1/inventories",
    tag = "inventories",
    params(InventoryQuery),
    responses(
        (status = 200, description = "Inventories retrieved successfully", body = ApiResponse<Vec<InventoryResponse>>),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_inventories(
    Valid(Query(query)): Valid<Query<InventoryQuery>>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<InventoryResponse>>>, ApiError> {
    trace!("Entering get_inventories function");

    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(50);
    debug!("Fetching inventories - page: {}, limit: {}", page, limit);

    let mut select = inventory::Entity::find();

    if let Some(language_id) = query.language_id {
        select = select.filter(inventory::Column::LanguageId.eq(language_id));
    }
    if let Some(type_id) = query.type_id {
        select = select.filter(inventory::Column::TypeId.eq(type_id));
    }
    if let Some(tag_id) = query.tag_id {
        select = select.filter(
            inventory::Column::Id.in_subquery(
                inventory_tag_link::Entity::find()
                    .select_only()
                    .column(inventory_tag_link::Column::InventoryId)
                    .filter(inventory_tag_link::Column::TagId.eq(tag_id))
                    .into_query(),
            ),
        );
    }

    let inventories = select
        .order_by_asc(inventory::Column::Id)
        .paginate(&state.db, limit)
        .fetch_page(page - 1)
        .await?;

    let data = InventoryResponse::many_with_tags(inventories, &state.db).await?;

    info!("Successfully retrieved {} inventories", data.len());
    let response = ApiResponse {
        data,
        message: "Inventories retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// List every inventory created at or after `created_at`.
///
/// Answers with a plain JSON array ordered by creation time, then ID.
#[utoipa::path(
    get,
    path = "/api/v1/inventories/by-date",
    tag = "inventories",
    params(CreatedSinceQuery),
    responses(
        (status = 200, description = "Inventories created at or after the timestamp", body = Vec<InventoryResponse>),
        (status = 400, description = "Missing, malformed or offset-less timestamp", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_inventories_by_date(
    Query(query): Query<CreatedSinceQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<InventoryResponse>>, ApiError> {
    trace!("Entering get_inventories_by_date function");

    let raw = query.created_at.as_deref().unwrap_or_default();
    let since = parse_aware_timestamp(raw).map_err(|e| {
        warn!("Rejected created_at '{}': {}", raw, e);
        ApiError::from(e)
    })?;
    debug!("Fetching inventories created at or after {}", since);

    let inventories = inventory::Entity::find()
        .filter(inventory::Column::CreatedAt.gte(since))
        .order_by_asc(inventory::Column::CreatedAt)
        .order_by_asc(inventory::Column::Id)
        .all(&state.db)
        .await?;

    let data = InventoryResponse::many_with_tags(inventories, &state.db).await?;
    info!("Found {} inventories created since {}", data.len(), since);
    Ok(Json(data))
}

/// Get a specific inventory by ID
#[utoipa::path(
    get,
    path = "/api/v1/inventories/{inventory_id}",
    tag = "inventories",
    params(
        ("inventory_id" = i32, Path, description = "Inventory ID"),
    ),
    responses(
        (status = 200, description = "Inventory retrieved successfully", body = ApiResponse<InventoryResponse>),
        (status = 404, description = "Inventory not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_inventory(
    Path(inventory_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<InventoryResponse>>, ApiError> {
    trace!("Entering get_inventory function for inventory_id: {}", inventory_id);

    let inventory = inventory::Entity::find_by_id(inventory_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            warn!("Inventory with ID {} not found", inventory_id);
            ApiError::NotFound { entity: "Inventory", id: inventory_id }
        })?;

    let response = ApiResponse {
        data: InventoryResponse::with_tags(inventory, &state.db).await?,
        message: "Inventory retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Update an inventory
#[utoipa::path(
    put,
    path = "/api/v1/inventories/{inventory_id}",
    tag = "inventories",
    params(
        ("inventory_id" = i32, Path, description = "Inventory ID"),
    ),
    request_body = UpdateInventoryRequest,
    responses(
        (status = 200, description = "Inventory updated successfully", body = ApiResponse<InventoryResponse>),
        (status = 400, description = "Invalid request or unknown language, type or tag", body = ErrorResponse),
        (status = 404, description = "Inventory not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn update_inventory(
    Path(inventory_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdateInventoryRequest>>,
) -> Result<Json<ApiResponse<InventoryResponse>>, ApiError> {
    trace!("Entering update_inventory function for inventory_id: {}", inventory_id);

    let txn = state.db.begin().await?;

    let existing = inventory::Entity::find_by_id(inventory_id)
        .one(&txn)
        .await?
        .ok_or_else(|| {
            warn!("Inventory with ID {} not found for update", inventory_id);
            ApiError::NotFound { entity: "Inventory", id: inventory_id }
        })?;

    let tag_ids: Option<BTreeSet<i32>> = request.tags.as_ref().map(|tags| tags.iter().copied().collect());
    ensure_references(&txn, request.language_id, request.type_id, tag_ids.as_ref()).await?;

    let mut inventory: inventory::ActiveModel = existing.into();
    let mut updated_fields = Vec::new();

    if let Some(name) = request.name.clone() {
        updated_fields.push("name");
        inventory.name = Set(name);
    }
    if let Some(metadata) = request.metadata.clone() {
        updated_fields.push("metadata");
        inventory.metadata = Set(metadata);
    }
    if let Some(language_id) = request.language_id {
        updated_fields.push("language_id");
        inventory.language_id = Set(language_id);
    }
    if let Some(type_id) = request.type_id {
        updated_fields.push("type_id");
        inventory.type_id = Set(type_id);
    }
    debug!("Updating inventory {} fields: {:?}", inventory_id, updated_fields);

    let updated = inventory
        .update(&txn)
        .await
        .map_err(|e| ApiError::from_write(e, "Inventory"))?;

    if let Some(tag_ids) = tag_ids.as_ref() {
        replace_tags(&txn, inventory_id, tag_ids).await?;
    }

    let response_data = InventoryResponse::with_tags(updated, &txn).await?;
    txn.commit().await?;

    info!("Inventory with ID {} updated successfully", inventory_id);
    let response = ApiResponse {
        data: response_data,
        message: "Inventory updated successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Delete an inventory
#[utoipa::path(
    delete,
    path = "/api/v1/inventories/{inventory_id}",
    tag = "inventories",
    params(
        ("inventory_id" = i32, Path, description = "Inventory ID"),
    ),
    responses(
        (status = 200, description = "Inventory deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Inventory not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_inventory(
    Path(inventory_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    trace!("Entering delete_inventory function for inventory_id: {}", inventory_id);

    let delete_result = inventory::Entity::delete_by_id(inventory_id)
        .exec(&state.db)
        .await?;

    if delete_result.rows_affected == 0 {
        warn!("Inventory with ID {} not found for deletion", inventory_id);
        return Err(ApiError::NotFound { entity: "Inventory", id: inventory_id });
    }

    info!("Inventory with ID {} deleted successfully", inventory_id);
    let response = ApiResponse {
        data: format!("Inventory {} deleted", inventory_id),
        message: "Inventory deleted successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
