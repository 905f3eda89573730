use crate::handlers::{
    health::health_check,
    inventories::{
        create_inventory, delete_inventory, get_inventories, get_inventories_by_date, get_inventory,
        update_inventory,
    },
    languages::{create_language, delete_language, get_language, get_languages, update_language},
    profiles::{
        create_profile, delete_profile, get_profile, get_profile_by_email, get_profiles,
        update_profile,
    },
    tags::{create_tag, delete_tag, get_tag, get_tags, update_tag},
    types::{create_type, delete_type, get_type, get_types, update_type},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{routing::get, Router};
use axum_prometheus::PrometheusMetricLayer;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Path of the `inventory-list-by-date` route.
pub const INVENTORY_LIST_BY_DATE: &str = "/api/v1/inventories/by-date";

/// Create application router with all routes and middleware
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Catalog routes
        .route("/api/v1/inventory-languages", get(get_languages).post(create_language))
        .route(
            "/api/v1/inventory-languages/:language_id",
            get(get_language).put(update_language).delete(delete_language),
        )
        .route("/api/v1/inventory-tags", get(get_tags).post(create_tag))
        .route(
            "/api/v1/inventory-tags/:tag_id",
            get(get_tag).put(update_tag).delete(delete_tag),
        )
        .route("/api/v1/inventory-types", get(get_types).post(create_type))
        .route(
            "/api/v1/inventory-types/:type_id",
            get(get_type).put(update_type).delete(delete_type),
        )
        // Inventory routes
        .route(INVENTORY_LIST_BY_DATE, get(get_inventories_by_date))
        .route("/api/v1/inventories", get(get_inventories).post(create_inventory))
        .route(
            "/api/v1/inventories/:inventory_id",
            get(get_inventory).put(update_inventory).delete(delete_inventory),
        )
        // Profile routes
        .route("/api/v1/profiles", get(get_profiles).post(create_profile))
        .route("/api/v1/profiles/by-email/:email", get(get_profile_by_email))
        .route(
            "/api/v1/profiles/:profile_id",
            get(get_profile).put(update_profile).delete(delete_profile),
        )
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(request_timeout))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Router for the long-running server: the application routes plus request
/// metrics exposed on `/metrics`.
///
/// The Prometheus recorder is process-global, so this must be called once.
pub fn create_router_with_metrics(state: AppState, request_timeout: Duration) -> Router {
    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

    create_router(state, request_timeout)
        .route("/metrics", get(move || async move { metric_handle.render() }))
        .layer(prometheus_layer)
}
