use crate::infra::{AppState, Catalog, LocalStorefront};
use axum::extract::{Path, Query};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use estate_catalog::config::CorsConfig;
use estate_catalog::error::AppError;
use estate_catalog::listings::{listing_router, ListingFilter, PropertyId};
use estate_catalog::storefront::{AdminForm, DetailView};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, Any, CorsLayer};
use tracing::warn;

/// Listings API plus the operational and storefront endpoints.
pub(crate) fn with_catalog_routes(catalog: &Catalog) -> axum::Router {
    listing_router(Arc::clone(&catalog.service), Arc::clone(&catalog.authority))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/storefront/home",
            axum::routing::get(storefront_home),
        )
        .route(
            "/api/v1/storefront/catalog",
            axum::routing::get(storefront_catalog),
        )
        .route(
            "/api/v1/storefront/properties/:property_id",
            axum::routing::get(storefront_property),
        )
        .route(
            "/api/v1/storefront/properties/:property_id/form",
            axum::routing::get(storefront_edit_form),
        )
        .layer(Extension(Arc::clone(&catalog.storefront)))
}

/// Browser access policy for every route.
pub(crate) fn cors_layer(config: &CorsConfig) -> CorsLayer {
    match config {
        CorsConfig::AnyOrigin => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        CorsConfig::Origins(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!(%origin, "skipping CORS origin that is not a valid header value");
                        None
                    }
                })
                .collect();
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(AllowMethods::mirror_request())
                .allow_headers(AllowHeaders::mirror_request())
                .allow_credentials(true)
        }
    }
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn storefront_home(
    Extension(site): Extension<Arc<LocalStorefront>>,
) -> impl IntoResponse {
    Json(site.home().await)
}

pub(crate) async fn storefront_catalog(
    Extension(site): Extension<Arc<LocalStorefront>>,
    Query(filter): Query<ListingFilter>,
) -> impl IntoResponse {
    Json(site.catalog(filter).await)
}

pub(crate) async fn storefront_property(
    Extension(site): Extension<Arc<LocalStorefront>>,
    Path(property_id): Path<String>,
) -> impl IntoResponse {
    let page = site.property(&PropertyId(property_id)).await;
    let status = match page.view {
        DetailView::Found(_) => StatusCode::OK,
        DetailView::NotFound(_) => StatusCode::NOT_FOUND,
    };
    (status, Json(page))
}

/// Prefills the admin edit form for an existing listing.
pub(crate) async fn storefront_edit_form(
    Extension(site): Extension<Arc<LocalStorefront>>,
    Path(property_id): Path<String>,
) -> Result<Json<AdminForm>, AppError> {
    let form = site.edit_form(&PropertyId(property_id)).await?;
    Ok(Json(form))
}
