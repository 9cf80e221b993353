use std::sync::Arc;

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequestParts, Path, Query, State},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::{error, warn};

use super::domain::{PropertyDraft, PropertyId, PropertyPatch};
use super::filter::ListingFilter;
use super::repository::{ListingRepository, RepositoryError};
use super::service::{ListingService, ListingServiceError};
use crate::admin::{AdminAuthority, AuthError, LoginRequest};

/// Shared handler state: the listing service plus the token authority guarding writes.
pub struct ListingApi<R> {
    pub service: Arc<ListingService<R>>,
    pub authority: Arc<AdminAuthority>,
}

impl<R> Clone for ListingApi<R> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            authority: Arc::clone(&self.authority),
        }
    }
}

/// Router builder exposing the listings REST API consumed by the storefront.
pub fn listing_router<R>(
    service: Arc<ListingService<R>>,
    authority: Arc<AdminAuthority>,
) -> Router
where
    R: ListingRepository + 'static,
{
    Router::new()
        .route("/api", get(root_handler))
        .route(
            "/api/properties",
            get(list_handler::<R>).post(create_handler::<R>),
        )
        .route(
            "/api/properties/:property_id",
            get(fetch_handler::<R>)
                .put(update_handler::<R>)
                .delete(delete_handler::<R>),
        )
        .route("/api/admin/login", post(login_handler::<R>))
        .with_state(ListingApi { service, authority })
}

fn detail(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "detail": message.into() }))).into_response()
}

fn service_error_response(err: ListingServiceError) -> Response {
    match err {
        ListingServiceError::Validation(reason) => {
            detail(StatusCode::UNPROCESSABLE_ENTITY, reason.to_string())
        }
        ListingServiceError::Repository(RepositoryError::NotFound) => {
            detail(StatusCode::NOT_FOUND, "Property not found")
        }
        ListingServiceError::Repository(RepositoryError::Conflict) => {
            detail(StatusCode::CONFLICT, "Property already exists")
        }
        ListingServiceError::Repository(other) => {
            error!(error = %other, "listing repository failure");
            detail(StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
        }
    }
}

fn auth_error_response(err: AuthError) -> Response {
    match err {
        AuthError::Unavailable => detail(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        _ => (
            StatusCode::UNAUTHORIZED,
            [("www-authenticate", "Bearer")],
            Json(json!({ "detail": err.to_string() })),
        )
            .into_response(),
    }
}

/// Proof of a live admin bearer token. Must precede the body extractor in
/// a handler's arguments so a bad token is 401 whatever the payload.
pub(crate) struct AdminGuard;

#[async_trait]
impl<R> FromRequestParts<ListingApi<R>> for AdminGuard
where
    R: ListingRepository + 'static,
{
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        api: &ListingApi<R>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        api.authority.authorize(header).map_err(|err| {
            warn!(reason = %err, "rejected admin request");
            auth_error_response(err)
        })?;
        Ok(AdminGuard)
    }
}

fn body_rejection_response(rejection: JsonRejection) -> Response {
    warn!(reason = %rejection.body_text(), "rejected request body");
    detail(StatusCode::UNPROCESSABLE_ENTITY, rejection.body_text())
}

pub(crate) async fn root_handler() -> Json<serde_json::Value> {
    Json(json!({ "message": "Real Estate API" }))
}

pub(crate) async fn list_handler<R>(
    State(api): State<ListingApi<R>>,
    Query(filter): Query<ListingFilter>,
) -> Response
where
    R: ListingRepository + 'static,
{
    match api.service.list(&filter) {
        Ok(listings) => (StatusCode::OK, Json(listings)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn fetch_handler<R>(
    State(api): State<ListingApi<R>>,
    Path(property_id): Path<String>,
) -> Response
where
    R: ListingRepository + 'static,
{
    match api.service.get(&PropertyId(property_id)) {
        Ok(property) => (StatusCode::OK, Json(property)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn create_handler<R>(
    State(api): State<ListingApi<R>>,
    _admin: AdminGuard,
    body: Result<Json<PropertyDraft>, JsonRejection>,
) -> Response
where
    R: ListingRepository + 'static,
{
    let Json(draft) = match body {
        Ok(body) => body,
        Err(rejection) => return body_rejection_response(rejection),
    };
    match api.service.create(draft) {
        Ok(property) => (StatusCode::CREATED, Json(property)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn update_handler<R>(
    State(api): State<ListingApi<R>>,
    Path(property_id): Path<String>,
    _admin: AdminGuard,
    body: Result<Json<PropertyPatch>, JsonRejection>,
) -> Response
where
    R: ListingRepository + 'static,
{
    let Json(patch) = match body {
        Ok(body) => body,
        Err(rejection) => return body_rejection_response(rejection),
    };
    match api.service.update(&PropertyId(property_id), patch) {
        Ok(property) => (StatusCode::OK, Json(property)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn delete_handler<R>(
    State(api): State<ListingApi<R>>,
    Path(property_id): Path<String>,
    _admin: AdminGuard,
) -> Response
where
    R: ListingRepository + 'static,
{
    match api.service.delete(&PropertyId(property_id)) {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({ "message": "Property deleted successfully" })),
        )
            .into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn login_handler<R>(
    State(api): State<ListingApi<R>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Response
where
    R: ListingRepository + 'static,
{
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return body_rejection_response(rejection),
    };
    match api.authority.login(&request) {
        Ok(token) => (StatusCode::OK, Json(token)).into_response(),
        Err(err) => auth_error_response(err),
    }
}
