use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::admin::{AdminAuthority, LoginRequest};
use crate::listings::domain::{
    ListingStatus, Property, PropertyDraft, PropertyId, PropertyType,
};
use crate::listings::repository::{InMemoryListingRepository, ListingRepository, RepositoryError};
use crate::listings::service::ListingService;

/// `n` listings with ids `p0..p{n-1}` and prices rising by 750 000.
pub(crate) fn sample_properties(n: usize) -> Vec<Property> {
    (0..n)
        .map(|index| {
            let mut property = priced(
                &format!("p{index}"),
                500_000.0 + 750_000.0 * index as f64,
                if index % 2 == 0 { "Астана, Есиль" } else { "Алматы, Медеу" },
            );
            property.title = format!("Объект {index}");
            property
        })
        .collect()
}

pub(crate) fn priced(id: &str, price: f64, location: &str) -> Property {
    Property::from_draft(
        PropertyId(id.to_string()),
        PropertyDraft {
            price,
            location: location.to_string(),
            ..draft()
        },
        Utc.with_ymd_and_hms(2025, 10, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp"),
    )
}

pub(crate) fn draft() -> PropertyDraft {
    PropertyDraft {
        title: "Квартира в ЖК Highvill".to_string(),
        description: "Дизайнерский ремонт, вид на парк".to_string(),
        price: 64_500_000.0,
        location: "Астана, Есиль".to_string(),
        property_type: PropertyType::Apartment,
        area: 85.5,
        rooms: 3,
        bathrooms: Some(2),
        plot_size: None,
        purpose: None,
        images: vec![
            "https://cdn.example.kz/highvill-1.jpg".to_string(),
            "https://cdn.example.kz/highvill-2.jpg".to_string(),
        ],
        features: vec!["Паркинг".to_string(), "Балкон".to_string()],
        tour_3d_url: None,
        krisha_url: None,
        status: ListingStatus::Available,
    }
}

pub(crate) fn authority() -> Arc<AdminAuthority> {
    Arc::new(AdminAuthority::new(
        "admin",
        "admin123",
        chrono::Duration::minutes(30),
    ))
}

pub(crate) fn admin_token(authority: &AdminAuthority) -> String {
    authority
        .login(&LoginRequest {
            username: "admin".to_string(),
            password: "admin123".to_string(),
        })
        .expect("login succeeds")
        .access_token
}

pub(crate) fn build_service() -> (Arc<ListingService<InMemoryListingRepository>>, InMemoryListingRepository) {
    let repository = InMemoryListingRepository::default();
    let service = Arc::new(ListingService::new(Arc::new(repository.clone())));
    (service, repository)
}

pub(crate) struct UnavailableRepository;

impl ListingRepository for UnavailableRepository {
    fn insert(&self, _property: Property) -> Result<Property, RepositoryError> {
        Err(RepositoryError::Unavailable("maintenance".to_string()))
    }

    fn update(&self, _property: Property) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("maintenance".to_string()))
    }

    fn fetch(&self, _id: &PropertyId) -> Result<Option<Property>, RepositoryError> {
        Err(RepositoryError::Unavailable("maintenance".to_string()))
    }

    fn list(&self) -> Result<Vec<Property>, RepositoryError> {
        Err(RepositoryError::Unavailable("maintenance".to_string()))
    }

    fn remove(&self, _id: &PropertyId) -> Result<Property, RepositoryError> {
        Err(RepositoryError::Unavailable("maintenance".to_string()))
    }
}

pub(crate) fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_vec(body).expect("serialize body")))
        .expect("request builds")
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}
