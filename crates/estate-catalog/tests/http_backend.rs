//! Runs the listings router on a loopback socket and drives it with the HTTP
//! client the storefront uses, so wire formats are checked from both ends.

use std::net::SocketAddr;
use std::sync::Arc;

use estate_catalog::admin::{AdminAuthority, LoginRequest};
use estate_catalog::listings::{
    listing_router, InMemoryListingRepository, ListingFilter, ListingService, PropertyDraft,
    PropertyId, PropertyPatch, PropertyType,
};
use estate_catalog::storefront::{CatalogBackend, ClientError, HttpCatalogBackend};

async fn spawn_backend() -> SocketAddr {
    let repository = Arc::new(InMemoryListingRepository::default());
    let service = Arc::new(ListingService::new(repository));
    let authority = Arc::new(AdminAuthority::new(
        "admin",
        "admin123",
        chrono::Duration::minutes(5),
    ));
    let app = listing_router(service, authority);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind loopback");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server runs");
    });
    addr
}

fn draft(title: &str, property_type: PropertyType, price: f64) -> PropertyDraft {
    PropertyDraft {
        title: title.to_string(),
        description: "Новый объект".to_string(),
        price,
        location: "Алматы, Бостандыкский район".to_string(),
        property_type,
        area: 210.0,
        rooms: 5,
        bathrooms: Some(3),
        plot_size: Some(8.0),
        purpose: Some("ИЖС".to_string()),
        images: vec!["https://cdn.example.kz/house.jpg".to_string()],
        features: vec!["Камин".to_string()],
        tour_3d_url: None,
        krisha_url: Some("https://krisha.kz/a/show/42".to_string()),
        status: Default::default(),
    }
}

async fn login(backend: &HttpCatalogBackend) -> String {
    backend
        .login(&LoginRequest {
            username: "admin".to_string(),
            password: "admin123".to_string(),
        })
        .await
        .expect("login succeeds")
        .access_token
}

#[tokio::test]
async fn admin_round_trip_over_http() {
    let addr = spawn_backend().await;
    let backend = HttpCatalogBackend::new(format!("http://{addr}"));
    let token = login(&backend).await;

    let house = backend
        .create_property(&token, &draft("Дом в горах", PropertyType::House, 180_000_000.0))
        .await
        .expect("house created");
    backend
        .create_property(&token, &draft("Квартира", PropertyType::Apartment, 45_000_000.0))
        .await
        .expect("apartment created");

    let all = backend
        .list_properties(&ListingFilter::default())
        .await
        .expect("list all");
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, house.id);

    let houses = backend
        .list_properties(&ListingFilter {
            property_type: Some(PropertyType::House),
            ..ListingFilter::default()
        })
        .await
        .expect("filtered list");
    assert_eq!(houses.len(), 1);
    assert_eq!(houses[0].title, "Дом в горах");

    let patch = PropertyPatch {
        price: Some(175_000_000.0),
        plot_size: Some(None),
        ..PropertyPatch::default()
    };
    let updated = backend
        .update_property(&token, &house.id, &patch)
        .await
        .expect("update succeeds");
    assert_eq!(updated.price, 175_000_000.0);
    assert_eq!(updated.plot_size, None);
    assert_eq!(updated.bathrooms, Some(3));

    backend
        .delete_property(&token, &house.id)
        .await
        .expect("delete succeeds");
    let gone = backend.get_property(&house.id).await;
    assert!(matches!(gone, Err(ClientError::NotFound)));
}

#[tokio::test]
async fn writes_without_valid_token_are_unauthorized() {
    let addr = spawn_backend().await;
    let backend = HttpCatalogBackend::new(format!("http://{addr}/"));

    let err = backend
        .create_property("forged", &draft("Вилла", PropertyType::Villa, 1.0))
        .await
        .expect_err("forged token rejected");
    assert!(matches!(err, ClientError::Unauthorized));

    let err = backend
        .delete_property("forged", &PropertyId("nope".to_string()))
        .await
        .expect_err("forged token rejected");
    assert!(matches!(err, ClientError::Unauthorized));
}

#[tokio::test]
async fn validation_failures_surface_backend_detail() {
    let addr = spawn_backend().await;
    let backend = HttpCatalogBackend::new(format!("http://{addr}"));
    let token = login(&backend).await;

    let mut invalid = draft("Без фото", PropertyType::Penthouse, 90_000_000.0);
    invalid.images.clear();
    let err = backend
        .create_property(&token, &invalid)
        .await
        .expect_err("empty images rejected");
    match err {
        ClientError::Status { status, detail } => {
            assert_eq!(status, 422);
            assert!(!detail.is_empty());
        }
        other => panic!("expected status error, got {other:?}"),
    }
}
