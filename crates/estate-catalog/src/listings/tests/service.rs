use std::sync::Arc;

use super::common::*;
use crate::listings::domain::{ListingStatus, ListingValidationError, PropertyId, PropertyPatch};
use crate::listings::filter::ListingFilter;
use crate::listings::repository::{ListingRepository, RepositoryError};
use crate::listings::service::{ListingService, ListingServiceError};

#[test]
fn create_assigns_identifier_and_stores_listing() {
    let (service, repository) = build_service();

    let created = service.create(draft()).expect("create succeeds");
    assert!(!created.id.as_str().is_empty());
    assert_eq!(created.title, draft().title);

    let stored = repository
        .fetch(&created.id)
        .expect("fetch succeeds")
        .expect("listing stored");
    assert_eq!(stored, created);
}

#[test]
fn create_rejects_listing_without_images() {
    let (service, repository) = build_service();
    let mut invalid = draft();
    invalid.images.clear();

    let err = service.create(invalid).expect_err("validation fails");
    assert!(matches!(
        err,
        ListingServiceError::Validation(ListingValidationError::MissingImages)
    ));
    assert!(repository.list().expect("list succeeds").is_empty());
}

#[test]
fn list_preserves_insertion_order_and_applies_filter() {
    let (service, _) = build_service();
    let mut cheap = draft();
    cheap.price = 20_000_000.0;
    let mut sold = draft();
    sold.status = ListingStatus::Sold;

    let first = service.create(cheap).expect("create");
    let second = service.create(draft()).expect("create");
    let third = service.create(sold).expect("create");

    let all = service.list(&ListingFilter::default()).expect("list");
    let ids: Vec<_> = all.iter().map(|p| p.id.clone()).collect();
    assert_eq!(ids, vec![first.id, second.id.clone(), third.id]);

    let filtered = service
        .list(&ListingFilter {
            min_price: Some(50_000_000.0),
            status: Some(ListingStatus::Available),
            ..ListingFilter::default()
        })
        .expect("list");
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id, second.id);
}

#[test]
fn update_applies_patch_and_validates() {
    let (service, _) = build_service();
    let created = service.create(draft()).expect("create");

    let updated = service
        .update(
            &created.id,
            PropertyPatch {
                price: Some(59_900_000.0),
                purpose: Some(Some("Под офис".to_string())),
                ..PropertyPatch::default()
            },
        )
        .expect("update succeeds");
    assert_eq!(updated.price, 59_900_000.0);
    assert_eq!(updated.purpose.as_deref(), Some("Под офис"));
    assert_eq!(updated.created_at, created.created_at);

    let err = service
        .update(
            &created.id,
            PropertyPatch {
                images: Some(Vec::new()),
                ..PropertyPatch::default()
            },
        )
        .expect_err("empty images rejected");
    assert!(matches!(err, ListingServiceError::Validation(_)));
}

#[test]
fn missing_listing_reports_not_found() {
    let (service, _) = build_service();
    let missing = PropertyId("nonexistent-property-id-12345".to_string());

    assert!(service.get(&missing).expect_err("missing").is_not_found());
    assert!(service
        .update(&missing, PropertyPatch::default())
        .expect_err("missing")
        .is_not_found());
    assert!(service.delete(&missing).expect_err("missing").is_not_found());
}

#[test]
fn delete_removes_listing() {
    let (service, repository) = build_service();
    let created = service.create(draft()).expect("create");
    service.delete(&created.id).expect("delete succeeds");
    assert!(repository.fetch(&created.id).expect("fetch").is_none());
}

#[test]
fn repository_failures_surface_as_repository_errors() {
    let service = ListingService::new(Arc::new(UnavailableRepository));
    let err = service
        .list(&ListingFilter::default())
        .expect_err("repository down");
    assert!(matches!(
        err,
        ListingServiceError::Repository(RepositoryError::Unavailable(_))
    ));
}
