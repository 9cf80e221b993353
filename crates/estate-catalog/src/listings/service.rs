use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{ListingValidationError, Property, PropertyDraft, PropertyId, PropertyPatch};
use super::filter::ListingFilter;
use super::repository::{ListingRepository, RepositoryError};

/// Service composing validation and storage for listing CRUD.
pub struct ListingService<R> {
    repository: Arc<R>,
}

impl<R> ListingService<R>
where
    R: ListingRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Listings matching `filter`, in insertion order.
    pub fn list(&self, filter: &ListingFilter) -> Result<Vec<Property>, ListingServiceError> {
        let listings = self.repository.list()?;
        if filter.is_empty() {
            return Ok(listings);
        }
        Ok(listings
            .into_iter()
            .filter(|property| filter.matches(property))
            .collect())
    }

    pub fn get(&self, id: &PropertyId) -> Result<Property, ListingServiceError> {
        let property = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(property)
    }

    pub fn create(&self, draft: PropertyDraft) -> Result<Property, ListingServiceError> {
        draft.validate()?;
        let property = Property::from_draft(PropertyId::generate(), draft, Utc::now());
        let stored = self.repository.insert(property)?;
        info!(id = %stored.id, title = %stored.title, "listing created");
        Ok(stored)
    }

    /// Applies the supplied fields and returns the stored result.
    pub fn update(
        &self,
        id: &PropertyId,
        patch: PropertyPatch,
    ) -> Result<Property, ListingServiceError> {
        patch.validate()?;
        let mut property = self.get(id)?;
        property.apply(patch);
        self.repository.update(property.clone())?;
        info!(id = %property.id, "listing updated");
        Ok(property)
    }

    pub fn delete(&self, id: &PropertyId) -> Result<Property, ListingServiceError> {
        let removed = self.repository.remove(id)?;
        info!(id = %removed.id, "listing deleted");
        Ok(removed)
    }
}

/// Error raised by the listing service.
#[derive(Debug, thiserror::Error)]
pub enum ListingServiceError {
    #[error(transparent)]
    Validation(#[from] ListingValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ListingServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Repository(RepositoryError::NotFound))
    }
}
