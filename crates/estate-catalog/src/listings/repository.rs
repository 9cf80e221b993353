use std::sync::{Arc, Mutex, MutexGuard};

use super::domain::{Property, PropertyId};

/// Storage abstraction so the service module can be exercised in isolation.
pub trait ListingRepository: Send + Sync {
    fn insert(&self, property: Property) -> Result<Property, RepositoryError>;
    fn update(&self, property: Property) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &PropertyId) -> Result<Option<Property>, RepositoryError>;
    /// Every stored listing in insertion order.
    fn list(&self) -> Result<Vec<Property>, RepositoryError>;
    fn remove(&self, id: &PropertyId) -> Result<Property, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Process-local store; listings live as long as the server does.
#[derive(Debug, Default, Clone)]
pub struct InMemoryListingRepository {
    records: Arc<Mutex<Vec<Property>>>,
}

impl InMemoryListingRepository {
    pub fn with_listings(listings: Vec<Property>) -> Self {
        Self {
            records: Arc::new(Mutex::new(listings)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Property>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("listing store poisoned".to_string()))
    }
}

impl ListingRepository for InMemoryListingRepository {
    fn insert(&self, property: Property) -> Result<Property, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.iter().any(|stored| stored.id == property.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(property.clone());
        Ok(property)
    }

    fn update(&self, property: Property) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        let slot = guard
            .iter_mut()
            .find(|stored| stored.id == property.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = property;
        Ok(())
    }

    fn fetch(&self, id: &PropertyId) -> Result<Option<Property>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.iter().find(|stored| &stored.id == id).cloned())
    }

    fn list(&self) -> Result<Vec<Property>, RepositoryError> {
        Ok(self.lock()?.clone())
    }

    fn remove(&self, id: &PropertyId) -> Result<Property, RepositoryError> {
        let mut guard = self.lock()?;
        let index = guard
            .iter()
            .position(|stored| &stored.id == id)
            .ok_or(RepositoryError::NotFound)?;
        Ok(guard.remove(index))
    }
}
