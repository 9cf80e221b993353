use async_trait::async_trait;
use estate_catalog::admin::{AccessToken, AdminAuthority, AuthError, LoginRequest};
use estate_catalog::config::{AdminConfig, SitePreset};
use estate_catalog::error::AppError;
use estate_catalog::listings::{
    InMemoryListingRepository, ListingFilter, ListingImporter, ListingRepository, ListingService,
    ListingServiceError, ListingStatus, Property, PropertyDraft, PropertyId, PropertyPatch,
    PropertyType, RepositoryError,
};
use estate_catalog::storefront::{CatalogBackend, ClientError, SiteProfile, Storefront};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Storefront wired straight to the in-process listing service.
pub(crate) type LocalStorefront = Storefront<LocalCatalogBackend<InMemoryListingRepository>>;

/// Serves storefront pages from the same process as the listings API,
/// skipping the HTTP hop while keeping the backend's semantics.
pub(crate) struct LocalCatalogBackend<R> {
    service: Arc<ListingService<R>>,
    authority: Arc<AdminAuthority>,
}

impl<R> LocalCatalogBackend<R> {
    pub(crate) fn new(service: Arc<ListingService<R>>, authority: Arc<AdminAuthority>) -> Self {
        Self { service, authority }
    }

    fn authorize(&self, token: &str) -> Result<(), ClientError> {
        let header = format!("Bearer {token}");
        self.authority
            .authorize(Some(header.as_str()))
            .map_err(|err| match err {
                AuthError::Unavailable => ClientError::Status {
                    status: 500,
                    detail: err.to_string(),
                },
                _ => ClientError::Unauthorized,
            })
    }
}

fn client_error(err: ListingServiceError) -> ClientError {
    match err {
        ListingServiceError::Validation(reason) => ClientError::Status {
            status: 422,
            detail: reason.to_string(),
        },
        ListingServiceError::Repository(RepositoryError::NotFound) => ClientError::NotFound,
        ListingServiceError::Repository(RepositoryError::Conflict) => ClientError::Status {
            status: 409,
            detail: "Property already exists".to_string(),
        },
        ListingServiceError::Repository(other) => ClientError::Status {
            status: 500,
            detail: other.to_string(),
        },
    }
}

#[async_trait]
impl<R> CatalogBackend for LocalCatalogBackend<R>
where
    R: ListingRepository + 'static,
{
    async fn list_properties(&self, filter: &ListingFilter) -> Result<Vec<Property>, ClientError> {
        self.service.list(filter).map_err(client_error)
    }

    async fn get_property(&self, id: &PropertyId) -> Result<Property, ClientError> {
        self.service.get(id).map_err(client_error)
    }

    async fn login(&self, credentials: &LoginRequest) -> Result<AccessToken, ClientError> {
        self.authority
            .login(credentials)
            .map_err(|_| ClientError::Unauthorized)
    }

    async fn create_property(
        &self,
        token: &str,
        draft: &PropertyDraft,
    ) -> Result<Property, ClientError> {
        self.authorize(token)?;
        self.service.create(draft.clone()).map_err(client_error)
    }

    async fn update_property(
        &self,
        token: &str,
        id: &PropertyId,
        patch: &PropertyPatch,
    ) -> Result<Property, ClientError> {
        self.authorize(token)?;
        self.service.update(id, patch.clone()).map_err(client_error)
    }

    async fn delete_property(&self, token: &str, id: &PropertyId) -> Result<(), ClientError> {
        self.authorize(token)?;
        self.service.delete(id).map(|_| ()).map_err(client_error)
    }
}

/// Everything the HTTP service shares between the API and the storefront endpoints.
pub(crate) struct Catalog {
    pub(crate) service: Arc<ListingService<InMemoryListingRepository>>,
    pub(crate) authority: Arc<AdminAuthority>,
    pub(crate) storefront: Arc<LocalStorefront>,
}

impl Catalog {
    pub(crate) fn build(admin: &AdminConfig, site: SitePreset) -> Self {
        let repository = Arc::new(InMemoryListingRepository::default());
        let service = Arc::new(ListingService::new(repository));
        let authority = Arc::new(AdminAuthority::from_config(admin));
        let storefront = Arc::new(Storefront::new(
            LocalCatalogBackend::new(Arc::clone(&service), Arc::clone(&authority)),
            SiteProfile::from_preset(site),
        ));
        Self {
            service,
            authority,
            storefront,
        }
    }

    /// Loads the seed CSV through the regular create path.
    pub(crate) fn seed(&self, path: &Path) -> Result<usize, AppError> {
        let drafts = ListingImporter::from_path(path)?;
        let count = drafts.len();
        for draft in drafts {
            self.service.create(draft)?;
        }
        info!(path = %path.display(), count, "seeded listings from CSV");
        Ok(count)
    }
}

pub(crate) fn parse_property_type(raw: &str) -> Result<PropertyType, String> {
    PropertyType::parse(raw)
        .ok_or_else(|| format!("unknown property type '{raw}' (apartment, house, villa, penthouse)"))
}

pub(crate) fn parse_status(raw: &str) -> Result<ListingStatus, String> {
    ListingStatus::parse(raw)
        .ok_or_else(|| format!("unknown status '{raw}' (available, sold)"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> PropertyDraft {
        PropertyDraft {
            title: "Пентхаус".to_string(),
            description: String::new(),
            price: 300_000_000.0,
            location: "Астана".to_string(),
            property_type: PropertyType::Penthouse,
            area: 240.0,
            rooms: 5,
            bathrooms: Some(3),
            plot_size: None,
            purpose: None,
            images: vec!["https://cdn.example.kz/ph.jpg".to_string()],
            features: Vec::new(),
            tour_3d_url: None,
            krisha_url: None,
            status: ListingStatus::Available,
        }
    }

    fn backend() -> LocalCatalogBackend<InMemoryListingRepository> {
        let service = Arc::new(ListingService::new(Arc::new(
            InMemoryListingRepository::default(),
        )));
        let authority = Arc::new(AdminAuthority::new(
            "admin",
            "admin123",
            chrono::Duration::minutes(10),
        ));
        LocalCatalogBackend::new(service, authority)
    }

    #[tokio::test]
    async fn local_backend_enforces_tokens() {
        let backend = backend();
        let err = backend
            .create_property("nope", &draft())
            .await
            .expect_err("unknown token");
        assert!(matches!(err, ClientError::Unauthorized));

        let token = backend
            .login(&LoginRequest {
                username: "admin".to_string(),
                password: "admin123".to_string(),
            })
            .await
            .expect("login")
            .access_token;
        let created = backend
            .create_property(&token, &draft())
            .await
            .expect("created");
        assert_eq!(
            backend.get_property(&created.id).await.expect("stored").title,
            "Пентхаус"
        );

        backend
            .delete_property(&token, &created.id)
            .await
            .expect("deleted");
        assert!(matches!(
            backend.get_property(&created.id).await,
            Err(ClientError::NotFound)
        ));
    }

    #[test]
    fn cli_value_parsers_accept_known_names() {
        assert_eq!(parse_property_type("Villa"), Ok(PropertyType::Villa));
        assert!(parse_property_type("castle").is_err());
        assert_eq!(parse_status("sold"), Ok(ListingStatus::Sold));
    }
}
