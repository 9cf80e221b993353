use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::admin::{AccessToken, LoginRequest};
use crate::listings::{ListingFilter, Property, PropertyDraft, PropertyId, PropertyPatch};

/// The listings API as seen from the storefront pages.
#[async_trait]
pub trait CatalogBackend: Send + Sync {
    async fn list_properties(&self, filter: &ListingFilter) -> Result<Vec<Property>, ClientError>;
    async fn get_property(&self, id: &PropertyId) -> Result<Property, ClientError>;
    async fn login(&self, credentials: &LoginRequest) -> Result<AccessToken, ClientError>;
    async fn create_property(
        &self,
        token: &str,
        draft: &PropertyDraft,
    ) -> Result<Property, ClientError>;
    async fn update_property(
        &self,
        token: &str,
        id: &PropertyId,
        patch: &PropertyPatch,
    ) -> Result<Property, ClientError>;
    async fn delete_property(&self, token: &str, id: &PropertyId) -> Result<(), ClientError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("backend unreachable: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("backend rejected the admin token")]
    Unauthorized,
    #[error("resource not found")]
    NotFound,
    #[error("backend answered {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error("unexpected backend payload: {0}")]
    Decode(String),
    #[error("cannot build a request URL from '{0}'")]
    InvalidUrl(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// reqwest-backed client for the listings API.
#[derive(Debug, Clone)]
pub struct HttpCatalogBackend {
    client: Client,
    base_url: String,
}

impl HttpCatalogBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    /// The id goes in as a single escaped path segment.
    fn property_url(&self, id: &PropertyId) -> Result<Url, ClientError> {
        let collection = self.url("/properties");
        let mut url =
            Url::parse(&collection).map_err(|_| ClientError::InvalidUrl(collection.clone()))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(collection.clone()))?
            .push(id.as_str());
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let response = request.send().await.map_err(ClientError::Transport)?;
        let status = response.status();
        debug!(%status, url = %response.url(), "backend responded");

        match status {
            StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
            StatusCode::NOT_FOUND => Err(ClientError::NotFound),
            status if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                let detail = serde_json::from_str::<ErrorBody>(&body)
                    .ok()
                    .and_then(|parsed| parsed.detail)
                    .map(|detail| match detail {
                        serde_json::Value::String(text) => text,
                        other => other.to_string(),
                    })
                    .unwrap_or(body);
                Err(ClientError::Status {
                    status: status.as_u16(),
                    detail,
                })
            }
            _ => Ok(response),
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = self.send(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|err| ClientError::Decode(err.to_string()))
    }
}

#[async_trait]
impl CatalogBackend for HttpCatalogBackend {
    async fn list_properties(&self, filter: &ListingFilter) -> Result<Vec<Property>, ClientError> {
        let request = self.client.get(self.url("/properties")).query(filter);
        self.send_json(request).await
    }

    async fn get_property(&self, id: &PropertyId) -> Result<Property, ClientError> {
        self.send_json(self.client.get(self.property_url(id)?)).await
    }

    async fn login(&self, credentials: &LoginRequest) -> Result<AccessToken, ClientError> {
        let request = self.client.post(self.url("/admin/login")).json(credentials);
        self.send_json(request).await
    }

    async fn create_property(
        &self,
        token: &str,
        draft: &PropertyDraft,
    ) -> Result<Property, ClientError> {
        let request = self
            .client
            .post(self.url("/properties"))
            .bearer_auth(token)
            .json(draft);
        self.send_json(request).await
    }

    async fn update_property(
        &self,
        token: &str,
        id: &PropertyId,
        patch: &PropertyPatch,
    ) -> Result<Property, ClientError> {
        let request = self
            .client
            .put(self.property_url(id)?)
            .bearer_auth(token)
            .json(patch);
        self.send_json(request).await
    }

    async fn delete_property(&self, token: &str, id: &PropertyId) -> Result<(), ClientError> {
        let request = self.client.delete(self.property_url(id)?).bearer_auth(token);
        self.send(request).await?;
        Ok(())
    }
}
