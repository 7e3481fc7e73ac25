//! Typed HTTP client for the points API.

use async_trait::async_trait;
use ecoleta_core::types::DbId;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Item as listed by `GET /items`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogItem {
    pub id: DbId,
    pub title: String,
    pub image_url: String,
}

/// Payload of `POST /points`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPoint {
    pub name: String,
    pub email: String,
    pub whatsapp: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub uf: String,
    pub items: Vec<DbId>,
}

/// A stored point as returned by the API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RegisteredPoint {
    pub id: DbId,
    pub image: String,
    pub name: String,
    pub email: String,
    pub whatsapp: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub uf: String,
}

/// Response of `GET /points/{id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PointDetails {
    pub point: RegisteredPoint,
    pub items: Vec<AcceptedItem>,
}

/// An item title attached to a point.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AcceptedItem {
    pub title: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

// ---------------------------------------------------------------------------
// Port
// ---------------------------------------------------------------------------

/// The subset of the API the registration form depends on.
#[async_trait]
pub trait PointsApi: Send + Sync {
    /// Fetch the item catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] when the request fails or is rejected.
    async fn list_items(&self) -> Result<Vec<CatalogItem>, ClientError>;

    /// Register a point.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] when the request fails or is rejected.
    async fn create_point(&self, point: &NewPoint) -> Result<RegisteredPoint, ClientError>;
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

/// reqwest-backed API client. Construct one per base URL and share it.
#[derive(Debug, Clone)]
pub struct EcoletaClient {
    client: Client,
    base_url: String,
}

impl EcoletaClient {
    /// Create a client for the API rooted at `base_url` (e.g. `http://localhost:3333`).
    #[must_use]
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Points in `city`/`uf` accepting any of `item_ids`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Api`] with status 400 for an empty item list.
    pub async fn filter_points(
        &self,
        city: &str,
        uf: &str,
        item_ids: &[DbId],
    ) -> Result<Vec<RegisteredPoint>, ClientError> {
        let items = item_ids
            .iter()
            .map(DbId::to_string)
            .collect::<Vec<_>>()
            .join(",");

        let req = self
            .client
            .get(self.url("/points"))
            .query(&[("city", city), ("uf", uf), ("items", items.as_str())]);

        fetch_json(req).await
    }

    /// A point and its item titles, or `None` if the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] for any failure other than 404.
    pub async fn get_point(&self, id: DbId) -> Result<Option<PointDetails>, ClientError> {
        let req = self.client.get(self.url(&format!("/points/{id}")));

        match fetch_json(req).await {
            Ok(details) => Ok(Some(details)),
            Err(ClientError::Api { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}

#[async_trait]
impl PointsApi for EcoletaClient {
    async fn list_items(&self) -> Result<Vec<CatalogItem>, ClientError> {
        fetch_json(self.client.get(self.url("/items"))).await
    }

    async fn create_point(&self, point: &NewPoint) -> Result<RegisteredPoint, ClientError> {
        let created: RegisteredPoint =
            fetch_json(self.client.post(self.url("/points")).json(point)).await?;

        tracing::info!(point_id = created.id, "Point registered");
        Ok(created)
    }
}

/// Send a request and decode a JSON body, turning error statuses into
/// [`ClientError::Api`] with the server's message when it sent one.
async fn fetch_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, ClientError> {
    let response = req.send().await?;
    let status = response.status();

    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.message,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    };

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
