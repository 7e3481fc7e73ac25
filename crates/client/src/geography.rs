//! State and city lookup against the IBGE localities API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::error::ClientError;

const IBGE_BASE_URL: &str = "https://servicodados.ibge.gov.br/api/v1/localidades";

/// Administrative-geography lookups used to fill the state and city pickers.
#[async_trait]
pub trait GeographyPort: Send + Sync {
    /// All federative unit abbreviations, sorted.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] when the service request fails.
    async fn list_ufs(&self) -> Result<Vec<String>, ClientError>;

    /// City names within a federative unit, sorted.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] when the service request fails.
    async fn list_cities(&self, uf: &str) -> Result<Vec<String>, ClientError>;
}

/// Single entry from `/estados`.
#[derive(Debug, Deserialize)]
struct UfEntry {
    sigla: String,
}

/// Single entry from `/estados/{uf}/municipios`.
#[derive(Debug, Deserialize)]
struct CityEntry {
    nome: String,
}

/// [`GeographyPort`] backed by the IBGE public API.
#[derive(Debug, Clone)]
pub struct IbgeGeography {
    client: Client,
    base_url: String,
}

impl IbgeGeography {
    /// Create a port bound to the public IBGE endpoint.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, IBGE_BASE_URL)
    }

    /// Create a port bound to a custom endpoint (mirrors, tests).
    #[must_use]
    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl GeographyPort for IbgeGeography {
    async fn list_ufs(&self) -> Result<Vec<String>, ClientError> {
        let entries: Vec<UfEntry> = self
            .client
            .get(format!("{}/estados", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let mut ufs: Vec<String> = entries.into_iter().map(|e| e.sigla).collect();
        ufs.sort();
        Ok(ufs)
    }

    async fn list_cities(&self, uf: &str) -> Result<Vec<String>, ClientError> {
        let entries: Vec<CityEntry> = self
            .client
            .get(format!("{}/estados/{uf}/municipios", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let mut cities: Vec<String> = entries.into_iter().map(|e| e.nome).collect();
        cities.sort();
        Ok(cities)
    }
}
