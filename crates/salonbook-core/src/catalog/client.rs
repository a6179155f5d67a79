//! HTTP client for the salon platform API
//!
//! Implements [`CatalogApi`] and [`BookingApi`] against the upstream JSON
//! API. The client is thread-safe and cheap to clone; timeouts come from
//! configuration.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::booking::{BookingApi, BookingConfirmation, BookingRequest};
use crate::config::ApiConfig;
use crate::error::{Error, Result};

use super::types::{Employee, EmployeesResponse, SlotsResponse, TimeSlot};
use super::CatalogApi;

/// Default request timeout when none is configured
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP client for catalog and booking endpoints
#[derive(Clone)]
pub struct HttpApiClient {
    http_client: HttpClient,
    base_url: String,
}

impl std::fmt::Debug for HttpApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpApiClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Builder for creating an HttpApiClient
pub struct HttpApiClientBuilder {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

impl Default for HttpApiClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpApiClientBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout_secs: None,
        }
    }

    /// Set the API base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<HttpApiClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::ConfigError("API base URL is required".to_string()))?;

        let timeout_secs = self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(Error::Network)?;

        Ok(HttpApiClient {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl HttpApiClient {
    /// Create a builder
    pub fn builder() -> HttpApiClientBuilder {
        HttpApiClientBuilder::new()
    }

    /// Create a client from configuration
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Self::builder()
            .base_url(config.resolved_base_url())
            .timeout_secs(config.timeout_secs)
            .build()
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "GET request");

        let response = self
            .http_client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(Error::Network)?;

        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }
        response.json::<T>().await.map_err(Error::Network)
    }
}

#[async_trait]
impl CatalogApi for HttpApiClient {
    async fn employees_for_service(
        &self,
        salon_id: &str,
        service_id: &str,
        date: Option<&str>,
    ) -> Result<Vec<Employee>> {
        let path = format!("/salons/{salon_id}/services/{service_id}/employees");
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(date) = date {
            query.push(("date", date));
        }
        let response: EmployeesResponse = self.get_json(&path, &query).await?;
        Ok(response.employees)
    }

    async fn available_slots(
        &self,
        salon_id: &str,
        date: &str,
        service_id: &str,
    ) -> Result<Vec<TimeSlot>> {
        let path = format!("/salons/{salon_id}/slots");
        let response: SlotsResponse = self
            .get_json(&path, &[("date", date), ("service_id", service_id)])
            .await?;
        Ok(response.slots)
    }
}

#[async_trait]
impl BookingApi for HttpApiClient {
    async fn create_booking(
        &self,
        salon_id: &str,
        request: &BookingRequest,
    ) -> Result<BookingConfirmation> {
        let url = format!("{}/salons/{salon_id}/bookings", self.base_url);
        debug!(url = %url, items = request.items.len(), "POST booking");

        let response = self
            .http_client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(Error::Network)?;

        Self::decode(response).await
    }
}
