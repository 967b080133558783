//! reqwest-backed implementation of [`AirSafeApi`].

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::{ApiError, ConfigError};
use crate::wizard::MigrationRequest;

use super::AirSafeApi;
use super::endpoints;
use super::types::{AdvisoryRequest, AdvisoryResult, CityRecord, RecommendationResult};

/// HTTP client for the recommendation service.
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpApi {
    /// Build a client with the configured base URL and request timeout.
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ConfigError::InvalidValue {
                key: "http_client".into(),
                message: e.to_string(),
            })?;
        Ok(Self {
            client,
            base_url: config.api_url.clone(),
            timeout: config.request_timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        tracing::debug!(endpoint = path, "GET");
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(path, self.timeout, e))?;
        Self::decode(path, self.timeout, response).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!(endpoint = path, "POST");
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(path, self.timeout, e))?;
        Self::decode(path, self.timeout, response).await
    }

    async fn decode<T: DeserializeOwned>(
        path: &str,
        timeout: Duration,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(endpoint = path, status = status.as_u16(), body = %body, "Non-success response");
            return Err(ApiError::Status {
                endpoint: path.to_string(),
                status: status.as_u16(),
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::from_reqwest(path, timeout, e))
    }
}

#[async_trait]
impl AirSafeApi for HttpApi {
    async fn city_names(&self) -> Result<Vec<String>, ApiError> {
        self.get_json(endpoints::CITY_NAMES).await
    }

    async fn professions(&self) -> Result<Vec<String>, ApiError> {
        self.get_json(endpoints::PROFESSIONS).await
    }

    async fn cities(&self) -> Result<Vec<CityRecord>, ApiError> {
        self.get_json(endpoints::CITIES).await
    }

    async fn recommend(
        &self,
        request: &MigrationRequest,
    ) -> Result<RecommendationResult, ApiError> {
        self.post_json(endpoints::RECOMMENDATIONS, request).await
    }

    async fn advise(&self, request: &AdvisoryRequest) -> Result<AdvisoryResult, ApiError> {
        self.post_json(endpoints::ADVISORY, request).await
    }
}
