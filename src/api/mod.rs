//! Remote recommendation service integration.
//!
//! The service is consumed through the [`AirSafeApi`] trait. [`HttpApi`] is
//! the reqwest-backed implementation; tests drive the same orchestration
//! with stub services. Everything that calls the service goes through
//! [`call_with_fallback`], so a remote failure always resolves to a
//! locally synthesized value of the same shape.

pub mod client;
pub mod fallback;
pub mod http;
pub mod reference;
pub mod types;

pub use client::{RecommendationClient, ScoredRecommendations};
pub use fallback::{Resolved, Source, call_with_fallback};
pub use http::HttpApi;
pub use reference::{ReferenceData, ReferenceDataCache};
pub use types::{
    AdvisoryRequest, AdvisoryResult, AqiCategory, AqiTrend, CityRecommendation, CityRecord,
    RecommendationResult,
};

use async_trait::async_trait;

use crate::error::ApiError;
use crate::wizard::MigrationRequest;

/// Endpoint paths, relative to the configured base URL.
pub mod endpoints {
    pub const CITY_NAMES: &str = "/api/cities/names";
    pub const PROFESSIONS: &str = "/api/cities/professions";
    pub const CITIES: &str = "/api/cities/";
    pub const RECOMMENDATIONS: &str = "/api/recommendations/";
    pub const ADVISORY: &str = "/api/advisory/";
}

/// The recommendation service as seen by the client.
///
/// Implementations report failures; they never substitute fallbacks
/// themselves.
#[async_trait]
pub trait AirSafeApi: Send + Sync {
    /// `GET /api/cities/names`
    async fn city_names(&self) -> Result<Vec<String>, ApiError>;

    /// `GET /api/cities/professions`
    async fn professions(&self) -> Result<Vec<String>, ApiError>;

    /// `GET /api/cities/`
    async fn cities(&self) -> Result<Vec<CityRecord>, ApiError>;

    /// `POST /api/recommendations/`
    async fn recommend(&self, request: &MigrationRequest)
    -> Result<RecommendationResult, ApiError>;

    /// `POST /api/advisory/`
    async fn advise(&self, request: &AdvisoryRequest) -> Result<AdvisoryResult, ApiError>;
}
