//! Two-stage recommendation pipeline: scoring, then advisory.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::wizard::{FamilyHealth, LocationConstraint, MigrationRequest, Profile, build_request};

use super::AirSafeApi;
use super::endpoints;
use super::fallback::{Source, call_with_fallback, mock_advisory, mock_recommendations};
use super::types::{AdvisoryRequest, AdvisoryResult, RecommendationResult};

/// Output of the first stage.
///
/// Only [`RecommendationClient::get_recommendations`] can produce one, and
/// [`RecommendationClient::get_advisory`] requires one, so the advisory call
/// cannot be issued before scoring has resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRecommendations {
    request: MigrationRequest,
    result: RecommendationResult,
    source: Source,
}

impl ScoredRecommendations {
    /// The request this result was scored for.
    pub fn request(&self) -> &MigrationRequest {
        &self.request
    }

    pub fn result(&self) -> &RecommendationResult {
        &self.result
    }

    pub fn source(&self) -> Source {
        self.source
    }

    pub fn into_result(self) -> RecommendationResult {
        self.result
    }
}

/// Executes the two dependent remote calls with total fallback.
#[derive(Clone)]
pub struct RecommendationClient {
    api: Arc<dyn AirSafeApi>,
    timeout: Duration,
}

impl RecommendationClient {
    pub fn new(api: Arc<dyn AirSafeApi>, timeout: Duration) -> Self {
        Self { api, timeout }
    }

    /// Stage 1: score candidate cities.
    ///
    /// Never fails; an unreachable or misbehaving service yields the fixed
    /// fallback set for the request's current city.
    pub async fn get_recommendations(&self, request: &MigrationRequest) -> ScoredRecommendations {
        let resolved = call_with_fallback(
            endpoints::RECOMMENDATIONS,
            self.timeout,
            self.api.recommend(request),
            || mock_recommendations(request),
        )
        .await;

        info!(
            current_city = %request.current_city,
            candidates = resolved.value.recommendations.len(),
            source = ?resolved.source,
            "Recommendations resolved"
        );

        ScoredRecommendations {
            request: request.clone(),
            result: resolved.value,
            source: resolved.source,
        }
    }

    /// Stage 2: narrate the scored result for the user.
    ///
    /// On failure the narrative comes from a local template and
    /// `generated` is false.
    pub async fn get_advisory(
        &self,
        profile: &Profile,
        location: &LocationConstraint,
        family: &FamilyHealth,
        scored: &ScoredRecommendations,
    ) -> AdvisoryResult {
        debug_assert_eq!(
            scored.request(),
            &build_request(profile, location, family),
            "advisory payloads must come from the form that was scored"
        );
        let request = AdvisoryRequest::new(profile, location, family, &scored.result);

        let resolved = call_with_fallback(
            endpoints::ADVISORY,
            self.timeout,
            self.api.advise(&request),
            || AdvisoryResult {
                advisory: mock_advisory(&profile.name, scored.result.top()),
                generated: false,
            },
        )
        .await;

        info!(
            generated = resolved.value.generated,
            source = ?resolved.source,
            "Advisory resolved"
        );

        resolved.value
    }
}
