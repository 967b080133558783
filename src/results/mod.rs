//! Result handoff: the bundle shown on the results surface and the
//! single-slot store it travels through.

pub mod render;
pub mod store;

pub use render::render_bundle;
pub use store::{FileResultStore, MemoryResultStore, RESULTS_KEY, ResultStore};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::{AdvisoryResult, RecommendationResult, ScoredRecommendations, Source};
use crate::wizard::{FamilyHealth, LocationConstraint, Profile, ProfileFormState};

/// Everything the results surface needs for one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultBundle {
    pub submission_id: Uuid,
    pub submitted_at: DateTime<Utc>,
    pub recommendations: RecommendationResult,
    /// Whether `recommendations` came from the service or the local fallback.
    pub recommendation_source: Source,
    pub advisory: AdvisoryResult,
    pub profile: Profile,
    pub location: LocationConstraint,
    pub family_health: FamilyHealth,
}

impl ResultBundle {
    /// Combine both resolved stages with the form that produced them.
    ///
    /// Taking the stage outputs by value means a bundle cannot exist before
    /// both calls have resolved.
    pub fn assemble(
        submission_id: Uuid,
        scored: ScoredRecommendations,
        advisory: AdvisoryResult,
        form: &ProfileFormState,
    ) -> Self {
        let recommendation_source = scored.source();
        Self {
            submission_id,
            submitted_at: Utc::now(),
            recommendations: scored.into_result(),
            recommendation_source,
            advisory,
            profile: form.profile.clone(),
            location: form.location.clone(),
            family_health: form.family_health.clone(),
        }
    }

    /// True when any part of the bundle was synthesized locally.
    pub fn used_fallback(&self) -> bool {
        !self.recommendation_source.is_remote() || !self.advisory.generated
    }
}
