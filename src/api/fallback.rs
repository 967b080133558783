//! Fallback policy and the deterministic substitutes it uses.
//!
//! The substitutes are a contract of last resort so the wizard never
//! dead-ends: they do not reproduce the service's scoring or advisory
//! logic. Everything here is a pure function of its input. No clock, no
//! randomness.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::wizard::MigrationRequest;

use super::types::{AqiTrend, CityRecommendation, CityRecord, RecommendationResult};

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Remote,
    Fallback,
}

impl Source {
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote)
    }
}

/// A value produced by [`call_with_fallback`], tagged with its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub value: T,
    pub source: Source,
}

/// Run a remote call bounded by `timeout`; on any failure log it and
/// substitute `fallback()`.
///
/// HTTP status errors, transport errors, decode errors and timeouts are
/// handled identically. There is no retry.
pub async fn call_with_fallback<T, Fut, F>(
    endpoint: &str,
    timeout: Duration,
    remote: Fut,
    fallback: F,
) -> Resolved<T>
where
    Fut: Future<Output = Result<T, ApiError>>,
    F: FnOnce() -> T,
{
    let outcome = match tokio::time::timeout(timeout, remote).await {
        Ok(result) => result,
        Err(_) => Err(ApiError::Timeout {
            endpoint: endpoint.to_string(),
            timeout,
        }),
    };

    match outcome {
        Ok(value) => {
            debug!(endpoint, "Remote call succeeded");
            Resolved {
                value,
                source: Source::Remote,
            }
        }
        Err(e) => {
            warn!(endpoint, error = %e, "Remote call failed; using fallback");
            Resolved {
                value: fallback(),
                source: Source::Fallback,
            }
        }
    }
}

// ── Reference data ──────────────────────────────────────────────────────

/// City dropdown used when `/api/cities/names` is unavailable.
pub const DEFAULT_CITY_NAMES: [&str; 26] = [
    "Delhi",
    "Mumbai",
    "Bangalore",
    "Chennai",
    "Kolkata",
    "Hyderabad",
    "Pune",
    "Ahmedabad",
    "Jaipur",
    "Lucknow",
    "Shimla",
    "Dehradun",
    "Coimbatore",
    "Mysore",
    "Kochi",
    "Thiruvananthapuram",
    "Chandigarh",
    "Goa (Panaji)",
    "Visakhapatnam",
    "Indore",
    "Bhopal",
    "Nagpur",
    "Vadodara",
    "Surat",
    "Mangalore",
    "Pondicherry",
];

/// Profession dropdown used when `/api/cities/professions` is unavailable.
pub const DEFAULT_PROFESSIONS: [&str; 13] = [
    "IT/Software",
    "Healthcare",
    "Finance",
    "Education",
    "Manufacturing",
    "Government",
    "Retail",
    "Hospitality",
    "Media",
    "Legal",
    "Engineering",
    "Research",
    "Other",
];

pub fn default_city_names() -> Vec<String> {
    DEFAULT_CITY_NAMES.iter().map(|s| s.to_string()).collect()
}

pub fn default_professions() -> Vec<String> {
    DEFAULT_PROFESSIONS.iter().map(|s| s.to_string()).collect()
}

/// City records used when `/api/cities/` is unavailable.
pub fn default_cities() -> Vec<CityRecord> {
    vec![
        CityRecord {
            city_name: "Delhi".into(),
            state: "Delhi".into(),
            current_aqi: 285,
            avg_aqi_5yr: 268.5,
            aqi_trend: AqiTrend::Stable,
            avg_rent: 25000,
            job_score: 92.0,
            healthcare_score: 88.0,
        },
        CityRecord {
            city_name: "Shimla".into(),
            state: "Himachal Pradesh".into(),
            current_aqi: 48,
            avg_aqi_5yr: 52.3,
            aqi_trend: AqiTrend::Stable,
            avg_rent: 15000,
            job_score: 45.0,
            healthcare_score: 68.0,
        },
    ]
}

// ── Recommendations ─────────────────────────────────────────────────────

/// AQI assumed for cities missing from [`KNOWN_CITY_AQI`].
pub const DEFAULT_CITY_AQI: u32 = 150;

pub const KNOWN_CITY_AQI: [(&str, u32); 10] = [
    ("Delhi", 285),
    ("Mumbai", 156),
    ("Bangalore", 89),
    ("Chennai", 78),
    ("Kolkata", 168),
    ("Hyderabad", 95),
    ("Pune", 112),
    ("Ahmedabad", 142),
    ("Jaipur", 165),
    ("Lucknow", 225),
];

pub fn city_aqi(city: &str) -> u32 {
    KNOWN_CITY_AQI
        .iter()
        .find(|(name, _)| *name == city)
        .map(|(_, aqi)| *aqi)
        .unwrap_or(DEFAULT_CITY_AQI)
}

struct Candidate {
    city_name: &'static str,
    state: &'static str,
    suitability_score: f64,
    aqi_improvement_percent: f64,
    respiratory_risk_reduction_percent: f64,
    life_expectancy_gain_years: f64,
    distance_km: f64,
    avg_rent: u32,
    job_match_score: f64,
    target_aqi: u32,
    healthcare_score: f64,
    aqi_trend: AqiTrend,
}

const CANDIDATES: [Candidate; 5] = [
    Candidate {
        city_name: "Shimla",
        state: "Himachal Pradesh",
        suitability_score: 87.5,
        aqi_improvement_percent: 83.2,
        respiratory_risk_reduction_percent: 35.4,
        life_expectancy_gain_years: 2.1,
        distance_km: 320.0,
        avg_rent: 15000,
        job_match_score: 45.0,
        target_aqi: 48,
        healthcare_score: 68.0,
        aqi_trend: AqiTrend::Stable,
    },
    Candidate {
        city_name: "Dehradun",
        state: "Uttarakhand",
        suitability_score: 82.3,
        aqi_improvement_percent: 74.7,
        respiratory_risk_reduction_percent: 28.2,
        life_expectancy_gain_years: 1.8,
        distance_km: 250.0,
        avg_rent: 14000,
        job_match_score: 55.0,
        target_aqi: 72,
        healthcare_score: 72.0,
        aqi_trend: AqiTrend::Improving,
    },
    Candidate {
        city_name: "Mysore",
        state: "Karnataka",
        suitability_score: 78.9,
        aqi_improvement_percent: 81.8,
        respiratory_risk_reduction_percent: 32.1,
        life_expectancy_gain_years: 1.9,
        distance_km: 1980.0,
        avg_rent: 10000,
        job_match_score: 62.0,
        target_aqi: 52,
        healthcare_score: 78.0,
        aqi_trend: AqiTrend::Stable,
    },
    Candidate {
        city_name: "Kochi",
        state: "Kerala",
        suitability_score: 76.4,
        aqi_improvement_percent: 80.7,
        respiratory_risk_reduction_percent: 30.5,
        life_expectancy_gain_years: 1.8,
        distance_km: 2100.0,
        avg_rent: 14000,
        job_match_score: 72.0,
        target_aqi: 55,
        healthcare_score: 90.0,
        aqi_trend: AqiTrend::Stable,
    },
    Candidate {
        city_name: "Coimbatore",
        state: "Tamil Nadu",
        suitability_score: 74.2,
        aqi_improvement_percent: 79.6,
        respiratory_risk_reduction_percent: 29.8,
        life_expectancy_gain_years: 1.7,
        distance_km: 2050.0,
        avg_rent: 12000,
        job_match_score: 75.0,
        target_aqi: 58,
        healthcare_score: 85.0,
        aqi_trend: AqiTrend::Stable,
    },
];

/// Fixed recommendation set, anchored on the request's current city AQI.
pub fn mock_recommendations(request: &MigrationRequest) -> RecommendationResult {
    let current_aqi = city_aqi(&request.current_city);
    let recommendations = CANDIDATES
        .iter()
        .map(|c| CityRecommendation {
            city_name: c.city_name.to_string(),
            state: c.state.to_string(),
            suitability_score: c.suitability_score,
            aqi_improvement_percent: c.aqi_improvement_percent,
            respiratory_risk_reduction_percent: c.respiratory_risk_reduction_percent,
            life_expectancy_gain_years: c.life_expectancy_gain_years,
            distance_km: c.distance_km,
            avg_rent: c.avg_rent,
            job_match_score: c.job_match_score,
            current_aqi,
            target_aqi: c.target_aqi,
            healthcare_score: c.healthcare_score,
            aqi_trend: c.aqi_trend,
        })
        .collect();

    RecommendationResult {
        recommendations,
        current_aqi,
        readiness_score: 72.5,
        health_urgency: 68.3,
        health_sensitivity: 55.0,
    }
}

// ── Advisory ────────────────────────────────────────────────────────────

/// Template narrative built from the user's name and the top candidate.
pub fn mock_advisory(user_name: &str, top: Option<&CityRecommendation>) -> String {
    let Some(top) = top else {
        return format!(
            "Dear {user_name},\n\n\
             We could not find a candidate city within your distance and budget \
             constraints right now. Try widening the maximum migration distance or \
             relaxing the monthly budget, then run the assessment again.\n\n\
             Wishing you cleaner air and better health!"
        );
    };

    format!(
        "Dear {user_name},\n\n\
         Based on our comprehensive AI analysis, we strongly recommend considering migration \
         from your current city to {city}, {state}.\n\n\
         This move offers a remarkable {aqi:.1}% improvement in air quality, which translates \
         to an estimated {risk:.1}% reduction in respiratory health risks and a potential life \
         expectancy gain of {gain} years based on epidemiological research.\n\n\
         The city is approximately {distance:.0} km from your current location with average \
         monthly rent around ₹{rent}.\n\n\
         We encourage you to visit {city} to explore neighborhoods and job opportunities before \
         making your final decision. Your family's health is an investment worth making.\n\n\
         Wishing you cleaner air and better health!",
        city = top.city_name,
        state = top.state,
        aqi = top.aqi_improvement_percent,
        risk = top.respiratory_risk_reduction_percent,
        gain = top.life_expectancy_gain_years,
        distance = top.distance_km,
        rent = format_rupees(top.avg_rent),
    )
}

/// Group digits the Indian way: last three, then pairs (1,50,000).
pub fn format_rupees(amount: u32) -> String {
    let digits = amount.to_string();
    if digits.len() <= 3 {
        return digits;
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{tail}", groups.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::ProfileFormState;

    fn request_for(city: &str) -> MigrationRequest {
        let mut form = ProfileFormState::new();
        form.set_current_city(city);
        form.to_request()
    }

    #[tokio::test]
    async fn success_is_tagged_remote() {
        let resolved = call_with_fallback(
            "/test",
            Duration::from_secs(1),
            async { Ok::<_, ApiError>(7) },
            || 0,
        )
        .await;
        assert_eq!(resolved.value, 7);
        assert_eq!(resolved.source, Source::Remote);
    }

    #[tokio::test]
    async fn failure_substitutes_fallback() {
        let resolved = call_with_fallback(
            "/test",
            Duration::from_secs(1),
            async {
                Err::<u32, _>(ApiError::Status {
                    endpoint: "/test".into(),
                    status: 500,
                })
            },
            || 42,
        )
        .await;
        assert_eq!(resolved.value, 42);
        assert_eq!(resolved.source, Source::Fallback);
    }

    #[tokio::test]
    async fn slow_remote_times_out_into_fallback() {
        let resolved = call_with_fallback(
            "/slow",
            Duration::from_millis(20),
            async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<_, ApiError>("late")
            },
            || "fallback",
        )
        .await;
        assert_eq!(resolved.value, "fallback");
        assert_eq!(resolved.source, Source::Fallback);
    }

    #[test]
    fn fallback_is_not_evaluated_on_success() {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let resolved = rt.block_on(call_with_fallback(
            "/test",
            Duration::from_secs(1),
            async { Ok::<_, ApiError>(1) },
            || -> i32 { panic!("fallback must not run") },
        ));
        assert_eq!(resolved.value, 1);
    }

    #[test]
    fn city_aqi_lookup_and_default() {
        assert_eq!(city_aqi("Delhi"), 285);
        assert_eq!(city_aqi("Lucknow"), 225);
        assert_eq!(city_aqi("Shimla"), DEFAULT_CITY_AQI);
        assert_eq!(city_aqi("delhi"), DEFAULT_CITY_AQI);
    }

    #[test]
    fn mock_recommendations_anchor_on_current_city() {
        let result = mock_recommendations(&request_for("Delhi"));
        assert_eq!(result.current_aqi, 285);
        assert_eq!(result.recommendations.len(), 5);
        assert!(result.recommendations.iter().all(|r| r.current_aqi == 285));

        let names: Vec<&str> = result
            .recommendations
            .iter()
            .map(|r| r.city_name.as_str())
            .collect();
        assert_eq!(names, ["Shimla", "Dehradun", "Mysore", "Kochi", "Coimbatore"]);
        assert_eq!(result.readiness_score, 72.5);
        assert_eq!(result.health_urgency, 68.3);
        assert_eq!(result.health_sensitivity, 55.0);
    }

    #[test]
    fn mock_recommendations_are_deterministic() {
        let request = request_for("Mumbai");
        let a = serde_json::to_string(&mock_recommendations(&request)).unwrap();
        let b = serde_json::to_string(&mock_recommendations(&request)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn mock_advisory_substitutes_name_and_top_city() {
        let result = mock_recommendations(&request_for("Delhi"));
        let text = mock_advisory("Amit", result.top());
        assert!(text.starts_with("Dear Amit,"));
        assert!(text.contains("to Shimla, Himachal Pradesh."));
        assert!(text.contains("83.2% improvement"));
        assert!(text.contains("35.4% reduction"));
        assert!(text.contains("gain of 2.1 years"));
        assert!(text.contains("approximately 320 km"));
        assert!(text.contains("₹15,000"));
        assert!(text.contains("visit Shimla"));
    }

    #[test]
    fn mock_advisory_without_candidates() {
        let text = mock_advisory("Amit", None);
        assert!(text.starts_with("Dear Amit,"));
        assert!(text.contains("could not find a candidate city"));
    }

    #[test]
    fn rupee_grouping() {
        assert_eq!(format_rupees(0), "0");
        assert_eq!(format_rupees(950), "950");
        assert_eq!(format_rupees(15000), "15,000");
        assert_eq!(format_rupees(150000), "1,50,000");
        assert_eq!(format_rupees(12345678), "1,23,45,678");
    }

    #[test]
    fn default_lists_are_fixed() {
        assert_eq!(
            default_professions(),
            [
                "IT/Software",
                "Healthcare",
                "Finance",
                "Education",
                "Manufacturing",
                "Government",
                "Retail",
                "Hospitality",
                "Media",
                "Legal",
                "Engineering",
                "Research",
                "Other",
            ]
        );
        assert_eq!(default_city_names().len(), 26);
        assert_eq!(default_cities().len(), 2);
    }
}
