//! Wire types returned by the recommendation service.

use serde::{Deserialize, Serialize};

use crate::wizard::{FamilyHealth, FamilyType, HealthConditions, LocationConstraint, Profile};

/// Direction of a city's AQI over recent years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AqiTrend {
    Improving,
    #[default]
    Stable,
    Worsening,
}

impl std::fmt::Display for AqiTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Improving => write!(f, "improving"),
            Self::Stable => write!(f, "stable"),
            Self::Worsening => write!(f, "worsening"),
        }
    }
}

/// Health band for an AQI reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AqiCategory {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiCategory {
    pub fn from_aqi(aqi: u32) -> Self {
        match aqi {
            0..=50 => Self::Good,
            51..=100 => Self::Moderate,
            101..=150 => Self::UnhealthyForSensitiveGroups,
            151..=200 => Self::Unhealthy,
            201..=300 => Self::VeryUnhealthy,
            _ => Self::Hazardous,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            Self::Unhealthy => "Unhealthy",
            Self::VeryUnhealthy => "Very Unhealthy",
            Self::Hazardous => "Hazardous",
        }
    }
}

impl std::fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of `GET /api/cities/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRecord {
    pub city_name: String,
    pub state: String,
    pub current_aqi: u32,
    pub avg_aqi_5yr: f64,
    pub aqi_trend: AqiTrend,
    pub avg_rent: u32,
    pub job_score: f64,
    pub healthcare_score: f64,
}

/// A ranked candidate city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRecommendation {
    pub city_name: String,
    pub state: String,
    /// Ranking metric, 0–100.
    pub suitability_score: f64,
    pub aqi_improvement_percent: f64,
    #[serde(rename = "respiratory_risk_reduction")]
    pub respiratory_risk_reduction_percent: f64,
    pub life_expectancy_gain_years: f64,
    pub distance_km: f64,
    pub avg_rent: u32,
    pub job_match_score: f64,
    pub current_aqi: u32,
    pub target_aqi: u32,
    #[serde(default)]
    pub healthcare_score: f64,
    #[serde(default)]
    pub aqi_trend: AqiTrend,
}

/// Response of `POST /api/recommendations/`.
///
/// `recommendations` keeps the service's rank order; the client never
/// re-sorts it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub recommendations: Vec<CityRecommendation>,
    pub current_aqi: u32,
    pub readiness_score: f64,
    pub health_urgency: f64,
    pub health_sensitivity: f64,
}

impl RecommendationResult {
    /// Highest-ranked city, if the service returned any.
    pub fn top(&self) -> Option<&CityRecommendation> {
        self.recommendations.first()
    }
}

/// Body of `POST /api/advisory/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryRequest {
    pub user_name: String,
    pub age: u8,
    pub profession: String,
    pub current_city: String,
    pub current_aqi: u32,
    pub family_type: FamilyType,
    pub total_members: u8,
    pub children: u8,
    pub elderly: u8,
    pub health_conditions: HealthConditions,
    pub top_recommendations: Vec<CityRecommendation>,
    pub readiness_score: f64,
    pub health_urgency: f64,
}

impl AdvisoryRequest {
    /// Assemble the advisory context from the form payloads and a resolved
    /// recommendation result.
    pub(crate) fn new(
        profile: &Profile,
        location: &LocationConstraint,
        family: &FamilyHealth,
        result: &RecommendationResult,
    ) -> Self {
        Self {
            user_name: profile.name.clone(),
            age: profile.age,
            profession: profile.profession.clone(),
            current_city: location.current_city.clone(),
            current_aqi: result.current_aqi,
            family_type: family.family_type,
            total_members: family.total_members,
            children: family.children,
            elderly: family.elderly,
            health_conditions: family.health_conditions.clone(),
            top_recommendations: result.recommendations.clone(),
            readiness_score: result.readiness_score,
            health_urgency: result.health_urgency,
        }
    }
}

/// Response of `POST /api/advisory/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryResult {
    pub advisory: String,
    /// False when the text was synthesized locally (or by the service's own
    /// template) rather than by the language model.
    pub generated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aqi_category_boundaries() {
        assert_eq!(AqiCategory::from_aqi(0), AqiCategory::Good);
        assert_eq!(AqiCategory::from_aqi(50), AqiCategory::Good);
        assert_eq!(AqiCategory::from_aqi(51), AqiCategory::Moderate);
        assert_eq!(AqiCategory::from_aqi(150), AqiCategory::UnhealthyForSensitiveGroups);
        assert_eq!(AqiCategory::from_aqi(200), AqiCategory::Unhealthy);
        assert_eq!(AqiCategory::from_aqi(285), AqiCategory::VeryUnhealthy);
        assert_eq!(AqiCategory::from_aqi(301), AqiCategory::Hazardous);
    }

    #[test]
    fn recommendation_uses_service_field_names() {
        let json = serde_json::json!({
            "city_name": "Shimla",
            "state": "Himachal Pradesh",
            "suitability_score": 87.5,
            "aqi_improvement_percent": 83.2,
            "respiratory_risk_reduction": 35.4,
            "life_expectancy_gain_years": 2.1,
            "distance_km": 320.0,
            "avg_rent": 15000,
            "job_match_score": 45.0,
            "current_aqi": 285,
            "target_aqi": 48,
            "healthcare_score": 68.0,
            "aqi_trend": "stable"
        });
        let rec: CityRecommendation = serde_json::from_value(json).unwrap();
        assert_eq!(rec.respiratory_risk_reduction_percent, 35.4);
        assert_eq!(rec.aqi_trend, AqiTrend::Stable);

        let back = serde_json::to_value(&rec).unwrap();
        assert_eq!(back["respiratory_risk_reduction"], 35.4);
    }

    #[test]
    fn recommendation_tolerates_missing_trend_and_healthcare() {
        let json = serde_json::json!({
            "city_name": "Ooty",
            "state": "Tamil Nadu",
            "suitability_score": 70.0,
            "aqi_improvement_percent": 60.0,
            "respiratory_risk_reduction": 20.0,
            "life_expectancy_gain_years": 1.0,
            "distance_km": 2200.0,
            "avg_rent": 11000,
            "job_match_score": 40.0,
            "current_aqi": 285,
            "target_aqi": 40
        });
        let rec: CityRecommendation = serde_json::from_value(json).unwrap();
        assert_eq!(rec.healthcare_score, 0.0);
        assert_eq!(rec.aqi_trend, AqiTrend::Stable);
    }

    #[test]
    fn unknown_trend_is_a_decode_error() {
        let err = serde_json::from_str::<AqiTrend>("\"sideways\"");
        assert!(err.is_err());
    }
}
