//! Plain-text rendering of a result bundle for the terminal front-end.

use std::fmt::Write;

use crate::api::fallback::format_rupees;
use crate::api::{AqiCategory, Source};

use super::ResultBundle;

pub fn render_bundle(bundle: &ResultBundle) -> String {
    let mut out = String::new();
    let rec = &bundle.recommendations;

    let _ = writeln!(out, "Migration report for {}", bundle.profile.name);
    let _ = writeln!(
        out,
        "Current city: {} (AQI {}, {})",
        bundle.location.current_city,
        rec.current_aqi,
        AqiCategory::from_aqi(rec.current_aqi)
    );
    let _ = writeln!(
        out,
        "Readiness {:.1} | Health urgency {:.1} | Health sensitivity {:.1}",
        rec.readiness_score, rec.health_urgency, rec.health_sensitivity
    );
    let _ = writeln!(out);

    if rec.recommendations.is_empty() {
        let _ = writeln!(out, "No cities matched your constraints.");
    }
    for (rank, city) in rec.recommendations.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {}, {} | suitability {:.1}",
            rank + 1,
            city.city_name,
            city.state,
            city.suitability_score
        );
        let _ = writeln!(
            out,
            "   AQI {} → {} ({}, {}), {:.1}% cleaner air",
            city.current_aqi,
            city.target_aqi,
            AqiCategory::from_aqi(city.target_aqi),
            city.aqi_trend,
            city.aqi_improvement_percent
        );
        let _ = writeln!(
            out,
            "   {:.0} km away, rent ₹{}/month, job match {:.0}, healthcare {:.0}",
            city.distance_km,
            format_rupees(city.avg_rent),
            city.job_match_score,
            city.healthcare_score
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", bundle.advisory.advisory);

    if bundle.recommendation_source == Source::Fallback {
        let _ = writeln!(
            out,
            "\nNote: the recommendation service was unavailable; showing offline suggestions."
        );
    }
    if !bundle.advisory.generated {
        let _ = writeln!(out, "Note: this advisory was prepared from a template, not generated.");
    }

    out
}
