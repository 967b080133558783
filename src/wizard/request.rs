//! Projection of the wizard state onto the recommendation request wire shape.

use serde::{Deserialize, Serialize};

use super::model::{FamilyHealth, FamilyType, HealthConditions, LocationConstraint, Profile};
use super::state::ProfileFormState;

/// Body of `POST /api/recommendations/`.
///
/// Field names and optionality are part of the wire contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationRequest {
    pub current_city: String,
    pub age: u8,
    pub profession: String,
    pub max_distance_km: u32,
    /// `null` on the wire when the user set no budget.
    pub monthly_budget: Option<u32>,
    pub family_type: FamilyType,
    pub total_members: u8,
    pub children: u8,
    pub elderly: u8,
    pub health_conditions: HealthConditions,
}

/// Flatten the three step payloads into a request.
///
/// Step gating has already guaranteed the mandatory fields, so the only
/// conversion here is the budget text.
pub fn build_request(
    profile: &Profile,
    location: &LocationConstraint,
    family: &FamilyHealth,
) -> MigrationRequest {
    MigrationRequest {
        current_city: location.current_city.clone(),
        age: profile.age,
        profession: profile.profession.clone(),
        max_distance_km: location.max_distance_km,
        monthly_budget: parse_budget(&location.monthly_budget),
        family_type: family.family_type,
        total_members: family.total_members,
        children: family.children,
        elderly: family.elderly,
        health_conditions: family.health_conditions.clone(),
    }
}

/// Blank means no budget constraint; anything else is a base-10 integer.
///
/// Text that is not an integer is treated as blank rather than failing the
/// submission.
pub fn parse_budget(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<u32>() {
        Ok(amount) => Some(amount),
        Err(e) => {
            tracing::warn!(budget = %trimmed, error = %e, "Ignoring unparseable monthly budget");
            None
        }
    }
}

impl ProfileFormState {
    /// Build the recommendation request from the current form.
    pub fn to_request(&self) -> MigrationRequest {
        build_request(&self.profile, &self.location, &self.family_health)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::model::HealthCondition;

    fn delhi_form(budget: &str) -> ProfileFormState {
        let mut state = ProfileFormState::new();
        state.set_name("Amit");
        state.set_age(34);
        state.set_profession("IT/Software");
        state.set_current_city("Delhi");
        state.set_max_distance_km(500);
        state.set_monthly_budget(budget);
        state.set_family_type(FamilyType::NuclearFamily);
        state.set_total_members_input("4");
        state.set_children_input("1");
        state.set_elderly_input("0");
        state.toggle_health_condition(HealthCondition::Asthma);
        state
    }

    #[test]
    fn blank_budget_maps_to_null() {
        assert_eq!(delhi_form("").to_request().monthly_budget, None);
        assert_eq!(delhi_form("   ").to_request().monthly_budget, None);
    }

    #[test]
    fn numeric_budget_is_parsed() {
        assert_eq!(delhi_form("1500").to_request().monthly_budget, Some(1500));
        assert_eq!(delhi_form(" 20000 ").to_request().monthly_budget, Some(20000));
    }

    #[test]
    fn garbage_budget_is_treated_as_blank() {
        assert_eq!(parse_budget("twenty"), None);
        assert_eq!(parse_budget("-500"), None);
    }

    #[test]
    fn other_fields_are_copied_verbatim() {
        let form = delhi_form("20000");
        let request = form.to_request();
        assert_eq!(request.current_city, "Delhi");
        assert_eq!(request.age, 34);
        assert_eq!(request.profession, "IT/Software");
        assert_eq!(request.max_distance_km, 500);
        assert_eq!(request.family_type, FamilyType::NuclearFamily);
        assert_eq!(request.total_members, 4);
        assert_eq!(request.children, 1);
        assert_eq!(request.elderly, 0);
        assert_eq!(
            request.health_conditions.as_slice(),
            &[HealthCondition::Asthma]
        );
    }

    #[test]
    fn build_is_idempotent_and_leaves_form_untouched() {
        let form = delhi_form("20000");
        let before = form.clone();
        let first = form.to_request();
        let second = form.to_request();
        assert_eq!(first, second);
        assert_eq!(form, before);
    }

    #[test]
    fn wire_shape_uses_snake_case_and_null_budget() {
        let request = delhi_form("").to_request();
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["current_city"], "Delhi");
        assert_eq!(json["max_distance_km"], 500);
        assert!(json["monthly_budget"].is_null());
        assert_eq!(json["family_type"], "Nuclear Family");
        assert_eq!(json["health_conditions"], serde_json::json!(["Asthma"]));

        let keys: Vec<&str> = json
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys.len(), 10);
    }
}
