//! Wizard state machine: which step the user is on and whether they may
//! move forward.

use serde::{Deserialize, Serialize};

use crate::error::WizardError;

use super::model::{
    AGE_MAX, AGE_MIN, DEPENDANTS_MAX, DISTANCE_MAX_KM, DISTANCE_MIN_KM, FamilyHealth, FamilyType,
    HealthCondition, LocationConstraint, MEMBERS_MAX, MEMBERS_MIN, Profile,
};

/// The steps of the migration wizard.
///
/// Progresses linearly: Identity → Location → FamilyHealth. The last step
/// submits instead of advancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    Identity,
    Location,
    FamilyHealth,
}

impl WizardStep {
    pub const ALL: [WizardStep; 3] = [Self::Identity, Self::Location, Self::FamilyHealth];

    /// Zero-based position, as shown by the step indicator.
    pub fn index(&self) -> usize {
        match self {
            Self::Identity => 0,
            Self::Location => 1,
            Self::FamilyHealth => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn next(&self) -> Option<WizardStep> {
        Self::from_index(self.index() + 1)
    }

    pub fn previous(&self) -> Option<WizardStep> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    /// Whether this step submits rather than advances.
    pub fn is_terminal(&self) -> bool {
        self.next().is_none()
    }

    /// Heading shown by the front-end.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Identity => "Personal Info",
            Self::Location => "Location",
            Self::FamilyHealth => "Family & Health",
        }
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Identity => "identity",
            Self::Location => "location",
            Self::FamilyHealth => "family_health",
        };
        write!(f, "{s}")
    }
}

/// In-memory state of the whole wizard.
///
/// All three payloads live for the lifetime of the wizard, so going back a
/// step never loses what was entered further ahead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileFormState {
    pub step: WizardStep,
    pub profile: Profile,
    pub location: LocationConstraint,
    pub family_health: FamilyHealth,
}

impl ProfileFormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Why `step` cannot be left yet, or `None` when it can.
    pub fn blocking_reason(&self, step: WizardStep) -> Option<&'static str> {
        match step {
            WizardStep::Identity => {
                if self.profile.name.trim().is_empty() {
                    Some("name is required")
                } else if self.profile.profession.is_empty() {
                    Some("profession is required")
                } else {
                    None
                }
            }
            WizardStep::Location => {
                if self.location.current_city.is_empty() {
                    Some("current city is required")
                } else {
                    None
                }
            }
            // Terminal step: submission itself may still fail downstream.
            WizardStep::FamilyHealth => None,
        }
    }

    /// Whether the user may leave `step` going forward.
    pub fn can_advance(&self, step: WizardStep) -> bool {
        self.blocking_reason(step).is_none()
    }

    /// Move to the next step if the current one is complete.
    pub fn advance(&mut self) -> Result<WizardStep, WizardError> {
        if let Some(reason) = self.blocking_reason(self.step) {
            return Err(WizardError::Incomplete {
                step: self.step.to_string(),
                reason: reason.to_string(),
            });
        }
        let next = self.step.next().ok_or_else(|| WizardError::AtLastStep {
            step: self.step.to_string(),
        })?;
        self.step = next;
        Ok(next)
    }

    /// Move to the previous step. Never touches any payload.
    pub fn back(&mut self) -> Result<WizardStep, WizardError> {
        let previous = self.step.previous().ok_or_else(|| WizardError::AtFirstStep {
            step: self.step.to_string(),
        })?;
        self.step = previous;
        Ok(previous)
    }

    /// Every step before the terminal one must be complete to submit.
    pub fn ensure_submittable(&self) -> Result<(), WizardError> {
        for step in WizardStep::ALL {
            if let Some(reason) = self.blocking_reason(step) {
                return Err(WizardError::Incomplete {
                    step: step.to_string(),
                    reason: reason.to_string(),
                });
            }
        }
        Ok(())
    }

    // ── Input boundary ─────────────────────────────────────────────────

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.profile.name = name.into();
    }

    pub fn set_age(&mut self, age: u8) {
        self.profile.age = age.clamp(AGE_MIN, AGE_MAX);
    }

    pub fn set_profession(&mut self, profession: impl Into<String>) {
        self.profile.profession = profession.into();
    }

    pub fn set_current_city(&mut self, city: impl Into<String>) {
        self.location.current_city = city.into();
    }

    pub fn set_max_distance_km(&mut self, km: u32) {
        self.location.max_distance_km = km.clamp(DISTANCE_MIN_KM, DISTANCE_MAX_KM);
    }

    pub fn set_monthly_budget(&mut self, budget: impl Into<String>) {
        self.location.monthly_budget = budget.into();
    }

    pub fn set_family_type(&mut self, family_type: FamilyType) {
        self.family_health.family_type = family_type;
    }

    /// Non-numeric input resolves to 1.
    pub fn set_total_members_input(&mut self, input: &str) {
        self.family_health.total_members = parse_count(input, MEMBERS_MIN, MEMBERS_MIN, MEMBERS_MAX);
    }

    /// Non-numeric input resolves to 0.
    pub fn set_children_input(&mut self, input: &str) {
        self.family_health.children = parse_count(input, 0, 0, DEPENDANTS_MAX);
    }

    /// Non-numeric input resolves to 0.
    pub fn set_elderly_input(&mut self, input: &str) {
        self.family_health.elderly = parse_count(input, 0, 0, DEPENDANTS_MAX);
    }

    pub fn toggle_health_condition(&mut self, condition: HealthCondition) {
        self.family_health.health_conditions =
            self.family_health.health_conditions.toggled(condition);
    }
}

/// Parse a household count, falling back to `default` on garbage and
/// clamping into `[min, max]`.
pub fn parse_count(input: &str, default: u8, min: u8, max: u8) -> u8 {
    match input.trim().parse::<i64>() {
        Ok(n) => n.clamp(i64::from(min), i64::from(max)) as u8,
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(name: &str, profession: &str) -> ProfileFormState {
        let mut state = ProfileFormState::new();
        state.set_name(name);
        state.set_profession(profession);
        state
    }

    #[test]
    fn identity_gate_requires_name_and_profession() {
        assert!(!identity("", "IT/Software").can_advance(WizardStep::Identity));
        assert!(!identity("Amit", "").can_advance(WizardStep::Identity));
        assert!(identity("Amit", "IT/Software").can_advance(WizardStep::Identity));
    }

    #[test]
    fn identity_gate_trims_whitespace_name() {
        assert!(!identity("   ", "Finance").can_advance(WizardStep::Identity));
    }

    #[test]
    fn location_gate_only_checks_city() {
        let mut state = ProfileFormState::new();
        state.set_monthly_budget("not a number");
        assert!(!state.can_advance(WizardStep::Location));

        state.set_current_city("Delhi");
        assert!(state.can_advance(WizardStep::Location));
    }

    #[test]
    fn family_step_is_always_ready() {
        assert!(ProfileFormState::new().can_advance(WizardStep::FamilyHealth));
    }

    #[test]
    fn advance_is_gated_and_stops_at_last_step() {
        let mut state = ProfileFormState::new();
        assert!(matches!(
            state.advance(),
            Err(WizardError::Incomplete { .. })
        ));

        state.set_name("Amit");
        state.set_profession("IT/Software");
        assert_eq!(state.advance().unwrap(), WizardStep::Location);

        state.set_current_city("Delhi");
        assert_eq!(state.advance().unwrap(), WizardStep::FamilyHealth);
        assert!(matches!(state.advance(), Err(WizardError::AtLastStep { .. })));
    }

    #[test]
    fn back_keeps_later_step_data() {
        let mut state = identity("Amit", "IT/Software");
        state.advance().unwrap();
        state.set_current_city("Pune");
        state.set_monthly_budget("18000");
        state.advance().unwrap();
        state.toggle_health_condition(HealthCondition::Asthma);

        state.back().unwrap();
        state.back().unwrap();
        assert_eq!(state.step, WizardStep::Identity);
        assert!(matches!(state.back(), Err(WizardError::AtFirstStep { .. })));

        assert_eq!(state.location.current_city, "Pune");
        assert_eq!(state.location.monthly_budget, "18000");
        assert!(state.family_health.health_conditions.contains(HealthCondition::Asthma));
    }

    #[test]
    fn numeric_inputs_default_on_garbage() {
        let mut state = ProfileFormState::new();
        state.set_total_members_input("four");
        state.set_children_input("");
        state.set_elderly_input("x");
        assert_eq!(state.family_health.total_members, 1);
        assert_eq!(state.family_health.children, 0);
        assert_eq!(state.family_health.elderly, 0);
    }

    #[test]
    fn numeric_inputs_clamp_to_bounds() {
        let mut state = ProfileFormState::new();
        state.set_total_members_input("45");
        state.set_children_input("-3");
        state.set_elderly_input(" 7 ");
        state.set_age(95);
        state.set_max_distance_km(20);
        assert_eq!(state.family_health.total_members, 20);
        assert_eq!(state.family_health.children, 0);
        assert_eq!(state.family_health.elderly, 7);
        assert_eq!(state.profile.age, 80);
        assert_eq!(state.location.max_distance_km, 100);
    }

    #[test]
    fn ensure_submittable_reports_first_incomplete_step() {
        let mut state = identity("Amit", "IT/Software");
        let err = state.ensure_submittable().unwrap_err();
        assert_eq!(
            err,
            WizardError::Incomplete {
                step: "location".into(),
                reason: "current city is required".into(),
            }
        );

        state.set_current_city("Delhi");
        assert!(state.ensure_submittable().is_ok());
    }

    #[test]
    fn step_walks_forward_and_back() {
        assert_eq!(WizardStep::Identity.next(), Some(WizardStep::Location));
        assert_eq!(WizardStep::Location.next(), Some(WizardStep::FamilyHealth));
        assert!(WizardStep::FamilyHealth.is_terminal());
        assert_eq!(WizardStep::Identity.previous(), None);
        assert_eq!(WizardStep::FamilyHealth.previous(), Some(WizardStep::Location));
    }

    #[test]
    fn display_matches_serde() {
        for step in WizardStep::ALL {
            let json = serde_json::to_string(&step).unwrap();
            assert_eq!(format!("\"{step}\""), json);
        }
    }
}
