//! Form payloads collected by the three wizard steps.

use serde::{Deserialize, Serialize};

/// Selectable age range (inclusive).
pub const AGE_MIN: u8 = 18;
pub const AGE_MAX: u8 = 80;
/// Age preselected when the wizard opens.
pub const DEFAULT_AGE: u8 = 30;

/// Maximum migration distance range in km (inclusive).
pub const DISTANCE_MIN_KM: u32 = 100;
pub const DISTANCE_MAX_KM: u32 = 2500;
pub const DEFAULT_DISTANCE_KM: u32 = 500;

/// Household size bounds.
pub const MEMBERS_MIN: u8 = 1;
pub const MEMBERS_MAX: u8 = 20;
/// Upper bound for both children and elderly counts.
pub const DEPENDANTS_MAX: u8 = 10;

/// Step 0: who is migrating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub age: u8,
    /// Empty until the user picks one of the reference professions.
    pub profession: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: String::new(),
            age: DEFAULT_AGE,
            profession: String::new(),
        }
    }
}

/// Step 1: where from, and how far / how expensive the move may be.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationConstraint {
    pub current_city: String,
    pub max_distance_km: u32,
    /// Raw budget text as typed. Blank means "no budget constraint";
    /// the request builder owns the conversion.
    pub monthly_budget: String,
}

impl Default for LocationConstraint {
    fn default() -> Self {
        Self {
            current_city: String::new(),
            max_distance_km: DEFAULT_DISTANCE_KM,
            monthly_budget: String::new(),
        }
    }
}

/// Household composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FamilyType {
    #[default]
    #[serde(rename = "Nuclear Family")]
    NuclearFamily,
    #[serde(rename = "Joint Family")]
    JointFamily,
    Single,
    Couple,
}

impl FamilyType {
    /// All variants in display order.
    pub const ALL: [FamilyType; 4] = [
        Self::NuclearFamily,
        Self::JointFamily,
        Self::Single,
        Self::Couple,
    ];

    /// Label used on the wire and in the UI.
    pub fn label(&self) -> &'static str {
        match self {
            Self::NuclearFamily => "Nuclear Family",
            Self::JointFamily => "Joint Family",
            Self::Single => "Single",
            Self::Couple => "Couple",
        }
    }
}

impl std::fmt::Display for FamilyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Health condition tags the service understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HealthCondition {
    None,
    Asthma,
    #[serde(rename = "COPD")]
    Copd,
    Bronchitis,
    #[serde(rename = "Respiratory Allergies")]
    RespiratoryAllergies,
    #[serde(rename = "Lung Disease")]
    LungDisease,
    #[serde(rename = "Heart Disease")]
    HeartDisease,
    #[serde(rename = "Elderly Respiratory Issues")]
    ElderlyRespiratoryIssues,
    Other,
}

impl HealthCondition {
    /// All tags in display order, "None" first.
    pub const ALL: [HealthCondition; 9] = [
        Self::None,
        Self::Asthma,
        Self::Copd,
        Self::Bronchitis,
        Self::RespiratoryAllergies,
        Self::LungDisease,
        Self::HeartDisease,
        Self::ElderlyRespiratoryIssues,
        Self::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Asthma => "Asthma",
            Self::Copd => "COPD",
            Self::Bronchitis => "Bronchitis",
            Self::RespiratoryAllergies => "Respiratory Allergies",
            Self::LungDisease => "Lung Disease",
            Self::HeartDisease => "Heart Disease",
            Self::ElderlyRespiratoryIssues => "Elderly Respiratory Issues",
            Self::Other => "Other",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::None => "No health conditions in family",
            Self::Asthma => "Chronic respiratory condition",
            Self::Copd => "Chronic obstructive pulmonary disease",
            Self::Bronchitis => "Inflammation of bronchial tubes",
            Self::RespiratoryAllergies => "Dust, pollen, or air allergies",
            Self::LungDisease => "Other lung-related conditions",
            Self::HeartDisease => "Cardiovascular conditions",
            Self::ElderlyRespiratoryIssues => "Age-related breathing problems",
            Self::Other => "Specify other health conditions",
        }
    }
}

impl std::fmt::Display for HealthCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Non-empty set of health condition tags in selection order.
///
/// `None` is mutually exclusive with every other tag. The only ways to
/// change the set are [`HealthConditions::toggled`] and deserialization,
/// both of which keep that invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<HealthCondition>", into = "Vec<HealthCondition>")]
pub struct HealthConditions(Vec<HealthCondition>);

impl Default for HealthConditions {
    fn default() -> Self {
        Self(vec![HealthCondition::None])
    }
}

impl HealthConditions {
    /// Apply one UI toggle and return the resulting set.
    ///
    /// - `None` resets the set to `{None}`.
    /// - Any other tag removes `None`, then flips the tag.
    /// - Removing the last real tag reinstates `{None}`.
    pub fn toggled(&self, condition: HealthCondition) -> Self {
        if condition == HealthCondition::None {
            return Self::default();
        }

        let mut next: Vec<HealthCondition> = self
            .0
            .iter()
            .copied()
            .filter(|c| *c != HealthCondition::None)
            .collect();

        if let Some(pos) = next.iter().position(|c| *c == condition) {
            next.remove(pos);
        } else {
            next.push(condition);
        }

        if next.is_empty() {
            Self::default()
        } else {
            Self(next)
        }
    }

    pub fn contains(&self, condition: HealthCondition) -> bool {
        self.0.contains(&condition)
    }

    /// True when the household reported no conditions.
    pub fn is_none(&self) -> bool {
        self.0 == [HealthCondition::None]
    }

    pub fn as_slice(&self) -> &[HealthCondition] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true for a set built through `toggled` or deserialization.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Wire labels, in selection order.
    pub fn labels(&self) -> Vec<String> {
        self.0.iter().map(|c| c.label().to_string()).collect()
    }
}

impl TryFrom<Vec<HealthCondition>> for HealthConditions {
    type Error = String;

    fn try_from(mut tags: Vec<HealthCondition>) -> Result<Self, Self::Error> {
        if tags.is_empty() {
            return Err("health_conditions must contain at least one tag".to_string());
        }
        let mut seen = std::collections::HashSet::new();
        tags.retain(|c| seen.insert(*c));
        if tags.len() > 1 && tags.contains(&HealthCondition::None) {
            return Err("\"None\" cannot be combined with other health conditions".to_string());
        }
        Ok(Self(tags))
    }
}

impl From<HealthConditions> for Vec<HealthCondition> {
    fn from(set: HealthConditions) -> Self {
        set.0
    }
}

/// Step 2: household composition and health.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyHealth {
    pub family_type: FamilyType,
    pub total_members: u8,
    pub children: u8,
    pub elderly: u8,
    pub health_conditions: HealthConditions,
}

impl Default for FamilyHealth {
    fn default() -> Self {
        Self {
            family_type: FamilyType::NuclearFamily,
            total_members: 4,
            children: 1,
            elderly: 0,
            health_conditions: HealthConditions::default(),
        }
    }
}
