//! Migration wizard: the three-step form that produces a recommendation
//! request.
//!
//! The state object is plain data. Gating (`can_advance`), health condition
//! toggling and request building are pure functions over it; the front-end
//! only feeds user input through the setters.

pub mod model;
pub mod request;
pub mod state;

pub use model::{FamilyHealth, FamilyType, HealthCondition, HealthConditions, LocationConstraint, Profile};
pub use request::{MigrationRequest, build_request, parse_budget};
pub use state::{ProfileFormState, WizardStep};
