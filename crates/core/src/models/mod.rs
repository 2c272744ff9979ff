//! Gateway view models.
//!
//! These are the shapes returned to clients. Upstream wire shapes stay private to the delegates
//! that parse them.

pub mod comment;
pub mod dependent;
pub mod immunization;
pub mod note;
pub mod patient;
pub mod user_profile;
pub mod vaccine_status;

pub use comment::{CommentEntryType, UserComment};
pub use dependent::{DependentInformation, DependentModel, ResourceDelegate};
pub use immunization::{
    ImmunizationAgent, ImmunizationDefinition, ImmunizationEvent, ImmunizationRecommendation,
    ImmunizationResult, LoadState, TargetDisease,
};
pub use note::UserNote;
pub use patient::{Address, Name, PatientIdentifierType, PatientModel};
pub use user_profile::UserProfileModel;
pub use vaccine_status::{
    EncodedMedia, VaccineProofResponse, VaccineProofTemplate, VaccineState, VaccineStatus,
};
