//! Delegates wrap a single upstream system or store and report outcomes as
//! [`crate::RequestResult`] (upstream HTTP/SOAP) or [`crate::DbResult`] (store).

pub mod client_registry;
pub mod comment;
pub mod dependent;
pub mod immunization;
pub mod note;
pub mod phsa;
pub mod user_profile;
pub mod vaccine_proof;
pub mod vaccine_status;

pub use client_registry::{ClientRegistryDelegate, SoapClientRegistryDelegate};
pub use comment::{CommentDelegate, JsonCommentDelegate};
pub use dependent::{JsonResourceDelegateDelegate, ResourceDelegateDelegate};
pub use immunization::{ImmunizationDelegate, RestImmunizationDelegate};
pub use note::{JsonNoteDelegate, NoteDelegate};
pub use phsa::{PhsaLoadState, PhsaResult};
pub use user_profile::{JsonUserProfileDelegate, UserProfileDelegate};
pub use vaccine_proof::{BcMailPlusDelegate, VaccineProofDelegate};
pub use vaccine_status::{RestVaccineStatusDelegate, VaccineStatusDelegate, VaccineStatusQuery};
