//! Constants used throughout the gateway core crate.
//!
//! Identifier OIDs, Client Registry response codes, and store layout names live here so the
//! delegates and their tests agree on a single definition.

/// Default directory for the JSON store when no explicit directory is configured.
pub const DEFAULT_DATA_DIR: &str = "gateway_data";

/// Collection directory for user profiles.
pub const PROFILES_COLLECTION: &str = "profiles";

/// Collection directory for user comments.
pub const COMMENTS_COLLECTION: &str = "comments";

/// Collection directory for user notes.
pub const NOTES_COLLECTION: &str = "notes";

/// Collection directory for dependent (resource delegate) links.
pub const DEPENDENTS_COLLECTION: &str = "dependents";

/// Filename for a user profile document.
pub const PROFILE_FILENAME: &str = "profile.json";

/// Filename for a dependent link list.
pub const DEPENDENTS_FILENAME: &str = "dependents.json";

/// OID identifying an HDID in Client Registry messages.
pub const OID_HDID: &str = "2.16.840.1.113883.3.51.1.1.6";

/// OID identifying a PHN in Client Registry messages.
pub const OID_PHN: &str = "2.16.840.1.113883.3.51.1.1.6.1";

/// Prefix shared by all successful Client Registry query response codes.
pub const CR_SUCCESS_PREFIX: &str = "BCHCIM.GD.0.";

/// Client Registry response codes that carry a warning but still return a person.
pub const CR_WARNING_CODES: [&str; 4] = [
    "BCHCIM.GD.1.0019",
    "BCHCIM.GD.1.0021",
    "BCHCIM.GD.1.0022",
    "BCHCIM.GD.1.0023",
];

/// Client Registry response code for an unknown identifier.
pub const CR_NOT_FOUND: &str = "BCHCIM.GD.2.0018";

/// Client Registry response code for a malformed PHN.
pub const CR_INVALID_PHN: &str = "BCHCIM.GD.2.0006";

/// Maximum length of a comment body.
pub const MAX_COMMENT_LENGTH: usize = 1000;

/// Maximum length of a note title.
pub const MAX_NOTE_TITLE_LENGTH: usize = 100;
