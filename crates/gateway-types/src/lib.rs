//! Validated primitive types shared across the Health Gateway crates.
//!
//! Each type guarantees its invariant once constructed, so services and delegates can accept
//! them without repeating input checks.

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
    /// The input text exceeded the allowed length
    #[error("Text exceeds maximum length of {max} characters")]
    TooLong { max: usize },
}

/// Errors returned when parsing patient identifiers.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("hdid cannot be empty")]
    EmptyHdid,
    #[error("hdid must be at most {max} alphanumeric characters")]
    InvalidHdid { max: usize },
    #[error("phn must be 10 digits starting with 9")]
    MalformedPhn,
    #[error("phn check digit does not match")]
    PhnChecksum,
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// Returns `Err(TextError::Empty)` if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Creates a `NonEmptyText` bounded to `max` characters after trimming.
    pub fn bounded(input: impl AsRef<str>, max: usize) -> Result<Self, TextError> {
        let text = Self::new(input)?;
        if text.0.chars().count() > max {
            return Err(TextError::TooLong { max });
        }
        Ok(text)
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// Health Gateway's internal patient identifier.
///
/// HDIDs are opaque ASCII alphanumeric strings issued by the identity provider. They are compared
/// case-sensitively everywhere except when matched against Client Registry responses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Hdid(String);

impl Hdid {
    pub const MAX_LEN: usize = 64;

    pub fn parse(input: impl AsRef<str>) -> Result<Self, IdentifierError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(IdentifierError::EmptyHdid);
        }
        if trimmed.len() > Self::MAX_LEN || !trimmed.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(IdentifierError::InvalidHdid { max: Self::MAX_LEN });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Hdid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Hdid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Personal Health Number, the provincial patient identifier.
///
/// A valid PHN is ten digits, starts with `9`, and ends with a mod-11 check digit computed over
/// digits two to nine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Phn(String);

impl Phn {
    const WEIGHTS: [u32; 9] = [0, 2, 4, 8, 5, 10, 9, 7, 3];

    pub fn parse(input: impl AsRef<str>) -> Result<Self, IdentifierError> {
        let phn: String = input
            .as_ref()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        if phn.len() != 10 || !phn.bytes().all(|b| b.is_ascii_digit()) || !phn.starts_with('9') {
            return Err(IdentifierError::MalformedPhn);
        }

        let digits: Vec<u32> = phn.bytes().map(|b| u32::from(b - b'0')).collect();
        let sum: u32 = (1..9).map(|i| digits[i] * Self::WEIGHTS[i] % 11).sum();
        let check = 11 - (sum % 11);
        if check != digits[9] {
            return Err(IdentifierError::PhnChecksum);
        }

        Ok(Self(phn))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Phn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Phn {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
