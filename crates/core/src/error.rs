/// Errors raised while assembling the gateway or talking to its collaborators.
///
/// Request-level outcomes travel in [`crate::RequestResult`]; this type covers startup and
/// plumbing failures that callers propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("invalid configuration for {key}: {reason}")]
    InvalidConfig { key: &'static str, reason: String },
    #[error("missing configuration value: {0}")]
    MissingConfig(&'static str),
    #[error("failed to build http client: {0}")]
    HttpClient(reqwest::Error),
    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to parse XML: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("XML document has no root element")]
    EmptyXml,
}

pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// Errors returned by the JSON store delegates.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("record not found")]
    NotFound,
    #[error("record version does not match the stored version")]
    Concurrency,
    #[error("record already exists")]
    AlreadyExists,
    #[error("failed to access store: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to (de)serialise record: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type DbResult<T> = std::result::Result<T, DbError>;
