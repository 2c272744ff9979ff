//! Gateway runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into services. Nothing in
//! request handling reads process-wide environment variables; binaries call
//! [`GatewayConfig::from_lookup`] with `std::env::var`, tests call it with a map.

use crate::constants::DEFAULT_DATA_DIR;
use crate::{GatewayError, GatewayResult};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Token validation settings.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub audience: String,
}

/// SOAP Client Registry endpoint.
#[derive(Clone, Debug)]
pub struct ClientRegistryConfig {
    pub endpoint: String,
}

/// PHSA REST API settings.
#[derive(Clone, Debug)]
pub struct PhsaConfig {
    pub base_url: String,
    /// Token used for unauthenticated (public) lookups.
    pub system_token: Option<String>,
    pub immunization_limit: usize,
}

/// BC Mail Plus document generation settings.
#[derive(Clone, Debug)]
pub struct BcMailPlusConfig {
    pub base_url: String,
    pub job_class: String,
    pub max_attempts: u32,
    pub backoff: Duration,
}

/// Gateway configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    rest_addr: String,
    data_dir: PathBuf,
    auth: AuthConfig,
    client_registry: ClientRegistryConfig,
    phsa: PhsaConfig,
    bc_mail_plus: BcMailPlusConfig,
    patient_cache_ttl: Duration,
    upstream_timeout: Duration,
    max_dependent_age: u32,
    min_patient_age: u32,
}

impl GatewayConfig {
    /// Resolve configuration from a key lookup.
    ///
    /// Required keys: `AUTH_JWT_SECRET`, `CLIENT_REGISTRY_URL`, `PHSA_BASE_URL`,
    /// `BCMAILPLUS_BASE_URL`. Every other key falls back to a default.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if a required key is missing, a URL does not parse, or a numeric
    /// value is not a valid number.
    pub fn from_lookup<F>(lookup: F) -> GatewayResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let jwt_secret = get("AUTH_JWT_SECRET").ok_or(GatewayError::MissingConfig("AUTH_JWT_SECRET"))?;

        Ok(Self {
            rest_addr: get("GATEWAY_REST_ADDR").unwrap_or_else(|| "0.0.0.0:3000".into()),
            data_dir: get("GATEWAY_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            auth: AuthConfig {
                jwt_secret,
                audience: get("AUTH_AUDIENCE").unwrap_or_else(|| "health-gateway".into()),
            },
            client_registry: ClientRegistryConfig {
                endpoint: required_url("CLIENT_REGISTRY_URL", get("CLIENT_REGISTRY_URL"))?,
            },
            phsa: PhsaConfig {
                base_url: required_url("PHSA_BASE_URL", get("PHSA_BASE_URL"))?,
                system_token: get("PHSA_SYSTEM_TOKEN"),
                immunization_limit: parse_number(
                    "PHSA_IMMUNIZATION_LIMIT",
                    get("PHSA_IMMUNIZATION_LIMIT"),
                    1000,
                )?,
            },
            bc_mail_plus: BcMailPlusConfig {
                base_url: required_url("BCMAILPLUS_BASE_URL", get("BCMAILPLUS_BASE_URL"))?,
                job_class: get("BCMAILPLUS_JOB_CLASS").unwrap_or_else(|| "HLTH-SHCS".into()),
                max_attempts: parse_number(
                    "BCMAILPLUS_MAX_ATTEMPTS",
                    get("BCMAILPLUS_MAX_ATTEMPTS"),
                    5,
                )?,
                backoff: Duration::from_millis(parse_number(
                    "BCMAILPLUS_BACKOFF_MS",
                    get("BCMAILPLUS_BACKOFF_MS"),
                    1000,
                )?),
            },
            patient_cache_ttl: Duration::from_secs(
                60 * parse_number::<u64>(
                    "PATIENT_CACHE_TTL_MINUTES",
                    get("PATIENT_CACHE_TTL_MINUTES"),
                    90,
                )?,
            ),
            upstream_timeout: Duration::from_secs(parse_number(
                "UPSTREAM_TIMEOUT_SECS",
                get("UPSTREAM_TIMEOUT_SECS"),
                30,
            )?),
            max_dependent_age: parse_number("MAX_DEPENDENT_AGE", get("MAX_DEPENDENT_AGE"), 12)?,
            min_patient_age: parse_number("MIN_PATIENT_AGE", get("MIN_PATIENT_AGE"), 12)?,
        })
    }

    pub fn rest_addr(&self) -> &str {
        &self.rest_addr
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn auth(&self) -> &AuthConfig {
        &self.auth
    }

    pub fn client_registry(&self) -> &ClientRegistryConfig {
        &self.client_registry
    }

    pub fn phsa(&self) -> &PhsaConfig {
        &self.phsa
    }

    pub fn bc_mail_plus(&self) -> &BcMailPlusConfig {
        &self.bc_mail_plus
    }

    pub fn patient_cache_ttl(&self) -> Duration {
        self.patient_cache_ttl
    }

    pub fn max_dependent_age(&self) -> u32 {
        self.max_dependent_age
    }

    pub fn min_patient_age(&self) -> u32 {
        self.min_patient_age
    }

    /// Build the shared outbound HTTP client.
    pub fn http_client(&self) -> GatewayResult<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.upstream_timeout)
            .build()
            .map_err(GatewayError::HttpClient)
    }
}

fn required_url(key: &'static str, value: Option<String>) -> GatewayResult<String> {
    let value = value.ok_or(GatewayError::MissingConfig(key))?;
    reqwest::Url::parse(&value).map_err(|e| GatewayError::InvalidConfig {
        key,
        reason: e.to_string(),
    })?;
    Ok(value.trim_end_matches('/').to_string())
}

fn parse_number<T>(key: &'static str, value: Option<String>, default: T) -> GatewayResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(v) => v.parse::<T>().map_err(|e| GatewayError::InvalidConfig {
            key,
            reason: e.to_string(),
        }),
    }
}
