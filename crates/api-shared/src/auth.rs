//! Bearer token validation.
//!
//! Tokens are HS256 JWTs issued for the gateway audience. The patient the caller is signed in as
//! travels in the `hdid` claim.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,
    #[error("authorization header is not a bearer token")]
    MalformedHeader,
    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
    #[error("token has no hdid claim")]
    MissingHdid,
}

#[derive(Debug, Deserialize)]
struct Claims {
    hdid: Option<String>,
}

/// Caller identity extracted from a validated token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub hdid: String,
    /// The raw token, forwarded to PHSA on the caller's behalf.
    pub access_token: String,
}

#[derive(Clone)]
pub struct TokenValidator {
    key: DecodingKey,
    validation: Validation,
}

impl TokenValidator {
    pub fn new(secret: &str, audience: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[audience]);
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Validate an `Authorization` header value.
    pub fn authenticate(&self, header: Option<&str>) -> Result<AuthenticatedUser, AuthError> {
        let token = bearer_token(header)?;
        let data = decode::<Claims>(token, &self.key, &self.validation)?;
        let hdid = data
            .claims
            .hdid
            .filter(|h| !h.trim().is_empty())
            .ok_or(AuthError::MissingHdid)?;
        Ok(AuthenticatedUser {
            hdid,
            access_token: token.to_string(),
        })
    }
}

fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MissingToken)?;
    let (scheme, token) = header.split_once(' ').ok_or(AuthError::MalformedHeader)?;
    if !scheme.eq_ignore_ascii_case("bearer") || token.trim().is_empty() {
        return Err(AuthError::MalformedHeader);
    }
    Ok(token.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    fn token(secret: &str, claims: serde_json::Value) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn exp() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs()
            + 600
    }

    #[test]
    fn accepts_valid_token() {
        let validator = TokenValidator::new("secret", "health-gateway");
        let jwt = token(
            "secret",
            json!({"hdid": "ABC", "aud": "health-gateway", "exp": exp()}),
        );
        let user = validator
            .authenticate(Some(&format!("Bearer {jwt}")))
            .unwrap();
        assert_eq!(user.hdid, "ABC");
        assert_eq!(user.access_token, jwt);
    }

    #[test]
    fn rejects_wrong_secret_audience_and_missing_hdid() {
        let validator = TokenValidator::new("secret", "health-gateway");
        for jwt in [
            token("other", json!({"hdid": "A", "aud": "health-gateway", "exp": exp()})),
            token("secret", json!({"hdid": "A", "aud": "elsewhere", "exp": exp()})),
        ] {
            assert!(matches!(
                validator.authenticate(Some(&format!("Bearer {jwt}"))),
                Err(AuthError::InvalidToken(_))
            ));
        }

        let jwt = token("secret", json!({"aud": "health-gateway", "exp": exp()}));
        assert!(matches!(
            validator.authenticate(Some(&format!("Bearer {jwt}"))),
            Err(AuthError::MissingHdid)
        ));
    }

    #[test]
    fn header_must_be_bearer() {
        let validator = TokenValidator::new("secret", "aud");
        assert!(matches!(validator.authenticate(None), Err(AuthError::MissingToken)));
        assert!(matches!(
            validator.authenticate(Some("Basic abc")),
            Err(AuthError::MalformedHeader)
        ));
        assert!(matches!(
            validator.authenticate(Some("Bearer")),
            Err(AuthError::MalformedHeader)
        ));
    }
}
