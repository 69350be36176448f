//! Bearer credential value object.
//!
//! The credential is opaque to the client. It is only ever exposed when the
//! gateway builds an `Authorization` header or when the session store
//! persists it.

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{DecodingKey, Validation};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Opaque bearer token identifying an authenticated session.
#[derive(Clone)]
pub struct Credential(Secret<String>);

#[derive(Deserialize)]
struct ExpiryClaims {
    exp: i64,
}

impl Credential {
    /// Wraps a raw token. Blank tokens and tokens containing whitespace are
    /// rejected since they can never form a valid `Bearer` header.
    pub fn new(token: impl Into<String>) -> Result<Self, ValidationError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ValidationError::empty_field("credential"));
        }
        if token.chars().any(char::is_whitespace) {
            return Err(ValidationError::invalid_format(
                "credential",
                "must not contain whitespace",
            ));
        }
        Ok(Self(Secret::new(token)))
    }

    /// Exposes the raw token (for request headers and persistence only).
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Expiry of the credential when it is a JWT carrying an `exp` claim.
    ///
    /// The signature is not verified: the server remains the authority, this
    /// only lets the client skip restoring a token it already knows is dead.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let token = self.expose();
        let header = jsonwebtoken::decode_header(token).ok()?;

        let mut validation = Validation::new(header.alg);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let data =
            jsonwebtoken::decode::<ExpiryClaims>(token, &DecodingKey::from_secret(&[]), &validation)
                .ok()?;
        Utc.timestamp_opt(data.claims.exp, 0).single()
    }

    /// Returns true if the credential is known to be expired at `now`.
    /// Credentials without a readable expiry are never considered expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().map(|exp| exp <= now).unwrap_or(false)
    }
}

impl PartialEq for Credential {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for Credential {}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}
