//! HS256 access tokens.
//!
//! Claims are `{userId, email, iat, exp}`. Verification maps every failure onto
//! the three client-visible reasons in [`AuthError`].

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};

use chatrelay_core::auth::token::{TokenIssuer, TokenVerifier, strip_bearer};
use chatrelay_types::error::AuthError;
use chatrelay_types::user::Claims;

/// Signs and verifies access tokens with a shared secret.
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtTokenService {
    pub fn new(secret: &SecretString, ttl_hours: i64) -> Self {
        let key = secret.expose_secret().as_bytes();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(key),
            decoding: DecodingKey::from_secret(key),
            validation,
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Sign arbitrary claims. Used by `issue` and by tests that need
    /// hand-crafted (e.g. already expired) tokens.
    pub fn sign(&self, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
    }

    pub fn decode_claims(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(strip_bearer(token), &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::Invalid,
            })
    }
}

impl TokenVerifier for JwtTokenService {
    fn verify(&self, token: &str) -> Result<String, AuthError> {
        let claims = self.decode_claims(token)?;
        claims
            .user_id
            .filter(|id| !id.is_empty())
            .ok_or(AuthError::MissingSubject)
    }
}

impl TokenIssuer for JwtTokenService {
    fn issue(&self, user_id: &str, email: &str) -> Result<String, String> {
        let now = Utc::now();
        let claims = Claims {
            user_id: Some(user_id.to_string()),
            email: Some(email.to_string()),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        self.sign(&claims).map_err(|e| e.to_string())
    }
}
