//! JWT issuance and validation
//!
//! Tokens are HS256 JWTs whose subject is the username. Validation is
//! stateless apart from one store lookup that re-resolves the subject, so a
//! deleted user's tokens stop working immediately. There is no revocation
//! list: expiry is the only other way a token dies.

use super::{AuthError, Clock, Principal, SystemClock};
use crate::repositories::UserStore;
use anyhow::Result;
use chrono::Duration;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use myflix_shared::AuthFailure;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// The only signing algorithm accepted or produced
pub const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

/// JWT claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Pre-computed JWT keys, derived once at startup
#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    pub fn new(secret: &SecretString) -> Self {
        let secret = secret.expose_secret().as_bytes();
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret)),
            decoding: Arc::new(DecodingKey::from_secret(secret)),
        }
    }

    pub fn encoding(&self) -> &EncodingKey {
        &self.encoding
    }

    pub fn decoding(&self) -> &DecodingKey {
        &self.decoding
    }
}

/// Issues tokens for authenticated principals and turns presented tokens back
/// into principals.
#[derive(Clone)]
pub struct TokenAuthority {
    keys: JwtKeys,
    validation: Validation,
    validity_secs: i64,
    store: Arc<dyn UserStore>,
    clock: Arc<dyn Clock>,
}

impl TokenAuthority {
    /// Create an authority using wall-clock time.
    ///
    /// Call once at startup and share via `AppState`.
    pub fn new(secret: &SecretString, validity_secs: i64, store: Arc<dyn UserStore>) -> Self {
        let mut validation = Validation::new(TOKEN_ALGORITHM);
        // Expiry is checked against `clock` with no leeway.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            keys: JwtKeys::new(secret),
            validation,
            validity_secs,
            store,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Issue a signed token for `principal`.
    ///
    /// An error here is an infrastructure fault, never an `AuthFailure`.
    pub fn issue(&self, principal: &Principal) -> Result<String> {
        let now = self.clock.now();
        let expires_at = Duration::try_seconds(self.validity_secs)
            .and_then(|validity| now.checked_add_signed(validity))
            .ok_or_else(|| {
                anyhow::anyhow!("Token validity of {}s is out of range", self.validity_secs)
            })?;
        let claims = Claims {
            sub: principal.username().to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(TOKEN_ALGORITHM), &claims, self.keys.encoding())
            .map_err(|e| anyhow::anyhow!("Failed to sign token: {}", e))
    }

    /// Verify signature and expiry and return the claims.
    ///
    /// The signature is checked before the claims are deserialized.
    pub fn decode_claims(&self, token: &str) -> Result<Claims, AuthFailure> {
        let token_data = decode::<Claims>(token, self.keys.decoding(), &self.validation)
            .map_err(|e| classify(e.kind()))?;
        let claims = token_data.claims;

        if self.clock.now().timestamp() >= claims.exp {
            return Err(AuthFailure::TokenExpired);
        }

        Ok(claims)
    }

    /// Validate a presented token and resolve its principal from the store.
    pub async fn validate(&self, token: &str) -> Result<Principal, AuthError> {
        let claims = self.decode_claims(token).map_err(|failure| {
            debug!(reason = failure.as_str(), "token rejected");
            failure
        })?;

        let user = self
            .store
            .find_by_username(&claims.sub)
            .await?
            .ok_or_else(|| {
                debug!(
                    reason = AuthFailure::PrincipalNotFound.as_str(),
                    subject = %claims.sub,
                    "token rejected"
                );
                AuthFailure::PrincipalNotFound
            })?;

        Ok(Principal::from(&user))
    }

    /// Token lifetime in seconds
    #[inline]
    pub fn validity_secs(&self) -> i64 {
        self.validity_secs
    }
}

fn classify(kind: &ErrorKind) -> AuthFailure {
    match kind {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
            AuthFailure::TokenSignatureInvalid
        }
        ErrorKind::ExpiredSignature => AuthFailure::TokenExpired,
        _ => AuthFailure::TokenMalformed,
    }
}
