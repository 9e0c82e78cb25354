use std::time::Duration;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sehati_core::models::user::{Role, User};

use crate::error::AuthError;

const ISSUER: &str = "sehati";

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: Uuid,
    pub username: String,
    pub role: Role,
    pub health_unit_id: Option<Uuid>,
    pub iss: String,
    pub iat: u64,
    pub exp: u64,
}

impl SessionClaims {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// A freshly signed token and when it stops being accepted.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: jiff::Timestamp,
}

/// HMAC keys and lifetime for session tokens.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl SessionKeys {
    pub fn new(secret: &[u8], ttl: Duration) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::EmptySecret);
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Sign a session token for `user`, valid from now for the key's TTL.
    pub fn issue(&self, user: &User) -> Result<IssuedToken, AuthError> {
        let now = jiff::Timestamp::now();
        let iat = now.as_second().max(0) as u64;
        let exp = iat + self.ttl.as_secs();

        let claims = SessionClaims {
            sub: user.id,
            username: user.username.clone(),
            role: user.role,
            health_unit_id: user.health_unit_id,
            iss: ISSUER.to_string(),
            iat,
            exp,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        let expires_at = jiff::Timestamp::from_second(exp as i64)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        Ok(IssuedToken { token, expires_at })
    }

    /// Verify signature, issuer and expiry; return the claims.
    pub fn validate(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        validation.validate_exp = true;
        validation.leeway = 0;

        decode::<SessionClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                ErrorKind::InvalidSignature | ErrorKind::InvalidIssuer => {
                    AuthError::InvalidToken(e.to_string())
                }
                _ => AuthError::Jwt(e),
            })
    }
}
