use std::time::Duration;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::oid::ObjectId;
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, warn};

use crate::{auth::claims::Claims, config::JwtConfig, error::ApiError, state::AppState};

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Bad header shape, bad signature, malformed or expired token: callers
    /// never learn which.
    #[error("invalid or missing token")]
    InvalidOrMissing,
    #[error("token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Signing material, built once at startup from the configured secret.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub ttl: Duration,
}

impl JwtKeys {
    pub fn new(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            ttl: Duration::from_secs((cfg.ttl_hours.max(0) as u64) * 3600),
        }
    }

    pub fn issue(&self, user_email: &str, user_id: &str) -> Result<String, TokenError> {
        self.issue_at(user_email, user_id, OffsetDateTime::now_utc())
    }

    pub fn issue_at(
        &self,
        user_email: &str,
        user_id: &str,
        now: OffsetDateTime,
    ) -> Result<String, TokenError> {
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            authorized: true,
            user_email: user_email.to_owned(),
            user_id: user_id.to_owned(),
            exp: exp.unix_timestamp().max(0) as usize,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        debug!(user_id = %user_id, "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            debug!(error = %e, "jwt rejected");
            TokenError::InvalidOrMissing
        })?;
        if !data.claims.authorized {
            return Err(TokenError::InvalidOrMissing);
        }
        debug!(user_id = %data.claims.user_id, "jwt verified");
        Ok(data.claims)
    }

    /// Validates an `Authorization` header value and returns the embedded user id.
    ///
    /// The value must be exactly `Bearer <token>` with a single non-empty token.
    pub fn validate(&self, header_value: &str) -> Result<String, TokenError> {
        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or(TokenError::InvalidOrMissing)?;
        if token.is_empty() || token.contains(char::is_whitespace) {
            return Err(TokenError::InvalidOrMissing);
        }
        Ok(self.verify(token)?.user_id)
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.keys.clone()
    }
}

/// Caller identity resolved from a valid bearer token.
pub struct AuthUser(pub String);

impl AuthUser {
    pub fn object_id(&self) -> Result<ObjectId, ApiError> {
        ObjectId::parse_str(&self.0)
            .map_err(|_| ApiError::BadRequest("Invalid user ID format".into()))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        match keys.validate(header) {
            Ok(user_id) => Ok(AuthUser(user_id)),
            Err(_) => {
                warn!("invalid or missing token");
                Err(ApiError::InvalidToken)
            }
        }
    }
}
