use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::time::Duration;
use uuid::Uuid;

use crate::core::{AppError, AppResult};
use crate::models::User;

type HmacSha256 = Hmac<Sha256>;

/// Identity carried by a bearer token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub admin: bool,
    /// Expiry as a unix timestamp in seconds
    pub exp: i64,
}

/// Issues and verifies `<payload>.<signature>` tokens, both parts base64url
/// without padding, signed with HMAC-SHA256.
pub struct TokenSigner {
    key: Vec<u8>,
    ttl_secs: i64,
}

impl TokenSigner {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            key: secret.as_bytes().to_vec(),
            ttl_secs: i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX),
        }
    }

    pub fn issue(&self, user: &User) -> AppResult<String> {
        self.issue_at(user, Utc::now())
    }

    pub fn issue_at(&self, user: &User, now: DateTime<Utc>) -> AppResult<String> {
        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            admin: user.is_admin,
            exp: now.timestamp().saturating_add(self.ttl_secs),
        };
        let json = serde_json::to_vec(&claims)
            .map_err(|err| AppError::internal(format!("failed to encode claims: {err}")))?;
        let payload = B64.encode(json);
        let signature = B64.encode(self.mac(&payload)?.finalize().into_bytes());
        Ok(format!("{payload}.{signature}"))
    }

    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> AppResult<Claims> {
        let (payload, signature) = token
            .split_once('.')
            .ok_or_else(|| AppError::unauthorized("malformed token"))?;

        let signature = B64
            .decode(signature)
            .map_err(|_| AppError::unauthorized("malformed token"))?;
        self.mac(payload)?
            .verify_slice(&signature)
            .map_err(|_| AppError::unauthorized("invalid token signature"))?;

        let json = B64
            .decode(payload)
            .map_err(|_| AppError::unauthorized("malformed token"))?;
        let claims: Claims =
            serde_json::from_slice(&json).map_err(|_| AppError::unauthorized("malformed token"))?;

        if claims.exp <= now.timestamp() {
            return Err(AppError::unauthorized("token expired"));
        }

        Ok(claims)
    }

    fn mac(&self, payload: &str) -> AppResult<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .map_err(|err| AppError::internal(format!("invalid token key: {err}")))?;
        mac.update(payload.as_bytes());
        Ok(mac)
    }
}
