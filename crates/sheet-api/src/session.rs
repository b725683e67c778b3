//! Signed session tokens and password hashing.
//!
//! A token is `base64url(claims) "." hex(hmac_sha256(secret, base64url(claims)))`
//! with claims `{"uid": .., "exp": <unix seconds>}`.

use std::sync::Arc;

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use sheet_types::SESSION_COOKIE;

type HmacSha256 = Hmac<Sha256>;

#[derive(Serialize, Deserialize)]
struct Claims {
    uid: String,
    exp: i64,
}

#[derive(Clone)]
pub struct SessionKeys {
    secret: Arc<Vec<u8>>,
    ttl: Duration,
    secure: bool,
}

impl SessionKeys {
    pub fn new(secret: &str, ttlHours: i64) -> Self {
        Self {
            secret: Arc::new(secret.as_bytes().to_vec()),
            ttl: Duration::hours(ttlHours.max(1)),
            secure: true,
        }
    }

    /// Browsers drop `Secure` cookies on plain HTTP, so local http sites turn it off.
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    fn attributes(&self) -> &'static str {
        if self.secure {
            "HttpOnly; Secure; SameSite=Lax; Path=/"
        } else {
            "HttpOnly; SameSite=Lax; Path=/"
        }
    }

    fn mac(&self) -> HmacSha256 {
        // HMAC accepts keys of any length
        HmacSha256::new_from_slice(&self.secret).unwrap_or_else(|_| unreachable!())
    }

    pub fn issue(&self, uid: &str, now: DateTime<Utc>) -> String {
        let claims = Claims {
            uid: uid.to_string(),
            exp: (now + self.ttl).timestamp(),
        };
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap_or_default());
        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());
        format!("{payload}.{signature}")
    }

    /// The uid inside a valid, unexpired token.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Option<String> {
        let (payload, signature) = token.split_once('.')?;
        let signature = hex::decode(signature).ok()?;
        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature).ok()?;

        let claims: Claims = serde_json::from_slice(&URL_SAFE_NO_PAD.decode(payload).ok()?).ok()?;
        (claims.exp > now.timestamp()).then_some(claims.uid)
    }

    pub fn cookie(&self, token: &str) -> String {
        format!(
            "{SESSION_COOKIE}={token}; {}; Max-Age={}",
            self.attributes(),
            self.ttl.num_seconds()
        )
    }

    pub fn clear_cookie(&self) -> String {
        format!("{SESSION_COOKIE}=; {}; Max-Age=0", self.attributes())
    }
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}
