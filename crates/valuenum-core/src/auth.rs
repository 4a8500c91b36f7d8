//! HS256 bearer tokens identifying a caller.
//!
//! Tokens are standard three-segment JWTs (`header.claims.signature`, each
//! base64url without padding) signed with HMAC-SHA256. Only the `HS256`
//! algorithm is accepted.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::error::AuthError;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Caller identifier stored with each calculation.
    pub sub: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
}

/// Issues and verifies tokens for one shared secret.
#[derive(Clone)]
pub struct TokenSigner {
    key: Vec<u8>,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner").finish_non_exhaustive()
    }
}

impl TokenSigner {
    /// # Errors
    /// Returns [`AuthError::MissingSecret`] for an empty secret.
    pub fn new(secret: &str) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::MissingSecret);
        }
        Ok(Self {
            key: secret.as_bytes().to_vec(),
        })
    }

    fn mac(&self) -> Result<HmacSha256, AuthError> {
        HmacSha256::new_from_slice(&self.key).map_err(|_| AuthError::MissingSecret)
    }

    /// Issue a token valid for `ttl` from now.
    ///
    /// # Errors
    /// [`AuthError::InvalidTtl`] if the expiry overflows the date range, or
    /// an error if the claims cannot be encoded.
    pub fn issue(&self, sub: &str, role: Role, ttl: Duration) -> Result<String, AuthError> {
        self.issue_at(sub, role, ttl, Utc::now())
    }

    pub fn issue_at(
        &self,
        sub: &str,
        role: Role,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let expires_at = now.checked_add_signed(ttl).ok_or(AuthError::InvalidTtl)?;
        let claims = Claims {
            sub: sub.to_string(),
            role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let header = Header {
            alg: "HS256".into(),
            typ: "JWT".into(),
        };
        let signing_input = format!("{}.{}", encode_segment(&header)?, encode_segment(&claims)?);

        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        Ok(format!("{signing_input}.{signature}"))
    }

    /// Check signature and expiry, returning the claims.
    ///
    /// # Errors
    /// [`AuthError::Malformed`], [`AuthError::BadSignature`] or [`AuthError::Expired`].
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let mut segments = token.trim().split('.');
        let (header, claims, signature) =
            match (segments.next(), segments.next(), segments.next(), segments.next()) {
                (Some(h), Some(c), Some(s), None) => (h, c, s),
                _ => return Err(AuthError::Malformed("expected three segments".into())),
            };

        let decode = |segment: &str| {
            URL_SAFE_NO_PAD
                .decode(segment)
                .map_err(|e| AuthError::Malformed(e.to_string()))
        };

        let header: Header = serde_json::from_slice(&decode(header)?)
            .map_err(|e| AuthError::Malformed(format!("header: {e}")))?;
        if header.alg != "HS256" {
            return Err(AuthError::Malformed(format!("unsupported alg '{}'", header.alg)));
        }

        let signing_input_len = token.trim().len() - signature.len() - 1;
        let mut mac = self.mac()?;
        mac.update(token.trim()[..signing_input_len].as_bytes());
        mac.verify_slice(&decode(signature)?)
            .map_err(|_| AuthError::BadSignature)?;

        let claims: Claims = serde_json::from_slice(&decode(claims)?)
            .map_err(|e| AuthError::Malformed(format!("claims: {e}")))?;
        if claims.exp <= now.timestamp() {
            return Err(AuthError::Expired);
        }
        Ok(claims)
    }
}

fn encode_segment<T: Serialize>(value: &T) -> Result<String, AuthError> {
    let json = serde_json::to_vec(value).map_err(|e| AuthError::Malformed(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.trim().split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() {
        Some(token.trim())
    } else {
        None
    }
}
