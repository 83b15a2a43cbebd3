//! Identity token verification
//!
//! Users sign in with an external identity provider; every authenticated request
//! carries its HS256-signed token. The server only verifies tokens. `issue` exists so
//! tests and local tooling can mint tokens with the shared secret.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use memex_core::UserId;
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::error::AppError;

/// Claims carried by an identity token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Subject (user id)
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    /// Custom admin claim
    #[serde(default)]
    pub admin: bool,
    pub iat: i64,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

/// Identity established from a valid token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub uid: UserId,
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub admin: bool,
}

impl VerifiedIdentity {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: UserId::new(uid),
            email: String::new(),
            name: None,
            picture: None,
            admin: false,
        }
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_admin(mut self, admin: bool) -> Self {
        self.admin = admin;
        self
    }
}

impl From<IdentityClaims> for VerifiedIdentity {
    fn from(claims: IdentityClaims) -> Self {
        Self {
            uid: UserId::new(claims.sub),
            email: claims.email.unwrap_or_default(),
            name: claims.name,
            picture: claims.picture,
            admin: claims.admin,
        }
    }
}

/// Verifies raw bearer tokens
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// # Errors
    /// `MissingAuth` for an empty token, otherwise `InvalidToken` or `TokenExpired`
    async fn verify(&self, raw_token: &str) -> Result<VerifiedIdentity, AppError>;
}

/// HS256 token verifier sharing a secret with the identity provider
#[derive(Clone)]
pub struct JwtTokenVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: Option<String>,
    audience: Option<String>,
}

impl JwtTokenVerifier {
    #[must_use]
    pub fn new(secret: &str, issuer: Option<String>, audience: Option<String>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            audience,
        }
    }

    #[must_use]
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.token_secret, config.issuer.clone(), config.audience.clone())
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }
        match &self.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }
        validation
    }

    /// Decode and validate a token
    ///
    /// # Errors
    /// Returns an error if the token is malformed, badly signed or expired
    pub fn decode(&self, token: &str) -> Result<IdentityClaims, AppError> {
        decode::<IdentityClaims>(token, &self.decoding_key, &self.validation())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::InvalidToken,
            })
    }

    /// Mint a token for an identity, valid for `ttl`
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn issue(&self, identity: &VerifiedIdentity, ttl: Duration) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = IdentityClaims {
            sub: identity.uid.to_string(),
            email: Some(identity.email.clone()).filter(|e| !e.is_empty()),
            name: identity.name.clone(),
            picture: identity.picture.clone(),
            admin: identity.admin,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(anyhow::anyhow!("failed to encode identity token: {e}")))
    }
}

#[async_trait]
impl TokenVerifier for JwtTokenVerifier {
    async fn verify(&self, raw_token: &str) -> Result<VerifiedIdentity, AppError> {
        if raw_token.trim().is_empty() {
            return Err(AppError::MissingAuth);
        }
        let claims = self.decode(raw_token)?;
        if claims.sub.is_empty() {
            return Err(AppError::InvalidToken);
        }
        Ok(claims.into())
    }
}
