//! Password hashing and JWT issuing/verification

use crate::config::JwtConfig;
use crate::contract::ContactsError;
use crate::domain::messages;
use anyhow::Context;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// What a token may be used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenScope {
    AccessToken,
    EmailToken,
    ResetPassword,
}

/// JWT claims shared by all token kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Username for access tokens, email otherwise
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub scope: TokenScope,
    /// New password hash carried by reset tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Issues and verifies signed tokens
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    algorithm: Algorithm,
    access_ttl: i64,
    reset_ttl: i64,
    email_ttl: i64,
}

impl TokenService {
    pub fn from_config(config: &JwtConfig) -> anyhow::Result<Self> {
        let algorithm = Algorithm::from_str(&config.algorithm)
            .with_context(|| format!("unsupported JWT algorithm '{}'", config.algorithm))?;
        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            anyhow::bail!("JWT algorithm must be HMAC based, got '{}'", config.algorithm);
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            algorithm,
            access_ttl: config.expiration_seconds,
            reset_ttl: config.reset_expiration_seconds,
            email_ttl: config.email_expiration_seconds,
        })
    }

    pub fn create_access_token(&self, username: &str) -> Result<String, ContactsError> {
        self.issue(username, TokenScope::AccessToken, self.access_ttl, None)
    }

    pub fn create_email_token(&self, email: &str) -> Result<String, ContactsError> {
        self.issue(email, TokenScope::EmailToken, self.email_ttl, None)
    }

    pub fn create_reset_token(
        &self,
        email: &str,
        hashed_password: &str,
    ) -> Result<String, ContactsError> {
        self.issue(
            email,
            TokenScope::ResetPassword,
            self.reset_ttl,
            Some(hashed_password.to_string()),
        )
    }

    fn issue(
        &self,
        sub: &str,
        scope: TokenScope,
        ttl_seconds: i64,
        password: Option<String>,
    ) -> Result<String, ContactsError> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: sub.to_string(),
            iat: now,
            exp: now + ttl_seconds,
            scope,
            password,
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding).map_err(|e| {
            tracing::error!(error = %e, "failed to sign token");
            ContactsError::Internal
        })
    }

    /// Verify signature, expiry and scope
    pub fn decode(&self, token: &str, scope: TokenScope) -> Option<Claims> {
        let validation = Validation::new(self.algorithm);
        let data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|e| tracing::debug!(error = %e, ?scope, "token rejected"))
            .ok()?;
        (data.claims.scope == scope).then_some(data.claims)
    }

    /// Username carried by a valid access token
    pub fn username_from_access_token(&self, token: &str) -> Result<String, ContactsError> {
        self.decode(token, TokenScope::AccessToken)
            .map(|claims| claims.sub)
            .ok_or_else(|| ContactsError::unauthorized(messages::UNAUTHORIZED))
    }

    /// Email carried by a valid confirmation token
    pub fn email_from_token(&self, token: &str) -> Result<String, ContactsError> {
        self.decode(token, TokenScope::EmailToken)
            .map(|claims| claims.sub)
            .ok_or_else(|| ContactsError::validation(messages::INVALID_EMAIL_TOKEN))
    }

    /// Email and new password hash carried by a valid reset token
    pub fn reset_from_token(&self, token: &str) -> Result<(String, String), ContactsError> {
        self.decode(token, TokenScope::ResetPassword)
            .and_then(|claims| {
                let password = claims.password.filter(|p| !p.is_empty())?;
                (!claims.sub.is_empty()).then_some((claims.sub, password))
            })
            .ok_or_else(|| ContactsError::bad_request(messages::INVALID_OR_EXPIRED_TOKEN))
    }
}

/// bcrypt hashing, run on the blocking pool
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub async fn hash(&self, password: &str) -> Result<String, ContactsError> {
        let password = password.to_string();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "password hashing task failed");
                ContactsError::Internal
            })?
            .map_err(|e| {
                tracing::error!(error = %e, "password hashing failed");
                ContactsError::Internal
            })
    }

    /// `false` for a wrong password or an unreadable hash
    pub async fn verify(&self, password: &str, hash: &str) -> bool {
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
            .await
            .unwrap_or(false)
    }
}
