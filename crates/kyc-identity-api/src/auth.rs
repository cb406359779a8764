//! Authentication adapters: argon2id password hashing, HS256 bearer tokens
//! and the `AuthenticatedUser` extractor.

use std::fmt;

use argon2::password_hash::{PasswordHasher as _, PasswordVerifier as _, SaltString};
use argon2::password_hash::rand_core::OsRng;
use argon2::{Algorithm, Argon2, Params, PasswordHash, Version};
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use kyc_identity_core::error::DomainError;
use kyc_identity_users::application::ports::{PasswordHasher, Principal, TokenIssuer};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Argon2id hasher producing PHC strings.
#[derive(Debug, Clone, Default)]
pub struct Argon2PasswordHasher {
    params: Params,
}

impl Argon2PasswordHasher {
    /// Creates a hasher with the argon2 crate's recommended cost.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a hasher with an explicit memory cost (KiB) and iteration
    /// count.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the parameters are out of range.
    pub fn with_cost(memory_kib: u32, iterations: u32) -> Result<Self, DomainError> {
        let params = Params::new(memory_kib, iterations, 1, None)
            .map_err(|e| DomainError::Validation(format!("invalid argon2 parameters: {e}")))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plain: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(plain.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::Infrastructure(format!("password hashing failed: {e}")))
    }

    fn verify(&self, plain: &str, hash: &str) -> Result<bool, DomainError> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| DomainError::Infrastructure(format!("stored password hash: {e}")))?;
        match self.argon2().verify_password(plain.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(DomainError::Infrastructure(format!(
                "password verification failed: {e}"
            ))),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    email: String,
    iat: u64,
    exp: u64,
}

/// HS256 JWT issuer.
pub struct JwtTokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: u64,
}

impl fmt::Debug for JwtTokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtTokenIssuer")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

impl JwtTokenIssuer {
    /// Creates an issuer signing with `secret`; tokens expire after
    /// `ttl_hours`.
    #[must_use]
    pub fn new(secret: &[u8], ttl_hours: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation: Validation::default(),
            ttl_secs: ttl_hours.saturating_mul(3600),
        }
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, principal: &Principal) -> Result<String, DomainError> {
        let now = jsonwebtoken::get_current_timestamp();
        let claims = Claims {
            sub: principal.user_id,
            email: principal.email.clone(),
            iat: now,
            exp: now.saturating_add(self.ttl_secs),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| DomainError::Infrastructure(format!("token signing failed: {e}")))
    }

    fn verify(&self, token: &str) -> Result<Principal, DomainError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            debug!(error = %e, "bearer token rejected");
            DomainError::Unauthorized("invalid or expired token".into())
        })?;
        Ok(Principal {
            user_id: data.claims.sub,
            email: data.claims.email,
        })
    }
}

/// The caller of a bearer-protected route.
///
/// Rejects with 401 when the `Authorization` header is missing or malformed,
/// the token does not verify, or the user no longer exists.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Principal);

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| DomainError::Unauthorized("missing bearer token".into()))?;

        let principal = state.tokens.verify(token)?;
        if state
            .users
            .store()
            .find_by_id(principal.user_id)
            .await?
            .is_none()
        {
            return Err(DomainError::Unauthorized("user no longer exists".into()).into());
        }
        Ok(Self(principal))
    }
}
