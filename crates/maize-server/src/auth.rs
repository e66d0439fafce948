//! HTTP Basic-auth caller extractor and standalone verifier.
//!
//! The authenticated username becomes the [`OwnerId`] every prediction
//! operation is scoped to.

use std::collections::HashMap;

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use maize_core::{prediction::OwnerId, store::PredictionStore};

use crate::{AppState, UserCredential, error::ApiError};

/// Verified against when the username is unknown. Uses the default argon2id
/// cost parameters and matches no password.
const MISSING_USER_HASH: &str = concat!(
  "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHQ$",
  "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA",
);

/// Credentials accepted as valid for this server instance.
#[derive(Clone)]
pub struct AuthConfig {
  /// Username to argon2 PHC string, e.g. `$argon2id$v=19$…`
  users: HashMap<String, String>,
}

impl AuthConfig {
  pub fn from_users(users: &[UserCredential]) -> Self {
    Self {
      users: users
        .iter()
        .map(|u| (u.username.clone(), u.password_hash.clone()))
        .collect(),
    }
  }
}

/// The authenticated caller. Present in a handler means the request carried
/// valid credentials.
pub struct Caller(pub OwnerId);

/// Verify credentials directly from headers and return the caller identity.
pub fn verify_auth(
  headers: &HeaderMap,
  config: &AuthConfig,
) -> Result<OwnerId, ApiError> {
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(ApiError::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(ApiError::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| ApiError::Unauthorized)?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| ApiError::Unauthorized)?;

  let (username, password) = creds.split_once(':').ok_or(ApiError::Unauthorized)?;

  // Unknown users still pay for one argon2 verification.
  let stored = config.users.get(username);
  let parsed_hash =
    PasswordHash::new(stored.map_or(MISSING_USER_HASH, String::as_str))
      .map_err(|_| ApiError::Unauthorized)?;

  let verified = Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .is_ok();

  match stored {
    Some(_) if verified => Ok(OwnerId::new(username)),
    _ => Err(ApiError::Unauthorized),
  }
}

impl<S> FromRequestParts<AppState<S>> for Caller
where
  S: PredictionStore + Clone + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let owner = verify_auth(&parts.headers, &state.auth)?;
    Ok(Caller(owner))
  }
}
