//! JSON REST API for the maize yield advisory service.
//!
//! Exposes an axum [`Router`] backed by any [`PredictionStore`]. Every route
//! requires HTTP Basic credentials; the username is the owner identity all
//! prediction records are scoped to.

pub mod auth;
pub mod error;
pub mod handlers;

pub use error::ApiError;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::{Router, routing::get};
use maize_core::store::PredictionStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::AuthConfig;
use handlers::predictions;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `MAIZE_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  #[serde(default)]
  pub users:      Vec<UserCredential>,
}

impl ServerConfig {
  /// Layer defaults, the TOML file at `path` (if it exists), and `MAIZE_*`
  /// environment variables.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 8000)?
      .set_default("store_path", "~/.local/share/maize/predictions.sqlite3")?
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("MAIZE"))
      .build()?
      .try_deserialize()
  }

  /// `store_path` with a leading `~/` resolved against `$HOME`.
  pub fn resolved_store_path(&self) -> PathBuf {
    match (self.store_path.strip_prefix("~"), std::env::var_os("HOME")) {
      (Ok(rest), Some(home)) => PathBuf::from(home).join(rest),
      _ => self.store_path.clone(),
    }
  }
}

/// One login accepted by the server.
#[derive(Deserialize, Clone)]
pub struct UserCredential {
  pub username:      String,
  /// PHC string produced by argon2; see `server --hash-password`.
  pub password_hash: String,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: PredictionStore> {
  pub store: Arc<S>,
  pub auth:  Arc<AuthConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the application router with the API nested under `/api`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: PredictionStore + Clone + Send + Sync + 'static,
{
  let api = Router::new()
    .route(
      "/predictions",
      get(predictions::list::<S>).post(predictions::create::<S>),
    )
    .route("/predictions/summary", get(predictions::summary::<S>))
    .route(
      "/predictions/{id}",
      get(predictions::get_one::<S>)
        .patch(predictions::update::<S>)
        .put(predictions::update::<S>)
        .delete(predictions::delete::<S>),
    );

  Router::new()
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
