//! maize-server binary.
//!
//! Loads [`ServerConfig`] from `config.toml` (or `--config`) plus `MAIZE_*`
//! environment variables, opens the SQLite store, and serves the JSON API.
//!
//! Run with `--hash-password` to produce the argon2 string for a `[[users]]`
//! entry instead of starting the server.

use std::{
  io::{self, BufRead, IsTerminal, Write},
  path::PathBuf,
  sync::Arc,
};

use anyhow::Context as _;
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use clap::Parser;
use crossterm::{
  event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
  terminal,
};
use maize_server::{AppState, ServerConfig, auth::AuthConfig};
use maize_store_sqlite::SqliteStore;
use rand_core::OsRng;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Maize yield advisory server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Read a password, print its argon2 hash, and exit.
  #[arg(long)]
  hash_password: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  if cli.hash_password {
    let password = read_password()?;
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?;
    println!("{hash}");
    return Ok(());
  }

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load config from {:?}", cli.config))?;

  if server_cfg.users.is_empty() {
    tracing::warn!("no [[users]] configured; every request will be rejected");
  }

  let store_path = server_cfg.resolved_store_path();
  if let Some(dir) = store_path.parent().filter(|d| !d.as_os_str().is_empty()) {
    std::fs::create_dir_all(dir)
      .with_context(|| format!("failed to create {dir:?}"))?;
  }

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  tracing::info!(path = ?store_path, "store opened");

  let app = maize_server::router(AppState {
    store: Arc::new(store),
    auth:  Arc::new(AuthConfig::from_users(&server_cfg.users)),
  });

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;
  tracing::info!("Listening on http://{address}");

  axum::serve(listener, app).await.context("server error")
}

/// Read a password without echo when stdin is a terminal, or the first line
/// of piped input otherwise.
fn read_password() -> anyhow::Result<String> {
  if !io::stdin().is_terminal() {
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    return Ok(line.trim_end_matches(['\n', '\r']).to_string());
  }

  eprint!("Password: ");
  io::stderr().flush().ok();
  terminal::enable_raw_mode()?;
  let typed = read_hidden_line();
  terminal::disable_raw_mode()?;
  eprintln!();
  typed
}

fn read_hidden_line() -> anyhow::Result<String> {
  let mut password = String::new();
  loop {
    let Event::Key(key) = event::read()? else { continue };
    if key.kind != KeyEventKind::Press {
      continue;
    }
    match key.code {
      KeyCode::Enter => return Ok(password),
      KeyCode::Backspace => {
        password.pop();
      }
      KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        anyhow::bail!("interrupted");
      }
      KeyCode::Char(c) => password.push(c),
      _ => {}
    }
  }
}
