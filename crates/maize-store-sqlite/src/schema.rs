//! SQL schema for the maize SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS predictions (
    prediction_id  TEXT PRIMARY KEY,
    owner          TEXT NOT NULL,
    rainfall       REAL NOT NULL,   -- mm
    temperature    REAL NOT NULL,   -- degrees C
    nitrogen       REAL NOT NULL,
    phosphorus     REAL NOT NULL,
    potassium      REAL NOT NULL,
    ph             REAL NOT NULL,
    seed_variety   TEXT,
    yield_estimate REAL NOT NULL,   -- t/ha; derived from the six readings
    created_at     TEXT NOT NULL    -- RFC 3339 UTC, microseconds; never updated
);

CREATE INDEX IF NOT EXISTS predictions_owner_idx
    ON predictions(owner, created_at);

PRAGMA user_version = 1;
";
