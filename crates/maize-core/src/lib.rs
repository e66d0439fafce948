//! Core types and trait definitions for the maize yield advisory service.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! scoring and recommendation engines are pure functions; the
//! [`history::History`] manager runs them around any
//! [`store::PredictionStore`] backend.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod advice;
pub mod error;
pub mod history;
pub mod prediction;
pub mod scoring;
pub mod store;
pub mod submission;

pub use error::{Error, Result};
