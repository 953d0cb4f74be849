//! Slash-Tip HTTP API Service.
//!
//! This crate provides the HTTP API for the slash-tip backend, including:
//!
//! - Tip dispatch (validated and executed by the org's configured action)
//! - User registration
//! - Organization dashboard reads (users, tips, leaderboard)
//! - Contract deployment kickoff
//! - Daily allowance cron
//! - The indexer event webhook
//!
//! # Authentication
//!
//! Mutating endpoints require the service API key (the Slack bot and the
//! cron runner hold it); the indexer webhook is verified by an HMAC
//! signature over the raw body; `/health` and the dashboard reads are
//! public.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Some handlers need async for consistency

pub mod actions;
pub mod auth;
pub mod chain;
pub mod config;
pub mod crypto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod textgen;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
