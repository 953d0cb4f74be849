//! HTTP request handlers.

pub mod cron;
pub mod deploy;
pub mod health;
pub mod indexer;
pub mod metadata;
pub mod orgs;
pub mod register;
pub mod tips;
