//! Chain event ingestion for slash-tip.
//!
//! The indexer watches the factory, per-org contracts and the legacy global
//! contract, and delivers events to this crate via webhook. Ingestion is the
//! single writer of tips, contract mappings and chain-sourced user changes.
//!
//! Every write is an upsert on a natural key (transaction hash, user id,
//! org id), so delivery may be at-least-once and out of order: replays
//! converge on the same state. Events whose dependencies are not yet in the
//! store (an unknown contract, an undecodable input) are skipped with a
//! warning rather than failed, since the indexer will not redeliver them.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod decode;
pub mod event;
pub mod ingest;

pub use decode::{decode_tip_call, DecodeError, DecodedTipCall};
pub use event::ChainEvent;
pub use ingest::{IngestError, Ingestor, Outcome};
