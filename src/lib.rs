//! fs-twin: a live, persisted mirror of a watched directory tree.
//!
//! The [`engine::TwinEngine`] turns normalised filesystem notifications into
//! model updates, threat quarantines, snapshots, and audit records, one event
//! at a time under a single lock.

pub mod audit;
pub mod classify;
pub mod cli;
pub mod config;
pub mod delta;
pub mod engine;
pub mod error;
pub mod host;
pub mod model;
pub mod quarantine;
pub mod query;
pub mod snapshot;
pub mod watcher;
