//! Data-returning queries over the virtual model.
//!
//! Every query works on a borrowed [`VirtualModel`](crate::model::VirtualModel) so
//! it can run against the live engine or against a snapshot loaded from disk.
//! Missing state yields empty results, never errors.

pub mod health;
pub mod output;
pub mod report;
pub mod search;
pub mod summary;
