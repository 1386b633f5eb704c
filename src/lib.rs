//! Per-project issue tracker REST API.
//!
//! One resource route, `/api/issues/{project}`, carries create, list/filter,
//! update, and delete for issue records, each project name scoping its own
//! lazily created collection. Records live as JSON documents in SQLite
//! behind a generic [`store::DocumentStore`] trait.
//!
//! Module map:
//! - [`api`] - axum router and the contract handlers
//! - [`model`] - the Issue record, field whitelist, value casting
//! - [`store`] - document store trait and SQLite backend
//! - [`config`] - flag/env/default resolution
//! - [`error`], [`logging`], [`util`] - shared plumbing

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod store;
pub mod util;

pub use error::{Result, TrackerError};
