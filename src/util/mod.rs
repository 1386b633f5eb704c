//! Shared utilities for `issue_tracker`.
//!
//! Common functionality used across modules:
//! - Time parsing (RFC3339, simple dates, epoch milliseconds)

pub mod time;
