//! Error types and result aliases for ktwrap.
//!
//! - [`Result<T>`]: Type alias for `anyhow::Result<T>` used throughout the crate
//!
//! The wrap engine itself never fails; errors come from I/O, configuration
//! parsing and validation.

use anyhow::Result as AnyhowResult;

pub type Result<T> = AnyhowResult<T>;
