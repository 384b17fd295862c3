//! Kotlin line wrapping.
//!
//! The wrap engine and its building blocks:
//! - [`buffer`]: token buffer the engine edits in place
//! - [`scan`]: structural queries (bracket matching, top-level iteration)
//! - [`state`]: pending indentation carried across lines
//! - [`engine`]: strategy dispatch, recursion budget and manual-review marker
//! - [`comment`], [`braces`], [`declaration`], [`conditional`], [`for_loop`],
//!   [`assignment`], [`comma`]: one splitter per code shape
//! - [`line_split`]: text-only front end for single lines

pub mod assignment;
pub mod braces;
pub mod buffer;
pub mod comma;
pub mod comment;
pub mod conditional;
pub mod declaration;
pub mod engine;
pub mod for_loop;
pub mod line_split;
pub mod scan;
pub mod state;

pub use buffer::{TokenBuffer, TokenContext};
pub use engine::{Line, Settings, Wrapper, DEFAULT_MARKER, MAX_DEPTH, STRATEGIES};
pub use line_split::{split_long_lines, wrap_line, Wrapped};
pub use state::{PassState, PendingIndent};
