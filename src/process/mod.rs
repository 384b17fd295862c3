//! File processing and formatting pipeline.
//!
//! A document is processed in a single pass: tokenize, walk the physical
//! lines top to bottom, wrap the ones over the limit, render. In-file
//! directives (`// ktwrap: ...`) adjust the configuration per document.
//!
//! The main entry point is [`format_file`] which processes a buffered reader
//! and writes formatted output to any `Write` implementation; [`check_file`]
//! is the lint-only counterpart.

pub mod pipeline;

pub use pipeline::{check_file, check_source, format_file, format_source, FormatReport, Violation};
