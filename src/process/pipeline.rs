//! Document formatting pipeline
//!
//! One pass over a whole document:
//! - Tokenize the source into a [`TokenBuffer`]
//! - Walk its physical lines top to bottom, applying carried-over indentation
//! - Wrap every line wider than the limit, marking the ones that cannot be
//!   wrapped mechanically
//!
//! [`format_file`] honors a `// ktwrap:` directive found in the input and works
//! on any buffered reader and writer.

use std::io::{BufRead, Write};

use anyhow::bail;
use log::debug;

use crate::config::Config;
use crate::directive::find_directive;
use crate::format::{Settings, TokenBuffer, Wrapper};
use crate::Result;

/// Outcome of formatting one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatReport {
    /// Formatted text
    pub output: String,
    /// Lines that received the manual-review marker
    pub unhandled: usize,
    /// Lines that were rewritten
    pub wrapped: usize,
    /// The document opted out with `// ktwrap: off`
    pub skipped: bool,
}

impl FormatReport {
    fn unchanged(source: &str) -> Self {
        Self {
            output: source.to_string(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn changed(&self, source: &str) -> bool {
        self.output != source
    }
}

/// An over-long line found in check mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Violation {
    /// 1-based line number
    pub line: usize,
    /// Width in columns
    pub width: usize,
    /// The limit it exceeds
    pub max_line_length: usize,
}

impl Violation {
    #[must_use]
    pub fn message(&self) -> String {
        format!("Exceeded max line length ({})", self.max_line_length)
    }
}

/// Wrap every over-long line of `source`
#[must_use]
pub fn format_source(source: &str, settings: &Settings) -> FormatReport {
    if !settings.is_enabled() {
        return FormatReport::unchanged(source);
    }
    let mut buf = TokenBuffer::parse(source);
    let mut wrapper = Wrapper::new(&mut buf, settings);
    wrapper.run();
    let state = wrapper.into_state();
    FormatReport {
        output: buf.render(),
        unhandled: state.unhandled,
        wrapped: state.wrapped,
        skipped: false,
    }
}

/// Report over-long lines without editing anything
#[must_use]
pub fn check_source(source: &str, settings: &Settings) -> Vec<Violation> {
    if !settings.is_enabled() {
        return Vec::new();
    }
    source
        .lines()
        .enumerate()
        .filter_map(|(i, line)| {
            let width = line.chars().count();
            (width > settings.max_line_length).then_some(Violation {
                line: i + 1,
                width,
                max_line_length: settings.max_line_length,
            })
        })
        .collect()
}

/// Effective configuration for a document: `config` plus its directive
///
/// Returns `None` when the document opts out.
fn effective_config(source: &str, config: &Config, filename: &str) -> Result<Option<Config>> {
    let Some(overrides) = find_directive(source) else {
        return Ok(Some(config.clone()));
    };
    if overrides.disabled {
        debug!("{filename}: disabled by directive");
        return Ok(None);
    }
    let mut config = config.clone();
    config.apply_directive(&overrides);
    if let Some(err) = config.validate() {
        bail!("Invalid configuration in {filename}: {err}");
    }
    Ok(Some(config))
}

/// Format a Kotlin document read from `input`, writing the result to `output`
pub fn format_file<R: BufRead, W: Write>(
    mut input: R,
    output: &mut W,
    config: &Config,
    filename: &str,
) -> Result<FormatReport> {
    let mut source = String::new();
    input.read_to_string(&mut source)?;

    let report = match effective_config(&source, config, filename)? {
        Some(config) => format_source(&source, &config.to_settings()),
        None => FormatReport {
            skipped: true,
            ..FormatReport::unchanged(&source)
        },
    };
    if report.unhandled > 0 {
        debug!(
            "{filename}: {} lines need manual reformatting",
            report.unhandled
        );
    }
    output.write_all(report.output.as_bytes())?;
    Ok(report)
}

/// Check a Kotlin document read from `input`
pub fn check_file<R: BufRead>(
    mut input: R,
    config: &Config,
    filename: &str,
) -> Result<Vec<Violation>> {
    let mut source = String::new();
    input.read_to_string(&mut source)?;
    Ok(match effective_config(&source, config, filename)? {
        Some(config) => check_source(&source, &config.to_settings()),
        None => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::{BufReader, Cursor};

    fn settings(width: usize) -> Settings {
        Settings {
            max_line_length: width,
            ..Settings::default()
        }
    }

    fn run_file(input: &str, config: &Config) -> Result<(String, FormatReport)> {
        let reader = BufReader::new(Cursor::new(input.as_bytes()));
        let mut output = Vec::new();
        let report = format_file(reader, &mut output, config, "Test.kt")?;
        Ok((String::from_utf8(output)?, report))
    }

    #[test]
    fn test_format_source_wraps_only_long_lines() {
        let source = "fun main() {\n    val greeting = buildGreeting(firstName, lastName)\n    println(greeting)\n}\n";
        let report = format_source(source, &settings(50));
        assert_eq!(
            report.output,
            "fun main() {\n    val greeting =\n        buildGreeting(firstName, lastName)\n    println(greeting)\n}\n"
        );
        assert_eq!(report.wrapped, 1);
        assert_eq!(report.unhandled, 0);
        assert!(report.changed(source));
    }

    #[test]
    fn test_format_source_disabled() {
        let source = "val x = someVeryLongFunctionName(argumentOne, argumentTwo)\n";
        let report = format_source(source, &settings(0));
        assert_eq!(report.output, source);
        assert!(!report.changed(source));
    }

    #[test]
    fn test_check_source() {
        let source = "short\nthis line is a bit too long\nok\n";
        let violations = check_source(source, &settings(20));
        assert_eq!(
            violations,
            vec![Violation {
                line: 2,
                width: 27,
                max_line_length: 20
            }]
        );
        assert_eq!(violations[0].message(), "Exceeded max line length (20)");
    }

    #[test]
    fn test_format_file_respects_directive_width() {
        let input = "// ktwrap: -l 32\nval total = add(firstValue, secondValue)\n";
        let (output, report) = run_file(input, &Config::default()).unwrap();
        assert_eq!(
            output,
            "// ktwrap: -l 32\nval total =\n    add(firstValue, secondValue)\n"
        );
        assert_eq!(report.wrapped, 1);
    }

    #[test]
    fn test_format_file_directive_off() {
        let input = "// ktwrap: off\nval total = add(firstValue, secondValue, thirdValue, fourthValue, fifth, sixth)\n";
        let config = Config {
            max_line_length: 40,
            ..Default::default()
        };
        let (output, report) = run_file(input, &config).unwrap();
        assert_eq!(output, input);
        assert!(report.skipped);
    }

    #[test]
    fn test_format_file_invalid_directive() {
        let input = "// ktwrap: -l 5\nval x = 1\n";
        let err = run_file(input, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("Invalid configuration"));
    }

    #[test]
    fn test_check_file() {
        let input = "val total = add(firstValue, secondValue)\n";
        let config = Config {
            max_line_length: 30,
            ..Default::default()
        };
        let reader = BufReader::new(Cursor::new(input.as_bytes()));
        let violations = check_file(reader, &config, "Test.kt").unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].width, 40);
    }
}
