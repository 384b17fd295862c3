//! Inline directive parsing for `// ktwrap:` comments
//!
//! Supports in-file configuration overrides via special comments:
//! `// ktwrap: -l 120 --indent 2` or `// ktwrap: off`

use std::sync::LazyLock;

use regex::Regex;

/// Pattern to match ktwrap directives
static KTWRAP_DIRECTIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*//\s*ktwrap:\s*(.*?)\s*$").unwrap());

/// Parsed directive options that can override config
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DirectiveOverrides {
    pub max_line_length: Option<usize>,
    pub indent: Option<usize>,
    /// `off`: leave the whole file untouched
    pub disabled: bool,
}

impl DirectiveOverrides {
    /// Check if any overrides are set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.max_line_length.is_none() && self.indent.is_none() && !self.disabled
    }
}

/// Check if a line contains a ktwrap directive
#[must_use]
pub fn is_directive_line(line: &str) -> bool {
    KTWRAP_DIRECTIVE_RE.is_match(line)
}

/// Parse a ktwrap directive line and return option overrides
///
/// Returns `None` if the line is not a directive or sets nothing.
#[must_use]
pub fn parse_directive(line: &str) -> Option<DirectiveOverrides> {
    let caps = KTWRAP_DIRECTIVE_RE.captures(line)?;
    let args_str = caps.get(1)?.as_str();
    parse_directive_args(args_str)
}

/// Parse directive arguments into overrides
fn parse_directive_args(args_str: &str) -> Option<DirectiveOverrides> {
    let mut overrides = DirectiveOverrides::default();
    let tokens: Vec<&str> = args_str.split_whitespace().collect();
    let mut i = 0;

    while i < tokens.len() {
        match tokens[i] {
            "-i" | "--indent" => {
                i += 1;
                if i < tokens.len() {
                    overrides.indent = tokens[i].parse().ok();
                }
            }
            "-l" | "--max-line-length" => {
                i += 1;
                if i < tokens.len() {
                    overrides.max_line_length = tokens[i].parse().ok();
                }
            }
            word if word.eq_ignore_ascii_case("off") => overrides.disabled = true,
            _ => {
                // Unknown option, skip
            }
        }
        i += 1;
    }

    if overrides.is_empty() {
        None
    } else {
        Some(overrides)
    }
}

/// Scan source text for ktwrap directives and return the first found
///
/// Only the first directive is used (subsequent ones are ignored).
#[must_use]
pub fn find_directive(source: &str) -> Option<DirectiveOverrides> {
    source
        .lines()
        .find(|line| is_directive_line(line))
        .and_then(parse_directive)
}
