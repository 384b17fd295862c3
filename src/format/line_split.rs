//! Text-only front end
//!
//! Wraps lines given as plain strings, without a surrounding document. Each
//! line is tokenized on its own and run through the same engine as a full
//! document pass, so pending indentation never crosses line boundaries here.

use crate::format::buffer::TokenBuffer;
use crate::format::engine::{Settings, Wrapper};

/// Result of wrapping one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wrapped {
    /// Replacement text; may span several lines
    pub text: String,
    /// Manual-review markers inserted
    pub unhandled: usize,
}

/// Wrap a single line of Kotlin source
///
/// A line that fits (or disabled settings) comes back unchanged.
#[must_use]
pub fn wrap_line(line: &str, settings: &Settings) -> Wrapped {
    if !settings.is_enabled() {
        return Wrapped {
            text: line.to_string(),
            unhandled: 0,
        };
    }
    let mut buf = TokenBuffer::parse(line);
    let mut wrapper = Wrapper::new(&mut buf, settings);
    wrapper.run();
    let unhandled = wrapper.into_state().unhandled;
    Wrapped {
        text: buf.render(),
        unhandled,
    }
}

/// Wrap every over-long line of a sequence
///
/// Returns the produced physical lines and the number of manual-review
/// markers inserted.
#[must_use]
pub fn split_long_lines(lines: &[String], settings: &Settings) -> (Vec<String>, usize) {
    let mut result = Vec::with_capacity(lines.len());
    let mut unhandled = 0;

    for line in lines {
        let body = line.trim_end_matches(['\r', '\n']);
        if body.chars().count() <= settings.max_line_length || !settings.is_enabled() {
            result.push(line.clone());
            continue;
        }
        let wrapped = wrap_line(body, settings);
        unhandled += wrapped.unhandled;
        let ending = &line[body.len()..];
        result.extend(wrapped.text.lines().map(|l| format!("{l}{ending}")));
    }

    (result, unhandled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn settings(width: usize) -> Settings {
        Settings {
            max_line_length: width,
            ..Settings::default()
        }
    }

    #[test]
    fn test_fitting_line_is_unchanged() {
        let out = wrap_line("val x = 1", &settings(40));
        assert_eq!(out.text, "val x = 1");
        assert_eq!(out.unhandled, 0);
    }

    #[test]
    fn test_disabled_settings() {
        let line = "val value = computeSomethingVeryLong(argumentNumberOne, two)";
        let out = wrap_line(line, &settings(0));
        assert_eq!(out.text, line);
    }

    #[test]
    fn test_split_long_lines() {
        let lines = vec![
            "fun main() {\n".to_string(),
            "    val total = accumulate(firstValue, secondValue)\n".to_string(),
            "}\n".to_string(),
        ];
        let (result, unhandled) = split_long_lines(&lines, &settings(44));
        assert_eq!(
            result,
            vec![
                "fun main() {\n",
                "    val total =\n",
                "        accumulate(firstValue, secondValue)\n",
                "}\n",
            ]
        );
        assert_eq!(unhandled, 0);
    }

    #[test]
    fn test_split_long_lines_counts_markers() {
        let lines = vec!["aaaaaaaaaaaaaaaa + bbbbbbbbbbbbbbbbbbbbbbbb".to_string()];
        let (result, unhandled) = split_long_lines(&lines, &settings(20));
        assert_eq!(
            result,
            vec!["// TODO: Reformat", "aaaaaaaaaaaaaaaa + bbbbbbbbbbbbbbbbbbbbbbbb"]
        );
        assert_eq!(unhandled, 1);
    }
}
