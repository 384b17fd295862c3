//! Wrap engine
//!
//! [`Wrapper`] walks the lines of a [`TokenBuffer`] and rewrites every line
//! wider than the configured maximum. For each such line the strategies in
//! [`STRATEGIES`] are tried in order; the first one whose shape matches and
//! that actually edits the buffer wins. Splitters re-enter [`Wrapper::format`]
//! for each line they produce, right to left, so indices to the left of an
//! edit stay valid.
//!
//! A line no strategy can shorten gets a manual-review marker comment above it.

use log::{debug, trace};

use crate::format::buffer::{TokenBuffer, TokenContext};
use crate::format::state::PassState;
use crate::format::{assignment, braces, comma, comment, conditional, declaration, for_loop, scan};
use crate::parser::token::{Token, TokenKind};

/// Recursion budget for nested splits
pub const MAX_DEPTH: usize = 48;

/// Default manual-review marker text
pub const DEFAULT_MARKER: &str = "TODO: Reformat";

/// Engine settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Maximum line width in columns; 0 disables the engine
    pub max_line_length: usize,
    /// Columns per indentation level
    pub indent: usize,
    /// Text of the manual-review marker comment
    pub marker: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_line_length: 100,
            indent: 4,
            marker: DEFAULT_MARKER.to_string(),
        }
    }
}

impl Settings {
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.max_line_length > 0
    }

    /// The marker as a line comment
    #[must_use]
    pub fn marker_comment(&self) -> String {
        format!("// {}", self.marker)
    }
}

/// A physical line handed to a strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    pub start: usize,
    pub end: usize,
    pub indent: usize,
    pub depth: usize,
}

/// Finds the anchor token of a code shape
pub type Detect = fn(&TokenBuffer, Line) -> Option<usize>;

/// Rewrites a line around its anchor; returns the new end or declines
pub type Split = fn(&mut Wrapper<'_>, Line, usize) -> Option<usize>;

pub struct Strategy {
    pub name: &'static str,
    pub detect: Detect,
    pub split: Split,
}

/// Wrapping strategies in priority order
pub const STRATEGIES: &[Strategy] = &[
    Strategy {
        name: "comment",
        detect: comment::detect,
        split: comment::split,
    },
    Strategy {
        name: "brace-block",
        detect: braces::detect,
        split: braces::split,
    },
    Strategy {
        name: "declaration",
        detect: declaration::detect,
        split: declaration::split,
    },
    Strategy {
        name: "conditional",
        detect: conditional::detect,
        split: conditional::split,
    },
    Strategy {
        name: "for-loop",
        detect: for_loop::detect,
        split: for_loop::split,
    },
    Strategy {
        name: "assignment",
        detect: assignment::detect,
        split: assignment::split,
    },
    Strategy {
        name: "boolean",
        detect: conditional::detect_boolean,
        split: conditional::split_boolean,
    },
    Strategy {
        name: "comma",
        detect: comma::detect,
        split: comma::split,
    },
    Strategy {
        name: "parenthesized",
        detect: declaration::detect_paren,
        split: declaration::split_paren,
    },
];

/// One document pass of the wrap engine
pub struct Wrapper<'a> {
    buf: &'a mut TokenBuffer,
    settings: &'a Settings,
    state: PassState,
    /// Tokens after the top-level line being wrapped
    tail_len: usize,
}

impl<'a> Wrapper<'a> {
    pub fn new(buf: &'a mut TokenBuffer, settings: &'a Settings) -> Self {
        Self {
            buf,
            settings,
            state: PassState::default(),
            tail_len: 0,
        }
    }

    #[must_use]
    pub fn buf(&self) -> &TokenBuffer {
        self.buf
    }

    pub fn buf_mut(&mut self) -> &mut TokenBuffer {
        self.buf
    }

    /// Columns per indentation level
    #[must_use]
    pub fn unit(&self) -> usize {
        self.settings.indent
    }

    #[must_use]
    pub fn state(&self) -> &PassState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut PassState {
        &mut self.state
    }

    #[must_use]
    pub fn into_state(self) -> PassState {
        self.state
    }

    /// Wrap every line of the buffer, top to bottom
    pub fn run(&mut self) {
        if !self.settings.is_enabled() {
            return;
        }
        self.state.pending.reset();
        let mut start = 0;
        let mut line_no = 1;
        while start < self.buf.len() {
            line_no += self.buf.token(start).lead.matches('\n').count();
            let extra = self.state.pending.take_line();
            self.buf.add_indent(start, extra);

            let end = self.buf.line_end(start);
            let revision = self.buf.revision();
            let unhandled = self.state.unhandled;
            let new_end = self.wrap_line(start, end);

            if self.state.unhandled > unhandled {
                debug!("line {line_no}: needs manual reformatting");
            }
            if self.buf.revision() != revision {
                self.state.wrapped += 1;
                debug!(
                    "line {line_no}: rewritten as {} lines",
                    self.buf.lines_in(start, new_end).len()
                );
            }
            start = new_end;
        }
    }

    /// Wrap the top-level line `[start, end)`; returns its new end
    pub fn wrap_line(&mut self, start: usize, end: usize) -> usize {
        self.tail_len = self.buf.len() - end;
        self.format(start, end, 0)
    }

    /// End of the top-level line currently being wrapped
    #[must_use]
    pub fn top_end(&self) -> usize {
        self.buf.len() - self.tail_len
    }

    /// Format the line `[start, end)` if it is too wide; returns its new end
    pub fn format(&mut self, start: usize, end: usize, depth: usize) -> usize {
        if start >= end || self.buf.line_width(start, end) <= self.settings.max_line_length {
            return end;
        }
        if self.buf.has_multiline_token(start, end) {
            debug!("token {start}: over-long line holds a multi-line literal, left as is");
            return end;
        }
        if scan::is_comment_only(self.buf(), start, end) {
            trace!("token {start}: nothing to wrap");
            return end;
        }
        let line = Line {
            start,
            end,
            indent: self.buf.indent_of(start),
            depth,
        };
        if depth >= MAX_DEPTH {
            debug!("token {start}: recursion budget exhausted");
            return self.mark(line);
        }

        for strategy in STRATEGIES {
            let Some(anchor) = (strategy.detect)(self.buf, line) else {
                continue;
            };
            let revision = self.buf.revision();
            match (strategy.split)(self, line, anchor) {
                Some(new_end) if self.buf.revision() != revision => {
                    trace!("{}: split at token {anchor} (depth {depth})", strategy.name);
                    return new_end;
                }
                _ => trace!("{}: declined at token {anchor}", strategy.name),
            }
        }
        self.mark(line)
    }

    /// Re-format every physical line of `[start, end)`, right to left
    ///
    /// Returns the new end of the region.
    pub fn format_lines(&mut self, start: usize, end: usize, depth: usize) -> usize {
        let mut region_end = end;
        for (s, e) in self.buf.lines_in(start, end).into_iter().rev() {
            region_end += self.format(s, e, depth + 1) - e;
        }
        region_end
    }

    /// Start a new line at each `(token, indent)` pair, then re-format
    ///
    /// Declines when there is nothing to break.
    pub fn apply_breaks(&mut self, line: Line, breaks: &[(usize, usize)]) -> Option<usize> {
        if breaks.is_empty() {
            return None;
        }
        for &(i, indent) in breaks {
            self.buf.set_break(i, indent);
        }
        Some(self.format_lines(line.start, line.end, line.depth))
    }

    /// Flag a line for manual review
    fn mark(&mut self, line: Line) -> usize {
        self.state.unhandled += 1;
        let marker = self.settings.marker_comment();
        if line.start > 0 && self.buf.token(line.start - 1).text == marker {
            return line.end;
        }
        let token = Token::new(TokenKind::LineComment, marker, "");
        self.buf.insert_line_above(line.start, token, line.indent);
        line.end + 1
    }
}
