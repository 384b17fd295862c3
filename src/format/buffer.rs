//! Token buffer
//!
//! The shared, mutable view of one document that the wrap engine edits in
//! place. Lines are not stored: a line is the run of tokens from one token
//! whose leading whitespace contains a newline up to (excluding) the next one.
//!
//! Positions are token indices. Changing a token's leading whitespace never
//! moves any index; only [`TokenBuffer::insert`] shifts the tokens after it.

use std::ops::Range;

use crate::parser::lexer::{KotlinLexer, Lexed, Tokenizer};
use crate::parser::token::Token;

/// Read-only navigation over a token sequence
///
/// The structural scanners only need this subset, so any tokenizer whose
/// output can be viewed as lead-carrying tokens can drive them.
pub trait TokenContext {
    fn len(&self) -> usize;

    fn token(&self, i: usize) -> &Token;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn next(&self, i: usize) -> Option<usize> {
        (i + 1 < self.len()).then_some(i + 1)
    }

    fn prev(&self, i: usize) -> Option<usize> {
        i.checked_sub(1)
    }

    /// Source text of a token range, without the lead of its first token
    fn text(&self, range: Range<usize>) -> String {
        let mut out = String::new();
        for i in range.clone() {
            if i != range.start {
                out.push_str(&self.token(i).lead);
            }
            out.push_str(&self.token(i).text);
        }
        out
    }

    /// First token of the line holding token `i`
    fn line_start(&self, i: usize) -> usize {
        let mut j = i;
        while j > 0 && !self.token(j).starts_line() {
            j -= 1;
        }
        j
    }

    /// One past the last token of the line holding token `i`
    fn line_end(&self, i: usize) -> usize {
        let mut j = i + 1;
        while j < self.len() && !self.token(j).starts_line() {
            j += 1;
        }
        j
    }

    /// Indentation (in columns) of a line, given its first token
    fn indent_of(&self, start: usize) -> usize {
        let lead = &self.token(start).lead;
        let last_line = lead.rfind('\n').map_or(lead.as_str(), |p| &lead[p + 1..]);
        last_line.chars().count()
    }

    /// Rendered width of the line `[start, end)` including its indentation
    fn line_width(&self, start: usize, end: usize) -> usize {
        if start >= end {
            return 0;
        }
        let mut width = self.indent_of(start) + self.token(start).width();
        for i in start + 1..end {
            let tok = self.token(i);
            width += tok.lead.chars().count() + tok.width();
        }
        width
    }

    /// Physical lines inside `[start, end)` as `(start, end)` pairs
    fn lines_in(&self, start: usize, end: usize) -> Vec<(usize, usize)> {
        let mut lines = Vec::new();
        let mut s = start;
        while s < end {
            let e = self.line_end(s).min(end);
            lines.push((s, e));
            s = e;
        }
        lines
    }
}

/// Tokens of one document plus its trailing whitespace
#[derive(Debug, Clone)]
pub struct TokenBuffer {
    tokens: Vec<Token>,
    tail: String,
    newline: &'static str,
    revision: u64,
}

impl TokenContext for TokenBuffer {
    fn len(&self) -> usize {
        self.tokens.len()
    }

    fn token(&self, i: usize) -> &Token {
        &self.tokens[i]
    }
}

impl TokenBuffer {
    /// Tokenize `source` with the built-in Kotlin lexer
    #[must_use]
    pub fn parse(source: &str) -> Self {
        Self::with_tokenizer(&KotlinLexer, source)
    }

    #[must_use]
    pub fn with_tokenizer<T: Tokenizer + ?Sized>(tokenizer: &T, source: &str) -> Self {
        let newline = if source.contains("\r\n") { "\r\n" } else { "\n" };
        let mut buf = Self::from_lexed(tokenizer.tokenize(source));
        buf.newline = newline;
        buf
    }

    #[must_use]
    pub fn from_lexed(lexed: Lexed) -> Self {
        Self {
            tokens: lexed.tokens,
            tail: lexed.tail,
            newline: "\n",
            revision: 0,
        }
    }

    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Edit counter; unchanged revision means no edit was made
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Byte offset of token `i`'s text in the rendered document
    #[must_use]
    pub fn offset_of(&self, i: usize) -> usize {
        self.tokens[..i]
            .iter()
            .map(|t| t.lead.len() + t.text.len())
            .sum::<usize>()
            + self.tokens.get(i).map_or(0, |t| t.lead.len())
    }

    /// Index of the token whose text covers byte `offset`
    #[must_use]
    pub fn token_at(&self, offset: usize) -> Option<usize> {
        let mut pos = 0;
        for (i, tok) in self.tokens.iter().enumerate() {
            pos += tok.lead.len();
            if offset < pos {
                return None;
            }
            if offset < pos + tok.text.len() {
                return Some(i);
            }
            pos += tok.text.len();
        }
        None
    }

    /// Whether any token in the range spans several physical lines
    #[must_use]
    pub fn has_multiline_token(&self, start: usize, end: usize) -> bool {
        self.tokens[start..end].iter().any(|t| t.text.contains('\n'))
    }

    fn set_lead(&mut self, i: usize, lead: String) {
        if self.tokens[i].lead != lead {
            self.tokens[i].lead = lead;
            self.revision += 1;
        }
    }

    fn break_lead(&self, indent: usize) -> String {
        format!("{}{}", self.newline, " ".repeat(indent))
    }

    /// Start a new line at token `i`, indented by `indent` columns
    pub fn set_break(&mut self, i: usize, indent: usize) {
        let lead = self.break_lead(indent);
        self.set_lead(i, lead);
    }

    /// Join token `i` to the previous one with a single space
    pub fn set_space(&mut self, i: usize) {
        self.set_lead(i, " ".to_string());
    }

    /// Indent the line starting at token `i` by `extra` more columns
    pub fn add_indent(&mut self, i: usize, extra: usize) {
        if extra > 0 {
            self.tokens[i].lead.push_str(&" ".repeat(extra));
            self.revision += 1;
        }
    }

    /// Insert a token before index `i`
    pub fn insert(&mut self, i: usize, token: Token) {
        self.tokens.insert(i, token);
        self.revision += 1;
    }

    /// Insert `token` before index `i`, starting a new line at `indent`
    pub fn insert_on_new_line(&mut self, i: usize, mut token: Token, indent: usize) {
        token.lead = self.break_lead(indent);
        self.insert(i, token);
    }

    /// Insert `token` as its own line above the line starting at `start`
    pub fn insert_line_above(&mut self, start: usize, mut token: Token, indent: usize) {
        let lead = self.break_lead(indent);
        token.lead = std::mem::replace(&mut self.tokens[start].lead, lead);
        self.insert(start, token);
    }

    /// Move token `from` so it starts the line at `to` (`to < from`)
    ///
    /// The moved token takes over the lead of the line start, which is pushed
    /// onto a new line at `indent`. The moved token's own lead is dropped.
    pub fn rotate_to(&mut self, from: usize, to: usize, indent: usize) {
        debug_assert!(to < from);
        let token = self.tokens.remove(from);
        self.insert_line_above(to, token, indent);
    }

    /// Render the document
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(
            self.tokens.iter().map(|t| t.lead.len() + t.text.len()).sum::<usize>() + self.tail.len(),
        );
        for tok in &self.tokens {
            out.push_str(&tok.lead);
            out.push_str(&tok.text);
        }
        out.push_str(&self.tail);
        out
    }
}
