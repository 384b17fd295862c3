//! For-loop split
//!
//! An unbraced body is wrapped in a brace block first. Otherwise each range
//! clause of the header (`in`, `until`, `downTo`, `step`) starts its own line
//! one level deeper and the header `)` returns to the loop's indentation.

use crate::format::buffer::{TokenBuffer, TokenContext};
use crate::format::conditional::brace_body;
use crate::format::engine::{Line, Wrapper};
use crate::format::scan;
use crate::parser::token::{Keyword, Punct, Token, TokenKind};

/// Soft keywords that open a range clause
const RANGE_WORDS: &[&str] = &["until", "downTo", "step"];

fn is_clause(tok: &Token) -> bool {
    tok.is_keyword(Keyword::In)
        || (tok.kind == TokenKind::Identifier && RANGE_WORDS.contains(&tok.text.as_str()))
}

pub fn detect(buf: &TokenBuffer, line: Line) -> Option<usize> {
    scan::find_top_level(buf, line.start, line.end.saturating_sub(1), |i| {
        buf.token(i).is_keyword(Keyword::For) && buf.token(i + 1).is(Punct::LParen)
    })
}

pub fn split(w: &mut Wrapper<'_>, line: Line, keyword: usize) -> Option<usize> {
    let lparen = keyword + 1;
    let rparen = scan::matching_close(w.buf(), lparen, line.end)?;
    if let Some(end) = brace_body(w, line, rparen) {
        return Some(end);
    }

    let buf = w.buf();
    let inner = line.indent + w.unit();
    let mut breaks: Vec<(usize, usize)> = scan::top_level(buf, lparen + 2, rparen)
        .filter(|&i| is_clause(buf.token(i)))
        .map(|i| (i, inner))
        .collect();
    if breaks.is_empty() {
        return None;
    }
    breaks.push((rparen, line.indent));
    w.apply_breaks(line, &breaks)
}
