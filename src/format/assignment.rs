//! Assignment split
//!
//! The right-hand side of a declaration initializer or a plain assignment
//! moves to its own line one level deeper. When the line ends by opening a
//! bracket that closes on a later line, the lines up to that closer were
//! indented for the old position of the right-hand side, so they are owed one
//! extra indentation unit through the pending-indent state.

use crate::format::buffer::{TokenBuffer, TokenContext};
use crate::format::engine::{Line, Wrapper};
use crate::format::scan;
use crate::parser::token::{Keyword, Punct, Token, TokenKind};

/// Anchor is the first top-level `=` with something after it
pub fn detect(buf: &TokenBuffer, line: Line) -> Option<usize> {
    let eq = scan::find_top_level(buf, line.start, line.end, |i| {
        buf.token(i).is(Punct::Eq) && i + 1 < line.end
    })?;
    is_target(buf, line.start, eq).then_some(eq)
}

/// Whether `[start, eq)` is something assigned to
///
/// Accepted: a `val`/`var` declaration, a `fun` with an expression body, the
/// tail of an already split declaration (`): Type`), or an l-value path such
/// as `this.items[key]`.
fn is_target(buf: &TokenBuffer, start: usize, eq: usize) -> bool {
    if start >= eq {
        return false;
    }
    if buf.token(start).is(Punct::RParen) {
        return true;
    }
    let declares = (start..eq).any(|i| {
        let tok = buf.token(i);
        tok.is_keyword(Keyword::Val) || tok.is_keyword(Keyword::Var) || tok.is_keyword(Keyword::Fun)
    });
    declares || is_path(buf, start, eq)
}

fn is_path(buf: &TokenBuffer, start: usize, eq: usize) -> bool {
    let mut depth = 0usize;
    for i in start..eq {
        let tok = buf.token(i);
        match tok.punct_kind() {
            Some(Punct::LBracket) => depth += 1,
            Some(Punct::RBracket) if depth > 0 => depth -= 1,
            _ if depth > 0 => {}
            _ if !is_path_part(tok) => return false,
            _ => {}
        }
    }
    depth == 0
}

fn is_path_part(tok: &Token) -> bool {
    match tok.kind {
        TokenKind::Identifier => true,
        TokenKind::Keyword(Keyword::Other) => matches!(tok.text.as_str(), "this" | "super"),
        TokenKind::Operator => matches!(tok.text.as_str(), "." | "?." | "!!"),
        _ => false,
    }
}

pub fn split(w: &mut Wrapper<'_>, line: Line, eq: usize) -> Option<usize> {
    let unit = w.unit();
    let top_end = w.top_end();
    let buf = w.buf();
    let last = line.end - 1;
    let carried = if buf.token(last).punct_kind().is_some_and(|p| p.is_open()) {
        scan::matching_close(buf, last, buf.len())
            .filter(|&close| close >= top_end)
            .map_or(0, |close| scan::lines_through(buf, top_end, close))
    } else {
        0
    };

    w.buf_mut().set_break(eq + 1, line.indent + unit);
    w.state_mut().pending.push(unit, carried);
    Some(w.format_lines(line.start, line.end, line.depth))
}
