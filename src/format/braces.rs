//! Brace-block split
//!
//! Explodes a `{ ... }` span: the head (through `{`, or through the lambda
//! `->`) stays, the body moves to its own line one level deeper and the
//! closing `}` returns to the original indentation.

use crate::format::buffer::{TokenBuffer, TokenContext};
use crate::format::engine::{Line, Wrapper};
use crate::format::scan;
use crate::parser::token::Punct;

/// Anchor is the `{` of the block to explode
pub fn detect(buf: &TokenBuffer, line: Line) -> Option<usize> {
    let (s, e) = (line.start, line.end);
    let is_code = |i: usize| scan::is_code(buf, s, i);

    // Line ends with `}` (or `})`) closing a block opened on the line
    let mut last = e - 1;
    if last > s && buf.token(last).is(Punct::RParen) && buf.token(last - 1).is(Punct::RBrace) {
        last -= 1;
    }
    if buf.token(last).is(Punct::RBrace) {
        if let Some(open) = scan::matching_open(buf, last, s) {
            if open + 1 < last && is_code(open) {
                return Some(open);
            }
        }
    }

    // Last `{` opens a block that continues on later lines
    let lbrace = (s..e).rev().find(|&i| buf.token(i).is(Punct::LBrace))?;
    if lbrace + 1 < e {
        let unmatched = scan::matching_close(buf, lbrace, e).is_none();
        return (unmatched && is_code(lbrace)).then_some(lbrace);
    }

    // Trailing `{` is empty: right-most earlier block with content
    scan::top_level(buf, s, lbrace)
        .filter(|&i| buf.token(i).is(Punct::LBrace))
        .filter(|&i| scan::matching_close(buf, i, lbrace).is_some_and(|close| close > i + 1))
        .last()
        .filter(|&i| is_code(i))
}

pub fn split(w: &mut Wrapper<'_>, line: Line, lbrace: usize) -> Option<usize> {
    let buf = w.buf();
    let rbrace = scan::matching_close(buf, lbrace, line.end);
    let body_end = rbrace.unwrap_or(line.end);
    let body = scan::lambda_arrow(buf, lbrace, body_end).map_or(lbrace + 1, |arrow| arrow + 1);
    if body >= body_end {
        return None;
    }

    let mut breaks = vec![(body, line.indent + w.unit())];
    if let Some(rbrace) = rbrace {
        breaks.push((rbrace, line.indent));
    }
    w.apply_breaks(line, &breaks)
}
