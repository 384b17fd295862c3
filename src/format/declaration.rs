//! Declaration split
//!
//! Puts each parameter of a `class`/`fun` declaration on its own line one
//! level deeper, with the closing `)` back at the declaration's indentation.
//! A supertype list (or return type) after `):` is split at its top-level
//! commas the same way; when that happens the body `{` gets its own line.
//!
//! The parameter-list split is shared with the comma-list and parenthesized
//! expression fallbacks.

use crate::format::buffer::{TokenBuffer, TokenContext};
use crate::format::engine::{Line, Wrapper};
use crate::format::scan;
use crate::parser::token::{Keyword, Punct, Token, TokenKind};

/// Words allowed before `class` on a declaration line
const MODIFIERS: &[&str] = &[
    "data", "open", "enum", "sealed", "inline", "inner", "private", "public",
];

fn is_modifier(tok: &Token) -> bool {
    tok.kind == TokenKind::Annotation
        || (tok.kind == TokenKind::Identifier && MODIFIERS.contains(&tok.text.as_str()))
}

/// Anchor is the `class` or `fun` keyword
pub fn detect(buf: &TokenBuffer, line: Line) -> Option<usize> {
    let s = line.start;
    scan::find_top_level(buf, s, line.end, |i| {
        let tok = buf.token(i);
        tok.is_keyword(Keyword::Fun)
            || (tok.is_keyword(Keyword::Class) && (s..i).all(|j| is_modifier(buf.token(j))))
    })
}

pub fn split(w: &mut Wrapper<'_>, line: Line, keyword: usize) -> Option<usize> {
    let buf = w.buf();
    let unit = w.unit();
    let e = line.end;
    let lparen = scan::top_level(buf, keyword + 1, e)
        .with_generics(true)
        .find(|&i| buf.token(i).is(Punct::LParen));
    let colon = scan::top_level(buf, keyword + 1, e)
        .with_generics(true)
        .find(|&i| buf.token(i).is(Punct::Colon));

    let breaks = match (lparen, colon) {
        (Some(lp), colon) if colon.map_or(true, |c| lp < c) => {
            let rp = scan::matching_close(buf, lp, e);
            let mut breaks = param_breaks(buf, line, lp, rp, unit);
            if let Some(rp) = rp.filter(|&rp| rp + 1 < e && buf.token(rp + 1).is(Punct::Colon)) {
                breaks.extend(supertype_breaks(buf, line, rp + 1, unit, false));
            }
            breaks
        }
        (_, Some(colon)) if colon + 1 < e => {
            let mut breaks = vec![(colon, line.indent + unit)];
            breaks.extend(supertype_breaks(buf, line, colon, unit, true));
            breaks
        }
        _ => return None,
    };
    w.apply_breaks(line, &breaks)
}

/// Breaks that put each top-level entry of the list opened at `lparen` on its
/// own line; `rparen` is absent when the list continues past the line
pub fn param_breaks(
    buf: &TokenBuffer,
    line: Line,
    lparen: usize,
    rparen: Option<usize>,
    unit: usize,
) -> Vec<(usize, usize)> {
    let stop = rparen.unwrap_or(line.end);
    let first = lparen + 1;
    if first >= stop {
        return Vec::new();
    }
    let inner = line.indent + unit;
    let mut breaks = vec![(first, inner)];
    breaks.extend(
        scan::top_level(buf, first, stop)
            .filter(|&i| buf.token(i).is(Punct::Comma) && i + 1 < stop)
            .map(|i| (i + 1, inner)),
    );
    if let Some(rparen) = rparen {
        breaks.push((rparen, line.indent));
    }
    breaks
}

/// Breaks after each top-level comma of the clause introduced by `colon`
///
/// The clause ends at the body `{` or an expression-body `=`. The `{` moves to
/// its own line when the list was split, or always with `brace_own_line`.
fn supertype_breaks(
    buf: &TokenBuffer,
    line: Line,
    colon: usize,
    unit: usize,
    brace_own_line: bool,
) -> Vec<(usize, usize)> {
    let e = line.end;
    let inner = line.indent + unit;
    let mut breaks = Vec::new();
    let mut body = None;
    for i in scan::top_level(buf, colon + 1, e).with_generics(true) {
        let tok = buf.token(i);
        if tok.is(Punct::LBrace) || tok.is(Punct::Eq) {
            body = Some(i);
            break;
        }
        if tok.is(Punct::Comma) && i + 1 < e && !buf.token(i + 1).is(Punct::LBrace) {
            breaks.push((i + 1, inner));
        }
    }
    if brace_own_line || !breaks.is_empty() {
        if let Some(lbrace) = body.filter(|&b| buf.token(b).is(Punct::LBrace)) {
            breaks.push((lbrace, line.indent));
        }
    }
    breaks
}

/// Anchor is the first `(` with content whose `)` is on the line
pub fn detect_paren(buf: &TokenBuffer, line: Line) -> Option<usize> {
    (line.start..line.end).find(|&i| {
        buf.token(i).is(Punct::LParen)
            && scan::matching_close(buf, i, line.end).is_some_and(|close| close > i + 1)
            && scan::is_code(buf, line.start, i)
    })
}

pub fn split_paren(w: &mut Wrapper<'_>, line: Line, lparen: usize) -> Option<usize> {
    let rparen = scan::matching_close(w.buf(), lparen, line.end);
    let breaks = param_breaks(w.buf(), line, lparen, rparen, w.unit());
    w.apply_breaks(line, &breaks)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::format::line_split::wrap_line;
    use crate::format::Settings;

    fn settings(width: usize) -> Settings {
        Settings {
            max_line_length: width,
            ..Settings::default()
        }
    }

    #[test]
    fn test_fun_parameters() {
        let out = wrap_line(
            "fun connect(host: String, port: Int, timeout: Long): Connection {",
            &settings(50),
        );
        assert_eq!(
            out.text,
            "fun connect(\n    host: String,\n    port: Int,\n    timeout: Long\n): Connection {"
        );
    }

    #[test]
    fn test_generic_commas_stay_together() {
        let out = wrap_line(
            "fun index(entries: Map<String, List<Int>>, fallback: Int) {",
            &settings(40),
        );
        assert_eq!(
            out.text,
            "fun index(\n    entries: Map<String, List<Int>>,\n    fallback: Int\n) {"
        );
    }

    #[test]
    fn test_trailing_comma_keeps_closer_alone() {
        let out = wrap_line("class Point(val x: Double, val y: Double,)", &settings(30));
        assert_eq!(
            out.text,
            "class Point(\n    val x: Double,\n    val y: Double,\n)"
        );
    }

    #[test]
    fn test_modifiers_before_class() {
        let out = wrap_line(
            "private data class Pair(val first: String, val second: String)",
            &settings(50),
        );
        assert_eq!(
            out.text,
            "private data class Pair(\n    val first: String,\n    val second: String\n)"
        );
    }

    #[test]
    fn test_supertypes_without_parameters() {
        let out = wrap_line(
            "class Repository : Closeable, Flushable, AutoCloseable {",
            &settings(40),
        );
        assert_eq!(
            out.text,
            "class Repository\n    : Closeable,\n    Flushable,\n    AutoCloseable\n{"
        );
    }

    #[test]
    fn test_parenthesized_fallback() {
        let out = wrap_line(
            "        println(\"This message is long enough to need its own line\")",
            &settings(64),
        );
        assert_eq!(
            out.text,
            "        println(\n            \"This message is long enough to need its own line\"\n        )"
        );
    }
}
