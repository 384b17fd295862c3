//! Conditional split (`if`/`while`) and the boolean-operator fallback
//!
//! Only an `if`/`while` outside any bracket opened on the line is considered.
//! In priority order an over-long conditional line:
//! - moves the keyword to its own line when it follows `{`, `=` or `->`;
//! - turns `if (c) a else b` into explicit brace blocks;
//! - wraps a single unbraced body in braces;
//! - splits the condition after each top-level `&&`/`||`, closing with `)`
//!   on its own line.

use crate::format::buffer::{TokenBuffer, TokenContext};
use crate::format::engine::{Line, Wrapper};
use crate::format::scan;
use crate::parser::token::{Keyword, Punct, Token};

fn is_bool_op(tok: &Token) -> bool {
    tok.is(Punct::AndAnd) || tok.is(Punct::OrOr)
}

/// Anchor is a top-level `if` or `while` directly followed by `(`
pub fn detect(buf: &TokenBuffer, line: Line) -> Option<usize> {
    scan::find_top_level(buf, line.start, line.end, |i| {
        let tok = buf.token(i);
        (tok.is_keyword(Keyword::If) || tok.is_keyword(Keyword::While))
            && i + 1 < line.end
            && buf.token(i + 1).is(Punct::LParen)
    })
}

pub fn split(w: &mut Wrapper<'_>, line: Line, keyword: usize) -> Option<usize> {
    let buf = w.buf();
    if keyword > line.start {
        let prev = buf.token(keyword - 1);
        let nested = [Punct::LBrace, Punct::Eq, Punct::Arrow]
            .into_iter()
            .any(|p| prev.is(p));
        if nested {
            let breaks = [(keyword, line.indent + w.unit())];
            return w.apply_breaks(line, &breaks);
        }
    }

    let rparen = scan::matching_close(buf, keyword + 1, line.end)?;
    if buf.token(keyword).is_keyword(Keyword::If) {
        if let Some(end) = brace_branches(w, line, rparen) {
            return Some(end);
        }
    }
    if let Some(end) = brace_body(w, line, rparen) {
        return Some(end);
    }
    split_condition(w, line, keyword + 1, rparen)
}

/// `if (c) a else b` becomes two brace blocks
fn brace_branches(w: &mut Wrapper<'_>, line: Line, rparen: usize) -> Option<usize> {
    let buf = w.buf();
    let then_start = rparen + 1;
    let group = scan::group_end(buf, then_start, line.end);
    let else_kw = scan::find_unnested(buf, then_start, group, |t| t.is_keyword(Keyword::Else))?;
    let else_body = else_kw + 1;
    if then_start >= else_kw || else_body >= group {
        return None;
    }
    // Already block-formatted
    if buf.token(then_start).is(Punct::LBrace)
        || buf.token(else_body).is(Punct::LBrace)
        || buf.token(else_kw - 1).is(Punct::RBrace)
    {
        return None;
    }
    let else_if = buf.token(else_body).is_keyword(Keyword::If);
    let (indent, inner) = (line.indent, line.indent + w.unit());

    let buf = w.buf_mut();
    let mut added = 2;
    if !else_if {
        buf.insert_on_new_line(group, Token::punct(Punct::RBrace, ""), indent);
        buf.insert(else_body, Token::punct(Punct::LBrace, " "));
        buf.set_break(else_body + 1, inner);
        added += 2;
    }
    buf.set_space(else_kw);
    buf.insert_on_new_line(else_kw, Token::punct(Punct::RBrace, ""), indent);
    buf.insert(then_start, Token::punct(Punct::LBrace, " "));
    buf.set_break(then_start + 1, inner);
    Some(w.format_lines(line.start, line.end + added, line.depth))
}

/// A single statement after the header `)` goes into a brace block
///
/// Shared with the for-loop split.
pub(crate) fn brace_body(w: &mut Wrapper<'_>, line: Line, rparen: usize) -> Option<usize> {
    let buf = w.buf();
    let body = rparen + 1;
    let group = scan::group_end(buf, body, line.end);
    if body >= group || buf.token(body).is(Punct::LBrace) {
        return None;
    }
    if scan::find_unnested(buf, body, group, |t| t.is_keyword(Keyword::Else)).is_some() {
        return None;
    }
    // `if (c) a; else b`
    if group + 1 < line.end
        && buf.token(group).is(Punct::Semi)
        && buf.token(group + 1).is_keyword(Keyword::Else)
    {
        return None;
    }
    let (indent, inner) = (line.indent, line.indent + w.unit());

    let buf = w.buf_mut();
    buf.insert_on_new_line(group, Token::punct(Punct::RBrace, ""), indent);
    buf.insert(body, Token::punct(Punct::LBrace, " "));
    buf.set_break(body + 1, inner);
    Some(w.format_lines(line.start, line.end + 2, line.depth))
}

/// Split the condition between `lparen` and `rparen`
fn split_condition(w: &mut Wrapper<'_>, line: Line, lparen: usize, rparen: usize) -> Option<usize> {
    let buf = w.buf();
    let inner = line.indent + w.unit();
    let mut breaks: Vec<(usize, usize)> = scan::top_level(buf, lparen + 1, rparen)
        .filter(|&i| is_bool_op(buf.token(i)) && i + 1 < rparen)
        .map(|i| (i + 1, inner))
        .collect();
    if breaks.is_empty() {
        // No operator: the whole condition gets its own line
        if lparen + 1 >= rparen {
            return None;
        }
        breaks.push((lparen + 1, inner));
    }
    breaks.push((rparen, line.indent));
    w.apply_breaks(line, &breaks)
}

/// Anchor is the earliest top-level `&&` or `||`
pub fn detect_boolean(buf: &TokenBuffer, line: Line) -> Option<usize> {
    scan::find_top_level(buf, line.start, line.end, |i| {
        is_bool_op(buf.token(i)) && i + 1 < line.end
    })
}

pub fn split_boolean(w: &mut Wrapper<'_>, line: Line, _first: usize) -> Option<usize> {
    let buf = w.buf();
    let inner = line.indent + w.unit();
    let breaks: Vec<(usize, usize)> = scan::top_level(buf, line.start, line.end)
        .filter(|&i| is_bool_op(buf.token(i)) && i + 1 < line.end)
        .map(|i| (i + 1, inner))
        .collect();
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
    fn test_if_else_gets_braces() {
        let out = wrap_line("val size = if (compact) smallSize() else largeSize()", &settings(40));
        assert_eq!(
            out.text,
            "val size =\n    if (compact) {\n        smallSize()\n    } else {\n        largeSize()\n    }"
        );
    }

    #[test]
    fn test_else_if_chain() {
        let out = wrap_line(
            "return if (a > b) first() else if (b > c) second() else third()",
            &settings(35),
        );
        assert_eq!(
            out.text,
            "return if (a > b) {\n    first()\n} else if (b > c) {\n    second()\n} else {\n    third()\n}"
        );
    }

    #[test]
    fn test_unbraced_body() {
        let out = wrap_line("    while (iterator.hasNext()) consume(iterator.next())", &settings(40));
        assert_eq!(
            out.text,
            "    while (iterator.hasNext()) {\n        consume(iterator.next())\n    }"
        );
    }

    #[test]
    fn test_condition_split_at_operators() {
        let out = wrap_line(
            "if (isReady && hasPermission || isAdministrator) {",
            &settings(40),
        );
        assert_eq!(
            out.text,
            "if (isReady &&\n    hasPermission ||\n    isAdministrator\n) {"
        );
    }

    #[test]
    fn test_condition_without_operators() {
        let out = wrap_line("if (configuration.isValidFor(environment)) {", &settings(42));
        assert_eq!(
            out.text,
            "if (\n    configuration.isValidFor(environment)\n) {"
        );
    }

    #[test]
    fn test_unbraced_body_stops_at_semicolon() {
        let out = wrap_line(
            "    if (ready) start(); logMessage(\"done with a fairly long message text\")",
            &settings(50),
        );
        assert_eq!(
            out.text,
            concat!(
                "    if (ready) {\n",
                "        start()\n",
                "    }; logMessage(\n",
                "        \"done with a fairly long message text\"\n",
                "    )",
            )
        );
    }

    #[test]
    fn test_if_nested_in_call_is_not_a_conditional_line() {
        let out = wrap_line(
            "val result = compute(if (flag) firstAlternativeValue else secondAlternativeValue, anotherArgument)",
            &settings(60),
        );
        assert_eq!(
            out.text,
            concat!(
                "val result =\n",
                "    compute(\n",
                "        if (flag) {\n",
                "            firstAlternativeValue\n",
                "        } else {\n",
                "            secondAlternativeValue\n",
                "        },\n",
                "        anotherArgument\n",
                "    )",
            )
        );
    }

    #[test]
    fn test_boolean_fallback() {
        let out = wrap_line("return firstCondition && secondCondition", &settings(30));
        assert_eq!(out.text, "return firstCondition &&\n    secondCondition");
    }
}
