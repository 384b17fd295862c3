//! Structural scanners
//!
//! Stateless queries over a [`TokenContext`]: bracket matching, top-level
//! iteration, keyword search and comment detection. "Top-level" is always
//! relative to the first token of the scanned range: not nested in an
//! unmatched `(` or `[` opened inside the range, nor in a generic `<...>`.

use crate::format::buffer::TokenContext;
use crate::parser::char_filter::in_literal_at;
use crate::parser::token::{Keyword, Punct, Token, TokenKind};

/// Iterator over the top-level token indices of a range
pub struct TopLevel<'a, C: TokenContext + ?Sized> {
    ctx: &'a C,
    next: usize,
    end: usize,
    depth: usize,
    angle: usize,
    generics: bool,
}

impl<C: TokenContext + ?Sized> Iterator for TopLevel<'_, C> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        while self.next < self.end {
            let i = self.next;
            self.next += 1;
            let top = self.depth == 0 && self.angle == 0;
            match self.ctx.token(i).punct_kind() {
                Some(Punct::LParen | Punct::LBracket) => self.depth += 1,
                Some(Punct::RParen | Punct::RBracket) => self.depth = self.depth.saturating_sub(1),
                Some(Punct::Lt) if self.generics && opens_generic(self.ctx, i) => self.angle += 1,
                Some(Punct::Gt) if self.angle > 0 => self.angle -= 1,
                _ => {}
            }
            if top {
                return Some(i);
            }
        }
        None
    }
}

impl<C: TokenContext + ?Sized> TopLevel<'_, C> {
    /// Force generic tracking on or off
    #[must_use]
    pub fn with_generics(mut self, generics: bool) -> Self {
        self.generics = generics;
        self
    }
}

/// Top-level tokens of `[start, end)`
///
/// Generic angle brackets are tracked unless the range holds an `if`, where
/// `<` and `>` are far more likely to be comparisons.
pub fn top_level<C: TokenContext + ?Sized>(ctx: &C, start: usize, end: usize) -> TopLevel<'_, C> {
    let generics = !(start..end).any(|i| ctx.token(i).is_keyword(Keyword::If));
    TopLevel {
        ctx,
        next: start,
        end,
        depth: 0,
        angle: 0,
        generics,
    }
}

/// `<` written as `Name<...` (no space) or `fun <T>` opens a type argument list
fn opens_generic<C: TokenContext + ?Sized>(ctx: &C, i: usize) -> bool {
    let Some(p) = ctx.prev(i) else {
        return false;
    };
    let prev = ctx.token(p);
    (prev.kind == TokenKind::Identifier && ctx.token(i).lead.is_empty())
        || prev.is_keyword(Keyword::Fun)
}

/// Quote-parity guard: whether token `i` is code rather than literal text
///
/// Counts the quotes and comment openers in the line text before the token.
pub fn is_code<C: TokenContext + ?Sized>(ctx: &C, line_start: usize, i: usize) -> bool {
    let before = ctx.text(line_start..i);
    let lead = if i == line_start { "" } else { ctx.token(i).lead.as_str() };
    let text = format!("{before}{lead}{}", ctx.token(i).text);
    !in_literal_at(&text, before.len() + lead.len())
}

/// First top-level token of `[start, end)` matching `pred`
pub fn find_top_level<C, F>(ctx: &C, start: usize, end: usize, pred: F) -> Option<usize>
where
    C: TokenContext + ?Sized,
    F: Fn(usize) -> bool,
{
    top_level(ctx, start, end).find(|&i| pred(i) && is_code(ctx, start, i))
}

/// First occurrence of `keyword` in `[start, end)` at any nesting depth
pub fn find_keyword<C: TokenContext + ?Sized>(
    ctx: &C,
    start: usize,
    end: usize,
    keyword: Keyword,
) -> Option<usize> {
    (start..end).find(|&i| ctx.token(i).is_keyword(keyword) && is_code(ctx, start, i))
}

/// Matching closer of the opener at `open`, searching before `limit`
pub fn matching_close<C: TokenContext + ?Sized>(ctx: &C, open: usize, limit: usize) -> Option<usize> {
    let closer = ctx.token(open).punct_kind()?.closer()?;
    let mut stack: Vec<Punct> = Vec::new();
    for i in open..limit {
        let Some(p) = ctx.token(i).punct_kind() else {
            continue;
        };
        if p.is_open() {
            stack.push(p);
        } else if p.is_close() {
            let top = stack.pop()?;
            if top.closer() != Some(p) {
                return None;
            }
            if stack.is_empty() {
                return (p == closer).then_some(i);
            }
        }
    }
    None
}

/// Matching opener of the closer at `close`, searching back to `start`
pub fn matching_open<C: TokenContext + ?Sized>(ctx: &C, close: usize, start: usize) -> Option<usize> {
    let close_kind = ctx.token(close).punct_kind()?;
    if !close_kind.is_close() {
        return None;
    }
    let mut stack: Vec<Punct> = Vec::new();
    for i in (start..=close).rev() {
        let Some(p) = ctx.token(i).punct_kind() else {
            continue;
        };
        if p.is_close() {
            stack.push(p);
        } else if p.is_open() {
            let top = stack.pop()?;
            if p.closer() != Some(top) {
                return None;
            }
            if stack.is_empty() {
                return Some(i);
            }
        }
    }
    None
}

/// Nearest unmatched `(` or `[` before `i`, not before `start`
pub fn enclosing_opener<C: TokenContext + ?Sized>(ctx: &C, start: usize, i: usize) -> Option<usize> {
    let mut depth = 0usize;
    for j in (start..i).rev() {
        match ctx.token(j).punct_kind() {
            Some(Punct::RParen | Punct::RBracket) => depth += 1,
            Some(Punct::LParen | Punct::LBracket) => {
                if depth == 0 {
                    return Some(j);
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    None
}

/// First token of `[from, end)` outside any bracket opened in the range
pub fn find_unnested<C, F>(ctx: &C, from: usize, end: usize, pred: F) -> Option<usize>
where
    C: TokenContext + ?Sized,
    F: Fn(&Token) -> bool,
{
    let mut depth = 0usize;
    for i in from..end {
        let tok = ctx.token(i);
        if depth == 0 && pred(tok) {
            return Some(i);
        }
        match tok.punct_kind() {
            Some(p) if p.is_open() => depth += 1,
            Some(p) if p.is_close() => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    None
}

/// End of the expression group starting at `from`
///
/// The group stops at the first `,`, `;` or unmatched closer at its own
/// depth, or at `end`.
pub fn group_end<C: TokenContext + ?Sized>(ctx: &C, from: usize, end: usize) -> usize {
    let mut depth = 0usize;
    for i in from..end {
        match ctx.token(i).punct_kind() {
            Some(p) if p.is_open() => depth += 1,
            Some(p) if p.is_close() => {
                if depth == 0 {
                    return i;
                }
                depth -= 1;
            }
            Some(Punct::Comma | Punct::Semi) if depth == 0 => return i,
            _ => {}
        }
    }
    end
}

/// The `->` of a lambda whose braces are `lbrace` and `rbrace`
pub fn lambda_arrow<C: TokenContext + ?Sized>(ctx: &C, lbrace: usize, rbrace: usize) -> Option<usize> {
    let mut depth = 0usize;
    for i in lbrace + 1..rbrace {
        match ctx.token(i).punct_kind() {
            Some(p) if p.is_open() => depth += 1,
            Some(p) if p.is_close() => depth = depth.saturating_sub(1),
            Some(Punct::Arrow) if depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

/// A comment ending the line after some code
pub fn trailing_comment<C: TokenContext + ?Sized>(ctx: &C, start: usize, end: usize) -> Option<usize> {
    let last = end.checked_sub(1)?;
    if last <= start || !ctx.token(last).kind.is_comment() {
        return None;
    }
    (start..last)
        .any(|i| !ctx.token(i).kind.is_comment())
        .then_some(last)
}

#[must_use]
pub fn is_comment_only<C: TokenContext + ?Sized>(ctx: &C, start: usize, end: usize) -> bool {
    (start..end).all(|i| ctx.token(i).kind.is_comment())
}

/// Number of physical lines from the one starting at `from` through token `to`
pub fn lines_through<C: TokenContext + ?Sized>(ctx: &C, from: usize, to: usize) -> usize {
    (from..=to).filter(|&i| i == from || ctx.token(i).starts_line()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::buffer::TokenBuffer;

    fn texts(buf: &TokenBuffer, idx: impl Iterator<Item = usize>) -> Vec<String> {
        idx.map(|i| buf.token(i).text.clone()).collect()
    }

    #[test]
    fn test_top_level_skips_nested() {
        let buf = TokenBuffer::parse("f(a, b), g[c, d], e");
        let commas: Vec<usize> = top_level(&buf, 0, buf.len())
            .filter(|&i| buf.token(i).is(Punct::Comma))
            .collect();
        assert_eq!(commas.len(), 2);
    }

    #[test]
    fn test_generic_commas_are_nested() {
        let buf = TokenBuffer::parse("x: Map<String, Int>, y: Int");
        let commas: Vec<usize> = top_level(&buf, 0, buf.len())
            .filter(|&i| buf.token(i).is(Punct::Comma))
            .collect();
        assert_eq!(commas, vec![8]);
    }

    #[test]
    fn test_comparisons_inside_if_are_not_generics() {
        let buf = TokenBuffer::parse("if (a<b) f(x, y) else c");
        let top = texts(&buf, top_level(&buf, 0, buf.len()));
        assert!(top.contains(&"else".to_string()));
    }

    #[test]
    fn test_matching() {
        let buf = TokenBuffer::parse("a(b[c], { d }) + e");
        assert_eq!(matching_close(&buf, 1, buf.len()), Some(10));
        assert_eq!(matching_open(&buf, 10, 0), Some(1));
        assert_eq!(matching_close(&buf, 3, buf.len()), Some(5));
        // Unbalanced
        let buf = TokenBuffer::parse("f(a, b");
        assert_eq!(matching_close(&buf, 1, buf.len()), None);
    }

    #[test]
    fn test_enclosing_opener() {
        let buf = TokenBuffer::parse("foo(a, bar(b), c");
        // comma after `bar(b)` is index 8
        assert_eq!(buf.token(8).text, ",");
        assert_eq!(enclosing_opener(&buf, 0, 8), Some(1));
        assert_eq!(enclosing_opener(&buf, 5, 8), None);
    }

    #[test]
    fn test_group_end() {
        let buf = TokenBuffer::parse("x else f(a, b), c)");
        assert_eq!(buf.token(group_end(&buf, 2, buf.len())).text, ",");
        let buf = TokenBuffer::parse("y)");
        assert_eq!(group_end(&buf, 0, buf.len()), 1);
        let buf = TokenBuffer::parse("start(); stop()");
        assert_eq!(buf.token(group_end(&buf, 0, buf.len())).text, ";");
    }

    #[test]
    fn test_lambda_arrow() {
        let buf = TokenBuffer::parse("{ seed -> f(seed) }");
        assert_eq!(lambda_arrow(&buf, 0, buf.len() - 1), Some(2));
        let buf = TokenBuffer::parse("{ f { a -> a } }");
        assert_eq!(lambda_arrow(&buf, 0, buf.len() - 1), None);
    }

    #[test]
    fn test_trailing_comment() {
        let buf = TokenBuffer::parse("x = 1 // one");
        assert_eq!(trailing_comment(&buf, 0, buf.len()), Some(3));
        let buf = TokenBuffer::parse("// only a comment");
        assert_eq!(trailing_comment(&buf, 0, buf.len()), None);
        assert!(is_comment_only(&buf, 0, buf.len()));
    }

    #[test]
    fn test_keyword_inside_string_is_invisible() {
        let buf = TokenBuffer::parse(r#"println("if (x) else y")"#);
        assert_eq!(find_keyword(&buf, 0, buf.len(), Keyword::If), None);
        let buf = TokenBuffer::parse(r#"log("x"); if (y) z"#);
        assert_eq!(find_keyword(&buf, 0, buf.len(), Keyword::If), Some(5));
    }

    #[test]
    fn test_quote_guard_on_split_literal_tokens() {
        // A tokenizer that splits string contents still must not expose them
        use crate::parser::lexer::Lexed;
        use crate::parser::token::Token;
        let lexed = Lexed {
            tokens: vec![
                Token::new(TokenKind::Unknown, "\"", ""),
                Token::new(TokenKind::Keyword(Keyword::If), "if", ""),
                Token::new(TokenKind::Unknown, "\"", " "),
            ],
            tail: String::new(),
        };
        let buf = TokenBuffer::from_lexed(lexed);
        assert!(!is_code(&buf, 0, 1));
        assert_eq!(find_keyword(&buf, 0, buf.len(), Keyword::If), None);
    }

    #[test]
    fn test_find_unnested() {
        let buf = TokenBuffer::parse("a { if (x) b else c } else d");
        let found = find_unnested(&buf, 1, buf.len(), |t| t.is_keyword(Keyword::Else));
        assert_eq!(found, Some(10));
    }

    #[test]
    fn test_lines_through() {
        let buf = TokenBuffer::parse("a(\n  b,\n  c\n)\nd");
        assert_eq!(lines_through(&buf, 2, 5), 3);
    }
}
