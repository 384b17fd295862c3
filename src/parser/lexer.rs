//! Kotlin tokenizer
//!
//! Turns source text into [`Token`]s that each carry their leading whitespace.
//! String and char literals, comments and `${...}` templates are kept whole, so
//! nothing inside a literal is ever seen as a keyword or bracket by the engine.
//!
//! Recognition is done by a logos-derived [`RawToken`]; literals and nested
//! comments are finished by callbacks that scan the remainder. A thin pass over
//! the logos spans then attaches each whitespace run to the token after it.
//!
//! Lexing never fails: unknown characters become [`TokenKind::Unknown`] and
//! unterminated literals or comments run to the end of the input.

use logos::{Lexer, Logos};

use super::token::{Keyword, Punct, Token, TokenKind};

/// Token classes as seen by logos, before keyword and punctuation lookup
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum RawToken {
    #[regex(r"\s+")]
    Whitespace,

    // A `\r` of CRLF line endings stays in the whitespace
    #[regex(r"//[^\r\n]*")]
    LineComment,

    #[token("/*", block_comment)]
    BlockComment,

    #[token("\"", string)]
    #[token("\"\"\"", raw_string)]
    StringLit,

    #[token("'", char_literal)]
    CharLit,

    #[regex(r"[\p{L}_][\p{L}\p{N}_]*")]
    #[regex(r"`[^`\n]*`?")]
    Identifier,

    #[regex(r"@[\p{L}_][\p{L}\p{N}_]*")]
    Annotation,

    #[regex(r"[0-9][0-9A-Za-z_]*(\.[0-9][0-9A-Za-z_]*)?")]
    #[regex(r"[0-9][0-9_]*(\.[0-9][0-9_]*)?[eE][+-][0-9][0-9A-Za-z_]*")]
    Number,

    // Multi-character operators win by longest match
    #[token("===")]
    #[token("!==")]
    #[token("..<")]
    #[token("==")]
    #[token("!=")]
    #[token("<=")]
    #[token(">=")]
    #[token("->")]
    #[token("&&")]
    #[token("||")]
    #[token("?:")]
    #[token("?.")]
    #[token("!!")]
    #[token("::")]
    #[token("..")]
    #[token("+=")]
    #[token("-=")]
    #[token("*=")]
    #[token("/=")]
    #[token("%=")]
    #[token("++")]
    #[token("--")]
    #[token("(")]
    #[token(")")]
    #[token("{")]
    #[token("}")]
    #[token("[")]
    #[token("]")]
    #[token(",")]
    #[token(":")]
    #[token("=")]
    #[token("<")]
    #[token(">")]
    #[token(";")]
    #[token(".")]
    #[token("+")]
    #[token("-")]
    #[token("*")]
    #[token("/")]
    #[token("%")]
    #[token("!")]
    #[token("?")]
    #[token("&")]
    #[token("|")]
    #[token("^")]
    #[token("~")]
    #[token("#")]
    #[token("@")]
    Operator,
}

fn block_comment(lex: &mut Lexer<'_, RawToken>) {
    let len = block_comment_len(lex.remainder().as_bytes());
    lex.bump(len);
}

fn string(lex: &mut Lexer<'_, RawToken>) {
    let len = string_len(lex.remainder().as_bytes(), false);
    lex.bump(len);
}

fn raw_string(lex: &mut Lexer<'_, RawToken>) {
    let len = string_len(lex.remainder().as_bytes(), true);
    lex.bump(len);
}

fn char_literal(lex: &mut Lexer<'_, RawToken>) {
    let len = char_len(lex.remainder().as_bytes());
    lex.bump(len);
}

// The scanners below work on bytes after the opening delimiter and return how
// many belong to the token. Every delimiter is ASCII, so the lengths always
// fall on char boundaries.

/// Rest of a block comment whose `/*` was consumed; nests
fn block_comment_len(rest: &[u8]) -> usize {
    let mut depth = 1usize;
    let mut i = 0;
    while i < rest.len() {
        if rest[i..].starts_with(b"/*") {
            depth += 1;
            i += 2;
        } else if rest[i..].starts_with(b"*/") {
            depth -= 1;
            i += 2;
            if depth == 0 {
                return i;
            }
        } else {
            i += 1;
        }
    }
    rest.len()
}

/// Rest of a string literal, `${...}` templates included
///
/// A plain string also ends before an unescaped newline.
fn string_len(rest: &[u8], raw: bool) -> usize {
    let mut i = 0;
    while i < rest.len() {
        match rest[i] {
            b'"' if raw => {
                if rest[i..].starts_with(b"\"\"\"") {
                    i += 3;
                    // Extra quotes before the closing triple belong to it
                    while rest.get(i) == Some(&b'"') {
                        i += 1;
                    }
                    return i;
                }
                i += 1;
            }
            b'"' => return i + 1,
            b'\\' if !raw => i += 2,
            b'\n' if !raw => return i,
            b'$' if rest.get(i + 1) == Some(&b'{') => i += 2 + template_len(&rest[i + 2..]),
            _ => i += 1,
        }
    }
    rest.len()
}

/// Rest of a char literal
fn char_len(rest: &[u8]) -> usize {
    let mut i = 0;
    while i < rest.len() {
        match rest[i] {
            b'\\' => i += 2,
            b'\'' => return i + 1,
            b'\n' => return i,
            _ => i += 1,
        }
    }
    rest.len()
}

/// Rest of a `${...}` template up to and including its closing `}`
fn template_len(rest: &[u8]) -> usize {
    let mut depth = 0usize;
    let mut i = 0;
    while i < rest.len() {
        match rest[i] {
            b'"' if rest[i..].starts_with(b"\"\"\"") => i += 3 + string_len(&rest[i + 3..], true),
            b'"' => i += 1 + string_len(&rest[i + 1..], false),
            b'\'' => i += 1 + char_len(&rest[i + 1..]),
            b'{' => {
                depth += 1;
                i += 1;
            }
            b'}' if depth == 0 => return i + 1,
            b'}' => {
                depth -= 1;
                i += 1;
            }
            _ => i += 1,
        }
    }
    rest.len()
}

/// Output of the tokenizer
#[derive(Debug, Clone, Default)]
pub struct Lexed {
    pub tokens: Vec<Token>,
    /// Whitespace after the last token
    pub tail: String,
}

/// Source of tokens for the wrap engine
///
/// The engine only depends on this trait, so any tokenizer that can produce
/// lead-carrying tokens can drive it.
pub trait Tokenizer {
    fn tokenize(&self, source: &str) -> Lexed;
}

/// The built-in Kotlin tokenizer
#[derive(Debug, Clone, Copy, Default)]
pub struct KotlinLexer;

impl Tokenizer for KotlinLexer {
    fn tokenize(&self, source: &str) -> Lexed {
        tokenize(source)
    }
}

/// Tokenize Kotlin source
#[must_use]
pub fn tokenize(source: &str) -> Lexed {
    let mut lexer = RawToken::lexer(source);
    let mut tokens = Vec::new();
    let mut lead = String::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let kind = match result {
            Ok(RawToken::Whitespace) => {
                lead.push_str(lexer.slice());
                continue;
            }
            Ok(raw) => classify(raw, lexer.slice()),
            Err(()) => TokenKind::Unknown,
        };
        // An unknown character is never cut in half
        let end = source[span.start..]
            .chars()
            .next()
            .map_or(span.end, |c| span.end.max(span.start + c.len_utf8()));
        if end > span.end {
            lexer.bump(end - span.end);
        }
        tokens.push(Token::new(kind, &source[span.start..end], std::mem::take(&mut lead)));
    }
    Lexed { tokens, tail: lead }
}

fn classify(raw: RawToken, text: &str) -> TokenKind {
    match raw {
        RawToken::Identifier => Keyword::from_word(text).map_or(TokenKind::Identifier, TokenKind::Keyword),
        RawToken::Operator => classify_operator(text),
        RawToken::LineComment => TokenKind::LineComment,
        RawToken::BlockComment => TokenKind::BlockComment,
        RawToken::StringLit => TokenKind::StringLit,
        RawToken::CharLit => TokenKind::CharLit,
        RawToken::Annotation => TokenKind::Annotation,
        RawToken::Number => TokenKind::Number,
        RawToken::Whitespace => TokenKind::Unknown,
    }
}

fn classify_operator(text: &str) -> TokenKind {
    let punct = match text {
        "(" => Punct::LParen,
        ")" => Punct::RParen,
        "{" => Punct::LBrace,
        "}" => Punct::RBrace,
        "[" => Punct::LBracket,
        "]" => Punct::RBracket,
        "," => Punct::Comma,
        ";" => Punct::Semi,
        ":" => Punct::Colon,
        "=" => Punct::Eq,
        "->" => Punct::Arrow,
        "&&" => Punct::AndAnd,
        "||" => Punct::OrOr,
        "<" => Punct::Lt,
        ">" => Punct::Gt,
        _ => return TokenKind::Operator,
    };
    TokenKind::Punct(punct)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).tokens.into_iter().map(|t| t.kind).collect()
    }

    fn texts(source: &str) -> Vec<String> {
        tokenize(source).tokens.into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_round_trip_preserves_text() {
        let source = "  val x = foo(a, \"b c\") // done\n\n}\n";
        let lexed = tokenize(source);
        let rendered: String = lexed.tokens.iter().map(ToString::to_string).collect::<String>()
            + &lexed.tail;
        assert_eq!(rendered, source);
    }

    #[test]
    fn test_keywords_and_punct() {
        assert_eq!(
            kinds("if (a && b) x = y"),
            vec![
                TokenKind::Keyword(Keyword::If),
                TokenKind::Punct(Punct::LParen),
                TokenKind::Identifier,
                TokenKind::Punct(Punct::AndAnd),
                TokenKind::Identifier,
                TokenKind::Punct(Punct::RParen),
                TokenKind::Identifier,
                TokenKind::Punct(Punct::Eq),
                TokenKind::Identifier,
            ]
        );
    }

    #[test]
    fn test_maximal_munch() {
        assert_eq!(texts("a == b"), vec!["a", "==", "b"]);
        assert_eq!(texts("0..n"), vec!["0", "..", "n"]);
        assert_eq!(texts("x?.y ?: z"), vec!["x", "?.", "y", "?:", "z"]);
        assert_eq!(texts("{ a -> b }"), vec!["{", "a", "->", "b", "}"]);
        assert_eq!(kinds("a <= b")[1], TokenKind::Operator);
    }

    #[test]
    fn test_generic_closers_stay_separate() {
        assert_eq!(
            texts("Map<String, List<Int>>"),
            vec!["Map", "<", "String", ",", "List", "<", "Int", ">", ">"]
        );
    }

    #[test]
    fn test_string_literal_is_one_token() {
        let lexed = tokenize(r#"println("if (x) { a, b }", y)"#);
        assert_eq!(lexed.tokens.len(), 6);
        assert_eq!(lexed.tokens[2].text, r#""if (x) { a, b }""#);
        assert_eq!(lexed.tokens[2].kind, TokenKind::StringLit);
    }

    #[test]
    fn test_template_with_nested_string() {
        let source = r#"s = "a ${f("}")} b" + c"#;
        assert_eq!(texts(source), vec!["s", "=", r#""a ${f("}")} b""#, "+", "c"]);
    }

    #[test]
    fn test_raw_string() {
        let source = "x = \"\"\"a \"quoted\" (\"\"\"";
        assert_eq!(texts(source), vec!["x", "=", "\"\"\"a \"quoted\" (\"\"\""]);
    }

    #[test]
    fn test_comments() {
        let lexed = tokenize("a /* b /* c */ d */ e // f\ng");
        let kinds: Vec<TokenKind> = lexed.tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Identifier,
                TokenKind::BlockComment,
                TokenKind::Identifier,
                TokenKind::LineComment,
                TokenKind::Identifier,
            ]
        );
        assert_eq!(lexed.tokens[3].text, "// f");
        assert_eq!(lexed.tokens[4].lead, "\n");
    }

    #[test]
    fn test_char_literal_and_annotation() {
        assert_eq!(texts("c == '\"' @Suppress"), vec!["c", "==", "'\"'", "@Suppress"]);
        assert_eq!(kinds("@Suppress")[0], TokenKind::Annotation);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(texts("1.5e-3 + 0xFFL + 1_000"), vec!["1.5e-3", "+", "0xFFL", "+", "1_000"]);
    }

    #[test]
    fn test_unterminated_literal_does_not_panic() {
        let lexed = tokenize("x = \"abc");
        assert_eq!(lexed.tokens.last().unwrap().text, "\"abc");
        let lexed = tokenize("/* open");
        assert_eq!(lexed.tokens[0].kind, TokenKind::BlockComment);
    }

    #[test]
    fn test_unknown_character_keeps_its_bytes() {
        let lexed = tokenize("a \u{a7} b");
        assert_eq!(texts("a \u{a7} b"), vec!["a", "\u{a7}", "b"]);
        assert_eq!(lexed.tokens[1].kind, TokenKind::Unknown);
    }

    #[test]
    fn test_crlf_stays_in_lead() {
        let lexed = tokenize("x // note\r\ny;");
        assert_eq!(lexed.tokens[1].text, "// note");
        assert_eq!(lexed.tokens[2].lead, "\r\n");
        assert_eq!(lexed.tokens[3].kind, TokenKind::Punct(Punct::Semi));
    }

    #[test]
    fn test_raw_string_template_and_extra_quotes() {
        let source = "t = \"\"\"${if (a) \"}\" else b}\"\"\"\" + c";
        assert_eq!(
            texts(source),
            vec!["t", "=", "\"\"\"${if (a) \"}\" else b}\"\"\"\"", "+", "c"]
        );
    }
}
