//! Token types for Kotlin source
//!
//! A token owns the whitespace that precedes it (`lead`), so whitespace never
//! shows up as a token of its own. The wrap engine only ever edits `lead`,
//! which keeps token indices stable while lines are being broken.

use std::fmt;

/// Keywords the wrap engine dispatches on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Class,
    Fun,
    If,
    While,
    For,
    Val,
    Var,
    Else,
    In,
    /// Any other hard keyword (`return`, `when`, `object`, ...)
    Other,
}

impl Keyword {
    /// Map a word to its keyword, if it is one
    #[must_use]
    pub fn from_word(word: &str) -> Option<Self> {
        let kw = match word {
            "class" => Keyword::Class,
            "fun" => Keyword::Fun,
            "if" => Keyword::If,
            "while" => Keyword::While,
            "for" => Keyword::For,
            "val" => Keyword::Val,
            "var" => Keyword::Var,
            "else" => Keyword::Else,
            "in" => Keyword::In,
            "as" | "break" | "continue" | "do" | "false" | "interface" | "is" | "null"
            | "object" | "package" | "return" | "super" | "this" | "throw" | "true" | "try"
            | "typealias" | "typeof" | "when" => Keyword::Other,
            _ => return None,
        };
        Some(kw)
    }
}

/// Punctuation with structural meaning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punct {
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Semi,
    Colon,
    Eq,
    Arrow,
    AndAnd,
    OrOr,
    Lt,
    Gt,
}

impl Punct {
    /// The closing counterpart of an opening bracket
    #[must_use]
    pub fn closer(self) -> Option<Punct> {
        match self {
            Punct::LParen => Some(Punct::RParen),
            Punct::LBrace => Some(Punct::RBrace),
            Punct::LBracket => Some(Punct::RBracket),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_open(self) -> bool {
        matches!(self, Punct::LParen | Punct::LBrace | Punct::LBracket)
    }

    #[must_use]
    pub fn is_close(self) -> bool {
        matches!(self, Punct::RParen | Punct::RBrace | Punct::RBracket)
    }
}

/// Lexical category of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    Keyword(Keyword),
    Punct(Punct),
    /// Operators without structural meaning (`==`, `+`, `?.`, `..`, ...)
    Operator,
    Number,
    StringLit,
    CharLit,
    LineComment,
    BlockComment,
    Annotation,
    Unknown,
}

impl TokenKind {
    #[must_use]
    pub fn is_comment(self) -> bool {
        matches!(self, TokenKind::LineComment | TokenKind::BlockComment)
    }
}

/// A significant token together with its leading whitespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// Whitespace (spaces, tabs, newlines) between the previous token and this one
    pub lead: String,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<String>, lead: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            lead: lead.into(),
        }
    }

    /// Synthetic punctuation token (used for inserted braces)
    #[must_use]
    pub fn punct(punct: Punct, lead: impl Into<String>) -> Self {
        let text = match punct {
            Punct::LParen => "(",
            Punct::RParen => ")",
            Punct::LBrace => "{",
            Punct::RBrace => "}",
            Punct::LBracket => "[",
            Punct::RBracket => "]",
            Punct::Comma => ",",
            Punct::Semi => ";",
            Punct::Colon => ":",
            Punct::Eq => "=",
            Punct::Arrow => "->",
            Punct::AndAnd => "&&",
            Punct::OrOr => "||",
            Punct::Lt => "<",
            Punct::Gt => ">",
        };
        Self::new(TokenKind::Punct(punct), text, lead)
    }

    #[must_use]
    pub fn is(&self, punct: Punct) -> bool {
        self.kind == TokenKind::Punct(punct)
    }

    #[must_use]
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword(keyword)
    }

    #[must_use]
    pub fn punct_kind(&self) -> Option<Punct> {
        match self.kind {
            TokenKind::Punct(p) => Some(p),
            _ => None,
        }
    }

    /// Whether the whitespace before this token contains a line break
    #[must_use]
    pub fn starts_line(&self) -> bool {
        self.lead.contains('\n')
    }

    /// Width in characters of the token text
    #[must_use]
    pub fn width(&self) -> usize {
        self.text.chars().count()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.lead, self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(Keyword::from_word("class"), Some(Keyword::Class));
        assert_eq!(Keyword::from_word("in"), Some(Keyword::In));
        assert_eq!(Keyword::from_word("return"), Some(Keyword::Other));
        // Soft keywords stay identifiers
        assert_eq!(Keyword::from_word("until"), None);
        assert_eq!(Keyword::from_word("downTo"), None);
        assert_eq!(Keyword::from_word("data"), None);
    }

    #[test]
    fn test_punct_pairs() {
        assert_eq!(Punct::LParen.closer(), Some(Punct::RParen));
        assert_eq!(Punct::LBrace.closer(), Some(Punct::RBrace));
        assert_eq!(Punct::Comma.closer(), None);
        assert!(Punct::LBracket.is_open());
        assert!(Punct::RBracket.is_close());
        assert!(!Punct::Lt.is_open());
    }

    #[test]
    fn test_synthetic_brace() {
        let tok = Token::punct(Punct::RBrace, "\n    ");
        assert_eq!(tok.text, "}");
        assert!(tok.starts_line());
        assert_eq!(tok.to_string(), "\n    }");
    }
}
