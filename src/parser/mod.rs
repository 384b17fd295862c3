//! Kotlin source tokenizing.
//!
//! - [`token`]: token model (kinds, keywords, structural punctuation)
//! - [`lexer`]: the built-in tokenizer producing lead-carrying tokens
//! - [`CharFilter`]: iterator adapter that identifies strings, comments, and code regions

pub mod char_filter;
pub mod lexer;
pub mod token;

pub use char_filter::{in_literal_at, CharFilter, StringDelimiter};
pub use lexer::{tokenize, KotlinLexer, Lexed, Tokenizer};
pub use token::{Keyword, Punct, Token, TokenKind};
