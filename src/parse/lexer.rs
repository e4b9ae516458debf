//! Tokens of coordinate text
//!
//! Whitespace is kept as a token because the grammars differ in where they
//! require, allow or forbid it.

use logos::Logos;

#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token {
    /// Optionally negative decimal number, e.g. `-12`, `12.5` or `12.`
    #[regex(r"-?[0-9]+(\.[0-9]*)?", |lex| lex.slice().to_owned())]
    Number(String),

    #[regex(r"[A-Za-z]+", |lex| lex.slice().to_owned())]
    Word(String),

    #[token("\u{00B0}")]
    Degree,

    /// ASCII `'`, either a minute mark or a thousands separator
    #[token("'")]
    Apostrophe,

    /// Typographic minute marks
    #[token("\u{2032}")]
    #[token("\u{02BC}")]
    #[token("\u{2019}")]
    Prime,

    /// Second marks
    #[token("\"")]
    #[token("\u{2033}")]
    DoublePrime,

    #[token(",")]
    Comma,

    #[token(";")]
    Semicolon,

    #[token(":")]
    Colon,

    #[token("(")]
    OpenParen,

    #[token(")")]
    CloseParen,

    #[regex(r"[ \t\r\n]+")]
    Space,
}

/// Splits text into tokens; `None` if any character is not part of the
/// coordinate alphabet
pub fn tokenize(text: &str) -> Option<Vec<Token>> {
    Token::lexer(text).collect::<Result<Vec<_>, _>>().ok()
}
