//! SQL Tokens - the atomic units of SQL output.
//!
//! Renderers assemble [`TokenStream`]s; whitespace is decided only when a
//! stream is serialized against a [`Layout`], so layout options can never
//! change token content.

use super::quote::{quote_identifier, quote_string};
use crate::config::DeparseOptions;

/// SQL Token - every element a renderer can emit.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// One or more SQL keywords, emitted verbatim.
    Keyword(&'static str),
    /// An identifier, delimited when needed.
    Ident(String),
    /// A string literal, quoted and escaped.
    LitString(String),
    LitInt(i64),
    /// Numeric text kept exactly as written.
    Number(String),
    /// An operator symbol.
    Operator(String),

    // === Punctuation ===
    Comma,
    Dot,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Colon,
    DoubleColon,
    Semicolon,
    Star,

    // === Whitespace ===
    Space,
    /// Between major clauses: a space, or a line break in pretty mode.
    Break,
    /// Between a clause keyword and its body: a space, or a line break plus
    /// one indent unit in pretty mode.
    Continue,

    /// Pre-rendered text, emitted verbatim.
    Raw(String),
}

/// Whitespace policy applied at serialization.
#[derive(Debug, Clone, Copy)]
pub struct Layout<'a> {
    newline: &'a str,
    tab: &'a str,
    pretty: bool,
}

impl<'a> Layout<'a> {
    pub fn new(options: &'a DeparseOptions) -> Self {
        Self {
            newline: &options.newline,
            tab: &options.tab,
            pretty: options.pretty,
        }
    }

    /// Single-line layout.
    pub fn compact() -> Layout<'static> {
        Layout {
            newline: "\n",
            tab: "  ",
            pretty: false,
        }
    }

    pub fn newline(&self) -> &'a str {
        self.newline
    }
}

impl Token {
    /// Serialize this token into `out`.
    pub fn write(&self, out: &mut String, layout: &Layout<'_>) {
        match self {
            Token::Keyword(k) => out.push_str(k),
            Token::Ident(name) => out.push_str(&quote_identifier(name)),
            Token::LitString(s) => out.push_str(&quote_string(s)),
            Token::LitInt(n) => out.push_str(&n.to_string()),
            Token::Number(s) | Token::Operator(s) | Token::Raw(s) => out.push_str(s),

            Token::Comma => out.push(','),
            Token::Dot => out.push('.'),
            Token::LParen => out.push('('),
            Token::RParen => out.push(')'),
            Token::LBracket => out.push('['),
            Token::RBracket => out.push(']'),
            Token::Colon => out.push(':'),
            Token::DoubleColon => out.push_str("::"),
            Token::Semicolon => out.push(';'),
            Token::Star => out.push('*'),

            Token::Space => out.push(' '),
            Token::Break if layout.pretty => out.push_str(layout.newline),
            Token::Continue if layout.pretty => {
                out.push_str(layout.newline);
                out.push_str(layout.tab);
            }
            Token::Break | Token::Continue => out.push(' '),
        }
    }
}

/// A stream of tokens that can be serialized to SQL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Create an empty token stream.
    pub fn new() -> Self {
        Self { tokens: vec![] }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Push a single token.
    pub fn push(&mut self, token: Token) -> &mut Self {
        self.tokens.push(token);
        self
    }

    /// Extend with multiple tokens.
    pub fn extend(&mut self, tokens: impl IntoIterator<Item = Token>) -> &mut Self {
        self.tokens.extend(tokens);
        self
    }

    /// Append another token stream.
    pub fn append(&mut self, other: TokenStream) -> &mut Self {
        self.tokens.extend(other.tokens);
        self
    }

    /// Serialize all tokens to a SQL string.
    pub fn serialize(&self, layout: &Layout<'_>) -> String {
        let mut out = String::new();
        for token in &self.tokens {
            token.write(&mut out, layout);
        }
        out
    }

    /// Append `other` wrapped in parentheses.
    pub fn parenthesized(&mut self, other: TokenStream) -> &mut Self {
        self.lparen().append(other).rparen()
    }

    /// Append `parts` separated by `, `.
    pub fn comma_separated(&mut self, parts: impl IntoIterator<Item = TokenStream>) -> &mut Self {
        self.separated(parts, &[Token::Comma, Token::Space])
    }

    /// Append `parts` separated by `separator`.
    pub fn separated(
        &mut self,
        parts: impl IntoIterator<Item = TokenStream>,
        separator: &[Token],
    ) -> &mut Self {
        for (i, part) in parts.into_iter().enumerate() {
            if i > 0 {
                self.extend(separator.iter().cloned());
            }
            self.append(part);
        }
        self
    }

    /// Space followed by `keyword`.
    pub fn then(&mut self, keyword: &'static str) -> &mut Self {
        self.space().keyword(keyword)
    }

    /// Start a major clause: `keyword` on a fresh line in pretty mode, with
    /// `body` on an indented continuation line. An empty body leaves the
    /// keyword alone.
    pub fn clause(&mut self, keyword: &'static str, body: TokenStream) -> &mut Self {
        if !self.is_empty() {
            self.push(Token::Break);
        }
        self.keyword(keyword);
        if !body.is_empty() {
            self.push(Token::Continue).append(body);
        }
        self
    }

    // Convenience methods for common tokens
    pub fn keyword(&mut self, keyword: &'static str) -> &mut Self {
        self.push(Token::Keyword(keyword))
    }
    pub fn ident(&mut self, name: impl Into<String>) -> &mut Self {
        self.push(Token::Ident(name.into()))
    }
    pub fn string(&mut self, value: impl Into<String>) -> &mut Self {
        self.push(Token::LitString(value.into()))
    }
    pub fn space(&mut self) -> &mut Self {
        self.push(Token::Space)
    }
    pub fn comma(&mut self) -> &mut Self {
        self.push(Token::Comma)
    }
    pub fn lparen(&mut self) -> &mut Self {
        self.push(Token::LParen)
    }
    pub fn rparen(&mut self) -> &mut Self {
        self.push(Token::RParen)
    }
}

impl From<Token> for TokenStream {
    fn from(token: Token) -> Self {
        Self {
            tokens: vec![token],
        }
    }
}
