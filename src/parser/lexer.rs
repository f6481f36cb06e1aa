//! Lexer (tokenizer) for the C subset
//!
//! Produces a flat list of [`Token`]s, each a [`TokenKind`] plus the
//! [`SourceLocation`] of its first character. Comments are dropped, and so is
//! any line starting with `#`: there is no preprocessor, so `#include` lines
//! in a program are ignored.
//!
//! String literals are tokenized even though no supported construct uses
//! them; the engine reports them as unsupported at the point of use.

use super::ast::SourceLocation;
use std::fmt;
use thiserror::Error;

/// What a token is, without where it is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    IntLiteral(i64),
    CharLiteral(i8),
    StringLiteral(String),
    Ident(String),

    // Keywords
    Int,
    Char,
    Void,
    Extern,
    If,
    Else,
    While,
    Do,
    For,
    Break,
    Continue,
    Return,
    Sizeof,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    AndAnd,
    OrOr,
    Bang,
    Amp,
    Pipe,
    Caret,
    Tilde,
    LtLt,
    GtGt,
    Eq,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    PlusPlus,
    MinusMinus,

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Comma,

    Eof,
}

/// Every token with a fixed spelling. Keywords are the alphabetic entries;
/// operators are matched longest-first against the rest.
static SPELLINGS: &[(&str, TokenKind)] = &[
    ("int", TokenKind::Int),
    ("char", TokenKind::Char),
    ("void", TokenKind::Void),
    ("extern", TokenKind::Extern),
    ("if", TokenKind::If),
    ("else", TokenKind::Else),
    ("while", TokenKind::While),
    ("do", TokenKind::Do),
    ("for", TokenKind::For),
    ("break", TokenKind::Break),
    ("continue", TokenKind::Continue),
    ("return", TokenKind::Return),
    ("sizeof", TokenKind::Sizeof),
    ("++", TokenKind::PlusPlus),
    ("--", TokenKind::MinusMinus),
    ("+=", TokenKind::PlusEq),
    ("-=", TokenKind::MinusEq),
    ("*=", TokenKind::StarEq),
    ("/=", TokenKind::SlashEq),
    ("%=", TokenKind::PercentEq),
    ("==", TokenKind::EqEq),
    ("!=", TokenKind::NotEq),
    ("<=", TokenKind::Le),
    (">=", TokenKind::Ge),
    ("<<", TokenKind::LtLt),
    (">>", TokenKind::GtGt),
    ("&&", TokenKind::AndAnd),
    ("||", TokenKind::OrOr),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Star),
    ("/", TokenKind::Slash),
    ("%", TokenKind::Percent),
    ("=", TokenKind::Eq),
    ("!", TokenKind::Bang),
    ("<", TokenKind::Lt),
    (">", TokenKind::Gt),
    ("&", TokenKind::Amp),
    ("|", TokenKind::Pipe),
    ("^", TokenKind::Caret),
    ("~", TokenKind::Tilde),
    ("(", TokenKind::LParen),
    (")", TokenKind::RParen),
    ("{", TokenKind::LBrace),
    ("}", TokenKind::RBrace),
    ("[", TokenKind::LBracket),
    ("]", TokenKind::RBracket),
    (";", TokenKind::Semicolon),
    (",", TokenKind::Comma),
];

impl TokenKind {
    fn keyword(word: &str) -> Option<TokenKind> {
        SPELLINGS
            .iter()
            .find(|(spelling, _)| *spelling == word)
            .map(|(_, kind)| kind.clone())
    }

    /// Source text of a fixed token
    pub fn spelling(&self) -> Option<&'static str> {
        SPELLINGS
            .iter()
            .find(|(_, kind)| kind == self)
            .map(|(spelling, _)| *spelling)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::IntLiteral(n) => write!(f, "int literal {}", n),
            TokenKind::CharLiteral(c) => write!(f, "char literal {}", c),
            TokenKind::StringLiteral(s) => write!(f, "string literal {:?}", s),
            TokenKind::Ident(name) => write!(f, "identifier '{}'", name),
            TokenKind::Eof => write!(f, "end of file"),
            fixed => write!(f, "'{}'", fixed.spelling().unwrap_or_default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub location: SourceLocation,
}

/// Lexer error type
#[derive(Debug, Clone, Error)]
#[error("Lexer error at line {}, column {}: {message}", .location.line, .location.column)]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
}

pub struct Lexer<'a> {
    source: &'a str,
    offset: usize, // byte offset into `source`
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the whole source; the last token is always [`TokenKind::Eof`]
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia()?;
            let location = self.location();
            let Some(ch) = self.peek() else {
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    location,
                });
                return Ok(tokens);
            };

            let kind = match ch {
                '0'..='9' => self.number(location)?,
                'a'..='z' | 'A'..='Z' | '_' => self.word(),
                '\'' => self.char_literal(location)?,
                '"' => self.string_literal(location)?,
                _ => self.operator(location)?,
            };
            tokens.push(Token { kind, location });
        }
    }

    fn rest(&self) -> &'a str {
        &self.source[self.offset..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.offset += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    /// Consume characters while `pred` holds and return them as a slice
    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.offset;
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
        &self.source[start..self.offset]
    }

    fn location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }

    fn error(message: impl Into<String>, location: SourceLocation) -> LexError {
        LexError {
            message: message.into(),
            location,
        }
    }

    /// Skip whitespace, `//` and `/* */` comments, and `#` directive lines
    fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            let rest = self.rest();
            if rest.starts_with(|c: char| c.is_ascii_whitespace()) {
                self.bump();
            } else if rest.starts_with("//") || rest.starts_with('#') {
                self.take_while(|c| c != '\n');
            } else if rest.starts_with("/*") {
                let start = self.location();
                let Some(end) = rest[2..].find("*/") else {
                    return Err(Self::error("Unterminated block comment", start));
                };
                // Bump through the comment so newlines inside it are counted
                let stop = self.offset + end + 4;
                while self.offset < stop {
                    self.bump();
                }
            } else {
                return Ok(());
            }
        }
    }

    fn number(&mut self, location: SourceLocation) -> Result<TokenKind, LexError> {
        let digits = self.take_while(|c| c.is_ascii_digit());
        digits
            .parse::<i64>()
            .map(TokenKind::IntLiteral)
            .map_err(|_| Self::error(format!("Invalid integer literal: {}", digits), location))
    }

    fn word(&mut self) -> TokenKind {
        let word = self.take_while(|c| c.is_ascii_alphanumeric() || c == '_');
        TokenKind::keyword(word).unwrap_or_else(|| TokenKind::Ident(word.to_string()))
    }

    fn operator(&mut self, location: SourceLocation) -> Result<TokenKind, LexError> {
        let rest = self.rest();
        let matched = SPELLINGS
            .iter()
            .filter(|(spelling, _)| !spelling.starts_with(|c: char| c.is_ascii_alphabetic()))
            .filter(|(spelling, _)| rest.starts_with(spelling))
            .max_by_key(|(spelling, _)| spelling.len());

        match matched {
            Some((spelling, kind)) => {
                for _ in 0..spelling.len() {
                    self.bump();
                }
                Ok(kind.clone())
            }
            None => {
                let ch = self.peek().unwrap_or_default();
                Err(Self::error(format!("Unexpected character: '{}'", ch), location))
            }
        }
    }

    /// Read one possibly escaped character inside a quoted literal
    fn quoted_char(&mut self, literal: &str) -> Result<char, LexError> {
        let location = self.location();
        let eof = || Self::error(format!("Unexpected end of file in {}", literal), location);

        let ch = self.bump().ok_or_else(eof)?;
        if ch != '\\' {
            return Ok(ch);
        }
        match self.bump().ok_or_else(eof)? {
            'n' => Ok('\n'),
            't' => Ok('\t'),
            'r' => Ok('\r'),
            '0' => Ok('\0'),
            '\\' => Ok('\\'),
            '\'' => Ok('\''),
            '"' => Ok('"'),
            'x' => {
                let hex = self.take_while(|c| c.is_ascii_hexdigit());
                u8::from_str_radix(hex, 16)
                    .map(char::from)
                    .map_err(|_| Self::error(format!("Invalid hex escape: \\x{}", hex), location))
            }
            other => Err(Self::error(format!("Unknown escape sequence: \\{}", other), location)),
        }
    }

    fn char_literal(&mut self, location: SourceLocation) -> Result<TokenKind, LexError> {
        self.bump(); // opening quote
        let ch = self.quoted_char("character literal")?;
        if self.bump() != Some('\'') {
            return Err(Self::error("Expected closing quote in character literal", location));
        }
        let byte = u8::try_from(ch).map_err(|_| {
            Self::error(format!("Character literal '{}' is not a single byte", ch), location)
        })?;
        Ok(TokenKind::CharLiteral(byte as i8))
    }

    fn string_literal(&mut self, location: SourceLocation) -> Result<TokenKind, LexError> {
        self.bump(); // opening quote
        let mut text = String::new();
        loop {
            match self.peek() {
                Some('"') => {
                    self.bump();
                    return Ok(TokenKind::StringLiteral(text));
                }
                Some(_) => text.push(self.quoted_char("string literal")?),
                None => return Err(Self::error("Unterminated string literal", location)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    fn ident(name: &str) -> TokenKind {
        TokenKind::Ident(name.to_string())
    }

    #[test]
    fn test_simple_tokens() {
        use TokenKind::*;
        assert_eq!(
            kinds("int main() { return 0; }"),
            vec![Int, ident("main"), LParen, RParen, LBrace, Return, IntLiteral(0), Semicolon, RBrace, Eof]
        );
    }

    #[test]
    fn test_longest_operator_wins() {
        use TokenKind::*;
        assert_eq!(
            kinds("a+++b <<= !x"),
            vec![ident("a"), PlusPlus, Plus, ident("b"), LtLt, Eq, Bang, ident("x"), Eof]
        );
        assert_eq!(
            kinds("++ -- += -= == != && ||"),
            vec![PlusPlus, MinusMinus, PlusEq, MinusEq, EqEq, NotEq, AndAnd, OrOr, Eof]
        );
    }

    #[test]
    fn test_keyword_prefix_is_identifier() {
        assert_eq!(kinds("integer do_it"), vec![ident("integer"), ident("do_it"), TokenKind::Eof]);
    }

    #[test]
    fn test_trivia_is_skipped() {
        use TokenKind::*;
        let source = "#include <stdio.h>\nint x; // comment\n/* block\ncomment */ int y;";
        assert_eq!(
            kinds(source),
            vec![Int, ident("x"), Semicolon, Int, ident("y"), Semicolon, Eof]
        );
    }

    #[test]
    fn test_locations_after_block_comment() {
        let tokens = Lexer::new("/* a\nb */ x").tokenize().unwrap();
        assert_eq!(tokens[0].location, SourceLocation::new(2, 6));
    }

    #[test]
    fn test_literals() {
        use TokenKind::*;
        assert_eq!(
            kinds(r#"4294967296 'a' '\n' '\x41' "hi\n""#),
            vec![
                IntLiteral(4_294_967_296),
                CharLiteral(97),
                CharLiteral(10),
                CharLiteral(65),
                StringLiteral("hi\n".to_string()),
                Eof
            ]
        );
    }

    #[test]
    fn test_intrinsic_prototype() {
        use TokenKind::*;
        assert_eq!(
            kinds("extern void *MALLOC(int);"),
            vec![Extern, Void, Star, ident("MALLOC"), LParen, Int, RParen, Semicolon, Eof]
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(TokenKind::LBrace.to_string(), "'{'");
        assert_eq!(TokenKind::Sizeof.to_string(), "'sizeof'");
        assert_eq!(ident("n").to_string(), "identifier 'n'");
        assert_eq!(TokenKind::Eof.to_string(), "end of file");
    }

    #[test]
    fn test_errors() {
        let err = Lexer::new("int x = a.b;").tokenize().unwrap_err();
        assert_eq!(err.location, SourceLocation::new(1, 10));
        assert!(err.message.contains("'.'"));

        assert!(Lexer::new("\"open").tokenize().is_err());
        assert!(Lexer::new("/* open").tokenize().is_err());
        assert!(Lexer::new("/*/ x").tokenize().is_err());
        assert!(Lexer::new("'ab'").tokenize().is_err());
    }
}
