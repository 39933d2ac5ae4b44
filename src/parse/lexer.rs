use super::error::{ParseError, ParseErrorKind};
use crate::common::*;
use logos::Logos;
use std::fmt;

type LResult<T> = Result<T, ParseError>;

#[derive(Logos, Debug, Copy, Clone, Eq, PartialEq)]
enum RawToken {
    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token(",")]
    Comma,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,

    // Numbers, identifiers and dice literals are all words; they are told apart later.
    #[regex(r"[^\s()+\-*/%,][\p{L}\p{Nd}]*")]
    Word,

    #[regex(r"\s+", logos::skip)]
    #[error]
    Error,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TokenKind {
    Number,
    Identifier,
    LeftParen,
    RightParen,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Comma,
    Eof,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        use TokenKind::*;

        match self {
            Number => "<number>",
            Identifier => "<identifier>",
            LeftParen => "'('",
            RightParen => "')'",
            Plus => "'+'",
            Minus => "'-'",
            Star => "'*'",
            Slash => "'/'",
            Percent => "'%'",
            Comma => "','",
            Eof => "<eof>",
        }
    }

    pub fn as_binary_op(&self) -> Option<BinaryOperator> {
        use BinaryOperator::*;
        Some(match self {
            Self::Plus => Add,
            Self::Minus => Sub,
            Self::Star => Mul,
            Self::Slash => Div,
            Self::Percent => Rem,
            _ => return None,
        })
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Token<'a> {
    Number(Int),
    Identifier(&'a str),
    LeftParen,
    RightParen,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Comma,
    Eof,
}

impl<'a> Token<'a> {
    pub fn kind(&self) -> TokenKind {
        match self {
            Self::Number(_) => TokenKind::Number,
            Self::Identifier(_) => TokenKind::Identifier,
            Self::LeftParen => TokenKind::LeftParen,
            Self::RightParen => TokenKind::RightParen,
            Self::Plus => TokenKind::Plus,
            Self::Minus => TokenKind::Minus,
            Self::Star => TokenKind::Star,
            Self::Slash => TokenKind::Slash,
            Self::Percent => TokenKind::Percent,
            Self::Comma => TokenKind::Comma,
            Self::Eof => TokenKind::Eof,
        }
    }

    pub fn value(&self) -> Option<TokenValue<'a>> {
        match *self {
            Self::Number(x) => Some(TokenValue::Number(x)),
            Self::Identifier(s) => Some(TokenValue::Identifier(s)),
            _ => None,
        }
    }
}

/// The literal payload of a [Token::Number] or [Token::Identifier].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TokenValue<'a> {
    Number(Int),
    Identifier(&'a str),
}

impl fmt::Display for TokenValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(x) => fmt::Display::fmt(x, f),
            Self::Identifier(s) => f.write_str(s),
        }
    }
}

/// Produces tokens one at a time and can replay the most recent one.
///
/// After the input is exhausted every call to [Lexer::next_token] returns [Token::Eof].
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, RawToken>,
    last: Option<(Token<'a>, logos::Span)>,
    replay: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(s: &'a str) -> Self {
        Self {
            inner: RawToken::lexer(s),
            last: None,
            replay: false,
        }
    }

    pub fn source(&self) -> &'a str {
        self.inner.source()
    }

    /// Span of the most recently returned token.
    pub fn span(&self) -> logos::Span {
        match &self.last {
            Some((_, span)) => span.clone(),
            None => 0..0,
        }
    }

    pub fn current_value(&self) -> Option<TokenValue<'a>> {
        self.last.as_ref().and_then(|(token, _)| token.value())
    }

    pub fn next_token(&mut self) -> LResult<Token<'a>> {
        if self.replay {
            if let Some((token, _)) = self.last {
                self.replay = false;
                return Ok(token);
            }
        }

        let token = match self.inner.next() {
            None => {
                let end = self.source().len();
                self.last = Some((Token::Eof, end..end));
                return Ok(Token::Eof);
            }
            Some(RawToken::LeftParen) => Token::LeftParen,
            Some(RawToken::RightParen) => Token::RightParen,
            Some(RawToken::Comma) => Token::Comma,
            Some(RawToken::Plus) => Token::Plus,
            Some(RawToken::Minus) => Token::Minus,
            Some(RawToken::Star) => Token::Star,
            Some(RawToken::Slash) => Token::Slash,
            Some(RawToken::Percent) => Token::Percent,
            Some(RawToken::Word | RawToken::Error) => self.word()?,
        };
        self.last = Some((token, self.inner.span()));
        Ok(token)
    }

    pub fn push_back(&mut self) -> LResult<()> {
        if self.last.is_none() || self.replay {
            return Err(self.error(ParseErrorKind::PushBack));
        }
        self.replay = true;
        Ok(())
    }

    pub(crate) fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError {
            kind,
            span: self.span(),
            expression: self.source().to_string(),
        }
    }

    fn word(&self) -> LResult<Token<'a>> {
        let slice = self.inner.slice();
        if slice.bytes().all(|b| b.is_ascii_digit()) {
            slice.parse().map(Token::Number).map_err(|_| ParseError {
                kind: ParseErrorKind::NumberOutOfRange(slice.to_string()),
                span: self.inner.span(),
                expression: self.source().to_string(),
            })
        } else {
            Ok(Token::Identifier(slice))
        }
    }
}
