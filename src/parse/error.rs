use super::lexer::TokenKind;
use crate::common::NonEmpty;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid expression <{expression}> at position {}: {kind}", .span.start)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: logos::Span,
    pub expression: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    UnexpectedToken {
        found: TokenKind,
        expected: NonEmpty<TokenKind>,
    },
    NumberOutOfRange(String),
    PushBack,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedToken { found, expected } => {
                write!(f, "unexpected token: found {}, expected {}", found, expected.fmt_expected())
            }
            Self::NumberOutOfRange(slice) => write!(f, "number {:?} is out of range", slice),
            Self::PushBack => f.write_str("no tokens read: can't pushback"),
        }
    }
}

trait FormatExpected {
    fn fmt_expected(&self) -> String;
}

impl FormatExpected for [TokenKind] {
    fn fmt_expected(&self) -> String {
        match self {
            [] => unreachable!("NonEmpty cannot be empty"),
            [a] => a.to_string(),
            [a, b] => format!("{} or {}", a, b),
            s => {
                let init: Vec<_> = s[..s.len() - 1].iter().map(ToString::to_string).collect();
                format!("{}, or {}", init.join(", "), s[s.len() - 1])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vec1::vec1;

    #[test]
    fn test_fmt_expected() {
        assert_eq!(vec1![TokenKind::RightParen].fmt_expected(), "')'");
        assert_eq!(
            vec1![TokenKind::Comma, TokenKind::RightParen].fmt_expected(),
            "',' or ')'"
        );
        assert_eq!(
            vec1![TokenKind::Identifier, TokenKind::LeftParen, TokenKind::Number].fmt_expected(),
            "<identifier>, '(', or <number>"
        );
    }

    #[test]
    fn test_error_message() {
        let err = ParseError {
            kind: ParseErrorKind::UnexpectedToken {
                found: TokenKind::Eof,
                expected: vec1![TokenKind::RightParen],
            },
            span: 6..6,
            expression: "(1 + 2".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid expression <(1 + 2> at position 6: unexpected token: found <eof>, expected ')'"
        );
    }
}
