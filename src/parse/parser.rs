use super::ast::*;
use super::error::{ParseError, ParseErrorKind};
use super::lexer::{Lexer, Token, TokenKind};
use crate::common::*;
use vec1::vec1;

type PResult<T = Expression> = Result<T, ParseError>;

pub struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { lexer: Lexer::new(s) }
    }

    pub fn parse(mut self) -> PResult {
        let expr = self.parse_addition()?;
        self.consume(TokenKind::Eof)?;
        Ok(expr)
    }

    fn advance(&mut self) -> PResult<Token<'a>> {
        self.lexer.next_token()
    }

    fn consume(&mut self, expected: TokenKind) -> PResult<()> {
        let found = self.advance()?;
        if found.kind() == expected {
            Ok(())
        } else {
            self.unexpected_token(found, vec1![expected])
        }
    }

    fn error<T>(&self, kind: ParseErrorKind) -> PResult<T> {
        Err(self.lexer.error(kind))
    }

    fn unexpected_token<T>(&self, found: Token<'a>, expected: NonEmpty<TokenKind>) -> PResult<T> {
        self.error(ParseErrorKind::UnexpectedToken {
            found: found.kind(),
            expected,
        })
    }

    // expr = factor (('+' | '-') factor)*
    fn parse_addition(&mut self) -> PResult {
        let mut lhs = self.parse_multiplication()?;

        loop {
            match self.advance()?.kind().as_binary_op() {
                Some(op @ (BinaryOperator::Add | BinaryOperator::Sub)) => {
                    let rhs = self.parse_multiplication()?;
                    lhs = Expression::binary(op, lhs, rhs);
                }
                _ => {
                    self.lexer.push_back()?;
                    return Ok(lhs);
                }
            }
        }
    }

    // factor = term (('*' | '/' | '%') term)*
    fn parse_multiplication(&mut self) -> PResult {
        let mut lhs = self.parse_term()?;

        loop {
            match self.advance()?.kind().as_binary_op() {
                Some(op @ (BinaryOperator::Mul | BinaryOperator::Div | BinaryOperator::Rem)) => {
                    let rhs = self.parse_term()?;
                    lhs = Expression::binary(op, lhs, rhs);
                }
                _ => {
                    self.lexer.push_back()?;
                    return Ok(lhs);
                }
            }
        }
    }

    fn parse_term(&mut self) -> PResult {
        match self.advance()? {
            Token::Identifier(name) => {
                if self.advance()? == Token::LeftParen {
                    let args = self.parse_arguments()?;
                    Ok(Expression::apply(name, args))
                } else {
                    self.lexer.push_back()?;
                    self.parse_variable_or_die(name)
                }
            }
            Token::LeftParen => {
                let expr = self.parse_addition()?;
                self.consume(TokenKind::RightParen)?;
                Ok(expr)
            }
            _ => {
                self.lexer.push_back()?;
                self.parse_number()
            }
        }
    }

    /// Parses the rest of an argument list; the opening parenthesis has already been read.
    fn parse_arguments(&mut self) -> PResult<Vec<Expression>> {
        let mut args = Vec::new();
        if self.advance()? == Token::RightParen {
            return Ok(args);
        }
        self.lexer.push_back()?;

        loop {
            args.push(self.parse_addition()?);
            match self.advance()? {
                Token::Comma => {}
                Token::RightParen => return Ok(args),
                found => {
                    return self.unexpected_token(found, vec1![TokenKind::Comma, TokenKind::RightParen])
                }
            }
        }
    }

    // Only a literal may carry a sign: `-5` parses, `-x` does not.
    fn parse_number(&mut self) -> PResult {
        let (negative, signed, token) = match self.advance()? {
            Token::Plus => (false, true, self.advance()?),
            Token::Minus => (true, true, self.advance()?),
            token => (false, false, token),
        };

        match token {
            Token::Number(x) => Ok(Expression::constant(if negative { -x } else { x })),
            found if signed => self.unexpected_token(found, vec1![TokenKind::Number]),
            found => self.unexpected_token(
                found,
                vec1![
                    TokenKind::Identifier,
                    TokenKind::LeftParen,
                    TokenKind::Plus,
                    TokenKind::Minus,
                    TokenKind::Number,
                ],
            ),
        }
    }

    fn parse_variable_or_die(&self, word: &str) -> PResult {
        let (num, sides) = match split_dice(word) {
            Some(parts) => parts,
            None => return Ok(Expression::variable(word)),
        };

        let multiplier = if num.is_empty() {
            1
        } else {
            self.parse_int(num)?
        };
        let sides = self.parse_int(sides)?;
        Ok(Expression::die(multiplier, sides))
    }

    fn parse_int(&self, digits: &str) -> PResult<Int> {
        match digits.parse() {
            Ok(x) => Ok(x),
            Err(_) => self.error(ParseErrorKind::NumberOutOfRange(digits.to_string())),
        }
    }
}

/// Splits a dice literal of the form `(\d*)d(\d+)` into its count and sides.
fn split_dice(word: &str) -> Option<(&str, &str)> {
    let (num, sides) = word.split_once('d')?;
    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if is_digits(num) && !sides.is_empty() && is_digits(sides) {
        Some((num, sides))
    } else {
        None
    }
}
