pub mod ast;
mod error;
pub mod lexer;
mod parser;

pub use error::{ParseError, ParseErrorKind};

pub(crate) fn parse(s: &str) -> Result<ast::Expression, ParseError> {
    let expr = parser::Parser::new(s).parse()?;
    log::trace!("parsed {:?} as {}", s, expr);
    Ok(expr)
}
