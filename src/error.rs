#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("{0}")]
    Parse(#[from] crate::parse::ParseError),
    #[error("{0}")]
    Eval(#[from] crate::eval::EvalError),
}
