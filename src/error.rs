use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A comparator name outside `kasc`, `kdesc`, `asc`, `desc`.
    #[error("unknown comparator `{0}`")]
    UnknownComparator(String),
    /// A `$`-prefixed query key that names no operator.
    #[error("unknown query operator `{0}`")]
    UnknownOperator(String),
    #[error("malformed operand for `{op}`: expected {expected}")]
    MalformedOperand { op: String, expected: &'static str },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
