use thiserror::Error;

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("policy parse error: {0}")]
    Parse(String),

    #[error("unknown macro action id {0}")]
    UnknownAction(i64),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PolicyResult<T> = Result<T, PolicyError>;
