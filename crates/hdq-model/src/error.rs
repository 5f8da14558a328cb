use thiserror::Error;

#[derive(Debug, Error)]
pub enum HdqError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid configuration supplied to the engine. Fatal: scoring and
    /// normalization results would be meaningless, so this aborts before
    /// any processing starts.
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, HdqError>;
