use thiserror::Error;

/// Recurrence engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Parse error: {0}")]
    Parse(#[from] crate::parse::ParseError),

    #[error("Expansion error: {0}")]
    Expand(#[from] crate::expand::ExpandError),

    #[error(transparent)]
    CoreError(#[from] perpetua_core::error::CoreError),
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
