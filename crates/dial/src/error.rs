use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DialError {
    #[error("Dial has no cells")]
    NoCells,
    #[error("Invalid physics: {0}")]
    InvalidPhysics(&'static str),
    #[error("Rotation offset must be finite, got {0}")]
    NonFiniteOffset(f64),
}
