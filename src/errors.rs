use crate::decoder::error::ParserError;
use thiserror::Error;

/// Application-wide error type - single point of truth
#[derive(Error, Debug)]
pub enum AppError {
    /// File I/O operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration issues
    #[error("Configuration error: {0}")]
    Config(String),

    /// Hex decoding of command-line input
    #[error("Hex decode error: {0}")]
    Hex(#[from] hex::FromHexError),

    /// Decoder rejected the message
    #[error("Parser error 0x{code:04X}: {0}", code = .0.status_code())]
    Parser(#[from] ParserError),

    /// Malformed command-line input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
