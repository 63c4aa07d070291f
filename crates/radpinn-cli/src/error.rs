//! Error - CLI Error Types
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use radpinn_train::TrainError;
use thiserror::Error;

// =============================================================================
// Error Types
// =============================================================================

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Training error
    #[error(transparent)]
    Training(#[from] TrainError),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Refusing to overwrite
    #[error("{0} already exists. Use --force to overwrite.")]
    AlreadyExists(String),
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_training_error_is_transparent() {
        let err: CliError = TrainError::Config("bad".to_string()).into();
        assert_eq!(err.to_string(), "Configuration error: bad");
    }

    #[test]
    fn test_already_exists_message() {
        let err = CliError::AlreadyExists("radpinn.toml".to_string());
        assert!(err.to_string().contains("--force"));
    }
}
