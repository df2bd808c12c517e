pub use masterror::{AppError, AppResult};

/// Create unsupported dialect error
///
/// This is the only error the signature pipeline itself can produce; every
/// other pass degrades gracefully on malformed SQL.
pub fn unsupported_dialect_error(tag: &str) -> AppError {
    AppError::bad_request(format!("unsupported dialect: {}", tag.trim()))
}

/// Create file read error
pub fn file_read_error(path: &str, source: std::io::Error) -> AppError {
    AppError::internal(format!("Failed to read file '{}': {}", path, source))
}

/// Create config error
pub fn config_error(message: impl Into<String>) -> AppError {
    AppError::bad_request(message.into())
}

/// Create output serialization error
pub fn output_error(message: impl Into<String>) -> AppError {
    AppError::internal(format!("Failed to render output: {}", message.into()))
}
