pub use masterror::{AppError, AppErrorKind, AppResult};

/// Create file write error
pub fn file_write_error(path: &str, source: std::io::Error) -> AppError {
    AppError::internal(format!("Failed to write file '{}': {}", path, source))
}

/// Create config error
pub fn config_error(message: impl Into<String>) -> AppError {
    AppError::bad_request(message.into())
}

/// Create error for an export directory that does not exist
pub fn directory_not_found_error(role: &str, path: &str) -> AppError {
    AppError::bad_request(format!(
        "{} directory '{}' does not exist or is not a directory",
        role, path
    ))
}

/// Create JSON/YAML serialization error
pub fn serialization_error(format: &str, message: impl std::fmt::Display) -> AppError {
    AppError::internal(format!("{} serialization failed: {}", format, message))
}

/// Create error for a diff task that did not run to completion
pub fn task_error(message: impl std::fmt::Display) -> AppError {
    AppError::service(format!("Diff task failed: {}", message))
}
