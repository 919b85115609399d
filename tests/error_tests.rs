use std::io;

use lookup_differ::error::{
    AppErrorKind, config_error, directory_not_found_error, file_write_error, serialization_error,
    task_error
};

#[test]
fn test_file_write_error_is_internal() {
    let write = file_write_error("out/a.sql", io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
    assert_eq!(write.kind, AppErrorKind::Internal);
}

#[test]
fn test_invocation_errors_are_bad_requests() {
    assert_eq!(config_error("bad config").kind, AppErrorKind::BadRequest);
    assert_eq!(
        directory_not_found_error("Source", "/no/such/dir").kind,
        AppErrorKind::BadRequest
    );
}

#[test]
fn test_serialization_error_is_internal() {
    assert_eq!(serialization_error("YAML", "boom").kind, AppErrorKind::Internal);
}

#[test]
fn test_task_error_is_service() {
    assert_eq!(task_error("worker panicked").kind, AppErrorKind::Service);
}
