// Unit tests for logger module initialization logic
// Tests focus on idempotence and error handling

use crate::logger::{LOG_FILE_NAME, initialize, open_log_file};

use std::path::PathBuf;

/// **VALUE**: Verifies that calling initialize() multiple times doesn't panic or fail.
///
/// **WHY THIS MATTERS**: If the second call panics, any code path that sets up
/// logging again (tests, restarts of the REPL) crashes the client.
///
/// **BUG THIS CATCHES**: Would catch if the Once or AtomicBool guards are removed,
/// causing fern to panic when trying to set a global logger twice.
#[test]
fn given_logger_initialized_when_called_again_then_returns_ok() {
    // GIVEN: A valid temporary directory
    let temp_dir = tempfile::tempdir().unwrap();

    // WHEN: Calling initialize twice
    let result1 = initialize(temp_dir.path());
    let result2 = initialize(temp_dir.path());

    // THEN: Both should return Ok (second one logs warning but doesn't error)
    assert!(result1.is_ok(), "First initialization should succeed");
    assert!(
        result2.is_ok(),
        "Second initialization should succeed (idempotent)"
    );
}

/// **VALUE**: Verifies that an unwritable log directory is reported, not panicked on.
///
/// **BUG THIS CATCHES**: Would catch if `fern::log_file()` is unwrapped instead of
/// mapped into a `ChatroomError`.
#[test]
fn given_invalid_log_dir_when_opening_log_file_then_returns_error() {
    // GIVEN: A path below a device file, which can never be a directory
    let invalid_dir = PathBuf::from("/dev/null/invalid-path");

    // WHEN: Opening the log file there
    let result = open_log_file(&invalid_dir);

    // THEN: Should return a Chatroom error naming the file
    let err = result.expect_err("Should return error for invalid log directory");
    let err_string = format!("{err:?}");
    assert!(
        err_string.contains("Chatroom"),
        "Error should be ChatroomError::Chatroom variant"
    );
    assert!(err.message().contains(LOG_FILE_NAME));
}

#[test]
fn given_valid_dir_when_opening_log_file_then_file_created() {
    let temp_dir = tempfile::tempdir().unwrap();

    let result = open_log_file(temp_dir.path());

    assert!(result.is_ok());
    assert!(temp_dir.path().join(LOG_FILE_NAME).exists());
}
