use crate::ErrorLocation;
use std::panic::Location;

/// **VALUE**: Verifies that `ErrorLocation::from()` captures file, line and column.
///
/// **WHY THIS MATTERS**: Every error in the workspace carries one of these. If the
/// capture is wrong, every error message points at the wrong place.
#[test]
fn given_location_caller_when_error_location_created_then_captures_file_line_column() {
    // GIVEN/WHEN: An ErrorLocation built on a known line
    let (location, expected_line) = (ErrorLocation::from(Location::caller()), line!());

    // THEN: File, line and column match this call site
    assert!(
        location.file.contains("error_location.rs"),
        "Should capture file path"
    );
    assert_eq!(location.line, expected_line, "Should capture line number");
    assert!(location.column > 0, "Should capture column number");
}

/// **VALUE**: Verifies the Display format is `[file:line:column]`.
///
/// **BUG THIS CATCHES**: Would catch a Display change that drops the brackets or
/// one of the three components, which breaks every `{location}` in error messages.
#[test]
fn given_error_location_when_formatted_then_produces_bracketed_format() {
    // GIVEN: An ErrorLocation
    let location = ErrorLocation {
        file: "src/session/controller.rs",
        line: 42,
        column: 7,
    };

    // WHEN: Formatting as string
    let formatted = format!("{}", location);

    // THEN: Bracketed file:line:column
    assert_eq!(formatted, "[src/session/controller.rs:42:7]");
}

#[test]
fn given_error_location_when_serialized_then_exposes_all_fields() {
    let location = ErrorLocation {
        file: "a.rs",
        line: 1,
        column: 2,
    };

    let json = serde_json::to_string(&location).unwrap();

    assert_eq!(json, r#"{"file":"a.rs","line":1,"column":2}"#);
}
