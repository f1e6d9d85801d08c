use chatroom_core::error::ApiClientError;

use common::{ErrorLocation, HttpStatusCode};

use std::panic::Location;

/// **VALUE**: Server errors carry status, body and location in their message.
///
/// **WHY THIS MATTERS**: Backend failures only reach the log as this string;
/// without the status and location there is nothing to debug from.
#[test]
fn given_server_error_when_formatted_then_includes_status_message_and_location() {
    // GIVEN: A Server error
    let err = ApiClientError::Server {
        status: HttpStatusCode(503),
        message: "model loading".to_string(),
        location: ErrorLocation::from(Location::caller()),
    };

    // WHEN: Formatting it
    let text = err.to_string();

    // THEN: Status, message and file all present
    assert!(text.contains("Server Error"));
    assert!(text.contains("503"));
    assert!(text.contains("model loading"));
    assert!(text.contains("api_client.rs"));
    assert_eq!(err.status(), Some(HttpStatusCode(503)));
}

#[test]
fn given_server_error_when_summarized_then_omits_location() {
    let err = ApiClientError::Server {
        status: HttpStatusCode(500),
        message: "boom".to_string(),
        location: ErrorLocation::from(Location::caller()),
    };

    assert_eq!(err.summary(), "HTTP 500 - boom");
}

#[test]
fn given_url_parse_failure_when_converted_then_url_parse_variant() {
    let parse_error = url::Url::parse("not a url").unwrap_err();

    let err = ApiClientError::from(parse_error);

    assert!(matches!(err, ApiClientError::UrlParse { .. }));
    assert_eq!(err.status(), None);
}
