use crate::HttpStatusCode;

/// **VALUE**: Verifies status classification used when a backend call fails.
///
/// **BUG THIS CATCHES**: Off-by-one range bounds (e.g. treating 300 as success or
/// 499 as a server error) would misreport failures in notices and logs.
#[test]
fn given_status_codes_when_classified_then_ranges_are_exclusive() {
    assert!(HttpStatusCode(200).is_success());
    assert!(HttpStatusCode(299).is_success());
    assert!(!HttpStatusCode(300).is_success());

    assert!(HttpStatusCode(404).is_client_error());
    assert!(!HttpStatusCode(404).is_server_error());

    assert!(HttpStatusCode(503).is_server_error());
    assert!(!HttpStatusCode(503).is_client_error());
}

#[test]
fn given_status_code_when_displayed_then_prints_number() {
    assert_eq!(HttpStatusCode::from(502).to_string(), "502");
}
