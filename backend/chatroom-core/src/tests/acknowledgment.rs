use crate::api::wire::UploadOutcome;
use crate::session::acknowledgment::Acknowledgment;
use crate::session::state::RequestKind;

/// **VALUE**: An ingested upload reports file name and both counts.
#[test]
fn given_ingested_upload_when_displayed_then_contains_filename_and_counts() {
    let ack = Acknowledgment::from(UploadOutcome::Ingested {
        filename: "doc.pdf".to_string(),
        success: 2,
        fail: 1,
    });

    let text = ack.to_string();

    assert!(text.contains("doc.pdf"));
    assert!(text.contains('2'));
    assert!(text.contains('1'));
}

/// **VALUE**: A rejected upload shows the server's message and no counts.
///
/// **BUG THIS CATCHES**: Would catch falling through to the counts branch when
/// the backend reported an error.
#[test]
fn given_rejected_upload_when_displayed_then_contains_message_without_counts() {
    let ack = Acknowledgment::from(UploadOutcome::Rejected {
        message: "unsupported format".to_string(),
    });

    let text = ack.to_string();

    assert!(text.contains("unsupported format"));
    assert!(!text.contains("succeeded"));
    assert!(!text.contains("failed"));
}

#[test]
fn given_remember_outcomes_when_displayed_then_fixed_messages() {
    assert_eq!(Acknowledgment::Remembered.to_string(), "Answer saved");
    assert_eq!(Acknowledgment::RememberFailed.to_string(), "Failed to save answer");
}

#[test]
fn given_busy_upload_when_displayed_then_names_the_operation() {
    let text = Acknowledgment::Busy(RequestKind::Upload).to_string();

    assert!(text.starts_with("Upload already in progress"));
}
