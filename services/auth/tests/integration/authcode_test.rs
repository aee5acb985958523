use chrono::Duration;

use formerr_auth::domain::types::{Verification, VerifyFailure};
use formerr_auth::error::AuthServiceError;
use formerr_auth::infra::memory::InMemoryAuthCodeStore;
use formerr_auth::usecase::authcode::{AuthCodeManager, RequestCodeInput};
use formerr_testing::clock::ManualClock;

use crate::helpers::{
    FailingNotifier, harness, issue, request_input, stored_code, wrong_code,
};

const FORM: &str = "form_1";
const EMAIL: &str = "a@x.com";

fn rejected(reason: VerifyFailure) -> Verification {
    Verification::Rejected(reason)
}

#[tokio::test]
async fn should_issue_code_and_report_delivery() {
    let h = harness();

    let result = h
        .manager
        .request_code(request_input(FORM, EMAIL))
        .await
        .unwrap();

    assert!(result.success);
    assert!(result.code_sent);
    assert_eq!(result.email, EMAIL);
    assert_eq!(result.form_id, FORM);
    assert_eq!(result.expires_in_minutes, 10);

    let sent = h.notifier.last();
    assert_eq!(sent.to_email, EMAIL);
    assert_eq!(sent.to_name, "User", "default display name");
    assert_eq!(sent.form_title, "Customer survey");
    assert_eq!(sent.expires_in_minutes, 10);
    assert_eq!(sent.code.len(), 6);
    assert!(sent.code.bytes().all(|b| b.is_ascii_digit()));

    assert_eq!(h.manager.outstanding(), 1);
    assert_eq!(stored_code(&h.store, FORM, EMAIL), Some(sent.code));
}

#[tokio::test]
async fn should_pass_display_name_to_notifier() {
    let h = harness();

    h.manager
        .request_code(RequestCodeInput {
            display_name: Some("Ana".to_owned()),
            ..request_input(FORM, EMAIL)
        })
        .await
        .unwrap();

    assert_eq!(h.notifier.last().to_name, "Ana");
}

#[tokio::test]
async fn should_fall_back_to_default_name_when_display_name_is_blank() {
    let h = harness();

    for blank in ["", "   "] {
        h.manager
            .request_code(RequestCodeInput {
                display_name: Some(blank.to_owned()),
                ..request_input(FORM, EMAIL)
            })
            .await
            .unwrap();
        assert_eq!(h.notifier.last().to_name, "User", "display name {blank:?}");
    }
}

#[tokio::test]
async fn should_reject_blank_email_or_form_without_storing() {
    let h = harness();

    let err = h
        .manager
        .request_code(request_input(FORM, "  "))
        .await
        .unwrap_err();
    assert!(
        matches!(err, AuthServiceError::MissingField("email")),
        "got {err:?}"
    );

    let err = h
        .manager
        .request_code(request_input("", EMAIL))
        .await
        .unwrap_err();
    assert!(
        matches!(err, AuthServiceError::MissingField("form_id")),
        "got {err:?}"
    );

    assert_eq!(h.manager.outstanding(), 0);
    assert_eq!(h.notifier.count(), 0);
}

#[tokio::test]
async fn should_keep_code_when_delivery_fails() {
    let store = InMemoryAuthCodeStore::new();
    let manager = AuthCodeManager::new(store.clone(), FailingNotifier, ManualClock::starting_now());

    let result = manager
        .request_code(request_input(FORM, EMAIL))
        .await
        .unwrap();

    assert!(result.success);
    assert!(!result.code_sent);

    let code = stored_code(&store, FORM, EMAIL).expect("record stored despite failed delivery");
    assert!(manager.verify_code(EMAIL, FORM, &code).is_valid());
}

#[tokio::test]
async fn should_follow_wrong_then_correct_then_replay_scenario() {
    let h = harness();
    let code = issue(&h, FORM, EMAIL).await;

    assert_eq!(
        h.manager.verify_code(EMAIL, FORM, &wrong_code(&code)),
        rejected(VerifyFailure::InvalidCode {
            attempts_remaining: 2
        })
    );

    let now = h.clock_now();
    assert_eq!(
        h.manager.verify_code(EMAIL, FORM, &code),
        Verification::Valid {
            authenticated_at: now
        }
    );

    assert_eq!(
        h.manager.verify_code(EMAIL, FORM, &code),
        rejected(VerifyFailure::CodeAlreadyUsed)
    );
    // Tombstone stays until swept.
    assert_eq!(h.manager.outstanding(), 1);
}

#[tokio::test]
async fn should_supersede_previous_code_for_same_key() {
    let h = harness();
    let first = issue(&h, FORM, EMAIL).await;
    let second = issue(&h, FORM, EMAIL).await;

    assert_eq!(h.manager.outstanding(), 1);
    assert_eq!(stored_code(&h.store, FORM, EMAIL), Some(second.clone()));

    if first != second {
        assert!(!h.manager.verify_code(EMAIL, FORM, &first).is_valid());
    }
    assert!(h.manager.verify_code(EMAIL, FORM, &second).is_valid());
}

#[tokio::test]
async fn should_reset_attempts_when_code_is_reissued() {
    let h = harness();
    let code = issue(&h, FORM, EMAIL).await;
    for _ in 0..3 {
        h.manager.verify_code(EMAIL, FORM, &wrong_code(&code));
    }

    let code = issue(&h, FORM, EMAIL).await;
    assert_eq!(
        h.manager.verify_code(EMAIL, FORM, &wrong_code(&code)),
        rejected(VerifyFailure::InvalidCode {
            attempts_remaining: 2
        })
    );
}

#[tokio::test]
async fn should_lock_out_after_max_attempts() {
    let h = harness();
    let code = issue(&h, FORM, EMAIL).await;
    let wrong = wrong_code(&code);

    for remaining in [2, 1, 0] {
        assert_eq!(
            h.manager.verify_code(EMAIL, FORM, &wrong),
            rejected(VerifyFailure::InvalidCode {
                attempts_remaining: remaining
            })
        );
    }

    // Fourth attempt fails even with the right code, and evicts the record.
    assert_eq!(
        h.manager.verify_code(EMAIL, FORM, &code),
        rejected(VerifyFailure::MaxAttemptsExceeded)
    );
    assert_eq!(
        h.manager.verify_code(EMAIL, FORM, &code),
        rejected(VerifyFailure::CodeNotFound)
    );
    assert_eq!(h.manager.outstanding(), 0);

    let fresh = issue(&h, FORM, EMAIL).await;
    assert!(h.manager.verify_code(EMAIL, FORM, &fresh).is_valid());
}

#[tokio::test]
async fn should_accept_correct_code_on_last_attempt() {
    let h = harness();
    let code = issue(&h, FORM, EMAIL).await;
    let wrong = wrong_code(&code);

    h.manager.verify_code(EMAIL, FORM, &wrong);
    h.manager.verify_code(EMAIL, FORM, &wrong);
    assert!(h.manager.verify_code(EMAIL, FORM, &code).is_valid());
}

#[tokio::test]
async fn should_expire_code_after_ten_minutes() {
    let h = harness();
    let code = issue(&h, FORM, EMAIL).await;

    h.clock.advance(Duration::minutes(10) + Duration::seconds(1));

    assert_eq!(
        h.manager.verify_code(EMAIL, FORM, &code),
        rejected(VerifyFailure::CodeExpired)
    );
    assert_eq!(h.manager.outstanding(), 0, "expired record is evicted");
    assert_eq!(
        h.manager.verify_code(EMAIL, FORM, &code),
        rejected(VerifyFailure::CodeNotFound)
    );
}

#[tokio::test]
async fn should_report_expiry_before_exhaustion() {
    let h = harness();
    let code = issue(&h, FORM, EMAIL).await;
    for _ in 0..3 {
        h.manager.verify_code(EMAIL, FORM, &wrong_code(&code));
    }

    h.clock.advance(Duration::minutes(11));
    assert_eq!(
        h.manager.verify_code(EMAIL, FORM, &code),
        rejected(VerifyFailure::CodeExpired)
    );
}

#[tokio::test]
async fn should_accept_code_at_exact_expiry_instant() {
    let h = harness();
    let code = issue(&h, FORM, EMAIL).await;

    h.clock.advance(Duration::minutes(10));
    assert!(h.manager.verify_code(EMAIL, FORM, &code).is_valid());
}

#[tokio::test]
async fn should_report_already_used_after_expiry_until_swept() {
    let h = harness();
    let code = issue(&h, FORM, EMAIL).await;
    assert!(h.manager.verify_code(EMAIL, FORM, &code).is_valid());

    h.clock.advance(Duration::minutes(11));
    assert_eq!(
        h.manager.verify_code(EMAIL, FORM, &code),
        rejected(VerifyFailure::CodeAlreadyUsed)
    );

    assert_eq!(h.manager.sweep_expired(), 1);
    assert_eq!(
        h.manager.verify_code(EMAIL, FORM, &code),
        rejected(VerifyFailure::CodeNotFound)
    );
}

#[tokio::test]
async fn should_not_count_rejections_before_the_compare_step() {
    let h = harness();
    let code = issue(&h, FORM, EMAIL).await;
    assert!(h.manager.verify_code(EMAIL, FORM, &code).is_valid());

    for _ in 0..5 {
        h.manager.verify_code(EMAIL, FORM, &code);
    }
    let attempts = h.store_attempts(FORM, EMAIL);
    assert_eq!(attempts, Some(1), "used-check must not touch attempts");
}

#[tokio::test]
async fn should_reject_codes_of_wrong_length() {
    let h = harness();
    let code = issue(&h, FORM, EMAIL).await;

    assert_eq!(
        h.manager.verify_code(EMAIL, FORM, &code[..5]),
        rejected(VerifyFailure::InvalidCode {
            attempts_remaining: 2
        })
    );
    assert_eq!(
        h.manager.verify_code(EMAIL, FORM, ""),
        rejected(VerifyFailure::InvalidCode {
            attempts_remaining: 1
        })
    );
}

#[tokio::test]
async fn should_bind_code_to_form_and_email() {
    let h = harness();
    let code = issue(&h, FORM, EMAIL).await;

    assert_eq!(
        h.manager.verify_code(EMAIL, "form_2", &code),
        rejected(VerifyFailure::CodeNotFound)
    );
    assert_eq!(
        h.manager.verify_code("b@x.com", FORM, &code),
        rejected(VerifyFailure::CodeNotFound)
    );
    assert!(h.manager.verify_code(EMAIL, FORM, &code).is_valid());
}

#[tokio::test]
async fn should_report_not_found_for_unknown_key() {
    let h = harness();
    assert_eq!(
        h.manager.verify_code(EMAIL, FORM, "123456"),
        rejected(VerifyFailure::CodeNotFound)
    );
}
