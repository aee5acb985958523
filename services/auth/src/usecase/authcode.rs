use chrono::Duration;
use formerr_core::clock::Clock;
use rand::RngExt;
use subtle::ConstantTimeEq;
use tracing::{debug, info, warn};

use crate::domain::repository::{AuthCodeStore, CodeNotifier};
use crate::domain::types::{
    AUTHCODE_LEN, AUTHCODE_MAX_ATTEMPTS, AUTHCODE_TTL_MINUTES, AuthCodeRecord, CodeDelivery,
    CodeKey, DEFAULT_DISPLAY_NAME, RequestResult, Verification, VerifyFailure,
};
use crate::error::AuthServiceError;

const DIGITS: &[u8] = b"0123456789";

/// Draws from the thread-local CSPRNG (OS-seeded ChaCha).
fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..AUTHCODE_LEN)
        .map(|_| DIGITS[rng.random_range(0..DIGITS.len())] as char)
        .collect()
}

pub struct RequestCodeInput {
    pub email: String,
    pub form_id: String,
    pub form_title: String,
    pub display_name: Option<String>,
}

/// Owns the lifecycle of one-time codes: issue, verify, expire.
///
/// Single-process: each instance sees only its own store. Two service replicas
/// behind a load balancer do not share codes.
pub struct AuthCodeManager<S, N, C>
where
    S: AuthCodeStore,
    N: CodeNotifier,
    C: Clock,
{
    pub store: S,
    pub notifier: N,
    pub clock: C,
}

impl<S, N, C> AuthCodeManager<S, N, C>
where
    S: AuthCodeStore,
    N: CodeNotifier,
    C: Clock,
{
    pub fn new(store: S, notifier: N, clock: C) -> Self {
        Self {
            store,
            notifier,
            clock,
        }
    }

    /// Issue a fresh code for `(form_id, email)`, replacing any outstanding one,
    /// and hand it to the notifier.
    ///
    /// Email syntax is the caller's responsibility. A delivery failure is
    /// reported as `code_sent = false`; the code stays valid either way.
    pub async fn request_code(
        &self,
        input: RequestCodeInput,
    ) -> Result<RequestResult, AuthServiceError> {
        if input.email.trim().is_empty() {
            return Err(AuthServiceError::MissingField("email"));
        }
        if input.form_id.trim().is_empty() {
            return Err(AuthServiceError::MissingField("form_id"));
        }

        let key = CodeKey::new(input.form_id, input.email);
        let code = generate_code();
        let now = self.clock.now();
        let record = AuthCodeRecord {
            key: key.clone(),
            code: code.clone(),
            form_title: input.form_title,
            created_at: now,
            expires_at: now + Duration::minutes(AUTHCODE_TTL_MINUTES),
            attempts: 0,
            max_attempts: AUTHCODE_MAX_ATTEMPTS,
            used: false,
            used_at: None,
        };
        let form_title = record.form_title.clone();

        // Stored before delivery so a fast recipient can verify immediately.
        if self.store.put(record).is_some() {
            debug!(key = %key, "superseded outstanding auth code");
        }

        let delivery = CodeDelivery {
            to_email: &key.email,
            to_name: input
                .display_name
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .unwrap_or(DEFAULT_DISPLAY_NAME),
            code: &code,
            form_title: &form_title,
            expires_in_minutes: AUTHCODE_TTL_MINUTES,
        };
        let code_sent = match self.notifier.send(&delivery).await {
            Ok(()) => true,
            Err(e) => {
                warn!(key = %key, error = %e, "auth code delivery failed");
                false
            }
        };
        info!(form_id = %key.form_id, email = %key.email, code_sent, "auth code issued");

        Ok(RequestResult {
            success: true,
            code_sent,
            email: key.email,
            expires_in_minutes: AUTHCODE_TTL_MINUTES,
            form_id: key.form_id,
        })
    }

    /// Check `submitted_code` against the outstanding code for `(form_id, email)`.
    ///
    /// Checks run in a fixed order, all under exclusive access to the record:
    /// used, expired, exhausted, then attempt-increment and comparison. Only the
    /// last step mutates `attempts`, and it counts the successful attempt too.
    pub fn verify_code(&self, email: &str, form_id: &str, submitted_code: &str) -> Verification {
        let key = CodeKey::new(form_id, email);
        let now = self.clock.now();

        let verification = self.store.with_record(&key, |slot| {
            let Some(record) = slot.as_mut() else {
                return Verification::Rejected(VerifyFailure::CodeNotFound);
            };
            if record.used {
                return Verification::Rejected(VerifyFailure::CodeAlreadyUsed);
            }
            if record.is_expired(now) {
                *slot = None;
                return Verification::Rejected(VerifyFailure::CodeExpired);
            }
            if record.is_exhausted() {
                *slot = None;
                return Verification::Rejected(VerifyFailure::MaxAttemptsExceeded);
            }

            record.attempts += 1;
            if bool::from(submitted_code.as_bytes().ct_eq(record.code.as_bytes())) {
                record.used = true;
                record.used_at = Some(now);
                Verification::Valid {
                    authenticated_at: now,
                }
            } else {
                Verification::Rejected(VerifyFailure::InvalidCode {
                    attempts_remaining: record.attempts_remaining(),
                })
            }
        });

        match &verification {
            Verification::Valid { .. } => info!(key = %key, "auth code verified"),
            Verification::Rejected(failure) => {
                debug!(key = %key, reason = failure.reason(), "auth code rejected")
            }
        }
        verification
    }

    /// Evict every record whose expiry has passed, tombstones included.
    /// Returns the number of records removed.
    pub fn sweep_expired(&self) -> usize {
        let now = self.clock.now();
        self.store.evict_where(|record| record.expires_at < now)
    }

    /// Number of live records, tombstones included.
    pub fn outstanding(&self) -> usize {
        self.store.len()
    }
}
