use std::fmt;

use chrono::{DateTime, Utc};

/// Auth code time-to-live in minutes.
pub const AUTHCODE_TTL_MINUTES: i64 = 10;

/// Number of verification attempts allowed per code.
pub const AUTHCODE_MAX_ATTEMPTS: u32 = 3;

/// Auth code length in digits.
pub const AUTHCODE_LEN: usize = 6;

/// Name used in the delivered message when the caller supplies none.
pub const DEFAULT_DISPLAY_NAME: &str = "User";

/// Identity of one outstanding code: a form and the email proving access to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CodeKey {
    pub form_id: String,
    pub email: String,
}

impl CodeKey {
    pub fn new(form_id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            form_id: form_id.into(),
            email: email.into(),
        }
    }
}

impl fmt::Display for CodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "auth_code:{}:{}", self.form_id, self.email)
    }
}

/// One outstanding verification attempt.
///
/// `expires_at` never changes after creation. `used` flips to true at most once;
/// a used record stays behind as a tombstone until it expires and is swept.
#[derive(Clone)]
pub struct AuthCodeRecord {
    pub key: CodeKey,
    pub code: String,
    pub form_title: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub attempts: u32,
    pub max_attempts: u32,
    pub used: bool,
    pub used_at: Option<DateTime<Utc>>,
}

// Hand-written so the secret never reaches logs through `{:?}`.
impl fmt::Debug for AuthCodeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthCodeRecord")
            .field("key", &self.key)
            .field("code", &"<redacted>")
            .field("form_title", &self.form_title)
            .field("created_at", &self.created_at)
            .field("expires_at", &self.expires_at)
            .field("attempts", &self.attempts)
            .field("max_attempts", &self.max_attempts)
            .field("used", &self.used)
            .field("used_at", &self.used_at)
            .finish()
    }
}

impl AuthCodeRecord {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn is_exhausted(&self) -> bool {
        self.attempts >= self.max_attempts
    }

    pub fn attempts_remaining(&self) -> u32 {
        self.max_attempts.saturating_sub(self.attempts)
    }
}

/// Message handed to the delivery collaborator.
#[derive(Debug, Clone, Copy)]
pub struct CodeDelivery<'a> {
    pub to_email: &'a str,
    pub to_name: &'a str,
    pub code: &'a str,
    pub form_title: &'a str,
    pub expires_in_minutes: i64,
}

/// Outcome of a code request. Never carries the code itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestResult {
    pub success: bool,
    pub code_sent: bool,
    pub email: String,
    pub expires_in_minutes: i64,
    pub form_id: String,
}

/// Why a verification was rejected. Closed set; none of these are faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyFailure {
    CodeNotFound,
    CodeAlreadyUsed,
    CodeExpired,
    MaxAttemptsExceeded,
    InvalidCode { attempts_remaining: u32 },
}

impl VerifyFailure {
    /// Wire name of the reason.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::CodeNotFound => "code_not_found",
            Self::CodeAlreadyUsed => "code_already_used",
            Self::CodeExpired => "code_expired",
            Self::MaxAttemptsExceeded => "max_attempts_exceeded",
            Self::InvalidCode { .. } => "invalid_code",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::CodeNotFound => "Code not found. Request a new code.".to_owned(),
            Self::CodeAlreadyUsed => "This code has already been used.".to_owned(),
            Self::CodeExpired => "Code expired. Request a new code.".to_owned(),
            Self::MaxAttemptsExceeded => "Too many attempts. Request a new code.".to_owned(),
            Self::InvalidCode { attempts_remaining } => {
                format!("Incorrect code. Attempts remaining: {attempts_remaining}")
            }
        }
    }

    pub fn attempts_remaining(&self) -> Option<u32> {
        match self {
            Self::InvalidCode { attempts_remaining } => Some(*attempts_remaining),
            _ => None,
        }
    }
}

/// Outcome of a verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    Valid { authenticated_at: DateTime<Utc> },
    Rejected(VerifyFailure),
}

impl Verification {
    /// Human-readable outcome, for both acceptance and every rejection.
    pub fn message(&self) -> String {
        match self {
            Self::Valid { .. } => "Code valid. Access granted.".to_owned(),
            Self::Rejected(failure) => failure.message(),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    pub fn failure(&self) -> Option<VerifyFailure> {
        match self {
            Self::Valid { .. } => None,
            Self::Rejected(failure) => Some(*failure),
        }
    }
}
