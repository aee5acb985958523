use std::sync::LazyLock;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::types::Verification;
use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::authcode::RequestCodeInput;

static EMAIL_RE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$"));

/// Basic email shape check, applied before a code is issued.
pub fn valid_email(email: &str) -> bool {
    EMAIL_RE.as_ref().is_ok_and(|re| re.is_match(email))
}

// ── POST /forms/{form_id}/auth-code ──────────────────────────────────────────

#[derive(Deserialize)]
pub struct RequestAuthcodeRequest {
    pub email: String,
    pub form_title: String,
    pub user_name: Option<String>,
}

#[derive(Serialize)]
pub struct RequestAuthcodeResponse {
    pub success: bool,
    pub code_sent: bool,
    pub email: String,
    pub expires_in_minutes: i64,
    pub form_id: String,
}

pub async fn request_authcode(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
    Json(body): Json<RequestAuthcodeRequest>,
) -> Result<(StatusCode, Json<RequestAuthcodeResponse>), AuthServiceError> {
    let email = body.email.trim().to_owned();
    if email.is_empty() {
        return Err(AuthServiceError::MissingField("email"));
    }
    if !valid_email(&email) {
        return Err(AuthServiceError::InvalidEmail);
    }

    let out = state
        .auth_codes
        .request_code(RequestCodeInput {
            email,
            form_id,
            form_title: body.form_title,
            display_name: body.user_name,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RequestAuthcodeResponse {
            success: out.success,
            code_sent: out.code_sent,
            email: out.email,
            expires_in_minutes: out.expires_in_minutes,
            form_id: out.form_id,
        }),
    ))
}

// ── POST /forms/{form_id}/auth-code/verify ───────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyAuthcodeRequest {
    pub email: String,
    pub code: String,
}

#[derive(Serialize)]
pub struct VerifyAuthcodeResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts_remaining: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "formerr_core::serde::to_rfc3339_ms_opt"
    )]
    pub authenticated_at: Option<DateTime<Utc>>,
}

/// Always 200: a rejected code is a normal outcome described by `reason`.
pub async fn verify_authcode(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
    Json(body): Json<VerifyAuthcodeRequest>,
) -> Json<VerifyAuthcodeResponse> {
    let email = body.email.trim();
    let verification = state.auth_codes.verify_code(email, &form_id, &body.code);
    let message = verification.message();

    let response = match verification {
        Verification::Valid { authenticated_at } => VerifyAuthcodeResponse {
            valid: true,
            reason: None,
            message,
            attempts_remaining: None,
            form_id: Some(form_id),
            email: Some(email.to_owned()),
            authenticated_at: Some(authenticated_at),
        },
        Verification::Rejected(failure) => VerifyAuthcodeResponse {
            valid: false,
            reason: Some(failure.reason()),
            message,
            attempts_remaining: failure.attempts_remaining(),
            form_id: None,
            email: None,
            authenticated_at: None,
        },
    };
    Json(response)
}
