use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use formerr_auth_types::{
    identity::BearerToken,
    token::{TokenInfo, validate_access_token},
};

use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::capabilities::{
    Capabilities, FormCreationDecision, can_create_form, capabilities,
};

fn authenticate(state: &AppState, token: &BearerToken) -> Result<TokenInfo, AuthServiceError> {
    validate_access_token(&token.0, &state.jwt_secret).map_err(|_| AuthServiceError::InvalidToken)
}

// ── GET /auth/capabilities ───────────────────────────────────────────────────

pub async fn get_capabilities(
    State(state): State<AppState>,
    token: BearerToken,
) -> Result<Json<Capabilities>, AuthServiceError> {
    let identity = authenticate(&state, &token)?;
    Ok(Json(capabilities(identity.role)))
}

// ── GET /auth/forms/quota ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct FormQuotaQuery {
    #[serde(default)]
    pub current_forms: u32,
}

pub async fn get_form_quota(
    State(state): State<AppState>,
    token: BearerToken,
    Query(query): Query<FormQuotaQuery>,
) -> Result<Json<FormCreationDecision>, AuthServiceError> {
    let identity = authenticate(&state, &token)?;
    Ok(Json(can_create_form(identity.role, query.current_forms)))
}
