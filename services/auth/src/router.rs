use axum::{
    Router,
    routing::{get, post},
};

use formerr_core::health::{healthz, readyz};
use formerr_core::middleware::with_http_layers;

use crate::handlers::{
    auth_code::{request_authcode, verify_authcode},
    capabilities::{get_capabilities, get_form_quota},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Form access codes
        .route("/forms/{form_id}/auth-code", post(request_authcode))
        .route("/forms/{form_id}/auth-code/verify", post(verify_authcode))
        // Role policy
        .route("/auth/capabilities", get(get_capabilities))
        .route("/auth/forms/quota", get(get_form_quota))
        .with_state(state);
    with_http_layers(router)
}
