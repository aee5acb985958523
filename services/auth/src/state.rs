use std::sync::Arc;

use formerr_core::clock::SystemClock;

use crate::infra::mailer::Notifier;
use crate::infra::memory::InMemoryAuthCodeStore;
use crate::usecase::authcode::AuthCodeManager;

/// The manager as wired in production.
pub type AppAuthCodeManager = AuthCodeManager<InMemoryAuthCodeStore, Notifier, SystemClock>;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub auth_codes: Arc<AppAuthCodeManager>,
    pub jwt_secret: String,
}

impl AppState {
    pub fn new(store: InMemoryAuthCodeStore, notifier: Notifier, jwt_secret: String) -> Self {
        Self {
            auth_codes: Arc::new(AuthCodeManager::new(store, notifier, SystemClock)),
            jwt_secret,
        }
    }
}
