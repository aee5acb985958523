//! `Authorization: Bearer` extractor.

use axum::extract::FromRequestParts;
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use http::StatusCode;
use http::request::Parts;

/// Raw bearer token taken from the `Authorization` header.
///
/// Returns 401 if the header is absent or not a bearer credential. Signature and
/// expiry are checked by the handler with [`crate::token::validate_access_token`],
/// since the signing secret lives in service state.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // Extract synchronously and return a 'static future; see axum-core's
    // `fn -> impl Future + Send` signature.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = parts
            .headers
            .typed_get::<Authorization<Bearer>>()
            .map(|auth| auth.token().to_owned())
            .filter(|t| !t.is_empty());

        async move { token.map(Self).ok_or(StatusCode::UNAUTHORIZED) }
    }
}
