//! JWT access-token validation.

use formerr_domain::role::UserRole;
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::Deserialize;
#[cfg(any(feature = "issuer", test))]
use serde::Serialize;

/// Identity extracted from a validated access token.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub user_id: String,
    pub email: String,
    pub role: UserRole,
    pub exp: u64,
}

/// Errors returned by [`validate_access_token`].
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
}

/// JWT claims payload.
///
/// | Field | JWT claim | Meaning |
/// |-------|-----------|---------|
/// | `sub` | `sub` | account id issued by the OAuth callback |
/// | `email` | custom | primary email of the account |
/// | `role` | custom | [`UserRole`] wire name |
/// | `exp` | `exp` | seconds since epoch |
///
/// Permissions and limits are not carried in the token; they are derived from
/// `role` through the static policy in `formerr_domain::role`.
///
/// [`Serialize`] requires the **`issuer`** cargo feature.
#[derive(Debug, Deserialize)]
#[cfg_attr(any(feature = "issuer", test), derive(Serialize))]
pub struct JwtClaims {
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub role: UserRole,
    pub exp: u64,
}

/// HS256, exp checked, required claims `exp` + `sub`. Default leeway is 60s.
fn decode_jwt(token: &str, secret: &str) -> Result<JwtClaims, AuthError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        _ => AuthError::Malformed,
    })?;

    Ok(data.claims)
}

/// Validate a bearer access token, returning the caller's identity.
pub fn validate_access_token(token: &str, secret: &str) -> Result<TokenInfo, AuthError> {
    let claims = decode_jwt(token, secret)?;
    if claims.sub.is_empty() {
        return Err(AuthError::Malformed);
    }
    Ok(TokenInfo {
        user_id: claims.sub,
        email: claims.email,
        role: claims.role,
        exp: claims.exp,
    })
}

/// Sign `claims` with HS256.
#[cfg(any(feature = "issuer", test))]
pub fn issue_access_token(
    claims: &JwtClaims,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        claims,
        &jsonwebtoken::EncodingKey::from_secret(secret.as_bytes()),
    )
}
