use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::{validate_jwt, Claims};
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller extracted from the JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub username: String,
    pub is_admin: bool,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.sub,
            is_admin: claims.is_admin,
        }
    }
}

/// Rejects the request with 401 unless it carries a valid bearer token.
/// Applied as a route layer, so it runs before any handler extractor reads the body.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = extract_jwt_from_headers(&headers)
        .and_then(|token| {
            validate_jwt(&token, &state.config.security.jwt_secret).map_err(|e| e.to_string())
        })
        .map_err(|msg| {
            tracing::warn!(method = %request.method(), uri = %request.uri(), "Rejected request: {}", msg);
            ApiError::unauthorized(msg)
        })?;

    request.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        Some(_) => Err("Empty JWT token".to_string()),
        None => Err("Authorization header must use Bearer token format".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn auth_user_carries_admin_flag_from_claims() {
        let user = AuthUser::from(Claims::new("root", true, 1));
        assert_eq!(user.username, "root");
        assert!(user.is_admin);
        assert!(!AuthUser::from(Claims::new("u1", false, 1)).is_admin);
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(extract_jwt_from_headers(&headers_with("Bearer abc.def")).unwrap(), "abc.def");
    }

    #[test]
    fn rejects_missing_empty_and_non_bearer() {
        assert!(extract_jwt_from_headers(&HeaderMap::new()).is_err());
        assert_eq!(extract_jwt_from_headers(&headers_with("Bearer  ")).unwrap_err(), "Empty JWT token");
        assert!(extract_jwt_from_headers(&headers_with("Basic dXNlcjpwYXNz")).is_err());
    }
}
