use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use sqlx::PgPool;

use crate::{config::Config, error::AppError, repositories::session as session_repo};

/// Authorization gate for every session-dependent route.
///
/// Rejects before any store access when no bearer token is present, then
/// resolves the token through the session store (which also lazily purges
/// expired rows). The resolved `User` is inserted into the request
/// extensions; handlers never accept a user id from client input.
pub async fn auth(
    State((pool, _config)): State<(PgPool, Config)>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_bearer_token)
        .map(|value| value.to_string())
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

    let user = session_repo::validate_token(&pool, &token)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired session".to_string()))?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Extracts the token from a `Bearer` authorization header value. Shared
/// with the logout handler, which reads the header without going through
/// the gate.
pub fn parse_bearer_token(header: &str) -> Option<&str> {
    if let Some(rest) = header.strip_prefix("Bearer ") {
        return Some(rest);
    }
    if let Some(space_idx) = header.find(' ') {
        let (scheme, rest) = header.split_at(space_idx);
        if scheme.eq_ignore_ascii_case("bearer") {
            return Some(rest.trim_start());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_parsing_accepts_canonical_header() {
        assert_eq!(parse_bearer_token("Bearer abc123"), Some("abc123"));
    }

    #[test]
    fn bearer_parsing_is_scheme_case_insensitive() {
        assert_eq!(parse_bearer_token("bearer abc123"), Some("abc123"));
        assert_eq!(parse_bearer_token("BEARER abc123"), Some("abc123"));
    }

    #[test]
    fn bearer_parsing_rejects_other_schemes() {
        assert_eq!(parse_bearer_token("Basic abc123"), None);
        assert_eq!(parse_bearer_token("abc123"), None);
        assert_eq!(parse_bearer_token(""), None);
    }
}
