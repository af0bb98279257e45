use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::auth::{validate_session_token, SESSION_COOKIE};
use crate::database::models::User;
use crate::error::AppError;
use crate::state::AppState;

/// The signed-in user for this request, if any
#[derive(Clone, Debug, Default)]
pub struct CurrentUser(pub Option<User>);

/// Resolves the session (bearer token first, then the session cookie) into a
/// `CurrentUser` extension. Missing, invalid or expired sessions, and sessions
/// for deleted users, all resolve to an anonymous caller.
pub async fn current_user_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = match extract_token(&headers, &jar) {
        Some(token) => resolve_user(&state, &token).await?,
        None => None,
    };

    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}

fn extract_token(headers: &HeaderMap, jar: &CookieJar) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

async fn resolve_user(state: &AppState, token: &str) -> Result<Option<User>, AppError> {
    let claims = match validate_session_token(&state.config.security, token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!("Ignoring session token: {}", e);
            return Ok(None);
        }
    };

    let user_id = match claims.user_id() {
        Ok(id) => id,
        Err(e) => {
            tracing::debug!("Ignoring session token: {}", e);
            return Ok(None);
        }
    };

    Ok(state.db.users.get_by_id(user_id).await?)
}
