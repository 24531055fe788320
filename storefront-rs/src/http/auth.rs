use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, warn};

use crate::db;
use crate::models::User;

use super::error::ApiError;
use super::state::AppState;

pub const SESSION_COOKIE: &str = "storefront_session";

/// Resolve the session cookie to a user id, if the token is valid.
pub fn session_user_id(state: &AppState, jar: &CookieJar) -> Option<String> {
    let cookie = jar.get(SESSION_COOKIE)?;
    state.sessions.get(cookie.value())
}

/// Require a valid session. Missing or expired sessions are 401.
pub fn require_session(state: &AppState, jar: &CookieJar) -> Result<String, ApiError> {
    match session_user_id(state, jar) {
        Some(user_id) => {
            debug!("authorized request using session");
            Ok(user_id)
        }
        None => {
            warn!("unauthenticated request");
            Err(ApiError::Unauthorized)
        }
    }
}

/// Require a session whose user holds the admin role. Anything less,
/// including no session at all, is 403.
pub async fn require_admin(state: &AppState, jar: &CookieJar) -> Result<User, ApiError> {
    let Some(user_id) = session_user_id(state, jar) else {
        warn!("admin endpoint denied: no session");
        return Err(ApiError::Forbidden);
    };
    let Some(user) = db::users::find_by_id(&state.pool, &user_id).await? else {
        warn!("admin endpoint denied: session user no longer exists");
        return Err(ApiError::Forbidden);
    };
    if !user.is_admin() {
        warn!(user = %user.name, role = %user.role, "admin endpoint denied");
        return Err(ApiError::Forbidden);
    }
    debug!(user = %user.name, "authorized admin request");
    Ok(user)
}
