//! CSRF (Cross-Site Request Forgery) protection
//!
//! State-changing form posts must carry a token that matches the one stored
//! in the session cookie. The token is generated once per session and is
//! exposed to templates through `ClientCtx::get_csrf_token`.

use actix_web::{error, Error};
use rand::{distributions::Alphanumeric, Rng};

pub const CSRF_TOKEN_LENGTH: usize = 32;
const CSRF_SESSION_KEY: &str = "csrf_token";

/// Generate a new CSRF token
pub fn generate_csrf_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(CSRF_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Get or create CSRF token for the current session
///
/// This is automatically called when ClientCtx is created from session,
/// ensuring every request has a CSRF token available.
pub fn get_or_create_csrf_token(session: &actix_session::Session) -> Result<String, Error> {
    match session.get::<String>(CSRF_SESSION_KEY) {
        Ok(Some(token)) => Ok(token),
        _ => {
            let token = generate_csrf_token();
            session
                .insert(CSRF_SESSION_KEY, token.clone())
                .map_err(|_| error::ErrorInternalServerError("Failed to store CSRF token"))?;
            Ok(token)
        }
    }
}

/// Validate CSRF token from form data
///
/// Call this at the beginning of any handler that processes state-changing
/// requests.
pub fn validate_csrf_token(session: &actix_session::Session, token: &str) -> Result<(), Error> {
    let stored = session
        .get::<String>(CSRF_SESSION_KEY)
        .map_err(|_| error::ErrorBadRequest("Session unreadable"))?
        .ok_or_else(|| error::ErrorBadRequest("No CSRF token in session"))?;

    if stored.is_empty() || stored != token {
        return Err(error::ErrorForbidden("CSRF token mismatch"));
    }

    Ok(())
}
