//! Password hashing and cookie-session principal handling.
//!
//! The session layer stores only the authenticated user's id under a single
//! key. Resolving that principal to a full user record is the job of
//! `crate::user` (the identity gate); this module owns the mechanics.

use crate::user::Profile;
use actix_session::Session;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::Lazy;

/// Session key holding the authenticated user id.
pub const SESSION_USER_KEY: &str = "uid";

static ARGON2: Lazy<Argon2<'static>> = Lazy::new(Argon2::default);

pub fn get_argon2() -> &'static Argon2<'static> {
    &ARGON2
}

/// Forces lazy statics so hashing problems surface at boot.
pub fn init() {
    Lazy::force(&ARGON2);
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(get_argon2()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => get_argon2()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            log::error!("Stored password hash failed to parse: {}", e);
            false
        }
    }
}

/// Records the principal in the cookie session after a successful login.
pub fn store_principal(session: &Session, user_id: i32) -> Result<(), actix_web::Error> {
    session
        .insert(SESSION_USER_KEY, user_id)
        .map_err(|_| actix_web::error::ErrorInternalServerError("Failed to store session."))
}

pub fn clear_principal(session: &Session) {
    session.purge();
}

/// Resolves the session principal to a stored user, if any.
///
/// Returns None both for anonymous sessions and for sessions whose uid no
/// longer matches a stored user (e.g. the account was deleted).
pub async fn authenticate_client_by_session(session: &Session) -> Option<Profile> {
    let uid = match session.get::<i32>(SESSION_USER_KEY) {
        Ok(Some(uid)) => uid,
        Ok(None) => return None,
        Err(e) => {
            log::debug!("Unreadable session cookie: {}", e);
            return None;
        }
    };

    match Profile::get_by_id(crate::db::get_db_pool(), uid).await {
        Ok(profile) => Some(profile),
        Err(crate::error::OpError::NotFound(_)) => None,
        Err(e) => {
            log::error!("Session principal lookup failed: {}", e);
            None
        }
    }
}
