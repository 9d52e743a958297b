use std::sync::Arc;

use anyhow::Result;

use recipebox_db::Database;

use crate::password;
use crate::session::SessionStore;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub sessions: SessionStore,
    /// Mark the session cookie `Secure`. Off for plain-HTTP development.
    pub secure_cookies: bool,
    /// Verified against when a login names an unknown user, so both failure
    /// paths cost one Argon2 verification.
    pub dummy_hash: String,
}

impl AppStateInner {
    pub fn new(db: Database, sessions: SessionStore, secure_cookies: bool) -> Result<AppState> {
        let dummy_hash = password::hash_password("recipebox-dummy-password")?;
        Ok(Arc::new(Self {
            db,
            sessions,
            secure_cookies,
            dummy_hash,
        }))
    }
}
