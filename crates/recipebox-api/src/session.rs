use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Mutex, MutexGuard};

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;

use crate::state::AppState;

pub const SESSION_COOKIE: &str = "recipebox_session";

struct SessionEntry {
    user_id: i64,
    expires_at: DateTime<Utc>,
}

/// Server-side session table: opaque cookie token -> authenticated user id.
pub struct SessionStore {
    entries: Mutex<HashMap<String, SessionEntry>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// How long a new session stays valid.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Start a session for `user_id` and return its token.
    pub fn create(&self, user_id: i64) -> String {
        let token = new_token();
        self.lock().insert(
            token.clone(),
            SessionEntry {
                user_id,
                expires_at: Utc::now() + self.ttl,
            },
        );
        token
    }

    /// The user behind `token`, if the session exists and has not expired.
    /// Expired sessions are dropped on sight.
    pub fn resolve(&self, token: &str) -> Option<i64> {
        let mut entries = self.lock();
        let (user_id, expires_at) = entries.get(token).map(|e| (e.user_id, e.expires_at))?;
        if expires_at <= Utc::now() {
            entries.remove(token);
            return None;
        }
        Some(user_id)
    }

    pub fn destroy(&self, token: &str) -> bool {
        self.lock().remove(token).is_some()
    }

    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A panic while holding the lock cannot leave a half-written entry behind.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, SessionEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn new_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Cookie carrying `token`; the browser drops it when the server-side entry expires.
pub fn session_cookie(token: String, secure: bool, ttl: Duration) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::seconds(ttl.num_seconds()))
        .build()
}

/// Cookie that tells the client to forget its session token.
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

/// Authentication context for one request: the presented token and the user
/// it resolves to. Never rejects; each handler decides what absence means.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub token: Option<String>,
    pub user_id: Option<i64>,
}

impl FromRequestParts<AppState> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar.get(SESSION_COOKIE).map(|c| c.value().to_string());
        let user_id = token.as_deref().and_then(|t| state.sessions.resolve(t));
        Ok(Session { token, user_id })
    }
}

/// Replace whatever session the client holds with a fresh one for `user_id`.
pub fn start_session(state: &AppState, previous: &Session, jar: CookieJar, user_id: i64) -> CookieJar {
    if let Some(old) = previous.token.as_deref() {
        state.sessions.destroy(old);
    }
    let token = state.sessions.create(user_id);
    jar.add(session_cookie(token, state.secure_cookies, state.sessions.ttl()))
}
