use axum_extra::extract::cookie::{Cookie, CookieJar};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::views::logs::LogsState;
use crate::views::upload::StagedLicense;

pub const SESSION_COOKIE: &str = "keel_session";

/// Sessions untouched for this long are dropped.
const IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);
const MAX_SESSIONS: usize = 4096;

/// View state owned by one browser session.
#[derive(Debug, Default)]
pub struct Session {
    pub logs: LogsState,
    pub staged_license: Option<StagedLicense>,
}

struct Entry {
    session: Session,
    last_seen: Instant,
}

#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<String, Entry>>>,
    idle_timeout: Duration,
    max_sessions: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_limits(IDLE_TIMEOUT, MAX_SESSIONS)
    }
}

impl SessionStore {
    pub fn with_limits(idle_timeout: Duration, max_sessions: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            idle_timeout,
            max_sessions: max_sessions.max(1),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Entry>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns the session id from the cookie jar, minting a new one when absent or unknown.
    pub fn resolve(&self, jar: CookieJar) -> (CookieJar, String) {
        if let Some(id) = jar.get(SESSION_COOKIE).map(|c| c.value().to_string()) {
            if self.touch(&id) {
                return (jar, id);
            }
        }

        let id = uuid::Uuid::new_v4().to_string();
        self.prune();
        self.with(&id, |_| ());
        tracing::debug!("New console session {}", id);
        let cookie = Cookie::build((SESSION_COOKIE, id.clone())).path("/").http_only(true);
        (jar.add(cookie), id)
    }

    /// Marks a known session as seen. An idle one is dropped and reported unknown.
    fn touch(&self, id: &str) -> bool {
        let mut sessions = self.lock();
        match sessions.get_mut(id) {
            Some(entry) if entry.last_seen.elapsed() < self.idle_timeout => {
                entry.last_seen = Instant::now();
                true
            }
            Some(_) => {
                sessions.remove(id);
                false
            }
            None => false,
        }
    }

    #[cfg(test)]
    fn contains(&self, id: &str) -> bool {
        self.lock().contains_key(id)
    }

    /// Drops idle sessions, then the least recently seen ones until a new one fits.
    fn prune(&self) {
        let mut sessions = self.lock();
        let before = sessions.len();
        let idle_timeout = self.idle_timeout;
        sessions.retain(|_, entry| entry.last_seen.elapsed() < idle_timeout);

        while sessions.len() >= self.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(id, _)| id.clone());
            match oldest {
                Some(id) => sessions.remove(&id),
                None => break,
            };
        }

        if sessions.len() < before {
            tracing::debug!("Pruned {} console sessions", before - sessions.len());
        }
    }

    /// Runs `f` against the session, creating it if needed. Never hold this across an await.
    pub fn with<R>(&self, id: &str, f: impl FnOnce(&mut Session) -> R) -> R {
        let mut sessions = self.lock();
        let entry = sessions.entry(id.to_string()).or_insert_with(|| Entry {
            session: Session::default(),
            last_seen: Instant::now(),
        });
        entry.last_seen = Instant::now();
        f(&mut entry.session)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_mints_then_reuses_session() {
        let store = SessionStore::default();
        let (jar, id) = store.resolve(CookieJar::new());
        assert_eq!(jar.get(SESSION_COOKIE).unwrap().value(), id);
        assert_eq!(store.len(), 1);

        let (_, again) = store.resolve(jar);
        assert_eq!(again, id);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn unknown_cookie_gets_fresh_session() {
        let store = SessionStore::default();
        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE, "stale"));
        let (_, id) = store.resolve(jar);
        assert_ne!(id, "stale");
    }

    #[test]
    fn state_persists_between_calls() {
        let store = SessionStore::default();
        store.with("s1", |s| s.logs.last_log_id = "42".to_string());
        let id = store.with("s1", |s| s.logs.last_log_id.clone());
        assert_eq!(id, "42");
        assert!(store.with("s2", |s| s.staged_license.is_none()));
    }

    #[test]
    fn cookieless_clients_cannot_grow_store_past_cap() {
        let store = SessionStore::with_limits(IDLE_TIMEOUT, 16);
        for _ in 0..1000 {
            store.resolve(CookieJar::new());
        }
        assert_eq!(store.len(), 16);
    }

    #[test]
    fn idle_sessions_are_dropped_when_minting() {
        let store = SessionStore::with_limits(Duration::ZERO, MAX_SESSIONS);
        let (jar, first) = store.resolve(CookieJar::new());
        let (_, second) = store.resolve(CookieJar::new());
        assert_eq!(store.len(), 1);

        // The first session expired, so its cookie mints a fresh one.
        let (_, again) = store.resolve(jar);
        assert_ne!(again, first);
        assert_ne!(again, second);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn cap_evicts_least_recently_seen() {
        let store = SessionStore::with_limits(IDLE_TIMEOUT, 2);
        let (jar_a, a) = store.resolve(CookieJar::new());
        let (_, b) = store.resolve(CookieJar::new());
        std::thread::sleep(Duration::from_millis(2));
        store.resolve(jar_a);

        let (_, c) = store.resolve(CookieJar::new());
        assert_eq!(store.len(), 2);
        assert!(store.contains(&a));
        assert!(!store.contains(&b));
        assert!(store.contains(&c));
    }
}
