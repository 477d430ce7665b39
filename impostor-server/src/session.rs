//! Cookie-keyed, in-memory session storage holding one round per browser.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use impostor_core::RoundState;
use tokio::sync::RwLock;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "impostor_session";

/// Session id taken from the request cookie, or freshly issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId {
    id: String,
    issued: bool,
}

impl SessionId {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        match cookie_value(headers, SESSION_COOKIE).filter(|v| Uuid::parse_str(v).is_ok()) {
            Some(id) => Self { id, issued: false },
            None => Self::issue(),
        }
    }

    pub fn issue() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            issued: true,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.id
    }

    /// True when the client does not hold this id yet.
    pub fn is_new(&self) -> bool {
        self.issued
    }
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
}

#[derive(Debug)]
struct Session {
    round: Option<RoundState>,
    last_seen: Instant,
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Snapshot of the session's round, if it has one and has not expired.
    pub async fn round(&self, session: &SessionId) -> Option<RoundState> {
        self.with_round(session, |round| round.clone()).await
    }

    /// Runs `f` against the session's round. Returns `None` without calling
    /// `f` when there is no live round.
    pub async fn with_round<T>(
        &self,
        session: &SessionId,
        f: impl FnOnce(&mut RoundState) -> T,
    ) -> Option<T> {
        let mut sessions = self.sessions.write().await;
        self.prune(&mut sessions);

        let entry = sessions.get_mut(session.as_str())?;
        entry.last_seen = Instant::now();
        entry.round.as_mut().map(f)
    }

    pub async fn set_round(&self, session: &SessionId, round: RoundState) {
        let mut sessions = self.sessions.write().await;
        self.prune(&mut sessions);
        sessions.insert(
            session.as_str().to_string(),
            Session {
                round: Some(round),
                last_seen: Instant::now(),
            },
        );
    }

    pub async fn clear(&self, session: &SessionId) {
        let mut sessions = self.sessions.write().await;
        self.prune(&mut sessions);
        sessions.remove(session.as_str());
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    fn prune(&self, sessions: &mut HashMap<String, Session>) {
        let before = sessions.len();
        sessions.retain(|_, s| s.last_seen.elapsed() < self.ttl);
        let expired = before - sessions.len();
        if expired > 0 {
            tracing::debug!(expired, "pruned idle sessions");
        }
    }

    /// Adds `Set-Cookie` to every response so the cookie's `Max-Age` tracks
    /// the idle timeout rather than the time the id was issued.
    pub fn attach_cookie(&self, session: &SessionId, response: impl IntoResponse) -> Response {
        let mut response = response.into_response();
        if session.is_new() {
            tracing::debug!(session = %session.as_str(), "issued session cookie");
        }
        let cookie = format!(
            "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            session.as_str(),
            self.ttl.as_secs()
        );
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use impostor_core::{Category, SetupRequest, Word, WordBank};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn round() -> RoundState {
        let category = Category {
            name: "Animales".into(),
            words: vec![Word {
                text: "Perro".into(),
                hints: vec![],
            }],
        };
        let bank = WordBank::from([(category.name.clone(), category)]);
        let request = SetupRequest {
            player_names: "Ana, Beto, Caro".into(),
            impostor_count: 1,
            categories: vec!["Animales".into()],
            hints_enabled: false,
        };
        RoundState::setup(&request, &bank, &mut ChaCha8Rng::seed_from_u64(1)).unwrap()
    }

    fn headers_with_cookie(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn reads_existing_session_cookie() {
        let id = Uuid::new_v4().to_string();
        let headers = headers_with_cookie(&format!("theme=dark; {SESSION_COOKIE}={id}"));

        let session = SessionId::from_headers(&headers);

        assert_eq!(session.as_str(), id);
        assert!(!session.is_new());
    }

    #[test]
    fn issues_new_id_for_missing_or_garbage_cookie() {
        let session = SessionId::from_headers(&HeaderMap::new());
        assert!(session.is_new());

        let session =
            SessionId::from_headers(&headers_with_cookie(&format!("{SESSION_COOKIE}=../../etc")));
        assert!(session.is_new());
        assert_ne!(session.as_str(), "../../etc");
    }

    #[tokio::test]
    async fn stores_and_clears_rounds() {
        let store = SessionStore::new(Duration::from_secs(60));
        let session = SessionId::issue();
        assert!(store.round(&session).await.is_none());

        store.set_round(&session, round()).await;
        assert_eq!(store.round(&session).await, Some(round()));

        let advanced = store.with_round(&session, |r| r.advance()).await;
        assert_eq!(advanced, Some(impostor_core::FlowState::PlayerTurn(1)));
        assert_eq!(store.round(&session).await.unwrap().current_turn(), 1);

        store.clear(&session).await;
        assert!(store.round(&session).await.is_none());
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let store = SessionStore::new(Duration::from_secs(60));
        let first = SessionId::issue();
        let second = SessionId::issue();

        store.set_round(&first, round()).await;

        assert!(store.round(&second).await.is_none());
        assert!(store.round(&first).await.is_some());
    }

    #[tokio::test]
    async fn idle_sessions_expire() {
        let store = SessionStore::new(Duration::ZERO);
        let session = SessionId::issue();

        store.set_round(&session, round()).await;

        assert!(store.round(&session).await.is_none());
        assert_eq!(store.session_count().await, 0);
    }

    #[test]
    fn cookie_is_refreshed_for_new_and_existing_sessions() {
        let store = SessionStore::new(Duration::from_secs(60));
        let fresh = SessionId::issue();
        let existing = SessionId {
            issued: false,
            ..fresh.clone()
        };

        for session in [&fresh, &existing] {
            let response = store.attach_cookie(session, "ok");
            let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
            assert!(cookie.starts_with(&format!("{SESSION_COOKIE}={}", fresh.as_str())));
            assert!(cookie.contains("HttpOnly"));
            assert!(cookie.contains("Max-Age=60"));
        }
    }
}
