pub mod config;
pub mod session;
pub mod views;

use std::num::IntErrorKind;
use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use impostor_core::{FlowState, GameError, RoundState, SetupRequest, WordBank};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::session::{SessionId, SessionStore};

#[derive(Clone)]
pub struct AppState {
    bank: Arc<WordBank>,
    sessions: SessionStore,
    rng: Arc<Mutex<ChaCha8Rng>>,
    discussion_seconds: u32,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&Config::default(), WordBank::new())
    }
}

impl AppState {
    pub fn new(config: &Config, bank: WordBank) -> Self {
        let rng = config
            .rng_seed
            .map(ChaCha8Rng::seed_from_u64)
            .unwrap_or_else(ChaCha8Rng::from_entropy);

        Self {
            bank: Arc::new(bank),
            sessions: SessionStore::new(config.session_ttl),
            rng: Arc::new(Mutex::new(rng)),
            discussion_seconds: config.discussion_seconds,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/setup", get(show_setup).post(submit_setup))
        .route("/player", get(show_player))
        .route("/next", post(next_player))
        .route("/complete", get(show_complete))
        .route("/reset", post(reset))
        .with_state(state)
}

/// Fields posted by the setup form. Category checkboxes repeat their key,
/// so the body is decoded as raw pairs.
#[derive(Debug, Default)]
struct SetupForm {
    player_names: String,
    num_impostors: Option<String>,
    selected_categories: Vec<String>,
    hints_enabled: bool,
}

impl SetupForm {
    fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut form = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "player_names" => form.player_names = value,
                "num_impostors" => form.num_impostors = Some(value),
                "selected_categories" => form.selected_categories.push(value),
                "hints_enabled" => form.hints_enabled = true,
                _ => {}
            }
        }
        form
    }

    fn to_request(&self) -> Result<SetupRequest, GameError> {
        let impostor_count = match self.num_impostors.as_deref().map(str::trim) {
            None => 1,
            Some(raw) => parse_saturating(raw)
                .ok_or_else(|| GameError::Configuration(format!("invalid impostor count {raw:?}")))?,
        };

        Ok(SetupRequest {
            player_names: self.player_names.clone(),
            impostor_count,
            categories: self.selected_categories.clone(),
            hints_enabled: self.hints_enabled,
        })
    }
}

/// Parses an integer, saturating values that overflow `i64`. The count is
/// clamped to the player range later, so only the sign matters for them.
fn parse_saturating(raw: &str) -> Option<i64> {
    match raw.parse::<i64>() {
        Ok(n) => Some(n),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

async fn index(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = SessionId::from_headers(&headers);
    state.sessions.clear(&session).await;
    state.sessions.attach_cookie(&session, Redirect::to("/setup"))
}

async fn show_setup(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = SessionId::from_headers(&headers);
    state
        .sessions
        .attach_cookie(&session, views::setup_page(&state.bank, None, ""))
}

async fn submit_setup(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    let session = SessionId::from_headers(&headers);
    let form = SetupForm::from_pairs(pairs);

    let dealt = match form.to_request() {
        Ok(request) => {
            let mut rng = state.rng.lock().await;
            RoundState::setup(&request, &state.bank, &mut *rng)
        }
        Err(err) => Err(err),
    };

    match dealt {
        Ok(round) => {
            tracing::info!(
                players = round.players().len(),
                impostors = round.impostor_count(),
                category = %round.category(),
                "round started"
            );
            state.sessions.set_round(&session, round).await;
            state.sessions.attach_cookie(&session, Redirect::to("/player"))
        }
        Err(err) => {
            tracing::info!(%err, "setup rejected");
            let page = views::setup_page(&state.bank, Some(&err.to_string()), &form.player_names);
            state.sessions.attach_cookie(&session, page)
        }
    }
}

async fn show_player(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = SessionId::from_headers(&headers);
    let entered = {
        let mut rng = state.rng.lock().await;
        state
            .sessions
            .with_round(&session, |round| {
                let view = round.enter_turn(&mut *rng);
                (round.flow_state(), view)
            })
            .await
    };

    let response = match entered.unwrap_or((FlowState::AwaitingSetup, None)) {
        (FlowState::PlayerTurn(_), Some(view)) => views::player_page(&view).into_response(),
        (FlowState::AwaitingSetup, _) => Redirect::to("/setup").into_response(),
        _ => Redirect::to("/complete").into_response(),
    };
    state.sessions.attach_cookie(&session, response)
}

async fn next_player(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = SessionId::from_headers(&headers);
    if let Some(flow) = state
        .sessions
        .with_round(&session, RoundState::advance)
        .await
    {
        tracing::debug!(?flow, "advanced turn");
    }
    state.sessions.attach_cookie(&session, Redirect::to("/player"))
}

async fn show_complete(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = SessionId::from_headers(&headers);
    let results = {
        let mut rng = state.rng.lock().await;
        state
            .sessions
            .with_round(&session, |round| round.results(&mut *rng))
            .await
    };

    let response = match results {
        Some(view) => views::results_page(&view, state.discussion_seconds).into_response(),
        None => Redirect::to("/setup").into_response(),
    };
    state.sessions.attach_cookie(&session, response)
}

async fn reset(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = SessionId::from_headers(&headers);
    state.sessions.clear(&session).await;
    tracing::info!("round reset");
    state.sessions.attach_cookie(&session, Redirect::to("/setup"))
}
