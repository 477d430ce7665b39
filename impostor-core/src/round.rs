use crate::bank::{select_word, SelectedWord, Word, WordBank};
use crate::color::{generate_color, Color};
use crate::roles::{assign_impostors, clamp_impostor_count};
use crate::GameError;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

pub const MIN_PLAYERS: usize = 3;
pub const MAX_PLAYERS: usize = 20;

/// Splits comma-separated names, trimming whitespace and dropping empties.
pub fn parse_player_names(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupRequest {
    pub player_names: String,
    pub impostor_count: i64,
    pub categories: Vec<String>,
    pub hints_enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "index")]
pub enum FlowState {
    AwaitingSetup,
    PlayerTurn(usize),
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "role")]
pub enum TurnRole {
    Civilian { word: String, category: String },
    Impostor { hint: Option<String> },
}

/// What a single player sees on their private reveal screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnView {
    pub name: String,
    pub turn_number: usize,
    pub total_players: usize,
    pub color: Color,
    #[serde(flatten)]
    pub role: TurnRole,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsView {
    pub total_players: usize,
    pub impostor_count: usize,
    pub impostor_names: Vec<String>,
    pub word: String,
    pub category: String,
    pub starting_speaker: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    players: Vec<String>,
    current_turn: usize,
    impostor_count: usize,
    impostors: BTreeSet<usize>,
    category: String,
    word: Word,
    hints_enabled: bool,
    player_colors: HashMap<String, Color>,
}

impl RoundState {
    /// Validates a setup request and deals a fresh round.
    ///
    /// Checks run in order and the first failure is returned: player count,
    /// then category selection, then word availability.
    pub fn setup<R: Rng + ?Sized>(
        request: &SetupRequest,
        bank: &WordBank,
        rng: &mut R,
    ) -> Result<Self, GameError> {
        let players = parse_player_names(&request.player_names);
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players.len()) {
            return Err(GameError::InvalidPlayerCount {
                count: players.len(),
            });
        }

        if request.categories.is_empty() {
            return Err(GameError::NoCategories);
        }

        let impostor_count = clamp_impostor_count(request.impostor_count, players.len());
        let SelectedWord { category, word } = select_word(bank, &request.categories, rng)?;
        let impostors = assign_impostors(players.len(), impostor_count as i64, rng);

        tracing::debug!(
            players = players.len(),
            impostors = impostor_count,
            category = %category,
            "dealt new round"
        );

        Ok(Self {
            players,
            current_turn: 0,
            impostor_count,
            impostors,
            category,
            word,
            hints_enabled: request.hints_enabled,
            player_colors: HashMap::new(),
        })
    }

    pub fn players(&self) -> &[String] {
        &self.players
    }

    pub fn current_turn(&self) -> usize {
        self.current_turn
    }

    pub fn impostor_count(&self) -> usize {
        self.impostor_count
    }

    pub fn impostors(&self) -> &BTreeSet<usize> {
        &self.impostors
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn word(&self) -> &Word {
        &self.word
    }

    pub fn hints_enabled(&self) -> bool {
        self.hints_enabled
    }

    pub fn player_color(&self, name: &str) -> Option<Color> {
        self.player_colors.get(name).copied()
    }

    pub fn flow_state(&self) -> FlowState {
        if self.current_turn >= self.players.len() {
            FlowState::Complete
        } else {
            FlowState::PlayerTurn(self.current_turn)
        }
    }

    /// Enters the current player's turn and builds their private view.
    ///
    /// Assigns the player's color on first entry. Impostors with hints enabled
    /// get a hint drawn anew on every entry. Returns `None` once complete.
    pub fn enter_turn<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<TurnView> {
        let FlowState::PlayerTurn(index) = self.flow_state() else {
            return None;
        };

        let name = self.players[index].clone();
        let color = *self
            .player_colors
            .entry(name.clone())
            .or_insert_with(|| generate_color(rng));

        let role = if self.impostors.contains(&index) {
            let hint = if self.hints_enabled {
                self.word.hints.choose(rng).cloned()
            } else {
                None
            };
            TurnRole::Impostor { hint }
        } else {
            TurnRole::Civilian {
                word: self.word.text.clone(),
                category: self.category.clone(),
            }
        };

        Some(TurnView {
            name,
            turn_number: index + 1,
            total_players: self.players.len(),
            color,
            role,
        })
    }

    /// Moves to the next player. A no-op once the round is complete.
    pub fn advance(&mut self) -> FlowState {
        if self.current_turn < self.players.len() {
            self.current_turn += 1;
        }
        self.flow_state()
    }

    /// Builds the end-of-round disclosure with a freshly drawn first speaker.
    pub fn results<R: Rng + ?Sized>(&self, rng: &mut R) -> ResultsView {
        let impostor_names = self
            .impostors
            .iter()
            .filter_map(|&position| self.players.get(position).cloned())
            .collect();

        ResultsView {
            total_players: self.players.len(),
            impostor_count: self.impostor_count,
            impostor_names,
            word: self.word.text.clone(),
            category: self.category.clone(),
            starting_speaker: self.players.choose(rng).cloned(),
        }
    }
}
