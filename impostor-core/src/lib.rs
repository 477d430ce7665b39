pub mod bank;
pub mod color;
pub mod roles;
pub mod round;

use std::path::PathBuf;
use thiserror::Error;

pub use bank::{load_categories, select_word, Category, SelectedWord, Word, WordBank};
pub use color::{generate_color, Color};
pub use roles::{assign_impostors, clamp_impostor_count};
pub use round::{
    parse_player_names, FlowState, ResultsView, RoundState, SetupRequest, TurnRole, TurnView,
    MAX_PLAYERS, MIN_PLAYERS,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("enter between {} and {} player names (got {count})", MIN_PLAYERS, MAX_PLAYERS)]
    InvalidPlayerCount { count: usize },
    #[error("select at least one category")]
    NoCategories,
    #[error("no words available in the selected categories")]
    InsufficientData,
    #[error("skipping category file {}: {reason}", .path.display())]
    MalformedCategoryFile { path: PathBuf, reason: String },
    #[error("error configuring the game: {0}")]
    Configuration(String),
}
