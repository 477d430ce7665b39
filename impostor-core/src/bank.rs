use crate::GameError;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Category name to category, iterated in name order.
pub type WordBank = BTreeMap<String, Category>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Word {
    #[serde(rename = "word", alias = "palabra")]
    pub text: String,
    #[serde(default, alias = "pistas")]
    pub hints: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    #[serde(rename = "category", alias = "categoria")]
    pub name: String,
    #[serde(alias = "palabras")]
    pub words: Vec<Word>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectedWord {
    pub category: String,
    pub word: Word,
}

/// Loads every `*.json` category file in `dir`.
///
/// A missing directory is created and yields an empty bank. Files that cannot
/// be read or parsed are logged and skipped; only failing to create or list
/// the directory is reported as an error. Files are read in name order, so
/// when two files declare the same category the later one wins.
pub fn load_categories(dir: impl AsRef<Path>) -> io::Result<WordBank> {
    let dir = dir.as_ref();
    let mut bank = WordBank::new();

    if !dir.exists() {
        fs::create_dir_all(dir)?;
        tracing::info!(dir = %dir.display(), "created empty category directory");
        return Ok(bank);
    }

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    for path in paths {
        match read_category(&path) {
            Ok(category) => {
                let name = category.name.clone();
                if bank.insert(name.clone(), category).is_some() {
                    tracing::warn!(
                        category = %name,
                        file = %path.display(),
                        "duplicate category name, replacing earlier definition"
                    );
                }
            }
            Err(err) => tracing::warn!("{err}"),
        }
    }

    tracing::info!(count = bank.len(), dir = %dir.display(), "loaded word bank");
    Ok(bank)
}

fn read_category(path: &Path) -> Result<Category, GameError> {
    let malformed = |reason: String| GameError::MalformedCategoryFile {
        path: path.to_path_buf(),
        reason,
    };

    let text = fs::read_to_string(path).map_err(|e| malformed(e.to_string()))?;
    let category: Category = serde_json::from_str(&text).map_err(|e| malformed(e.to_string()))?;
    if category.name.trim().is_empty() {
        return Err(malformed("empty category name".to_string()));
    }
    Ok(category)
}

/// Picks one word uniformly from the union of the selected categories.
///
/// Every (category, word) pair is equally likely, so a word listed in two
/// selected categories is twice as likely as one listed once. Unknown names
/// are ignored and repeated names count once.
pub fn select_word<R: Rng + ?Sized>(
    bank: &WordBank,
    selected: &[String],
    rng: &mut R,
) -> Result<SelectedWord, GameError> {
    let mut seen = HashSet::new();
    let pool: Vec<(&str, &Word)> = selected
        .iter()
        .filter(|&name| seen.insert(name.as_str()))
        .filter_map(|name| bank.get(name))
        .flat_map(|category| {
            category
                .words
                .iter()
                .map(move |word| (category.name.as_str(), word))
        })
        .collect();

    let (category, word) = pool.choose(rng).ok_or(GameError::InsufficientData)?;
    Ok(SelectedWord {
        category: category.to_string(),
        word: (*word).clone(),
    })
}
