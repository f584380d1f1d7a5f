use include_dir::{include_dir, Dir};
use serde::{Deserialize, Serialize};
use serde_json::from_str;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{LexicardError, Result};

static CATALOG_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/catalog/data");

/// One flashcard: the prompt face is `word` + `grammatical_role`, the answer
/// face is `definition` + `example`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct VocabularyEntry {
    pub word: String,
    #[serde(rename = "role")]
    pub grammatical_role: String,
    pub definition: String,
    pub example: String,
}

/// A named, ordered list of entries reviewed as one deck.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Deck {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    pub entries: Vec<VocabularyEntry>,
}

impl Deck {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }

    fn validate(&self) -> Result<()> {
        if self.entries.is_empty() {
            return Err(LexicardError::InvalidCatalog(format!(
                "category '{}' has no entries",
                self.name
            )));
        }

        let mut seen = HashSet::new();
        for entry in &self.entries {
            if !seen.insert(entry.word.as_str()) {
                return Err(LexicardError::InvalidCatalog(format!(
                    "category '{}' lists '{}' more than once",
                    self.name, entry.word
                )));
            }
        }

        Ok(())
    }
}

/// Immutable category -> entries mapping. Categories keep catalog order,
/// which is the order tabs are shown in.
#[derive(Clone, Debug)]
pub struct Catalog {
    decks: Vec<Deck>,
}

impl Catalog {
    /// The compiled-in word lists.
    pub fn bundled() -> Result<Self> {
        let mut decks = Vec::new();
        for file in CATALOG_DIR.files() {
            let is_json = file.path().extension().is_some_and(|ext| ext == "json");
            if !is_json {
                continue;
            }

            let contents = file.contents_utf8().ok_or_else(|| {
                LexicardError::InvalidCatalog(format!(
                    "{} is not valid UTF-8",
                    file.path().display()
                ))
            })?;
            decks.push(from_str::<Deck>(contents)?);
        }
        decks.sort_by(|a, b| a.name.cmp(&b.name));

        Self::from_decks(decks)
    }

    /// Load every `*.json` deck in `dir`, ordered by file name.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir.as_ref())? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut decks = Vec::with_capacity(paths.len());
        for path in paths {
            let contents = fs::read_to_string(&path)?;
            decks.push(from_str::<Deck>(&contents)?);
        }

        log::debug!(
            "loaded {} categories from {}",
            decks.len(),
            dir.as_ref().display()
        );
        Self::from_decks(decks)
    }

    pub fn from_decks(decks: Vec<Deck>) -> Result<Self> {
        if decks.is_empty() {
            return Err(LexicardError::InvalidCatalog(
                "no categories registered".to_string(),
            ));
        }

        let mut names = HashSet::new();
        for deck in &decks {
            deck.validate()?;
            if !names.insert(deck.name.as_str()) {
                return Err(LexicardError::InvalidCatalog(format!(
                    "category '{}' registered twice",
                    deck.name
                )));
            }
        }

        Ok(Self { decks })
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.decks.iter().map(|deck| deck.name.as_str())
    }

    pub fn decks(&self) -> &[Deck] {
        &self.decks
    }

    pub fn deck(&self, category: &str) -> Result<&Deck> {
        self.decks
            .iter()
            .find(|deck| deck.name == category)
            .ok_or_else(|| LexicardError::UnknownCategory(category.to_string()))
    }

    pub fn contains(&self, category: &str) -> bool {
        self.decks.iter().any(|deck| deck.name == category)
    }

    pub fn entries_for(&self, category: &str) -> Result<&[VocabularyEntry]> {
        self.deck(category).map(|deck| deck.entries.as_slice())
    }

    pub fn length_of(&self, category: &str) -> Result<usize> {
        self.entries_for(category).map(<[VocabularyEntry]>::len)
    }
}
