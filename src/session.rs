use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::catalog::{Catalog, VocabularyEntry};
use crate::error::Result;

static INITIAL_STATE: SessionState = SessionState::new();

/// Review state for a single category.
///
/// `known` and `unknown` are append-only and deduplicated; they keep the order
/// words were judged in. A word can sit in both when the user changed their
/// mind on a later cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub cursor: usize,
    pub flipped: bool,
    pub known: Vec<String>,
    pub unknown: Vec<String>,
}

impl SessionState {
    pub const fn new() -> Self {
        Self {
            cursor: 0,
            flipped: false,
            known: Vec::new(),
            unknown: Vec::new(),
        }
    }

    pub fn is_known(&self, word: &str) -> bool {
        self.known.iter().any(|w| w == word)
    }

    pub fn is_unknown(&self, word: &str) -> bool {
        self.unknown.iter().any(|w| w == word)
    }

    fn flip(&mut self) -> bool {
        self.flipped = !self.flipped;
        self.flipped
    }

    fn advance(&mut self, len: usize) {
        self.cursor = (self.cursor + 1) % len;
        self.flipped = false;
    }

    /// Returns false when the word was already in the target set.
    fn record(&mut self, word: &str, known: bool) -> bool {
        let (set, present) = if known {
            let present = self.is_known(word);
            (&mut self.known, present)
        } else {
            let present = self.is_unknown(word);
            (&mut self.unknown, present)
        };

        if present {
            return false;
        }
        set.push(word.to_string());
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// 1-based
    pub position: usize,
    pub total: usize,
    pub percent: f64,
}

impl Progress {
    fn at(cursor: usize, total: usize) -> Self {
        let position = cursor + 1;
        Self {
            position,
            total,
            percent: position as f64 / total as f64 * 100.0,
        }
    }

    /// "3 / 20"
    pub fn label(&self) -> String {
        format!("{} / {}", self.position, self.total)
    }

    pub fn ratio(&self) -> f64 {
        (self.percent / 100.0).clamp(0.0, 1.0)
    }
}

/// Everything a renderer needs after a transition.
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub category: String,
    pub entry: VocabularyEntry,
    pub flipped: bool,
    pub progress: Progress,
    pub known_count: usize,
    pub unknown_count: usize,
}

/// Owns the catalog and one `SessionState` per category. Sessions are created
/// on the first transition in a category; reads before that see the initial
/// state.
#[derive(Debug)]
pub struct SessionManager {
    catalog: Catalog,
    sessions: HashMap<String, SessionState>,
}

impl SessionManager {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            sessions: HashMap::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Read-only view of a category's session.
    pub fn session(&self, category: &str) -> Result<&SessionState> {
        self.catalog.deck(category)?;
        Ok(self.sessions.get(category).unwrap_or(&INITIAL_STATE))
    }

    /// Categories that have seen at least one transition, in catalog order.
    pub fn active_sessions(&self) -> impl Iterator<Item = (&str, &SessionState)> {
        self.catalog
            .categories()
            .filter_map(|name| self.sessions.get(name).map(|state| (name, state)))
    }

    fn state_mut(&mut self, category: &str) -> Result<(&[VocabularyEntry], &mut SessionState)> {
        let entries = self.catalog.entries_for(category)?;
        let state = self.sessions.entry(category.to_string()).or_default();
        Ok((entries, state))
    }

    pub fn current_card(&self, category: &str) -> Result<&VocabularyEntry> {
        let entries = self.catalog.entries_for(category)?;
        let state = self.session(category)?;
        Ok(&entries[state.cursor])
    }

    pub fn is_flipped(&self, category: &str) -> Result<bool> {
        self.session(category).map(|state| state.flipped)
    }

    pub fn known(&self, category: &str) -> Result<&[String]> {
        self.session(category).map(|state| state.known.as_slice())
    }

    pub fn unknown(&self, category: &str) -> Result<&[String]> {
        self.session(category).map(|state| state.unknown.as_slice())
    }

    pub fn flip(&mut self, category: &str) -> Result<bool> {
        let (_, state) = self.state_mut(category)?;
        let flipped = state.flip();
        log::trace!("{category}: flipped={flipped}");
        Ok(flipped)
    }

    pub fn advance(&mut self, category: &str) -> Result<()> {
        let (entries, state) = self.state_mut(category)?;
        state.advance(entries.len());
        log::debug!(
            "{category}: advanced to {} ({})",
            state.cursor,
            entries[state.cursor].word
        );
        Ok(())
    }

    /// Records the current word as known or unknown, then advances.
    pub fn classify(&mut self, category: &str, known: bool) -> Result<Progress> {
        let (entries, state) = self.state_mut(category)?;
        let word = &entries[state.cursor].word;
        if state.record(word, known) {
            log::debug!("{category}: marked '{word}' known={known}");
        }
        state.advance(entries.len());
        Ok(Progress::at(state.cursor, entries.len()))
    }

    pub fn progress(&self, category: &str) -> Result<Progress> {
        let total = self.catalog.length_of(category)?;
        let state = self.session(category)?;
        Ok(Progress::at(state.cursor, total))
    }

    pub fn snapshot(&self, category: &str) -> Result<CardView> {
        let state = self.session(category)?;
        Ok(CardView {
            category: category.to_string(),
            entry: self.current_card(category)?.clone(),
            flipped: state.flipped,
            progress: self.progress(category)?,
            known_count: state.known.len(),
            unknown_count: state.unknown.len(),
        })
    }

    /// Back to cursor 0, front face, nothing classified.
    pub fn reset(&mut self, category: &str) -> Result<()> {
        let (_, state) = self.state_mut(category)?;
        *state = SessionState::new();
        log::info!("{category}: session reset");
        Ok(())
    }

    /// Seed a category from a saved state. The card always starts on its front and
    /// a cursor past the end of a shrunken category wraps around.
    pub fn restore(&mut self, category: &str, saved: SessionState) -> Result<()> {
        let (entries, state) = self.state_mut(category)?;
        *state = SessionState {
            cursor: saved.cursor % entries.len(),
            flipped: false,
            known: saved.known,
            unknown: saved.unknown,
        };
        Ok(())
    }
}
