use chrono::{DateTime, Local};

use crate::error::Result;
use crate::session::{Progress, SessionManager};
use crate::store::{Classification, ReviewStore};

/// The review sessions of one run, optionally backed by a `ReviewStore`.
///
/// Store failures never interrupt a review: they are logged and the
/// in-memory session carries on.
pub struct Study {
    manager: SessionManager,
    store: Option<Box<dyn ReviewStore>>,
}

impl Study {
    pub fn new(manager: SessionManager, store: Option<Box<dyn ReviewStore>>) -> Self {
        Self { manager, store }
    }

    pub fn in_memory(manager: SessionManager) -> Self {
        Self::new(manager, None)
    }

    pub fn manager(&self) -> &SessionManager {
        &self.manager
    }

    pub fn is_persistent(&self) -> bool {
        self.store.is_some()
    }

    /// Restore saved sessions. Sessions for categories missing from the
    /// catalog are skipped. Returns how many were restored.
    pub fn resume(&mut self) -> Result<usize> {
        let Some(store) = self.store.as_ref() else {
            return Ok(0);
        };

        let mut restored = 0;
        for (category, state) in store.load_sessions()? {
            if !self.manager.catalog().contains(&category) {
                log::warn!("skipping saved session for unknown category '{category}'");
                continue;
            }
            self.manager.restore(&category, state)?;
            restored += 1;
        }
        log::info!("resumed {restored} saved sessions");
        Ok(restored)
    }

    pub fn flip(&mut self, category: &str) -> Result<bool> {
        self.manager.flip(category)
    }

    pub fn advance(&mut self, category: &str) -> Result<()> {
        self.manager.advance(category)?;
        self.save(category);
        Ok(())
    }

    pub fn classify(&mut self, category: &str, known: bool) -> Result<Progress> {
        let word = self.manager.current_card(category)?.word.clone();
        let progress = self.manager.classify(category, known)?;

        if let Some(store) = &self.store {
            let entry = Classification {
                category: category.to_string(),
                word,
                known,
                timestamp: Local::now(),
            };
            if let Err(err) = store.record_classification(&entry) {
                log::warn!("could not log classification of '{}': {err}", entry.word);
            }
        }
        self.save(category);
        Ok(progress)
    }

    pub fn reset(&mut self, category: &str) -> Result<()> {
        self.manager.reset(category)?;
        if let Some(store) = &self.store {
            if let Err(err) = store.clear_session(category) {
                log::warn!("could not clear saved session for {category}: {err}");
            }
        }
        Ok(())
    }

    /// Time of the most recent classification in `category`, across runs.
    pub fn last_reviewed(&self, category: &str) -> Option<DateTime<Local>> {
        let store = self.store.as_ref()?;
        match store.last_reviewed(category) {
            Ok(when) => when,
            Err(err) => {
                log::warn!("could not read review log for {category}: {err}");
                None
            }
        }
    }

    fn save(&self, category: &str) {
        let Some(store) = &self.store else {
            return;
        };
        let saved = self
            .manager
            .session(category)
            .and_then(|state| store.save_session(category, state));
        if let Err(err) = saved {
            log::warn!("could not save session for {category}: {err}");
        }
    }
}
