use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;
use std::time::Instant;

use crate::error::{LexicardError, Result};
use crate::scheduler::RevealScheduler;
use crate::session::CardView;
use crate::study::Study;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum AppState {
    Review,
    Summary,
}

/// Review front-end state. `displayed` holds what is on screen for each
/// category, which lags the session by the reveal delay after an advance.
pub struct App {
    pub study: Study,
    pub state: AppState,
    pub scheduler: RevealScheduler,
    pub summary_scroll: usize,
    pub should_quit: bool,
    categories: Vec<String>,
    selected: usize,
    displayed: HashMap<String, CardView>,
    reviewed: HashMap<String, DateTime<Local>>,
}

impl App {
    pub fn new(study: Study, scheduler: RevealScheduler, start: Option<&str>) -> Result<Self> {
        let categories: Vec<String> = study
            .manager()
            .catalog()
            .categories()
            .map(str::to_string)
            .collect();

        let selected = match start {
            Some(name) => categories
                .iter()
                .position(|c| c == name)
                .ok_or_else(|| LexicardError::UnknownCategory(name.to_string()))?,
            None => 0,
        };

        let mut displayed = HashMap::with_capacity(categories.len());
        for category in &categories {
            displayed.insert(category.clone(), study.manager().snapshot(category)?);
        }

        Ok(Self {
            study,
            state: AppState::Review,
            scheduler,
            summary_scroll: 0,
            should_quit: false,
            categories,
            selected,
            displayed,
            reviewed: HashMap::new(),
        })
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn current_category(&self) -> &str {
        &self.categories[self.selected]
    }

    /// The card as currently painted for the selected category.
    pub fn view(&self) -> &CardView {
        &self.displayed[self.current_category()]
    }

    /// Last persisted review per category, as read when the summary opened.
    pub fn last_reviewed(&self, category: &str) -> Option<DateTime<Local>> {
        self.reviewed.get(category).copied()
    }

    pub fn open_summary(&mut self) {
        self.reviewed = self
            .categories
            .iter()
            .filter_map(|category| {
                self.study
                    .last_reviewed(category)
                    .map(|when| (category.clone(), when))
            })
            .collect();
        self.summary_scroll = 0;
        self.state = AppState::Summary;
    }

    /// Switch tabs. Entering a view drops its pending reveal and paints the
    /// session's current card right away.
    pub fn select(&mut self, index: usize) -> Result<()> {
        if index >= self.categories.len() {
            return Ok(());
        }
        self.selected = index;
        let category = self.categories[index].clone();
        if self.scheduler.cancel(&category) {
            log::trace!("{category}: pending reveal cancelled on re-entry");
        }
        self.refresh(&category)
    }

    pub fn next_category(&mut self) -> Result<()> {
        self.select((self.selected + 1) % self.categories.len())
    }

    pub fn previous_category(&mut self) -> Result<()> {
        let len = self.categories.len();
        self.select((self.selected + len - 1) % len)
    }

    pub fn flip(&mut self) -> Result<()> {
        let category = self.current_category().to_string();
        self.study.flip(&category)?;
        // flipping mid-delay shows the card the flip applied to
        self.scheduler.cancel(&category);
        self.refresh(&category)
    }

    pub fn advance(&mut self, now: Instant) -> Result<()> {
        let category = self.current_category().to_string();
        self.study.advance(&category)?;
        self.hide_answer(&category);
        self.scheduler.schedule(&category, now);
        Ok(())
    }

    pub fn classify(&mut self, known: bool, now: Instant) -> Result<()> {
        let category = self.current_category().to_string();
        self.study.classify(&category, known)?;

        let fresh = self.study.manager().snapshot(&category)?;
        if let Some(view) = self.displayed.get_mut(&category) {
            view.flipped = false;
            view.progress = fresh.progress;
            view.known_count = fresh.known_count;
            view.unknown_count = fresh.unknown_count;
        }
        self.scheduler.schedule(&category, now);
        Ok(())
    }

    pub fn reset_current(&mut self) -> Result<()> {
        let category = self.current_category().to_string();
        self.study.reset(&category)?;
        self.scheduler.cancel(&category);
        self.refresh(&category)
    }

    /// Paint due reveals. Returns true when anything changed on screen.
    pub fn on_tick(&mut self, now: Instant) -> Result<bool> {
        let due = self.scheduler.take_due(now);
        for category in &due {
            self.refresh(category)?;
        }
        Ok(!due.is_empty())
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) -> Result<()> {
        if key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
        {
            self.should_quit = true;
            return Ok(());
        }

        match key.code {
            KeyCode::Tab => return self.next_category(),
            KeyCode::BackTab => return self.previous_category(),
            KeyCode::Char(c @ '1'..='9') => {
                return self.select(c as usize - '1' as usize);
            }
            _ => {}
        }

        match self.state {
            AppState::Review => match key.code {
                KeyCode::Char(' ') | KeyCode::Enter => self.flip()?,
                KeyCode::Right | KeyCode::Char('n') => self.advance(now)?,
                KeyCode::Char('k') => self.classify(true, now)?,
                KeyCode::Char('u') => self.classify(false, now)?,
                KeyCode::Char('r') => self.reset_current()?,
                KeyCode::Char('s') => self.open_summary(),
                _ => {}
            },
            AppState::Summary => match key.code {
                KeyCode::Char('s') | KeyCode::Char('b') | KeyCode::Backspace => {
                    self.state = AppState::Review;
                }
                KeyCode::Up => {
                    self.summary_scroll = self.summary_scroll.saturating_sub(1);
                }
                KeyCode::Down => {
                    // clamped when rendering
                    self.summary_scroll += 1;
                }
                KeyCode::Home => {
                    self.summary_scroll = 0;
                }
                _ => {}
            },
        }
        Ok(())
    }

    fn hide_answer(&mut self, category: &str) {
        if let Some(view) = self.displayed.get_mut(category) {
            view.flipped = false;
        }
    }

    fn refresh(&mut self, category: &str) -> Result<()> {
        let view = self.study.manager().snapshot(category)?;
        self.displayed.insert(category.to_string(), view);
        Ok(())
    }
}
