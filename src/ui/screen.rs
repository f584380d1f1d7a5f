use ratatui::Frame;

use crate::{
    app::{App, AppState},
    ui::summary::render_summary,
};

/// A UI Screen boundary: responsible for rendering one app state
pub trait Screen {
    fn render(&self, app: &mut App, f: &mut Frame);
}

/// Card review screen - renders through the `App` widget
pub struct ReviewScreen;

impl Screen for ReviewScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        f.render_widget(&*app, f.area());
    }
}

pub struct SummaryScreen;

impl Screen for SummaryScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        render_summary(app, f);
    }
}

pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::Review => Box::new(ReviewScreen),
        AppState::Summary => Box::new(SummaryScreen),
    }
}

/// Draw whichever screen matches the app state
pub fn draw(app: &mut App, f: &mut Frame) {
    current_screen(&app.state).render(app, f);
}
