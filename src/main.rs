use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use lexicard::{
    app::App,
    app_dirs::AppDirs,
    catalog::Catalog,
    config::{Config, ConfigStore, FileConfigStore},
    runtime::{CrosstermEventSource, DeckEvent, EventSource, FixedTicker, Runner, Ticker},
    scheduler::RevealScheduler,
    session::SessionManager,
    store::{export_csv, ReviewStore, SqliteReviewStore},
    study::Study,
    ui::screen::draw,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::{self, File, OpenOptions},
    io::{self, stdin},
    path::PathBuf,
    time::Instant,
};

/// vocabulary flashcards in the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Review vocabulary flashcards by category. Flip a card to see its definition, mark it known or unknown, and pick up where you left off next time."
)]
pub struct Cli {
    /// category to open first
    #[clap(short = 'c', long)]
    category: Option<String>,

    /// milliseconds to keep the old card on screen after moving on
    #[clap(short = 'd', long)]
    reveal_delay_ms: Option<u64>,

    /// directory of JSON decks to use instead of the bundled word lists
    #[clap(long, value_name = "DIR")]
    catalog: Option<PathBuf>,

    /// list categories and exit
    #[clap(long)]
    list: bool,

    /// start every category from its first card, ignoring saved sessions
    #[clap(long)]
    fresh: bool,

    /// keep this run in memory only
    #[clap(long)]
    no_persist: bool,

    /// write the review log as CSV to FILE and exit
    #[clap(long, value_name = "FILE")]
    export: Option<PathBuf>,
}

impl Cli {
    /// Saved config overridden by whatever was passed on the command line
    fn merge(&self, saved: &Config) -> Config {
        Config {
            default_category: self
                .category
                .clone()
                .or_else(|| saved.default_category.clone()),
            reveal_delay_ms: self.reveal_delay_ms.unwrap_or(saved.reveal_delay_ms),
            ..saved.clone()
        }
    }

    fn wants_store(&self, config: &Config) -> bool {
        config.persist && !self.no_persist
    }

    /// Existing review database to export from, if this run uses one.
    fn review_log(&self, config: &Config, db: Option<PathBuf>) -> Option<PathBuf> {
        db.filter(|path| self.wants_store(config) && path.is_file())
    }
}

fn init_logging() {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("lexicard=info"),
    );

    // the terminal belongs to the UI, so log lines go to a file
    let log_file = AppDirs::log_path().and_then(|path| {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).ok()?;
        }
        OpenOptions::new().create(true).append(true).open(path).ok()
    });
    match log_file {
        Some(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        None => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }

    let _ = builder.try_init();
}

fn open_store(cli: &Cli, config: &Config) -> Option<Box<dyn ReviewStore>> {
    if !cli.wants_store(config) {
        return None;
    }
    match SqliteReviewStore::open_default() {
        Ok(store) => Some(Box::new(store)),
        Err(err) => {
            log::warn!("review store unavailable, running in memory: {err}");
            None
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging();

    let config_store = FileConfigStore::new();
    let config = cli.merge(&config_store.load());

    let catalog = match &cli.catalog {
        Some(dir) => Catalog::from_dir(dir)?,
        None => Catalog::bundled()?,
    };

    if cli.list {
        for deck in catalog.decks() {
            println!("{:<14}{:>4}  {}", deck.name, deck.entries.len(), deck.title());
        }
        return Ok(());
    }

    if let Some(path) = &cli.export {
        let Some(db) = cli.review_log(&config, AppDirs::db_path()) else {
            println!("no review log to export");
            return Ok(());
        };
        let store = SqliteReviewStore::open(db)?;
        let rows = export_csv(&store, File::create(path)?)?;
        println!("exported {rows} classifications to {}", path.display());
        return Ok(());
    }

    if let Some(category) = &cli.category {
        if !catalog.contains(category) {
            let mut cmd = Cli::command();
            cmd.error(
                ErrorKind::InvalidValue,
                format!("unknown category '{category}' (see --list)"),
            )
            .exit();
        }
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let start = config.default_category.clone().filter(|name| {
        let known = catalog.contains(name);
        if !known {
            log::warn!("configured category '{name}' is not in the catalog");
        }
        known
    });

    let mut study = Study::new(SessionManager::new(catalog), open_store(&cli, &config));
    if !cli.fresh {
        if let Err(err) = study.resume() {
            log::warn!("could not resume saved sessions: {err}");
        }
    }

    if let Err(err) = config_store.save(&config) {
        log::warn!(
            "could not save config to {}: {err}",
            config_store.path().display()
        );
    }

    let mut app = App::new(
        study,
        RevealScheduler::new(config.reveal_delay()),
        start.as_deref(),
    )?;

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(config.tick_rate()),
    );
    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend, E: EventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| draw(app, f))?;

    while !app.should_quit {
        let repaint = match runner.step() {
            DeckEvent::Tick => app.on_tick(Instant::now())?,
            DeckEvent::Resize => true,
            DeckEvent::Key(key) => {
                app.on_key(key, Instant::now())?;
                true
            }
            DeckEvent::Closed => {
                log::error!("terminal input closed, leaving review");
                return Err("terminal input closed".into());
            }
        };

        if repaint && !app.should_quit {
            terminal.draw(|f| draw(app, f))?;
        }
    }

    Ok(())
}
