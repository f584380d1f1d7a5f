use std::sync::mpsc::{self, Sender};
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use lexicard::app::App;
use lexicard::catalog::Catalog;
use lexicard::runtime::{DeckEvent, FixedTicker, Runner, TestEventSource};
use lexicard::scheduler::RevealScheduler;
use lexicard::session::SessionManager;
use lexicard::study::Study;

fn send(tx: &Sender<DeckEvent>, code: KeyCode) {
    tx.send(DeckEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)))
        .unwrap();
}

fn app(delay: Duration, start: &str) -> App {
    let study = Study::in_memory(SessionManager::new(Catalog::bundled().unwrap()));
    App::new(study, RevealScheduler::new(delay), Some(start)).unwrap()
}

// Drive the app from queued events until it quits or the bound is hit,
// using a fixed clock that moves forward one tick per step.
fn drive(app: &mut App, runner: &Runner<TestEventSource, FixedTicker>, start: Instant) {
    let mut now = start;
    for _ in 0..200u32 {
        match runner.step() {
            DeckEvent::Tick => {
                app.on_tick(now).unwrap();
            }
            DeckEvent::Resize => {}
            DeckEvent::Key(key) => app.on_key(key, now).unwrap(),
            DeckEvent::Closed => break,
        }
        if app.should_quit {
            break;
        }
        now += Duration::from_millis(10);
    }
}

#[test]
fn headless_transitions_walkthrough() {
    let mut app = app(Duration::ZERO, "transitions");
    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );

    // flip, mark known, then unknown, then quit
    send(&tx, KeyCode::Char(' '));
    send(&tx, KeyCode::Char('k'));
    send(&tx, KeyCode::Char('u'));
    send(&tx, KeyCode::Esc);

    drive(&mut app, &runner, Instant::now());

    assert!(app.should_quit);
    let manager = app.study.manager();
    assert_eq!(manager.known("transitions").unwrap(), ["consequently"]);
    assert_eq!(manager.unknown("transitions").unwrap(), ["furthermore"]);
    assert_eq!(manager.current_card("transitions").unwrap().word, "nevertheless");
    assert!(!manager.is_flipped("transitions").unwrap());

    let progress = manager.progress("transitions").unwrap();
    assert_eq!(progress.label(), "3 / 20");
    assert_eq!(progress.percent, 15.0);
}

#[test]
fn headless_reveal_waits_for_delay() {
    let mut app = app(Duration::from_millis(300), "science");
    let t0 = Instant::now();

    app.flip().unwrap();
    assert!(app.view().flipped);

    app.advance(t0).unwrap();
    // answer hidden at once, old word still painted
    assert!(!app.view().flipped);
    assert_eq!(app.view().entry.word, "hypothesis");

    assert!(!app.on_tick(t0 + Duration::from_millis(299)).unwrap());
    assert_eq!(app.view().entry.word, "hypothesis");

    assert!(app.on_tick(t0 + Duration::from_millis(300)).unwrap());
    assert_eq!(app.view().entry.word, "experiment");
}

#[test]
fn headless_categories_are_independent() {
    let mut app = app(Duration::ZERO, "academic");
    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );

    send(&tx, KeyCode::Char('n'));
    send(&tx, KeyCode::Char('n'));
    send(&tx, KeyCode::Tab);
    send(&tx, KeyCode::Char('k'));
    send(&tx, KeyCode::Char('4'));
    send(&tx, KeyCode::Char('u'));
    send(&tx, KeyCode::Esc);

    drive(&mut app, &runner, Instant::now());

    let manager = app.study.manager();
    assert_eq!(manager.progress("academic").unwrap().position, 3);
    assert!(manager.known("academic").unwrap().is_empty());
    assert_eq!(manager.known("science").unwrap(), ["hypothesis"]);
    assert_eq!(manager.unknown("transitions").unwrap(), ["consequently"]);
    assert_eq!(manager.progress("social").unwrap().position, 1);
    assert_eq!(app.current_category(), "transitions");
}

#[test]
fn headless_summary_round_trip() {
    let mut app = app(Duration::ZERO, "social");
    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );

    send(&tx, KeyCode::Char('s'));
    // review keys are ignored on the summary screen
    send(&tx, KeyCode::Char('k'));
    send(&tx, KeyCode::Char('b'));
    send(&tx, KeyCode::Char('k'));
    send(&tx, KeyCode::Esc);

    drive(&mut app, &runner, Instant::now());

    assert_eq!(app.state, lexicard::app::AppState::Review);
    assert_eq!(app.study.manager().known("social").unwrap(), ["demographic"]);
}
