use std::time::{Duration, Instant};

use lexicard::app::App;
use lexicard::catalog::Catalog;
use lexicard::scheduler::RevealScheduler;
use lexicard::session::SessionManager;
use lexicard::store::{export_csv, ReviewStore, SqliteReviewStore};
use lexicard::study::Study;
use tempfile::TempDir;

fn open_study(dir: &TempDir) -> Study {
    let store = SqliteReviewStore::open(dir.path().join("state").join("reviews.db")).unwrap();
    Study::new(
        SessionManager::new(Catalog::bundled().unwrap()),
        Some(Box::new(store)),
    )
}

#[test]
fn sessions_resume_across_runs() {
    let dir = TempDir::new().unwrap();

    {
        let mut study = open_study(&dir);
        assert_eq!(study.resume().unwrap(), 0);
        study.flip("science").unwrap();
        study.classify("science", true).unwrap();
        study.classify("science", false).unwrap();
        study.advance("science").unwrap();
        study.advance("academic").unwrap();
        study.flip("science").unwrap();
    }

    let mut study = open_study(&dir);
    assert_eq!(study.resume().unwrap(), 2);

    let manager = study.manager();
    assert_eq!(manager.current_card("science").unwrap().word, "organism");
    assert_eq!(manager.known("science").unwrap(), ["hypothesis"]);
    assert_eq!(manager.unknown("science").unwrap(), ["experiment"]);
    // flipped is never carried over
    assert!(!manager.is_flipped("science").unwrap());
    assert_eq!(manager.current_card("academic").unwrap().word, "approach");
    assert_eq!(manager.active_sessions().count(), 2);
    assert!(study.last_reviewed("science").is_some());
    assert!(study.last_reviewed("academic").is_none());
}

#[test]
fn reset_clears_the_saved_session() {
    let dir = TempDir::new().unwrap();

    {
        let mut study = open_study(&dir);
        study.classify("social", true).unwrap();
        study.reset("social").unwrap();
    }

    let mut study = open_study(&dir);
    assert_eq!(study.resume().unwrap(), 0);
    assert!(study.manager().known("social").unwrap().is_empty());
    // the review log is kept
    assert!(study.last_reviewed("social").is_some());
}

#[test]
fn app_resumes_on_saved_card() {
    let dir = TempDir::new().unwrap();

    {
        let study = open_study(&dir);
        let mut app = App::new(study, RevealScheduler::new(Duration::ZERO), Some("transitions"))
            .unwrap();
        let t0 = Instant::now();
        app.classify(true, t0).unwrap();
        app.classify(true, t0).unwrap();
    }

    let mut study = open_study(&dir);
    study.resume().unwrap();
    let app = App::new(study, RevealScheduler::default(), Some("transitions")).unwrap();

    assert_eq!(app.view().entry.word, "nevertheless");
    assert_eq!(app.view().known_count, 2);
    assert_eq!(app.view().progress.label(), "3 / 20");
}

#[test]
fn review_log_exports_as_csv() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("reviews.db");

    {
        let store = SqliteReviewStore::open(&path).unwrap();
        let mut study = Study::new(
            SessionManager::new(Catalog::bundled().unwrap()),
            Some(Box::new(store)),
        );
        study.classify("academic", true).unwrap();
        study.classify("academic", false).unwrap();
        study.classify("science", true).unwrap();
    }

    let store = SqliteReviewStore::open(&path).unwrap();
    assert_eq!(store.classifications().unwrap().len(), 3);

    let mut out = Vec::new();
    let rows = export_csv(&store, &mut out).unwrap();
    assert_eq!(rows, 3);

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "category,word,known,timestamp");
    assert!(lines[1].starts_with("academic,analyze,true,"));
    assert!(lines[2].starts_with("academic,approach,false,"));
    assert!(lines[3].starts_with("science,hypothesis,true,"));
}
