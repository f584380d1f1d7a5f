// Drives the compiled binary through a PTY: real event loop, real crossterm
// input. Unix-only and ignored by default.
// Run with: `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};
use tempfile::TempDir;

#[test]
#[ignore]
fn minimal_session_reviews_and_exits() -> Result<(), Box<dyn std::error::Error>> {
    // keep config and logs out of the real home directory
    let home = TempDir::new()?;
    let bin = assert_cmd::cargo::cargo_bin("lexicard");
    let cmd = format!(
        "env HOME={} {} --no-persist -c transitions -d 0",
        home.path().display(),
        bin.display()
    );

    let mut p = spawn(cmd)?;
    std::thread::sleep(Duration::from_millis(200));

    p.send(" ")?;
    p.send("k")?;
    std::thread::sleep(Duration::from_millis(200));

    p.send("\x1b")?;
    p.expect(Eof)?;
    Ok(())
}

#[test]
fn list_prints_categories() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    let output = assert_cmd::Command::cargo_bin("lexicard")?
        .env("HOME", home.path())
        .arg("--list")
        .output()?;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    let names: Vec<&str> = stdout
        .lines()
        .filter_map(|l| l.split_whitespace().next())
        .collect();
    assert_eq!(names, ["academic", "science", "social", "transitions"]);
    assert!(stdout.contains("20"));
    Ok(())
}
