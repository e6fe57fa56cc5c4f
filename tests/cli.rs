use assert_cmd::Command;
use predicates::prelude::*;

fn tubenarrator() -> Command {
    Command::cargo_bin("tubenarrator").expect("binary builds")
}

#[test]
fn resolve_prints_video_id() {
    tubenarrator()
        .args(["resolve", "https://www.youtube.com/watch?v=jNQXAC9IVRw"])
        .assert()
        .success()
        .stdout(predicate::eq("jNQXAC9IVRw\n"));
}

#[test]
fn resolve_accepts_short_links() {
    tubenarrator()
        .args(["resolve", "https://youtu.be/dQw4w9WgXcQ?si=abc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dQw4w9WgXcQ"));
}

#[test]
fn resolve_rejects_urls_without_id() {
    tubenarrator()
        .args(["resolve", "https://example.com/"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid YouTube URL"));
}

#[test]
fn help_lists_commands() {
    tubenarrator()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("process")
                .and(predicate::str::contains("metadata"))
                .and(predicate::str::contains("thumbnail"))
                .and(predicate::str::contains("narrate")),
        );
}

#[test]
fn thumbnail_requires_overlay_text() {
    tubenarrator()
        .args(["thumbnail", "script.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--text"));
}
