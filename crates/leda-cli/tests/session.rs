//! Editing session tests against an in-memory store.

use std::time::Duration;

use leda_autosave::{AutoSaveConfig, Notification};
use leda_cli::command::Command;
use leda_cli::session::{Reply, Session};
use leda_cli::settings::Settings;
use leda_persistence::{MemoryStore, SaveTarget};

fn session() -> Session<MemoryStore> {
    Session::new(MemoryStore::new(), AutoSaveConfig::default()).unwrap()
}

async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn test_script_appends_and_saves() {
    let session = session();
    let target = SaveTarget::new("notes.txt");

    let input: &[u8] = b"first line\nsecond line\n:w notes.txt\n:q\nignored\n";
    let mut output = Vec::new();
    session.run(input, &mut output).await.unwrap();

    assert_eq!(
        session.autosave().store().content(&target).as_deref(),
        Some("first line\nsecond line\n")
    );
    assert_eq!(session.autosave().target(), Some(target));
    // Nothing after :q was applied
    assert!(!session.document().text().contains("ignored"));
}

#[tokio::test]
async fn test_save_without_target_asks_for_path() {
    let session = session();
    session.execute(Command::Append("draft".into())).await;

    let reply = session.execute(Command::Save(None)).await;
    assert_eq!(
        reply,
        Reply::Message("No file name. Use :w PATH to choose one.".into())
    );
    assert_eq!(session.autosave().store().write_count(), 0);
}

#[tokio::test]
async fn test_failed_save_reports_error() {
    let session = session();
    session.autosave().store().set_simulate_write_error(true);

    let reply = session
        .execute(Command::SaveAs("out.txt".into()))
        .await;
    let Reply::Message(text) = reply else {
        panic!("expected an error message, got {reply:?}");
    };
    assert!(text.starts_with("error:"));
    assert_eq!(session.autosave().target(), None);
}

#[tokio::test]
async fn test_open_replaces_document() {
    let session = session();
    let target = SaveTarget::new("story.txt");
    session
        .autosave()
        .store()
        .insert(target.clone(), "once upon a time\n");
    session.execute(Command::Append("scratch".into())).await;

    let reply = session.execute(Command::Open("story.txt".into())).await;
    assert_eq!(reply, Reply::Message("Read 17 bytes from story.txt".into()));
    assert_eq!(session.document().text(), "once upon a time\n");
    assert_eq!(session.autosave().target(), Some(target));
}

#[tokio::test]
async fn test_open_missing_file_reports_error() {
    let session = session();
    let reply = session.execute(Command::Open("absent.txt".into())).await;
    let Reply::Message(text) = reply else {
        panic!("expected an error message, got {reply:?}");
    };
    assert!(text.contains("could not be found"));
    assert_eq!(session.autosave().target(), None);
}

#[tokio::test]
async fn test_open_initial_missing_file_becomes_target() {
    let session = session();
    session.open_initial("fresh.txt".into()).await.unwrap();

    assert_eq!(
        session.autosave().target(),
        Some(SaveTarget::new("fresh.txt"))
    );
    assert!(session.document().is_empty());
}

#[tokio::test]
async fn test_interval_command_validates() {
    let session = session();

    let reply = session.execute(Command::Interval(30)).await;
    assert_eq!(reply, Reply::Message("Auto-save interval set to 30s".into()));
    assert_eq!(session.autosave().current_interval(), 30);

    let Reply::Message(text) = session.execute(Command::Interval(400)).await else {
        panic!("expected a message");
    };
    assert_eq!(text, "Please enter a number between 5 and 300");
    assert_eq!(session.autosave().current_interval(), 30);
}

#[tokio::test]
async fn test_autosave_switch() {
    let session = session();

    assert_eq!(session.execute(Command::AutoSave(Some(true))).await, Reply::Silent);
    assert!(session.autosave().is_armed());
    assert_eq!(
        session.execute(Command::AutoSave(Some(true))).await,
        Reply::Message("Auto-save is already on".into())
    );

    assert_eq!(session.execute(Command::AutoSave(None)).await, Reply::Silent);
    assert!(!session.autosave().is_armed());
    settle().await;
    assert_eq!(session.autosave().pending_timers(), 0);
}

#[tokio::test]
async fn test_enabled_config_arms_at_start() {
    let session = Session::new(MemoryStore::new(), AutoSaveConfig::every(30).unwrap()).unwrap();
    assert!(session.autosave().is_armed());
    assert_eq!(session.autosave().current_interval(), 30);

    let bad = AutoSaveConfig {
        enabled: true,
        interval_seconds: 1,
    };
    assert!(Session::new(MemoryStore::new(), bad).is_err());
}

#[tokio::test]
async fn test_settings_with_bad_interval_still_start_a_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    std::fs::write(&path, "[autosave]\nenabled = true\ninterval_seconds = 1\n").unwrap();

    let settings = Settings::load_from(&path);
    let session = Session::new(MemoryStore::new(), settings.autosave).unwrap();
    assert!(!session.autosave().is_armed());
    assert_eq!(session.autosave().current_interval(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_autosave_writes_typed_lines() {
    let session = session();
    let mut rx = session.autosave().subscribe();
    session.open_initial("journal.txt".into()).await.unwrap();
    session.execute(Command::AutoSave(Some(true))).await;
    session.execute(Command::Append("dear diary".into())).await;
    settle().await;

    tokio::time::advance(Duration::from_secs(5)).await;
    settle().await;

    let store = session.autosave().store();
    assert_eq!(
        store.content(&SaveTarget::new("journal.txt")).as_deref(),
        Some("dear diary\n")
    );
    let saw_autosave = std::iter::from_fn(|| rx.try_recv().ok())
        .any(|n| matches!(n, Notification::Saved { .. }));
    assert!(saw_autosave);

    session.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_clear_stops_autosave_and_empties_document() {
    let session = session();
    session.open_initial("a.txt".into()).await.unwrap();
    session.execute(Command::Append("keep me".into())).await;
    session.execute(Command::AutoSave(Some(true))).await;

    let reply = session.execute(Command::Clear).await;
    assert_eq!(reply, Reply::Message("New document".into()));
    assert!(session.document().is_empty());
    assert_eq!(session.autosave().target(), None);
    assert!(!session.autosave().is_armed());

    tokio::time::advance(Duration::from_secs(30)).await;
    settle().await;
    assert_eq!(session.autosave().store().write_count(), 0);
}

#[tokio::test]
async fn test_status_line() {
    let session = session();
    session.execute(Command::Append("abc".into())).await;

    let Reply::Message(status) = session.execute(Command::Status).await else {
        panic!("expected a status line");
    };
    assert_eq!(status, "[No file] | 4 bytes | auto-save off (5s) | not saved");

    session.execute(Command::SaveAs("s.txt".into())).await;
    let Reply::Message(status) = session.execute(Command::Status).await else {
        panic!("expected a status line");
    };
    assert!(status.starts_with("s.txt | 4 bytes | auto-save off (5s) | saved "));
}

#[tokio::test]
async fn test_bad_command_is_reported_not_fatal() {
    let session = session();
    let input: &[u8] = b":frobnicate\ntext\n";
    let mut output = Vec::new();
    session.run(input, &mut output).await.unwrap();

    let output = String::from_utf8(output).unwrap();
    assert_eq!(output, "error: unknown command ':frobnicate'\n");
    assert_eq!(session.document().text(), "text\n");
}
