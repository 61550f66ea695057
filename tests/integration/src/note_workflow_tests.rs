//! Note workflow integration tests
//!
//! Each test drives the full slice: a manifest on disk is loaded, resolved
//! with a scripted prompter, and the staged note is moved by `FsNoteFiles`.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use elicit_core::{
    AcceptDefaults, ConfigurationManifest, Error, FsNoteFiles, NoteCreator, Resolver, Value,
};
use elicit_test_utils::{Answer, NoticeEvent, RecordingNotice, ScriptedPrompter, TestWorkspace};
use pretty_assertions::assert_eq;

const JOURNAL_MANIFEST: &str = r#"
[[element]]
key = "path"
prompt = false
value = "Journal/{{ kind }}"

[[element]]
key = "kind"
prompt = true
display = "Entry kind?"
value = ["daily", "meeting", "idea"]
text = ["Daily log", "Meeting notes", "Idea"]
limit = 3

[[element]]
key = "title"
prompt = true
display = "Title?"
value = ""
process = ["collapse_whitespace", "title_case"]
check = { non_empty = true, forbidden_chars = "/\\:" }

[[element]]
key = "filename"
prompt = false
value = "{{ kind }}-{{ title }}"
process = ["slugify"]
"#;

fn stage(ws: &TestWorkspace) -> PathBuf {
    ws.write(".staged.md", "# draft\n")
}

fn creator(ws: &TestWorkspace, resolver: Resolver) -> NoteCreator<FsNoteFiles> {
    NoteCreator::new(FsNoteFiles::new(ws.root(), stage(ws)), resolver)
}

#[tokio::test]
async fn test_journal_entry_is_filed() {
    let ws = TestWorkspace::new();
    let manifest = ws.write_manifest(JOURNAL_MANIFEST);
    let prompter = Arc::new(ScriptedPrompter::new([
        Answer::Pick(1),
        Answer::Reply("  quarterly   planning ".into()),
        Answer::Default,
    ]));
    let notice = Arc::new(RecordingNotice::new());
    let resolver = Resolver::new(prompter.clone()).with_notice(notice.clone());
    let mut config = ConfigurationManifest::load(&manifest)
        .unwrap()
        .into_configuration()
        .unwrap();

    let note = creator(&ws, resolver).create(&mut config).await.unwrap();

    assert_eq!(
        note,
        ws.root().join("Journal/meeting/meeting-quarterly-planning.md")
    );
    assert_eq!(fs::read_to_string(&note).unwrap(), "# draft\n");
    ws.assert_file_missing(".staged.md");
    assert_eq!(config.value("title"), Some(&Value::from("Quarterly Planning")));
    assert_eq!(prompter.remaining(), 0);

    let opened: Vec<String> = notice
        .events()
        .into_iter()
        .filter_map(|e| match e {
            NoticeEvent::Open { title, .. } => Some(title),
            NoticeEvent::Close => None,
        })
        .collect();
    assert_eq!(
        opened,
        vec![
            "Processing 'title' value.".to_string(),
            "Processing 'filename' value.".to_string(),
        ]
    );
    assert!(notice.is_balanced());
}

#[tokio::test]
async fn test_second_entry_with_same_name_conflicts() {
    let ws = TestWorkspace::new();
    let manifest = ws.write_manifest(JOURNAL_MANIFEST);
    ws.write("Journal/daily/daily-standup.md", "existing");

    let mut manifest = ConfigurationManifest::load(&manifest).unwrap();
    manifest.set_value("title", "standup");
    let mut config = manifest.into_configuration().unwrap();

    let err = creator(&ws, Resolver::new(Arc::new(AcceptDefaults)))
        .create(&mut config)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Note 'daily-standup' already exists.");
    assert_eq!(ws.read("Journal/daily/daily-standup.md"), "existing");
    ws.assert_file_exists(".staged.md");
}

#[tokio::test]
async fn test_forbidden_characters_abort_before_moving() {
    let ws = TestWorkspace::new();
    let manifest = ws.write_manifest(JOURNAL_MANIFEST);
    let prompter = Arc::new(ScriptedPrompter::new([
        Answer::Default,
        Answer::Reply("a/b".into()),
        Answer::Default,
    ]));
    let mut config = ConfigurationManifest::load(&manifest)
        .unwrap()
        .into_configuration()
        .unwrap();

    let err = creator(&ws, Resolver::new(prompter))
        .create(&mut config)
        .await
        .unwrap_err();

    assert!(err.is_canceled());
    assert!(matches!(
        err.root_cause(),
        Error::Validation { key, value } if key == "title" && value == "A/b"
    ));
    assert_eq!(config.value("kind"), Some(&Value::from("daily")));
    ws.assert_file_exists(".staged.md");
    ws.assert_file_missing("Journal");
}

#[tokio::test]
async fn test_resolution_serializes_in_configuration_order() {
    let ws = TestWorkspace::new();
    let manifest = ws.write_manifest(JOURNAL_MANIFEST);
    let mut manifest = ConfigurationManifest::load(&manifest).unwrap();
    manifest.set_value("title", "retro");
    let config = manifest.into_configuration().unwrap();

    let resolution = Resolver::new(Arc::new(AcceptDefaults))
        .resolve(&config)
        .await
        .unwrap();

    assert_eq!(
        serde_json::to_string(&resolution).unwrap(),
        r#"{"path":"Journal/daily","kind":"daily","title":"Retro","filename":"daily-retro"}"#
    );
}
