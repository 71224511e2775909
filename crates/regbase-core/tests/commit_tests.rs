//! End-to-end tests for the commit/discard workflow

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use regbase_core::{
    ActionKind, Change, Entry, Error, MemoryAuditLog, PendingAction, ResolvedConfig, Workspace,
};
use regbase_test_utils::TestWorkspace;
use serde_json::json;

const ID: &str = "MicroAOI";

fn workspace(fixture: &TestWorkspace) -> Workspace {
    Workspace::with_config(fixture.root(), ResolvedConfig::default())
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
}

#[test]
fn edit_commit_rewrites_baseline_and_backs_up_original() {
    let fixture = TestWorkspace::new();
    fixture.write_baseline(ID, r#"[["P","N","1","REG_SZ"]]"#);
    fixture.write_ledger(
        ID,
        r#"[{"Action":"Edit","Path":"P","Name":"N","Current Data":"2","Current Type":"REG_SZ"}]"#,
    );
    let ws = workspace(&fixture);
    let audit = MemoryAuditLog::new();

    let session = ws.open_session(ID, &audit).unwrap();
    assert_eq!(session.pending().len(), 1);
    let outcome = session.commit_on(date()).unwrap();

    assert!(!outcome.is_partial());
    assert_eq!(outcome.revision.number, 1);
    assert_eq!(fixture.read_json("golden/MicroAOI.json"), json!([["P", "N", "2", "REG_SZ"]]));
    assert_eq!(
        fixture.read_json("golden/backup/MicroAOI/MicroAOI_rev1_2024-05-01.json"),
        json!([["P", "N", "1", "REG_SZ"]])
    );
    fixture.assert_file_not_exists("golden/MicroAOI_edit.temp");
    assert_eq!(audit.events().len(), 1);
    assert!(audit.events()[0].starts_with("Commit MicroAOI: Edit P\\N"));
}

#[test]
fn empty_ledger_commit_still_creates_one_revision() {
    let fixture = TestWorkspace::new();
    fixture.write_baseline(ID, r#"[["P","N","1","REG_SZ"]]"#);
    let ws = workspace(&fixture);

    let outcome = ws
        .open_session(ID, MemoryAuditLog::new())
        .unwrap()
        .commit_on(date())
        .unwrap();

    assert!(outcome.applied.is_empty());
    assert_eq!(fixture.revision_files(ID), vec!["MicroAOI_rev1_2024-05-01.json"]);
    assert_eq!(fixture.read_json("golden/MicroAOI.json"), json!([["P", "N", "1", "REG_SZ"]]));
}

#[test]
fn revision_numbers_skip_past_gaps() {
    let fixture = TestWorkspace::new();
    fixture.write_baseline(ID, "[]");
    fixture.touch_revision(ID, 1, "2024-01-01");
    fixture.touch_revision(ID, 2, "2024-01-02");
    fixture.touch_revision(ID, 4, "2024-01-04");
    let ws = workspace(&fixture);

    assert_eq!(ws.revisions().next_number(ID).unwrap(), 5);

    let outcome = ws
        .open_session(ID, MemoryAuditLog::new())
        .unwrap()
        .commit_on(date())
        .unwrap();
    assert_eq!(outcome.revision.number, 5);
    fixture.assert_file_exists("golden/backup/MicroAOI/MicroAOI_rev5_2024-05-01.json");
}

#[test]
fn staged_changes_survive_close_and_are_adopted() {
    let fixture = TestWorkspace::new();
    fixture.write_baseline(ID, r#"[["P","N","1","REG_SZ"]]"#);
    let ws = workspace(&fixture);

    let mut session = ws.open_session(ID, MemoryAuditLog::new()).unwrap();
    session
        .stage_add([Change::new("P", "New", "REG_DWORD", "0x00000001")])
        .unwrap();
    session.close();

    fixture.assert_file_contains("golden/MicroAOI_edit.temp", "Registry Key/Subkey Path");

    let session = ws.open_session(ID, MemoryAuditLog::new()).unwrap();
    assert_eq!(session.pending().len(), 1);
    assert_eq!(session.pending()[0].kind(), ActionKind::Add);
}

#[test]
fn stage_edit_records_previous_value_from_baseline() {
    let fixture = TestWorkspace::new();
    fixture.write_baseline(ID, r#"[["P","N","1","REG_SZ"]]"#);
    let ws = workspace(&fixture);

    let mut session = ws.open_session(ID, MemoryAuditLog::new()).unwrap();
    session.stage_edit([Change::new("p", "n", "REG_SZ", "2")]).unwrap();

    let PendingAction::Edit(edit) = &session.pending()[0] else {
        panic!("expected an Edit, got {:?}", session.pending()[0]);
    };
    assert_eq!(edit.previous_data.as_deref(), Some("1"));
    assert_eq!(session.pending()[0].describe(), "Edit p\\n: 1 [REG_SZ] -> 2 [REG_SZ]");
}

#[test]
fn second_edit_records_staged_value_as_previous() {
    let fixture = TestWorkspace::new();
    fixture.write_baseline(ID, r#"[["P","N","1","REG_SZ"]]"#);
    let ws = workspace(&fixture);
    let audit = MemoryAuditLog::new();

    let mut session = ws.open_session(ID, &audit).unwrap();
    session.stage_edit([Change::new("P", "N", "REG_SZ", "2")]).unwrap();
    session.stage_edit([Change::new("P", "N", "REG_SZ", "3")]).unwrap();

    assert_eq!(session.pending()[1].describe(), "Edit P\\N: 2 [REG_SZ] -> 3 [REG_SZ]");

    session.commit_on(date()).unwrap();
    assert_eq!(
        audit.events(),
        vec![
            "Commit MicroAOI: Edit P\\N: 1 [REG_SZ] -> 2 [REG_SZ]".to_string(),
            "Commit MicroAOI: Edit P\\N: 2 [REG_SZ] -> 3 [REG_SZ]".to_string(),
        ]
    );
}

#[test]
fn preview_does_not_write() {
    let fixture = TestWorkspace::new();
    fixture.write_baseline(ID, r#"[["P","N","1","REG_SZ"]]"#);
    let ws = workspace(&fixture);

    let mut session = ws.open_session(ID, MemoryAuditLog::new()).unwrap();
    session.stage_delete([Change::new("P", "N", "REG_SZ", "1")]).unwrap();

    assert!(session.preview_entries().is_empty());
    assert_eq!(fixture.read_json("golden/MicroAOI.json"), json!([["P", "N", "1", "REG_SZ"]]));
}

#[test]
fn discard_removes_ledger_and_keeps_baseline() {
    let fixture = TestWorkspace::new();
    fixture.write_baseline(ID, r#"[["P","N","1","REG_SZ"]]"#);
    let ws = workspace(&fixture);
    let audit = MemoryAuditLog::new();

    let mut session = ws.open_session(ID, &audit).unwrap();
    session
        .stage_add([
            Change::new("P", "A", "REG_SZ", "a"),
            Change::new("P", "B", "REG_SZ", "b"),
        ])
        .unwrap();
    let discarded = session.discard().unwrap();

    assert_eq!(discarded.len(), 2);
    assert_eq!(audit.events().len(), 2);
    assert!(audit.events().iter().all(|e| e.starts_with("Discard MicroAOI: Add P\\")));
    fixture.assert_file_not_exists("golden/MicroAOI_edit.temp");
    assert!(fixture.revision_files(ID).is_empty());
    assert_eq!(fixture.read_json("golden/MicroAOI.json"), json!([["P", "N", "1", "REG_SZ"]]));
}

#[test]
fn partial_apply_writes_applied_subset() {
    let fixture = TestWorkspace::new();
    fixture.write_baseline(ID, r#"[["P","N","1","REG_SZ"]]"#);
    let ws = workspace(&fixture);
    let audit = MemoryAuditLog::new();

    let mut session = ws.open_session(ID, &audit).unwrap();
    session.stage_edit([Change::new("P", "Gone", "REG_SZ", "x")]).unwrap();
    session.stage_edit([Change::new("P", "N", "REG_SZ", "2")]).unwrap();

    let outcome = session.commit_on(date()).unwrap();
    assert!(outcome.is_partial());
    assert_eq!(outcome.applied.len(), 1);
    assert_eq!(outcome.failed[0].action.name(), "Gone");
    assert_eq!(fixture.read_json("golden/MicroAOI.json"), json!([["P", "N", "2", "REG_SZ"]]));
    assert_eq!(audit.events().len(), 2);

    match outcome.into_result() {
        Err(Error::PartialApply { id, applied, failed }) => {
            assert_eq!(id, ID);
            assert_eq!(applied, 1);
            assert_eq!(failed.len(), 1);
        }
        other => panic!("expected PartialApply, got {other:?}"),
    }
}

#[test]
fn add_then_delete_before_commit_leaves_baseline_unchanged() {
    let fixture = TestWorkspace::new();
    fixture.write_baseline(ID, r#"[["P","N","1","REG_SZ"]]"#);
    let ws = workspace(&fixture);
    let audit = MemoryAuditLog::new();

    let mut session = ws.open_session(ID, &audit).unwrap();
    session.stage_add([Change::new("P", "New", "REG_SZ", "x")]).unwrap();
    session.stage_delete([Change::new("P", "New", "REG_SZ", "x")]).unwrap();
    assert_eq!(session.pending().len(), 1);

    let outcome = session.commit_on(date()).unwrap();

    assert!(!outcome.is_partial());
    assert_eq!(outcome.applied.len(), 1);
    assert!(outcome.into_result().is_ok());
    assert_eq!(fixture.read_json("golden/MicroAOI.json"), json!([["P", "N", "1", "REG_SZ"]]));
    assert_eq!(fixture.revision_files(ID).len(), 1);
    assert_eq!(audit.events().len(), 1);
    assert!(audit.events()[0].starts_with("Commit MicroAOI: Delete P\\New"));
}

#[test]
fn missing_baseline_blocks_the_session() {
    let fixture = TestWorkspace::new();
    let ws = workspace(&fixture);

    let err = ws.open_session("Unknown", MemoryAuditLog::new()).err().unwrap();
    assert!(matches!(err, Error::BaselineNotFound { .. }), "got {err:?}");
}

#[test]
fn backup_failure_leaves_baseline_and_ledger_untouched() {
    let fixture = TestWorkspace::new();
    fixture.write_baseline(ID, r#"[["P","N","1","REG_SZ"]]"#);
    // A file where the revision folder should be makes the backup copy fail
    fixture.write_file("golden/backup/MicroAOI", "not a directory");
    let ws = workspace(&fixture);

    let mut session = ws.open_session(ID, MemoryAuditLog::new()).unwrap();
    session.stage_edit([Change::new("P", "N", "REG_SZ", "2")]).unwrap();
    let err = session.commit_on(date()).unwrap_err();

    assert!(matches!(err, Error::BackupFailed { .. }), "got {err:?}");
    assert_eq!(fixture.read_json("golden/MicroAOI.json"), json!([["P", "N", "1", "REG_SZ"]]));
    fixture.assert_file_exists("golden/MicroAOI_edit.temp");
}

#[test]
fn committed_revision_can_be_loaded() {
    let fixture = TestWorkspace::new();
    fixture.write_baseline(ID, r#"[["P","N","1","REG_SZ"]]"#);
    let ws = workspace(&fixture);

    let mut session = ws.open_session(ID, MemoryAuditLog::new()).unwrap();
    session.stage_edit([Change::new("P", "N", "REG_SZ", "2")]).unwrap();
    let outcome = session.commit_on(date()).unwrap();

    let entries = ws.revisions().load_entries(&outcome.revision).unwrap();
    assert_eq!(entries, vec![Entry::new("P", "N", "REG_SZ", "1")]);
}
