//! Tests for ledger collapsing rules

use pretty_assertions::assert_eq;
use regbase_core::ValueType;
use regbase_core::ledger::{ActionKind, Change, Ledger, PendingAction};
use regbase_fs::NormalizedPath;
use rstest::rstest;
use tempfile::tempdir;

fn change(data: &str) -> Change {
    Change::new("HKLM\\Vendor", "Mode", "REG_SZ", data)
}

#[test]
fn add_then_delete_becomes_single_delete() {
    let mut ledger = Ledger::new();
    ledger.append([change("auto")], ActionKind::Add);
    ledger.append([change("auto")], ActionKind::Delete);

    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger.actions()[0].kind(), ActionKind::Delete);
    assert_eq!(ledger.actions()[0].data(), "auto");
}

#[test]
fn add_then_edit_stays_add_with_new_data() {
    let mut ledger = Ledger::new();
    ledger.append([change("auto")], ActionKind::Add);
    ledger.append(
        [Change::new("hklm\\vendor", "MODE", "REG_DWORD", "0x00000001")],
        ActionKind::Edit,
    );

    assert_eq!(ledger.len(), 1);
    let action = &ledger.actions()[0];
    assert_eq!(action.kind(), ActionKind::Add);
    assert_eq!(action.data(), "0x00000001");
    assert_eq!(action.value_type(), &ValueType::DWord);
    // Key spelling of the original Add is kept
    assert_eq!(action.path(), "HKLM\\Vendor");
}

#[rstest]
#[case::edit_then_edit(ActionKind::Edit, ActionKind::Edit)]
#[case::edit_then_delete(ActionKind::Edit, ActionKind::Delete)]
#[case::delete_then_add(ActionKind::Delete, ActionKind::Add)]
#[case::delete_then_edit(ActionKind::Delete, ActionKind::Edit)]
#[case::add_then_add(ActionKind::Add, ActionKind::Add)]
fn other_combinations_append(#[case] first: ActionKind, #[case] second: ActionKind) {
    let mut ledger = Ledger::new();
    ledger.append([change("1")], first);
    ledger.append([change("2")], second);

    let kinds: Vec<_> = ledger.actions().iter().map(PendingAction::kind).collect();
    assert_eq!(kinds, vec![first, second]);
}

#[test]
fn collapse_targets_first_matching_action() {
    let mut ledger = Ledger::new();
    ledger.append([Change::new("K", "Other", "REG_SZ", "x")], ActionKind::Add);
    ledger.append([change("1")], ActionKind::Add);
    ledger.append([change("2")], ActionKind::Add);
    ledger.append([change("3")], ActionKind::Edit);

    let data: Vec<_> = ledger.actions().iter().map(|a| a.data().to_string()).collect();
    assert_eq!(data, vec!["x", "3", "2"]);
}

#[test]
fn batch_append_applies_rules_per_change() {
    let mut ledger = Ledger::new();
    ledger.append(
        [
            Change::new("K", "A", "REG_SZ", "a"),
            Change::new("K", "B", "REG_SZ", ""),
        ],
        ActionKind::Add,
    );
    ledger.append([Change::new("K", "A", "REG_SZ", "a")], ActionKind::Delete);

    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger.actions()[0].kind(), ActionKind::Delete);
    assert_eq!(ledger.actions()[1].data(), "-");
}

#[test]
fn ledger_file_uses_registry_keys() {
    let dir = tempdir().unwrap();
    let path = NormalizedPath::new(dir.path()).join("MicroAOI_edit.temp");

    let mut ledger = Ledger::new();
    ledger.append([change("auto")], ActionKind::Add);
    ledger.save(&path).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path.to_native()).unwrap()).unwrap();
    assert_eq!(
        raw,
        serde_json::json!([{
            "Action": "Add",
            "Registry Key/Subkey Path": "HKLM\\Vendor",
            "Registry Name": "Mode",
            "Data": "auto",
            "Type": "REG_SZ"
        }])
    );
}
