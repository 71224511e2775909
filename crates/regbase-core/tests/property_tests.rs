use proptest::prelude::*;
use regbase_core::{Classifier, DriftStatus, Entry, Reconciler};

fn value_type() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("REG_SZ"), Just("REG_EXPAND_SZ"), Just("REG_MULTI_SZ")]
}

proptest! {
    #[test]
    fn identical_entries_pass(
        path in "HKLM(\\\\[A-Za-z0-9]{1,8}){1,3}",
        name in "[A-Za-z][A-Za-z0-9]{0,11}",
        ty in value_type(),
        data in "[ -~]{0,24}",
    ) {
        let classifier = Classifier::default();
        prop_assume!(!classifier.is_protected(&name));

        let expected = Entry::new(path.clone(), name.clone(), ty, data.clone());
        let actual = Entry::new(path.to_uppercase(), name.to_lowercase(), ty, data);
        prop_assert_eq!(classifier.classify(&expected, Some(&actual)).status, DriftStatus::Pass);
    }

    #[test]
    fn protected_names_never_compare(
        data_a in "[a-z]{0,8}",
        data_b in "[a-z]{0,8}",
        present in any::<bool>(),
    ) {
        let classifier = Classifier::default();
        let expected = Entry::new("K", "Password", "REG_SZ", data_a);
        let actual = Entry::new("K", "password", "REG_SZ", data_b);

        let status = classifier
            .classify(&expected, present.then_some(&actual))
            .status;
        prop_assert!(status.is_protected());
    }

    #[test]
    fn full_report_has_one_row_per_baseline_key(
        values in prop::collection::vec(("[a-z]{0,4}", any::<bool>()), 0..24),
    ) {
        let expected: Vec<Entry> = values
            .iter()
            .enumerate()
            .map(|(i, (data, _))| Entry::new("K", format!("V{i}"), "REG_SZ", data.as_str()))
            .collect();
        let actual: Vec<Entry> = values
            .iter()
            .enumerate()
            .filter(|(_, (_, present))| *present)
            .map(|(i, (data, _))| Entry::new("k", format!("v{i}"), "REG_SZ", data.as_str()))
            .collect();

        let report = Reconciler::new(Classifier::default()).reconcile(&expected, &actual);

        prop_assert_eq!(report.full.len(), expected.len());
        prop_assert_eq!(report.redundant.len(), actual.len());
        prop_assert_eq!(report.full.summary().missing, expected.len() - actual.len());
        prop_assert!(report.filtered.is_empty() == (expected.len() == actual.len()));
    }
}
