//! Reconciliation properties over generated trees

use std::collections::BTreeMap;

use mirror_core::{ActionLog, RetryPolicy, SyncEngine, SyncOptions};
use mirror_test_utils::{Snapshot, TestTree};
use proptest::prelude::*;

/// Relative file path -> content. Directories are `d0..d2`, files `f0..f3.txt`,
/// so a file and a folder never share a name.
type Layout = BTreeMap<String, Vec<u8>>;

fn layout() -> impl Strategy<Value = Layout> {
    let file = (
        prop::collection::vec(0u8..3, 0..3),
        0u8..4,
        prop::collection::vec(any::<u8>(), 0..48),
    );
    prop::collection::vec(file, 0..10).prop_map(|files| {
        files
            .into_iter()
            .map(|(dirs, name, content)| {
                let mut rel: Vec<String> = dirs.iter().map(|d| format!("d{d}")).collect();
                rel.push(format!("f{name}.txt"));
                (rel.join("/"), content)
            })
            .collect()
    })
}

fn build(source: &Layout, target: &Layout) -> TestTree {
    let tree = TestTree::new();
    for (rel, content) in source {
        tree.source_file(rel, content);
    }
    for (rel, content) in target {
        tree.target_file(rel, content);
    }
    tree
}

fn sync(tree: &TestTree, emulate: bool) -> ActionLog {
    let options = SyncOptions {
        emulate,
        retry: RetryPolicy::new(1, 10),
        ..SyncOptions::default()
    };
    let mut log = ActionLog::new();
    SyncEngine::new(options)
        .synchronize(&tree.source(), &tree.target(), &mut log)
        .unwrap();
    log
}

fn uppercased(snapshot: Snapshot) -> Snapshot {
    snapshot
        .into_iter()
        .map(|(rel, content)| (rel.to_uppercase(), content))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn sync_makes_target_mirror_source(source in layout(), target in layout()) {
        let tree = build(&source, &target);

        sync(&tree, false);

        prop_assert_eq!(tree.target_snapshot(), tree.source_snapshot());
    }

    #[test]
    fn second_run_records_nothing(source in layout(), target in layout()) {
        let tree = build(&source, &target);
        sync(&tree, false);
        let mtimes = tree.target_mtimes();

        let second = sync(&tree, false);

        prop_assert!(second.is_empty(), "unexpected actions: {:?}", second.actions());
        prop_assert_eq!(tree.target_mtimes(), mtimes);
    }

    #[test]
    fn emulation_predicts_real_run(source in layout(), target in layout()) {
        let tree = build(&source, &target);
        let before = tree.target_snapshot();

        let emulated = sync(&tree, true);
        prop_assert_eq!(tree.target_snapshot(), before);

        let real = sync(&tree, false);
        prop_assert_eq!(emulated, real);
    }

    #[test]
    fn target_names_in_other_case_still_match(source in layout()) {
        let target: Layout = source
            .iter()
            .map(|(rel, content)| (rel.to_uppercase(), content.clone()))
            .collect();
        let tree = build(&source, &target);

        sync(&tree, false);

        prop_assert_eq!(
            uppercased(tree.target_snapshot()),
            uppercased(tree.source_snapshot())
        );
    }
}
