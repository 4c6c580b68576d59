//! Rendering of a run's action log

use mirror_core::{ActionLog, RetryPolicy, SyncEngine, SyncOptions};
use mirror_test_utils::TestTree;

fn synced_log(tree: &TestTree) -> ActionLog {
    let options = SyncOptions {
        retry: RetryPolicy::new(1, 10),
        ..SyncOptions::default()
    };
    let mut log = ActionLog::new();
    SyncEngine::new(options)
        .synchronize(&tree.source(), &tree.target(), &mut log)
        .unwrap();
    log
}

fn relativize(tree: &TestTree, line: &str) -> String {
    line.replace(&tree.source().display().to_string(), "[SRC]")
        .replace(&tree.target().display().to_string(), "[DST]")
        .replace('\\', "/")
}

fn sample_tree() -> TestTree {
    let tree = TestTree::new();
    tree.source_file("notes.txt", "n");
    tree.source_file("docs/readme.md", "r");
    tree.target_file("old.txt", "o");
    tree.target_file("legacy/x.txt", "x");
    tree
}

#[test]
fn log_lines_follow_decision_order() {
    let tree = sample_tree();
    let log = synced_log(&tree);

    let lines: Vec<String> = log.lines().map(|line| relativize(&tree, &line)).collect();

    insta::assert_snapshot!(lines.join("\n"), @r"
    Adding file: [SRC]/notes.txt
    Deleting file: [DST]/old.txt
    Creating folder: [DST]/docs
    Adding file: [SRC]/docs/readme.md
    Deleting file: [DST]/legacy/x.txt
    Deleting folder: [DST]/legacy
    ");
}

#[test]
fn persisted_log_appends_trailer() {
    let tree = sample_tree();
    let log = synced_log(&tree);
    let path = tree.root().join("easy-backup.log");

    log.persist(&path, &["Error: interrupted".to_string()]).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), log.len() + 1);
    assert_eq!(lines.last(), Some(&"Error: interrupted"));
}

#[test]
fn actions_serialize_with_kind_tag() {
    let tree = sample_tree();
    let log = synced_log(&tree);

    let json = serde_json::to_value(&log.actions()[0]).unwrap();

    assert_eq!(json["action"], "add_file");
    assert_eq!(
        json["target"].as_str().unwrap(),
        tree.target().join("notes.txt").to_str().unwrap()
    );
}
