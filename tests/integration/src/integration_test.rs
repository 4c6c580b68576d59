//! End-to-end runs of the engine over realistic trees
//!
//! Exercises the full flow: listing -> matching -> comparison -> mutation ->
//! metadata replication.

use std::fs;

use mirror_core::{ActionLog, RetryPolicy, ShortReadPolicy, SyncEngine, SyncOptions};
use mirror_fs::CHUNK_SIZE;
use mirror_test_utils::TestTree;
use pretty_assertions::assert_eq;

fn sync(tree: &TestTree, options: SyncOptions) -> ActionLog {
    let mut log = ActionLog::new();
    SyncEngine::new(SyncOptions {
        retry: RetryPolicy::new(2, 10),
        ..options
    })
    .synchronize(&tree.source(), &tree.target(), &mut log)
    .unwrap();
    log
}

#[test]
fn difference_in_last_chunk_is_detected() {
    let tree = TestTree::new();
    let mut content = vec![7u8; CHUNK_SIZE * 2 + 17];
    let source = tree.source_file("big.bin", &content);
    *content.last_mut().unwrap() = 8;
    let target = tree.target_file("big.bin", &content);
    TestTree::set_mtime(&source, 1_000_000);
    TestTree::set_mtime(&target, 2_000_000);

    let log = sync(&tree, SyncOptions::default());

    assert_eq!(log.summary().files_updated, 1);
    assert_eq!(fs::read(&target).unwrap(), fs::read(&source).unwrap());
}

#[test]
fn identical_multi_chunk_files_are_left_alone() {
    let tree = TestTree::new();
    let content: Vec<u8> = (0..CHUNK_SIZE + 3).map(|i| (i % 251) as u8).collect();
    let source = tree.source_file("big.bin", &content);
    let target = tree.target_file("big.bin", &content);
    TestTree::set_mtime(&source, 1_000_000);
    TestTree::set_mtime(&target, 1_000_000);

    let log = sync(
        &tree,
        SyncOptions {
            short_read: ShortReadPolicy::Different,
            ..SyncOptions::default()
        },
    );

    assert!(log.is_empty());
}

#[test]
fn deep_tree_is_mirrored_then_pruned() {
    let tree = TestTree::new();
    for dir in ["a", "a/b", "a/b/c", "x/y"] {
        tree.source_file(&format!("{dir}/file.txt"), dir);
    }
    tree.source_dir("empty/nested");

    let first = sync(&tree, SyncOptions::default());
    tree.assert_mirrored();
    assert_eq!(first.summary().files_added, 4);

    fs::remove_dir_all(tree.source().join("a/b")).unwrap();
    fs::remove_dir_all(tree.source().join("empty")).unwrap();
    let second = sync(&tree, SyncOptions::default());

    tree.assert_mirrored();
    assert_eq!(second.summary().files_deleted, 2);
    // One line per pruned subtree root.
    assert_eq!(second.summary().folders_deleted, 2);
}

#[test]
fn touched_source_is_recopied_with_new_time() {
    let tree = TestTree::new();
    let source = tree.source_file("a.txt", "same");
    TestTree::set_mtime(&source, 1_000_000);
    sync(&tree, SyncOptions::default());

    TestTree::set_mtime(&source, 1_500_000);
    let log = sync(&tree, SyncOptions::default());

    assert_eq!(log.summary().files_updated, 1);
    assert_eq!(
        TestTree::mtime(&tree.target().join("a.txt")).unix_seconds(),
        1_500_000
    );
}
