use assert_fs::prelude::*;
use mirror_fs::{DirectoryEntry, Named, take_match};
use std::ffi::OsStr;

#[test]
fn listing_is_sorted_by_name() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("c.txt").write_str("c").unwrap();
    temp.child("a.txt").write_str("a").unwrap();
    temp.child("b.txt").write_str("b").unwrap();
    temp.child("zeta").create_dir_all().unwrap();
    temp.child("alpha").create_dir_all().unwrap();

    let dir = DirectoryEntry::new(temp.path());
    let files: Vec<_> = dir.files().unwrap().iter().map(|f| f.name().to_owned()).collect();
    let dirs: Vec<_> = dir.directories().unwrap().iter().map(|d| d.name().to_owned()).collect();

    assert_eq!(files, ["a.txt", "b.txt", "c.txt"]);
    assert_eq!(dirs, ["alpha", "zeta"]);
}

#[test]
fn nested_children_are_not_listed() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("docs/guide.md").write_str("# guide").unwrap();

    let dir = DirectoryEntry::new(temp.path());

    assert!(dir.files().unwrap().is_empty());
    assert_eq!(dir.directories().unwrap().len(), 1);
}

#[cfg(unix)]
#[test]
fn dangling_links_are_skipped() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("real.txt").write_str("r").unwrap();
    std::os::unix::fs::symlink(temp.path().join("gone.txt"), temp.path().join("broken.txt")).unwrap();

    let files = DirectoryEntry::new(temp.path()).files().unwrap();

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name(), OsStr::new("real.txt"));
}

#[cfg(unix)]
#[test]
fn links_to_directories_are_directories() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("real").create_dir_all().unwrap();
    std::os::unix::fs::symlink(temp.path().join("real"), temp.path().join("link")).unwrap();

    let dirs = DirectoryEntry::new(temp.path()).directories().unwrap();

    assert_eq!(dirs.len(), 2);
}

#[test]
fn take_match_removes_first_case_insensitive_hit() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("README.md").write_str("r").unwrap();
    temp.child("notes.txt").write_str("n").unwrap();

    let mut pending = DirectoryEntry::new(temp.path()).files().unwrap();
    let hit = take_match(&mut pending, OsStr::new("readme.MD")).unwrap();

    assert_eq!(hit.name(), OsStr::new("README.md"));
    assert_eq!(pending.len(), 1);
    assert!(take_match(&mut pending, OsStr::new("missing")).is_none());
}
