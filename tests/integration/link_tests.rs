#![cfg(unix)]

use mapclash::collisions::{Classification, CollisionFinder, FinderConfig, ScanResult};
use mapclash::patterns::PatternSet;
use mapclash::scanner::WalkerConfig;
use std::fs;
use std::os::unix::fs::symlink;
use std::path::Path;
use tempfile::tempdir;

fn write(root: &Path, rel: &str, content: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn scan(root: &Path, follow: bool) -> ScanResult {
    let config = FinderConfig::default()
        .with_walker_config(WalkerConfig::default().with_follow_symlinks(follow));
    CollisionFinder::new(config)
        .find_collisions(root, &PatternSet::defaults())
        .unwrap()
}

#[test]
fn test_symlinked_file_counts_as_a_copy() {
    let dir = tempdir().unwrap();
    write(dir.path(), "mlo_a/stream/data.ymap", b"same");
    fs::create_dir_all(dir.path().join("mlo_b/stream")).unwrap();
    symlink(
        dir.path().join("mlo_a/stream/data.ymap"),
        dir.path().join("mlo_b/stream/data.ymap"),
    )
    .unwrap();

    let result = scan(dir.path(), true);

    assert_eq!(result.groups.len(), 1);
    assert_eq!(
        result.groups[0].classification,
        Classification::RedundantDuplicate
    );
}

#[test]
fn test_symlink_cycle_terminates() {
    let dir = tempdir().unwrap();
    write(dir.path(), "mlo_a/stream/data.ymap", b"1");
    symlink(dir.path(), dir.path().join("mlo_a/stream/loop")).unwrap();

    let result = scan(dir.path(), true);

    assert_eq!(result.files_scanned, 1);
    assert!(result.groups.is_empty());
}

#[test]
fn test_directory_reached_twice_is_walked_once() {
    let dir = tempdir().unwrap();
    write(dir.path(), "mlo_a/stream/data.ymap", b"1");
    symlink(dir.path().join("mlo_a"), dir.path().join("mlo_alias")).unwrap();

    let result = scan(dir.path(), true);

    // The alias resolves to the already visited mlo_a
    assert_eq!(result.files_scanned, 1);
    assert!(result.groups.is_empty());
}

#[test]
fn test_no_follow_skips_linked_directories() {
    let dir = tempdir().unwrap();
    let outside = tempdir().unwrap();
    write(outside.path(), "stream/data.ymap", b"2");
    write(dir.path(), "mlo_a/stream/data.ymap", b"1");
    symlink(outside.path(), dir.path().join("linked_mlo")).unwrap();

    let followed = scan(dir.path(), true);
    assert_eq!(followed.groups.len(), 1);
    assert_eq!(
        followed.groups[0].classification,
        Classification::CriticalConflict
    );

    let not_followed = scan(dir.path(), false);
    assert!(not_followed.groups.is_empty());
    assert_eq!(not_followed.files_scanned, 1);
}

#[test]
fn test_dangling_symlink_is_skipped() {
    let dir = tempdir().unwrap();
    write(dir.path(), "mlo_a/stream/data.ymap", b"1");
    fs::create_dir_all(dir.path().join("mlo_b/stream")).unwrap();
    symlink(
        dir.path().join("nowhere/data.ymap"),
        dir.path().join("mlo_b/stream/data.ymap"),
    )
    .unwrap();

    let result = scan(dir.path(), true);

    assert!(result.groups.is_empty());
    assert_eq!(result.files_scanned, 1);
    assert_eq!(result.skipped_count(), 1);
}
