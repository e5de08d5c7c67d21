use mapclash::collisions::{Classification, CollisionFinder, ScanResult};
use mapclash::patterns::PatternSet;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write(root: &Path, rel: &str, content: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn scan(root: &Path) -> ScanResult {
    CollisionFinder::with_defaults()
        .find_collisions(root, &PatternSet::defaults())
        .unwrap()
}

// macOS file systems treat both spellings as the same name
#[cfg(target_os = "linux")]
#[test]
fn test_composed_and_decomposed_names_group_together() {
    let dir = tempdir().unwrap();
    // "café.ymap" precomposed and with a combining acute accent
    write(dir.path(), "mlo_a/stream/caf\u{e9}.ymap", b"1");
    write(dir.path(), "mlo_b/stream/cafe\u{301}.ymap", b"2");

    let result = scan(dir.path());

    assert_eq!(result.groups.len(), 1);
    assert_eq!(result.groups[0].members.len(), 2);
    assert_eq!(result.groups[0].classification, Classification::CriticalConflict);
}

#[test]
fn test_spaces_and_brackets_in_folders() {
    let dir = tempdir().unwrap();
    write(dir.path(), "[maps]/Bank Heist MLO/stream/vault.ybn", b"same");
    write(dir.path(), "[maps]/bank_v2/stream/vault.ybn", b"same");

    let result = scan(dir.path());

    assert_eq!(result.groups.len(), 1);
    let resources: Vec<&str> = result.groups[0]
        .members
        .iter()
        .map(|m| m.resource.as_str())
        .collect();
    assert_eq!(resources, vec!["[maps]", "[maps]"]);
}

#[test]
fn test_deeply_nested_files() {
    let dir = tempdir().unwrap();
    let deep: String = (0..30).map(|i| format!("level{i}/")).collect();
    write(dir.path(), &format!("mlo_a/{deep}data.ymap"), b"1");
    write(dir.path(), "mlo_b/data.ymap", b"1");

    let result = scan(dir.path());

    assert_eq!(result.groups.len(), 1);
    assert_eq!(result.groups[0].classification, Classification::RedundantDuplicate);
}

#[test]
fn test_non_matching_files_are_ignored() {
    let dir = tempdir().unwrap();
    write(dir.path(), "mlo_a/stream/data.ymap.bak", b"1");
    write(dir.path(), "mlo_b/stream/data.ymap.bak", b"2");
    write(dir.path(), "mlo_a/fxmanifest.lua", b"fx_version 'cerulean'");
    write(dir.path(), "mlo_b/fxmanifest.lua", b"fx_version 'bodacious'");

    let result = scan(dir.path());

    assert!(result.groups.is_empty());
    assert_eq!(result.files_scanned, 0);
}

#[test]
fn test_same_folder_name_under_different_parents() {
    let dir = tempdir().unwrap();
    write(dir.path(), "[mlo]/shared/stream/door.ytd", b"a");
    write(dir.path(), "[old]/shared/stream/door.ytd", b"b");

    let result = scan(dir.path());

    assert_eq!(result.groups.len(), 1);
    assert_ne!(
        result.groups[0].members[0].resource_dir,
        result.groups[0].members[1].resource_dir
    );
}
