use mapclash::collisions::{Classification, CollisionFinder, FinderConfig, ScanResult};
use mapclash::patterns::PatternSet;
use mapclash::scanner::WalkerConfig;
use std::collections::BTreeMap;
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

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let result = scan(dir.path());

    assert!(result.groups.is_empty());
    assert_eq!(result.files_scanned, 0);
    assert_eq!(result.skipped_count(), 0);
    assert!(!result.has_conflicts());
}

#[test]
fn test_identical_copies_are_redundant_duplicates() {
    let dir = tempdir().unwrap();
    write(dir.path(), "mlo_a/stream/data.ymap", b"<CMapData>same</CMapData>");
    write(dir.path(), "mlo_b/stream/data.ymap", b"<CMapData>same</CMapData>");

    let result = scan(dir.path());

    assert_eq!(result.groups.len(), 1);
    let group = &result.groups[0];
    assert_eq!(group.classification, Classification::RedundantDuplicate);
    assert_eq!(group.members.len(), 2);
    assert_eq!(group.distinct_digests, 1);
    assert_eq!(group.members[0].resource, "mlo_a");
    assert_eq!(group.members[1].resource, "mlo_b");
    assert_eq!(group.members[0].digest, group.members[1].digest);
    assert_eq!(result.counts.duplicates, 1);
    assert_eq!(result.counts.conflicts, 0);
}

#[test]
fn test_one_byte_difference_is_a_conflict() {
    let dir = tempdir().unwrap();
    write(dir.path(), "mlo_a/stream/data.ymap", b"<CMapData>v1</CMapData>");
    write(dir.path(), "mlo_b/stream/data.ymap", b"<CMapData>v2</CMapData>");

    let result = scan(dir.path());

    assert_eq!(result.groups.len(), 1);
    let group = &result.groups[0];
    assert_eq!(group.classification, Classification::CriticalConflict);
    assert_eq!(group.distinct_digests, 2);
    assert_ne!(group.members[0].digest, group.members[1].digest);
    assert_eq!(result.counts.conflicts, 1);
    assert_eq!(result.counts.conflicting_versions, 2);
}

#[test]
fn test_disabled_extension_produces_no_candidates() {
    let dir = tempdir().unwrap();
    write(dir.path(), "mlo_a/stream/prop.ydr", b"drawable");
    write(dir.path(), "mlo_b/stream/prop.ydr", b"drawable");

    // *.ydr is optional, so off by default
    let result = scan(dir.path());
    assert!(result.groups.is_empty());
    assert_eq!(result.files_scanned, 0);

    let mut overrides = BTreeMap::new();
    overrides.insert("*.ydr".to_string(), true);
    let patterns = PatternSet::from_enablement(&overrides).unwrap();
    let result = CollisionFinder::with_defaults()
        .find_collisions(dir.path(), &patterns)
        .unwrap();
    assert_eq!(result.groups.len(), 1);
    assert_eq!(result.files_scanned, 2);
}

#[test]
fn test_names_group_case_insensitively() {
    let dir = tempdir().unwrap();
    write(dir.path(), "mlo_a/stream/Bank_Vault.YBN", b"a");
    write(dir.path(), "mlo_b/stream/bank_vault.ybn", b"b");

    let result = scan(dir.path());
    assert_eq!(result.groups.len(), 1);
    assert_eq!(result.groups[0].file_name, "Bank_Vault.YBN");
    assert_eq!(result.groups[0].extension, ".YBN");
}

#[test]
fn test_unique_names_form_no_group() {
    let dir = tempdir().unwrap();
    write(dir.path(), "mlo_a/stream/one.ymap", b"same");
    write(dir.path(), "mlo_b/stream/two.ymap", b"same");

    let result = scan(dir.path());
    assert!(result.groups.is_empty());
    assert_eq!(result.files_scanned, 2);
}

#[test]
fn test_three_way_group_counts_versions() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a/stream/gate.ybn", b"1");
    write(dir.path(), "b/stream/gate.ybn", b"2");
    write(dir.path(), "c/stream/gate.ybn", b"1");

    let result = scan(dir.path());
    assert_eq!(result.groups.len(), 1);
    assert_eq!(result.groups[0].members.len(), 3);
    assert_eq!(result.groups[0].distinct_digests, 2);
    assert_eq!(result.counts.grouped_files, 3);
}

#[test]
fn test_empty_files_are_duplicates() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a/stream/empty.ymt", b"");
    write(dir.path(), "b/stream/empty.ymt", b"");

    let result = scan(dir.path());
    assert_eq!(result.groups.len(), 1);
    assert_eq!(result.groups[0].classification, Classification::RedundantDuplicate);
    assert_eq!(result.groups[0].members[0].size, 0);
}

#[test]
fn test_conflicts_sorted_before_duplicates() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a/stream/aaa.ymap", b"same");
    write(dir.path(), "b/stream/aaa.ymap", b"same");
    write(dir.path(), "a/stream/zzz.ymap", b"one");
    write(dir.path(), "b/stream/zzz.ymap", b"two");
    write(dir.path(), "a/stream/Mmm.ybn", b"one");
    write(dir.path(), "b/stream/mmm.ybn", b"two");

    let result = scan(dir.path());
    let order: Vec<(&str, Classification)> = result
        .groups
        .iter()
        .map(|g| (g.file_name.as_str(), g.classification))
        .collect();
    assert_eq!(
        order,
        vec![
            ("Mmm.ybn", Classification::CriticalConflict),
            ("zzz.ymap", Classification::CriticalConflict),
            ("aaa.ymap", Classification::RedundantDuplicate),
        ]
    );
}

#[test]
fn test_scan_is_idempotent() {
    let dir = tempdir().unwrap();
    write(dir.path(), "mlo_a/stream/data.ymap", b"v1");
    write(dir.path(), "mlo_b/stream/data.ymap", b"v2");
    write(dir.path(), "mlo_a/stream/bank.ybn", b"same");
    write(dir.path(), "mlo_c/stream/bank.ybn", b"same");
    write(dir.path(), "mlo_c/stream/lodlights_small001.ymap", b"light");
    write(dir.path(), "mlo_d/lodlights_small001.ymap", b"light");

    let first = scan(dir.path());
    let second = scan(dir.path());

    assert_eq!(first.groups, second.groups);
    assert_eq!(first.counts, second.counts);
    assert_eq!(first.files_scanned, second.files_scanned);
}

#[test]
fn test_light_maps_filtered_when_excluded() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a/stream/lodlights_medium001.ymap", b"1");
    write(dir.path(), "b/stream/lodlights_medium001.ymap", b"2");
    write(dir.path(), "a/stream/vw_lights.ymap", b"1");
    write(dir.path(), "b/stream/vw_lights.ymap", b"1");

    let result = scan(dir.path());
    assert_eq!(result.groups.len(), 2);

    let config = FinderConfig::default()
        .with_walker_config(WalkerConfig::default().with_exclude_light_ymaps(true));
    let result = CollisionFinder::new(config)
        .find_collisions(dir.path(), &PatternSet::defaults())
        .unwrap();
    assert!(result.groups.is_empty());
    assert!(result.exclude_light_ymaps);
}

#[test]
fn test_file_directly_in_root_uses_root_resource() {
    let dir = tempdir().unwrap();
    write(dir.path(), "loose.ybn", b"1");
    write(dir.path(), "mlo_a/loose.ybn", b"1");

    let result = scan(dir.path());
    let resources: Vec<&str> = result.groups[0]
        .members
        .iter()
        .map(|m| m.resource.as_str())
        .collect();
    assert!(resources.contains(&"ROOT_DIR"));
    assert!(resources.contains(&"mlo_a"));
}

#[test]
fn test_members_carry_parent_directory() {
    let dir = tempdir().unwrap();
    write(dir.path(), "mlo_a/stream/sub/data.ymap", b"1");
    write(dir.path(), "mlo_b/stream/data.ymap", b"2");

    let result = scan(dir.path());
    for member in &result.groups[0].members {
        assert_eq!(member.path.parent().unwrap(), member.resource_dir);
        assert!(member.path.is_absolute());
    }
}

#[test]
fn test_pattern_labels_recorded() {
    let dir = tempdir().unwrap();
    let result = scan(dir.path());

    assert_eq!(result.patterns, PatternSet::defaults().labels());
    assert!(result.disabled_patterns.contains(&"*.ydr".to_string()));
    assert!(!result.disabled_patterns.contains(&"*.ymap".to_string()));
}
