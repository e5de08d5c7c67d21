use mapclash::collisions::{CollisionFinder, FinderConfig, ScanResult};
use mapclash::patterns::PatternSet;
use mapclash::scanner::{ExclusionReason, ScriptFolderRules, WalkerConfig};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write(root: &Path, rel: &str, content: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn scan_with(root: &Path, walker: WalkerConfig) -> ScanResult {
    CollisionFinder::new(FinderConfig::default().with_walker_config(walker))
        .find_collisions(root, &PatternSet::defaults())
        .unwrap()
}

fn skip_scripts() -> WalkerConfig {
    WalkerConfig::default().with_script_folders(ScriptFolderRules::default())
}

#[test]
fn test_framework_prefixed_folder_is_excluded() {
    let dir = tempdir().unwrap();
    write(dir.path(), "qb-garages/stream/data.ymap", b"1");
    write(dir.path(), "mlo_a/stream/data.ymap", b"2");

    let result = scan_with(dir.path(), skip_scripts());

    assert!(result.groups.is_empty());
    assert_eq!(result.files_scanned, 1);
    assert_eq!(result.excluded_paths.len(), 1);
    assert!(result.excluded_paths[0].path.ends_with("qb-garages"));
    assert_eq!(
        result.excluded_paths[0].reason,
        ExclusionReason::NamePattern {
            pattern: "qb-*".to_string()
        }
    );
}

#[test]
fn test_script_manifest_without_stream_is_excluded() {
    let dir = tempdir().unwrap();
    write(
        dir.path(),
        "police_job/fxmanifest.lua",
        b"fx_version 'cerulean'\ngame 'gta5'\nclient_script 'client.lua'\n",
    );
    write(dir.path(), "police_job/data/data.ymap", b"1");
    write(dir.path(), "mlo_a/stream/data.ymap", b"2");

    let result = scan_with(dir.path(), skip_scripts());

    assert!(result.groups.is_empty());
    assert_eq!(result.excluded_paths.len(), 1);
    assert!(matches!(
        result.excluded_paths[0].reason,
        ExclusionReason::ScriptManifest { .. }
    ));
}

#[test]
fn test_map_marker_keeps_folder() {
    let dir = tempdir().unwrap();
    write(
        dir.path(),
        "bank_mlo/fxmanifest.lua",
        b"fx_version 'cerulean'\nthis_is_a_map 'yes'\n",
    );
    write(dir.path(), "bank_mlo/data.ymap", b"1");
    write(dir.path(), "mlo_a/stream/data.ymap", b"2");

    let result = scan_with(dir.path(), skip_scripts());

    assert_eq!(result.groups.len(), 1);
    assert!(result.excluded_paths.is_empty());
}

#[test]
fn test_stream_folder_keeps_folder() {
    let dir = tempdir().unwrap();
    write(dir.path(), "interior/fxmanifest.lua", b"fx_version 'cerulean'\n");
    write(dir.path(), "interior/stream/data.ymap", b"1");
    write(dir.path(), "mlo_a/stream/data.ymap", b"1");

    let result = scan_with(dir.path(), skip_scripts());

    assert_eq!(result.groups.len(), 1);
    assert!(result.excluded_paths.is_empty());
}

#[test]
fn test_heuristic_off_by_default() {
    let dir = tempdir().unwrap();
    write(dir.path(), "qb-garages/stream/data.ymap", b"1");
    write(dir.path(), "mlo_a/stream/data.ymap", b"2");

    let result = scan_with(dir.path(), WalkerConfig::default());

    assert_eq!(result.groups.len(), 1);
    assert!(result.excluded_paths.is_empty());
}

#[test]
fn test_custom_rules() {
    let dir = tempdir().unwrap();
    write(dir.path(), "myserver_core/stream/data.ymap", b"1");
    write(dir.path(), "qb-garages/stream/data.ymap", b"2");

    let rules = ScriptFolderRules {
        name_patterns: vec!["myserver_*".to_string()],
        ..ScriptFolderRules::default()
    };
    let result = scan_with(dir.path(), WalkerConfig::default().with_script_folders(rules));

    assert_eq!(result.excluded_paths.len(), 1);
    assert!(result.excluded_paths[0].path.ends_with("myserver_core"));
    assert_eq!(result.files_scanned, 1);
}

#[test]
fn test_only_top_level_folders_are_checked() {
    let dir = tempdir().unwrap();
    write(dir.path(), "[maps]/qb-lookalike/stream/data.ymap", b"1");
    write(dir.path(), "mlo_a/stream/data.ymap", b"2");

    let result = scan_with(dir.path(), skip_scripts());

    assert_eq!(result.groups.len(), 1);
    assert!(result.excluded_paths.is_empty());
}

#[test]
fn test_ignore_patterns_prune_directories() {
    let dir = tempdir().unwrap();
    write(dir.path(), "_old/mlo_a/stream/data.ymap", b"1");
    write(dir.path(), "mlo_a/stream/data.ymap", b"2");
    write(dir.path(), "mlo_b/stream/data.ymap", b"3");

    let walker = WalkerConfig::default().with_ignore_patterns(vec!["_old/".to_string()]);
    let result = scan_with(dir.path(), walker);

    assert_eq!(result.groups.len(), 1);
    assert_eq!(result.groups[0].members.len(), 2);
    assert_eq!(result.files_scanned, 2);
}

#[test]
fn test_invalid_script_glob_is_config_error() {
    let dir = tempdir().unwrap();
    let rules = ScriptFolderRules {
        name_patterns: vec!["qb-[".to_string()],
        ..ScriptFolderRules::default()
    };
    let err = CollisionFinder::new(
        FinderConfig::default().with_walker_config(WalkerConfig::default().with_script_folders(rules)),
    )
    .find_collisions(dir.path(), &PatternSet::defaults())
    .unwrap_err();

    assert!(matches!(
        err,
        mapclash::collisions::FinderError::Config(mapclash::error::ConfigError::InvalidGlob { .. })
    ));
}
