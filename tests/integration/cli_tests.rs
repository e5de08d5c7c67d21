use clap::Parser;
use mapclash::cli::Cli;
use mapclash::error::ExitCode;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write(root: &Path, rel: &str, content: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn run(args: &[&str]) -> anyhow::Result<ExitCode> {
    let mut full = vec!["mapclash", "-q"];
    full.extend_from_slice(args);
    mapclash::run_app(Cli::try_parse_from(full).unwrap())
}

#[test]
fn test_exit_code_success_with_conflicts() {
    let dir = tempdir().unwrap();
    write(dir.path(), "mlo_a/stream/data.ymap", b"v1");
    write(dir.path(), "mlo_b/stream/data.ymap", b"v2");
    let report = dir.path().join("report.json");

    let code = run(&[dir.path().to_str().unwrap(), "-o", report.to_str().unwrap()]).unwrap();

    // Conflicts are a finding, not a failure
    assert_eq!(code, ExitCode::Success);
    assert!(report.exists());
}

#[test]
fn test_exit_code_success_clean_tree() {
    let dir = tempdir().unwrap();
    write(dir.path(), "mlo_a/stream/one.ymap", b"1");
    let report = dir.path().join("report.lua");

    let code = run(&[dir.path().to_str().unwrap(), "-o", report.to_str().unwrap()]).unwrap();
    assert_eq!(code, ExitCode::Success);
}

#[test]
fn test_missing_root_is_config_error() {
    let err = run(&["/nonexistent/mapclash/resources"]).unwrap_err();
    assert_eq!(ExitCode::for_error(&err), ExitCode::ConfigError);
}

#[test]
fn test_root_is_file_is_config_error() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("data.ymap");
    fs::write(&file, b"x").unwrap();

    let err = run(&[file.to_str().unwrap()]).unwrap_err();
    assert_eq!(ExitCode::for_error(&err), ExitCode::ConfigError);
}

#[test]
fn test_unknown_pattern_is_config_error() {
    let dir = tempdir().unwrap();
    let err = run(&[dir.path().to_str().unwrap(), "--enable", "*.yft"]).unwrap_err();

    assert_eq!(ExitCode::for_error(&err), ExitCode::ConfigError);
    assert!(err.to_string().contains("*.yft"));
}

#[test]
fn test_everything_disabled_is_config_error() {
    let dir = tempdir().unwrap();
    let mut args = vec![dir.path().to_str().unwrap().to_string()];
    for label in ["*.ymap", "light_ymaps", "*.ybn", "*.ymt", "*.ytd"] {
        args.push("--disable".to_string());
        args.push(label.to_string());
    }
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    let err = run(&args).unwrap_err();
    assert_eq!(ExitCode::for_error(&err), ExitCode::ConfigError);
}

#[test]
fn test_invalid_ignore_pattern_is_config_error() {
    let dir = tempdir().unwrap();
    let err = run(&[dir.path().to_str().unwrap(), "--ignore", "["]).unwrap_err();
    assert_eq!(ExitCode::for_error(&err), ExitCode::ConfigError);
}

#[test]
fn test_missing_config_file_is_config_error() {
    let dir = tempdir().unwrap();
    let err = run(&[
        dir.path().to_str().unwrap(),
        "--config",
        dir.path().join("absent.toml").to_str().unwrap(),
    ])
    .unwrap_err();
    assert_eq!(ExitCode::for_error(&err), ExitCode::ConfigError);
}

#[test]
fn test_unwritable_output_is_internal_error() {
    let dir = tempdir().unwrap();
    write(dir.path(), "mlo_a/stream/one.ymap", b"1");
    let err = run(&[
        dir.path().to_str().unwrap(),
        "-o",
        dir.path().join("missing_dir/report.html").to_str().unwrap(),
    ])
    .unwrap_err();
    assert_eq!(ExitCode::for_error(&err), ExitCode::InternalError);
}

#[test]
fn test_list_patterns_needs_no_root() {
    assert_eq!(run(&["--list-patterns"]).unwrap(), ExitCode::Success);
}

#[test]
fn test_report_to_stdout() {
    let dir = tempdir().unwrap();
    write(dir.path(), "mlo_a/stream/data.ymap", b"same");
    write(dir.path(), "mlo_b/stream/data.ymap", b"same");

    let code = run(&[dir.path().to_str().unwrap(), "--format", "csv"]).unwrap();
    assert_eq!(code, ExitCode::Success);
}

#[test]
fn test_console_listing_with_output_file() {
    let dir = tempdir().unwrap();
    write(dir.path(), "mlo_a/stream/data.ymap", b"v1");
    write(dir.path(), "mlo_b/stream/data.ymap", b"v2");
    let report = dir.path().join("report.html");

    // Not quiet: the per-group listing and the summary go to stderr
    let cli = Cli::try_parse_from([
        "mapclash",
        "--no-color",
        dir.path().to_str().unwrap(),
        "-o",
        report.to_str().unwrap(),
    ])
    .unwrap();
    let code = mapclash::run_app(cli).unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(fs::read_to_string(&report).unwrap().contains("data.ymap"));
}

#[test]
fn test_lua_format_name_accepted() {
    let dir = tempdir().unwrap();
    write(dir.path(), "mlo_a/stream/data.ymap", b"v1");
    write(dir.path(), "mlo_b/stream/data.ymap", b"v1");
    let report = dir.path().join("report.out");

    let code = run(&[
        dir.path().to_str().unwrap(),
        "--format",
        "lua",
        "-o",
        report.to_str().unwrap(),
    ])
    .unwrap();

    assert_eq!(code, ExitCode::Success);
    let text = fs::read_to_string(&report).unwrap();
    assert!(text.starts_with("-- ####"));
    assert!(text.contains("[Redundant Duplicates]"));
}
