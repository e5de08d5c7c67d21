use clap::Parser;
use mapclash::cli::Cli;
use mapclash::collisions::CollisionFinder;
use mapclash::error::ExitCode;
use mapclash::output::{render, write_report, OutputFormat};
use mapclash::patterns::PatternSet;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write(root: &Path, rel: &str, content: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn fixture(root: &Path) {
    write(root, "mlo_a/stream/data.ymap", b"v1");
    write(root, "mlo_b/stream/data.ymap", b"v2");
    write(root, "mlo_a/stream/bank.ybn", b"same");
    write(root, "mlo_c/stream/bank.ybn", b"same");
}

fn run_to(root: &Path, report: &Path, extra: &[&str]) -> ExitCode {
    let mut args = vec![
        "mapclash",
        "-q",
        root.to_str().unwrap(),
        "-o",
        report.to_str().unwrap(),
    ];
    args.extend_from_slice(extra);
    mapclash::run_app(Cli::try_parse_from(args).unwrap()).unwrap()
}

#[test]
fn test_html_report_from_extension() {
    let dir = tempdir().unwrap();
    fixture(dir.path());
    let report = dir.path().join("collisions.html");

    assert_eq!(run_to(dir.path(), &report, &[]), ExitCode::Success);

    let html = fs::read_to_string(&report).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("CRITICAL CONFLICTS"));
    assert!(html.contains("REDUNDANT DUPLICATES"));
    assert!(html.contains("data.ymap (2 versions)"));
    assert!(html.contains("copyDir(this)"));
}

#[test]
fn test_text_report_is_lua_comments() {
    let dir = tempdir().unwrap();
    fixture(dir.path());
    let report = dir.path().join("collisions.lua");

    run_to(dir.path(), &report, &[]);

    let text = fs::read_to_string(&report).unwrap();
    assert!(text.contains("-- --- .YBN Collisions ---"));
    assert!(text.contains("-- --- .YMAP Collisions ---"));
    assert!(text.contains("-- Total Critical Conflicts Found: 2"));
    assert!(text.contains("-- Total Redundant Duplicates Found: 1"));
    assert!(text.contains("Resource: mlo_c"));
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        assert!(line.trim_start().starts_with("--"));
    }
}

#[test]
fn test_json_report() {
    let dir = tempdir().unwrap();
    fixture(dir.path());
    let report = dir.path().join("collisions.json");

    run_to(dir.path(), &report, &[]);

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(value["exit_code"], 0);
    assert_eq!(value["groups"].as_array().unwrap().len(), 2);
    assert_eq!(value["groups"][0]["classification"], "CRITICAL_CONFLICT");
    assert_eq!(value["groups"][0]["members"][0]["resource"], "mlo_a");
    assert_eq!(value["counts"]["duplicates"], 1);
    assert_eq!(value["skipped"].as_array().unwrap().len(), 0);
}

#[test]
fn test_csv_report_with_explicit_format() {
    let dir = tempdir().unwrap();
    fixture(dir.path());
    let report = dir.path().join("collisions.out");

    run_to(dir.path(), &report, &["--format", "csv"]);

    let csv = fs::read_to_string(&report).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("group_id,classification"));
    assert!(lines[1].starts_with("1,CRITICAL_CONFLICT,data.ymap,mlo_a,"));
}

#[test]
fn test_report_overwrites_existing_file() {
    let dir = tempdir().unwrap();
    fixture(dir.path());
    let report = dir.path().join("collisions.json");
    fs::write(&report, "stale").unwrap();

    run_to(dir.path(), &report, &[]);

    assert!(!fs::read_to_string(&report).unwrap().contains("stale"));
}

#[test]
fn test_reports_agree_on_counts() {
    let dir = tempdir().unwrap();
    fixture(dir.path());
    let result = CollisionFinder::with_defaults()
        .find_collisions(dir.path(), &PatternSet::defaults())
        .unwrap();

    let text = render(&result, OutputFormat::Text).unwrap();
    let html = render(&result, OutputFormat::Html).unwrap();
    assert!(text.contains("Files Hashed: 4"));
    assert!(html.contains("Files Hashed: 4"));

    let out = dir.path().join("again.json");
    write_report(&result, OutputFormat::Json, &out).unwrap();
    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(value["files_scanned"], 4);
}
