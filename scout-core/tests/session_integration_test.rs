//! End-to-end tests: config file -> scan session -> ranked query results

use scout_core::{FilterKind, FinderConfig, ScanSession, ScoutError};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn create_project(root: &Path) {
    let files = [
        "src/main.rs",
        "src/mian.rs",
        "src/lib.rs",
        "src/config.rs",
        "tests/main_test.rs",
        "build/main.o",
        ".env",
    ];
    for file in files {
        let path = root.join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }
}

fn write_config(dir: &Path, ignore_rules: &str, config: &str) -> FinderConfig {
    let ignore_path = dir.join(".scoutignore");
    fs::write(&ignore_path, ignore_rules).unwrap();

    let config_path = dir.join("config.toml");
    let contents = format!(
        "{config}\n[ignore]\nenable = true\nhidden_ignore = true\nfile = {:?}\n",
        ignore_path.to_string_lossy()
    );
    fs::write(&config_path, contents).unwrap();

    FinderConfig::load(&config_path).unwrap()
}

#[test]
fn test_fuzzy_session_from_config_file() {
    let project = TempDir::new().unwrap();
    let config_dir = TempDir::new().unwrap();
    create_project(project.path());

    let config = write_config(
        config_dir.path(),
        "build/\n",
        "[filter]\ntype = \"fuzzy\"\nalgorithm = \"jarowinkler\"\nthreshold = 0.9\n",
    );

    let mut session = ScanSession::start(project.path(), &config).unwrap();
    let stats = session.wait();
    assert_eq!(stats.files, 5);

    let results = session.query("main.rs").unwrap();
    let names: Vec<&str> = results
        .iter()
        .map(|r| r.path.rsplit(['/', '\\']).next().unwrap())
        .collect();

    // main.rs scores 1.0, mian.rs ~0.957; nothing else clears 0.9
    assert_eq!(names, vec!["main.rs", "mian.rs"]);
    assert!(results[0].score > results[1].score);
}

#[test]
fn test_contains_session_from_config_file() {
    let project = TempDir::new().unwrap();
    let config_dir = TempDir::new().unwrap();
    create_project(project.path());

    let config = write_config(config_dir.path(), "", "[filter]\ntype = \"contains\"\n");
    assert_eq!(config.filter.kind, FilterKind::Contains);

    let mut session = ScanSession::start(project.path(), &config).unwrap();
    session.wait();

    let results = session.query("MAIN").unwrap();
    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| r.score == 1.0));
}

#[test]
fn test_levenshtein_and_ngram_sessions() {
    let project = TempDir::new().unwrap();
    create_project(project.path());

    let mut config = FinderConfig::default();
    config.filter.algorithm = "levenshtein".into();
    config.filter.threshold = 0.7;

    let mut session = ScanSession::start(project.path(), &config).unwrap();
    session.wait();
    let results = session.query("lib.rs").unwrap();
    assert_eq!(results.first().map(|r| r.score), Some(1.0));
    assert!(results.windows(2).all(|w| w[0].score >= w[1].score));

    config.filter.algorithm = "ngram".into();
    config.filter.threshold = 0.99;
    let mut session = ScanSession::start(project.path(), &config).unwrap();
    session.wait();
    let results = session.query("tests/").unwrap();
    assert_eq!(results.len(), 1);
    assert!(results[0].path.ends_with("main_test.rs"));
}

#[test]
fn test_malformed_ignore_file_is_fatal() {
    let project = TempDir::new().unwrap();
    let config_dir = TempDir::new().unwrap();
    create_project(project.path());

    let ignore_path = config_dir.path().join(".scoutignore");
    fs::write(&ignore_path, "ok.txt\n?broken\n").unwrap();

    let mut config = FinderConfig::default();
    config.ignore.enable = true;
    config.ignore.file = Some(ignore_path);

    let err = ScanSession::start(project.path(), &config).err().unwrap();
    assert!(matches!(err, ScoutError::InvalidGlob { .. }));
}

#[test]
fn test_missing_ignore_file_is_fatal() {
    let project = TempDir::new().unwrap();
    create_project(project.path());

    let mut config = FinderConfig::default();
    config.ignore.enable = true;
    config.ignore.file = Some(project.path().join("no-such-file"));

    assert!(matches!(
        ScanSession::start(project.path(), &config),
        Err(ScoutError::Io(_))
    ));
}
