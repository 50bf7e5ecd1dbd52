use std::fs;

use chrono::NaiveDate;
use pm_migrate::config::{Config, CONFIG_FILE};
use pm_migrate::Error;

#[test]
fn load_from_dir_defaults_without_a_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cfg = Config::load_from_dir(dir.path());
    assert_eq!(cfg.policy.cutoff_date, NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
    assert_eq!(cfg.users.primary, "Tom Sanpakit");
    assert_eq!(cfg.extraction.company_scan_limit, 10);
}

#[test]
fn load_from_dir_defaults_on_invalid_config() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join(CONFIG_FILE), "policy = 123").expect("write invalid config");

    let cfg = Config::load_from_dir(dir.path());
    assert_eq!(cfg.users.primary, "Tom Sanpakit");
}

#[test]
fn partial_config_keeps_other_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(CONFIG_FILE);
    let content = r#"
[policy]
cutoff_date = "2024-01-01"

[extraction]
company_scan_limit = 3
"#;
    fs::write(&path, content.trim()).expect("write config");

    let cfg = Config::load(&path).expect("load");
    assert_eq!(cfg.policy.cutoff_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    assert_eq!(cfg.extraction.company_scan_limit, 3);
    assert!(cfg.users.valid.iter().any(|name| name == "Austin Koziol"));
}

#[test]
fn primary_user_must_be_valid() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(CONFIG_FILE);
    let content = r#"
[users]
primary = "Nobody Here"
valid = ["Jane Doe"]
"#;
    fs::write(&path, content.trim()).expect("write config");

    let err = Config::load(&path).expect_err("invalid primary");
    assert!(matches!(err, Error::InvalidConfig(_)));
}

#[test]
fn save_then_load_preserves_roster() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(CONFIG_FILE);

    let mut cfg = Config::default();
    cfg.users.valid.push("Jane Doe".to_string());
    cfg.save(&path).expect("save");

    let loaded = Config::load(&path).expect("load");
    assert!(loaded.users.valid.iter().any(|name| name == "Jane Doe"));
    assert_eq!(loaded.users.aliases, cfg.users.aliases);
}
