use std::{fs, path::PathBuf};

use tally_config::{Config, ConfigError, ConfigManager};
use tempfile::tempdir;

#[test]
fn default_config_matches_shell_defaults() {
    let cfg = Config::default();

    assert_eq!(cfg.currency_symbol, "₹");
    assert!(cfg.newest_first);
    assert!(cfg.ui_color_enabled);
    assert_eq!(cfg.data_dir, None);
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"));
    assert_eq!(manager.load().expect("load"), Config::default());
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
    assert_eq!(manager.config_path(), dir.path().join("config").join("config.json"));

    let mut cfg = Config::default();
    cfg.currency_symbol = "$".to_string();
    cfg.data_dir = Some(PathBuf::from("/srv/tally"));

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded, cfg);
    assert!(!manager.config_path().with_extension("json.tmp").exists());
}

#[test]
fn partial_file_fills_in_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"newest_first": false}"#).expect("write");

    let loaded = ConfigManager::new(path).load().expect("load");
    assert!(!loaded.newest_first);
    assert_eq!(loaded.currency_symbol, "₹");
}

#[test]
fn corrupt_file_is_a_serde_error() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    fs::write(&path, "{").expect("write");

    let err = ConfigManager::new(path).load().expect_err("corrupt");
    assert!(matches!(err, ConfigError::Serde(_)));
}
