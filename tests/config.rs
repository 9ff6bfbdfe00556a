use std::fs;

use todo::config::Config;
use todo::view::Filter;

#[test]
fn load_or_default_on_invalid_config() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    fs::write(&path, "[storage]\nquota_bytes = \"lots\"").expect("write invalid config");

    let cfg = Config::load_or_default(Some(&path));
    assert_eq!(cfg.storage.key, "todo-tasks");
    assert_eq!(cfg.view.default_filter, Filter::All);
}

#[test]
fn load_or_default_on_invalid_key() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    fs::write(&path, "[storage]\nkey = \"\"").expect("write invalid key");

    let cfg = Config::load_or_default(Some(&path));
    assert_eq!(cfg.storage.key, "todo-tasks");
}
