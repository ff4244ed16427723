//! Configuration file handling

use tempfile::TempDir;
use watchkv::CONFIG_FILE_NAME;

use crate::common::*;

#[test]
fn open_config_writes_defaults() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);

    let db = Database::open_config(&path).unwrap();
    assert_eq!(db.config(), &WatchKvConfig::default());

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("namespaces = 16"));
    assert!(text.contains("command_error_policy = \"continue\""));
}

#[test]
fn open_config_rejects_bad_policy() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "command_error_policy = \"retry\"\n").unwrap();

    assert!(matches!(
        Database::open_config(&path),
        Err(Error::Config { .. })
    ));
}

#[test]
fn written_config_round_trips() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);

    let config = WatchKvConfig {
        namespaces: 4,
        command_error_policy: "abort".to_string(),
    };
    config.write_to_file(&path).unwrap();

    let db = Database::open_config(&path).unwrap();
    assert_eq!(db.config(), &config);
    assert_eq!(db.coordinator().policy(), CommandErrorPolicy::Abort);
}
