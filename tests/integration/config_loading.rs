use std::fs;
use std::time::Duration;

use treesync::config::{ConfigLoader, ConfigOverrides};
use treesync::types::LOG_FILE_NAME;

#[test]
fn file_values_load_and_flags_win() {
    let temp = tempfile::tempdir().unwrap();
    let source = temp.path().join("source");
    fs::create_dir(&source).unwrap();
    let config_file = temp.path().join("treesync.toml");
    fs::write(
        &config_file,
        format!(
            "source = {:?}\nreplica = {:?}\ninterval_secs = 30\nlog_path = {:?}\n\n[logging]\nlevel = \"debug\"\n",
            source.display().to_string(),
            temp.path().join("replica").display().to_string(),
            temp.path().join("logs").display().to_string(),
        ),
    )
    .unwrap();

    let overrides = ConfigOverrides {
        interval_secs: Some(5),
        ..Default::default()
    };
    let resolved = ConfigLoader::load_resolved(Some(&config_file), &overrides).unwrap();
    let base = dunce::canonicalize(temp.path()).unwrap();

    assert_eq!(resolved.source, base.join("source"));
    assert_eq!(resolved.replica, base.join("replica"));
    assert_eq!(resolved.interval, Duration::from_secs(5));
    assert_eq!(resolved.log_file, base.join("logs").join(LOG_FILE_NAME));
    assert_eq!(resolved.logging.level, "debug");
}

#[test]
fn missing_config_file_is_an_error() {
    let temp = tempfile::tempdir().unwrap();
    let result = ConfigLoader::load(
        Some(&temp.path().join("absent.toml")),
        &ConfigOverrides::default(),
    );
    assert!(result.is_err());
}

#[test]
fn nested_replica_is_rejected() {
    let temp = tempfile::tempdir().unwrap();
    let source = temp.path().join("source");
    fs::create_dir(&source).unwrap();

    let overrides = ConfigOverrides {
        source: Some(source.clone()),
        replica: Some(source.join("mirror")),
        log_path: Some(temp.path().join("logs")),
        ..Default::default()
    };
    let err = ConfigLoader::load_resolved(None, &overrides).unwrap_err();
    assert!(err.to_string().contains("inside source"));
}
