use std::path::PathBuf;
use std::time::Duration;

use volume_bridge::config::{Config, ConfigLoader};
use volume_bridge::system::mocks::MockFileSystem;
use volume_bridge::volume::StreamType;

#[test]
fn defaults_match_the_documented_contract() {
    let config = Config::default();
    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.monitor.silence_check_interval_secs, 2.0);
    assert_eq!(
        config.monitor.silence_check_interval(),
        Duration::from_secs(2)
    );
    assert_eq!(config.monitor.volume_stream, None);
    assert!(config.monitor.show_native_volume_ui);
}

#[test]
fn loader_parses_a_full_config_file() {
    let fs = MockFileSystem::new();
    let path = PathBuf::from("/config/volume-bridge/config.toml");
    fs.add_file(
        &path,
        r#"
[general]
log_level = "debug"

[monitor]
silence_check_interval_secs = 0.5
volume_stream = "music"
show_native_volume_ui = false
"#
        .to_string(),
    );

    let loader = ConfigLoader::new(fs, path);
    let config = loader.load_config().unwrap();

    assert_eq!(config.general.log_level, "debug");
    assert_eq!(
        config.monitor.silence_check_interval(),
        Duration::from_millis(500)
    );
    assert_eq!(config.monitor.volume_stream, Some(StreamType::Music));
    assert!(!config.monitor.show_native_volume_ui);
}

#[test]
fn loader_fills_missing_sections_with_defaults() {
    let fs = MockFileSystem::new();
    let path = PathBuf::from("/config/volume-bridge/config.toml");
    fs.add_file(&path, "[general]\nlog_level = \"warn\"\n".to_string());

    let loader = ConfigLoader::new(fs, path);
    let config = loader.load_config().unwrap();

    assert_eq!(config.general.log_level, "warn");
    assert_eq!(config.monitor.silence_check_interval_secs, 2.0);
}

#[test]
fn loader_creates_and_persists_defaults_when_file_is_missing() {
    let fs = MockFileSystem::new();
    let path = PathBuf::from("/config/volume-bridge/config.toml");

    let loader = ConfigLoader::new(fs, path.clone());
    let config = loader.load_config().unwrap();
    assert_eq!(config.general.log_level, "info");

    // The loader round-trips through the injected file system
    let reloaded = loader.load_config().unwrap();
    assert_eq!(reloaded.general.log_level, "info");
}

#[test]
fn loader_surfaces_parse_errors() {
    let fs = MockFileSystem::new();
    let path = PathBuf::from("/config/volume-bridge/config.toml");
    fs.add_file(&path, "not valid toml [".to_string());

    let loader = ConfigLoader::new(fs, path);
    assert!(loader.load_config().is_err());
}

#[test]
fn loader_surfaces_read_failures() {
    let fs = MockFileSystem::new();
    let path = PathBuf::from("/config/volume-bridge/config.toml");
    fs.add_file(&path, String::new());
    fs.set_read_failure(true);

    let loader = ConfigLoader::new(fs, path);
    assert!(loader.load_config().is_err());
}

#[test]
fn interval_floor_prevents_busy_polling() {
    let mut config = Config::default();
    config.monitor.silence_check_interval_secs = 0.0;
    assert_eq!(
        config.monitor.silence_check_interval(),
        Duration::from_millis(100)
    );
}

#[test]
fn config_round_trips_through_toml_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let path_str = path.to_str().unwrap();

    let mut config = Config::default();
    config.monitor.volume_stream = Some(StreamType::Ring);
    config.save(Some(path_str)).unwrap();

    let loaded = Config::load(Some(path_str)).unwrap();
    assert_eq!(loaded.monitor.volume_stream, Some(StreamType::Ring));
    assert_eq!(loaded.general.log_level, "info");
}
