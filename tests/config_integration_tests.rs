//! Integration tests for configuration loading and endpoint composition

use camino::Utf8PathBuf;
use replaysync::config::{ConfigManager, TransferConfig};
use replaysync::models::UploaderSettings;
use tempfile::TempDir;

fn manager_in_temp_dir() -> (ConfigManager, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    let manager = ConfigManager::new(&config_path).unwrap();
    (manager, temp_dir)
}

#[test]
fn test_missing_settings_file_yields_defaults() {
    let (manager, _temp_dir) = manager_in_temp_dir();

    let settings = manager.load_settings().unwrap();
    assert_eq!(settings.api_url, "https://www.rocketleaguereplays.com/api/");
    assert!(!settings.has_upload_key());
}

#[test]
fn test_settings_round_trip() {
    let (manager, _temp_dir) = manager_in_temp_dir();

    let settings = UploaderSettings {
        api_url: "https://replays.example.test/api/".to_string(),
        upload_key: "deadbeef".to_string(),
        debug_mode: true,
    };
    manager.save_settings(&settings).unwrap();

    let loaded = manager.load_settings().unwrap();
    assert_eq!(loaded.api_url, settings.api_url);
    assert_eq!(loaded.upload_key, settings.upload_key);
    assert!(loaded.debug_mode);
}

#[test]
fn test_unknown_settings_keys_are_tolerated() {
    let (manager, temp_dir) = manager_in_temp_dir();

    // Settings files written by older builds may carry extra keys
    std::fs::write(
        temp_dir.path().join("ReplaySync Config.yaml"),
        "API URL: https://replays.example.test/api/\nUpload Key: hunter2\nStat Logging: true\n",
    )
    .unwrap();

    let settings = manager.load_settings().unwrap();
    assert_eq!(settings.api_url, "https://replays.example.test/api/");
    assert_eq!(settings.upload_key, "hunter2");
}

#[test]
fn test_settings_file_with_renamed_yaml_keys() {
    let (manager, temp_dir) = manager_in_temp_dir();

    std::fs::write(
        temp_dir.path().join("ReplaySync Config.yaml"),
        "API URL: https://replays.example.test/api/\nUpload Key: hunter2\n",
    )
    .unwrap();

    let settings = manager.load_settings().unwrap();
    assert_eq!(settings.api_url, "https://replays.example.test/api/");
    assert_eq!(settings.upload_key, "hunter2");
    // Fields absent from the file fall back to defaults
    assert!(!settings.debug_mode);
}

#[test]
fn test_malformed_settings_file_is_an_error() {
    let (manager, temp_dir) = manager_in_temp_dir();

    std::fs::write(
        temp_dir.path().join("ReplaySync Config.yaml"),
        "API URL: [this is not\n  a valid mapping",
    )
    .unwrap();

    let result = manager.load_settings();
    assert!(result.is_err());
    let message = format!("{:#}", result.unwrap_err());
    assert!(message.contains("Failed to parse settings"));
}

#[test]
fn test_config_dir_is_created() {
    let temp_dir = TempDir::new().unwrap();
    let nested = Utf8PathBuf::try_from(temp_dir.path().join("nested").join("dir")).unwrap();

    let manager = ConfigManager::new(&nested).unwrap();
    assert!(nested.exists());
    assert_eq!(manager.config_dir(), nested);
}

#[test]
fn test_endpoint_composition_from_loaded_settings() {
    let (manager, _temp_dir) = manager_in_temp_dir();

    let settings = UploaderSettings {
        api_url: "https://replays.example.test/api".to_string(), // no trailing slash
        upload_key: "token123".to_string(),
        ..Default::default()
    };
    manager.save_settings(&settings).unwrap();

    let loaded = manager.load_settings().unwrap();
    let transfer_config = TransferConfig::from(&loaded);

    assert_eq!(
        transfer_config.api_endpoint("replays/"),
        "https://replays.example.test/api/replays/"
    );
    assert_eq!(transfer_config.upload_key(), Some("token123"));
}
