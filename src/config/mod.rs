use crate::models::UploaderSettings;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// Configuration manager for loading and saving the YAML settings file.
///
/// Manages a single configuration file (`ReplaySync Config.yaml`) containing
/// the remote API base URL and the upload credential.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    settings_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with the specified configuration directory.
    ///
    /// The directory is created if it does not exist yet.
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        Ok(Self {
            settings_path: config_dir.join("ReplaySync Config.yaml"),
            config_dir,
        })
    }

    /// Load the settings file, falling back to defaults when it is missing.
    pub fn load_settings(&self) -> Result<UploaderSettings> {
        if !self.settings_path.exists() {
            tracing::warn!(
                "Settings file not found at {}, using defaults",
                self.settings_path
            );
            return Ok(UploaderSettings::default());
        }

        let file_contents = fs::read_to_string(&self.settings_path)
            .with_context(|| format!("Failed to read settings: {}", self.settings_path))?;

        let settings: UploaderSettings = serde_yaml_ng::from_str(&file_contents)
            .with_context(|| format!("Failed to parse settings: {}", self.settings_path))?;

        tracing::info!("Loaded settings from {}", self.settings_path);
        Ok(settings)
    }

    /// Save the settings file.
    pub fn save_settings(&self, settings: &UploaderSettings) -> Result<()> {
        let yaml_string =
            serde_yaml_ng::to_string(settings).context("Failed to serialize settings to YAML")?;

        fs::write(&self.settings_path, yaml_string)
            .with_context(|| format!("Failed to write settings: {}", self.settings_path))?;

        tracing::info!("Saved settings to {}", self.settings_path);
        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }
}

/// Read-only slice of the configuration consumed by the transfer core.
///
/// The transfer manager never writes configuration; it only needs the base
/// URL to compose endpoints and the optional credential to authenticate.
#[derive(Debug, Clone)]
pub struct TransferConfig {
    api_url: String,
    upload_key: Option<String>,
}

impl TransferConfig {
    pub fn new(api_url: impl Into<String>, upload_key: Option<String>) -> Self {
        Self {
            api_url: api_url.into(),
            upload_key: upload_key.filter(|k| !k.trim().is_empty()),
        }
    }

    /// Compose the base URL with a method suffix. Pure, no side effects.
    ///
    /// A missing trailing slash on the configured base URL is tolerated.
    pub fn api_endpoint(&self, method: &str) -> String {
        if self.api_url.ends_with('/') {
            format!("{}{}", self.api_url, method)
        } else {
            format!("{}/{}", self.api_url, method)
        }
    }

    /// The credential sent as `Authorization: Token <key>`, if configured
    pub fn upload_key(&self) -> Option<&str> {
        self.upload_key.as_deref()
    }
}

impl From<&UploaderSettings> for TransferConfig {
    fn from(settings: &UploaderSettings) -> Self {
        let key = settings
            .has_upload_key()
            .then(|| settings.upload_key.clone());
        Self::new(settings.api_url.clone(), key)
    }
}
