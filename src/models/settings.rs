use serde::{Deserialize, Serialize};

/// User configuration from ReplaySync Config.yaml
///
/// Contains the remote service endpoint and the upload credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploaderSettings {
    #[serde(rename = "API URL", default = "default_api_url")]
    pub api_url: String,

    #[serde(rename = "Upload Key", default)]
    pub upload_key: String,

    #[serde(rename = "Debug Mode", default)]
    pub debug_mode: bool,
}

impl Default for UploaderSettings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            upload_key: String::new(),
            debug_mode: false,
        }
    }
}

fn default_api_url() -> String {
    "https://www.rocketleaguereplays.com/api/".to_string()
}

impl UploaderSettings {
    /// Check whether an upload credential has been configured
    pub fn has_upload_key(&self) -> bool {
        !self.upload_key.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings = UploaderSettings::default();
        assert_eq!(settings.api_url, "https://www.rocketleaguereplays.com/api/");
        assert!(settings.upload_key.is_empty());
        assert!(!settings.has_upload_key());
        assert!(!settings.debug_mode);
    }

    #[test]
    fn test_has_upload_key_ignores_whitespace() {
        let settings = UploaderSettings {
            upload_key: "   ".to_string(),
            ..Default::default()
        };
        assert!(!settings.has_upload_key());

        let settings = UploaderSettings {
            upload_key: "abc123".to_string(),
            ..Default::default()
        };
        assert!(settings.has_upload_key());
    }

    #[test]
    fn test_deserialize_with_renamed_keys() {
        let yaml = "API URL: https://example.test/api/\nUpload Key: secret\n";
        let settings: UploaderSettings = serde_yaml_ng::from_str(yaml).unwrap();

        assert_eq!(settings.api_url, "https://example.test/api/");
        assert_eq!(settings.upload_key, "secret");
        // Missing fields fall back to defaults
        assert!(!settings.debug_mode);
    }
}
