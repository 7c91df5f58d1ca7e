use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::app::infrastructure::error::AppError;
use crate::app::infrastructure::platform::detect_system_dark_mode;
use crate::app::services::speech::ListenPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ThemeMode {
    Light,
    Dark,
    SystemDefault,
}

impl ThemeMode {
    /// Resolve to a concrete light/dark choice, asking the OS if needed.
    pub fn resolve(self) -> bool {
        match self {
            ThemeMode::Light => false,
            ThemeMode::Dark => true,
            ThemeMode::SystemDefault => detect_system_dark_mode(),
        }
    }
}

/// Voice-to-text configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechSettings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_language")]
    pub language: String,

    /// Speech/silence boundary, as RMS on the 16-bit sample scale
    #[serde(default = "default_energy_threshold")]
    pub energy_threshold: f32,

    #[serde(default = "default_pause_ms")]
    pub pause_ms: u64,

    #[serde(default = "default_wait_timeout_secs")]
    pub wait_timeout_secs: u64,

    #[serde(default = "default_phrase_limit_secs")]
    pub phrase_limit_secs: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_endpoint() -> String {
    "https://www.google.com/speech-api/v2/recognize".to_string()
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_energy_threshold() -> f32 {
    300.0
}

fn default_pause_ms() -> u64 {
    800
}

fn default_wait_timeout_secs() -> u64 {
    10
}

fn default_phrase_limit_secs() -> u64 {
    30
}

fn default_request_timeout_secs() -> u64 {
    15
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            language: default_language(),
            energy_threshold: default_energy_threshold(),
            pause_ms: default_pause_ms(),
            wait_timeout_secs: default_wait_timeout_secs(),
            phrase_limit_secs: default_phrase_limit_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl SpeechSettings {
    pub fn listen_policy(&self) -> ListenPolicy {
        ListenPolicy {
            energy_threshold: self.energy_threshold,
            pause: std::time::Duration::from_millis(self.pause_ms),
            wait_timeout: std::time::Duration::from_secs(self.wait_timeout_secs),
            phrase_limit: std::time::Duration::from_secs(self.phrase_limit_secs),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_theme_mode")]
    pub theme_mode: ThemeMode,

    #[serde(default = "default_font_size")]
    pub font_size: u32,

    #[serde(default = "default_word_wrap")]
    pub word_wrap_enabled: bool,

    /// Word list used by Check Spelling; system lists are tried when unset
    #[serde(default)]
    pub dictionary_path: Option<PathBuf>,

    #[serde(default)]
    pub speech: SpeechSettings,
}

fn default_theme_mode() -> ThemeMode {
    ThemeMode::Light
}

fn default_font_size() -> u32 {
    12
}

fn default_word_wrap() -> bool {
    true
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme_mode: default_theme_mode(),
            font_size: default_font_size(),
            word_wrap_enabled: default_word_wrap(),
            dictionary_path: None,
            speech: SpeechSettings::default(),
        }
    }
}

impl AppSettings {
    /// Load settings from disk, or create default if not exists
    pub fn load() -> Self {
        let config_path = match Self::get_config_path() {
            Ok(path) => path,
            Err(e) => {
                log::warn!("{}. Using defaults.", e);
                return Self::default();
            }
        };

        match fs::read_to_string(&config_path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    log::warn!("Failed to parse settings: {}. Using defaults.", e);
                    Self::default()
                }
            },
            Err(_) => {
                // File doesn't exist, use defaults
                let default = Self::default();
                if let Err(e) = default.save() {
                    log::warn!("Could not write default settings: {}", e);
                }
                default
            }
        }
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<(), AppError> {
        let config_path = Self::get_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, json)?;

        Ok(())
    }

    /// Get config file path (cross-platform)
    pub fn get_config_path() -> Result<PathBuf, AppError> {
        let mut path = dirs::config_dir()
            .ok_or_else(|| AppError::Settings("no configuration directory".to_string()))?;
        path.push("quillpad");
        path.push("settings.json");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.font_size, 12);
        assert!(settings.word_wrap_enabled);
        assert_eq!(settings.theme_mode, ThemeMode::Light);
        assert!(settings.dictionary_path.is_none());
        assert_eq!(settings.speech.language, "en-US");
        assert!(settings.speech.api_key.is_none());
    }

    #[test]
    fn test_serialize_deserialize() {
        let settings = AppSettings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let loaded: AppSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings, loaded);
    }

    #[test]
    fn test_partial_config() {
        let json = r#"{"word_wrap_enabled": false}"#;
        let settings: AppSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.font_size, 12);
        assert!(!settings.word_wrap_enabled);
        assert_eq!(settings.speech, SpeechSettings::default());
    }

    #[test]
    fn test_partial_speech_config() {
        let json = r#"{"speech": {"api_key": "k", "language": "de-DE"}}"#;
        let settings: AppSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.speech.api_key.as_deref(), Some("k"));
        assert_eq!(settings.speech.language, "de-DE");
        assert_eq!(settings.speech.pause_ms, 800);
        assert_eq!(settings.speech.endpoint, default_endpoint());
    }

    #[test]
    fn test_theme_mode_serialization() {
        let settings = AppSettings {
            theme_mode: ThemeMode::Dark,
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("\"Dark\""));
    }

    #[test]
    fn test_explicit_theme_modes_resolve_without_platform() {
        assert!(!ThemeMode::Light.resolve());
        assert!(ThemeMode::Dark.resolve());
    }

    #[test]
    fn test_listen_policy_from_settings() {
        let speech = SpeechSettings {
            pause_ms: 500,
            wait_timeout_secs: 3,
            ..Default::default()
        };
        let policy = speech.listen_policy();
        assert_eq!(policy.pause, std::time::Duration::from_millis(500));
        assert_eq!(policy.wait_timeout, std::time::Duration::from_secs(3));
        assert_eq!(policy.phrase_limit, std::time::Duration::from_secs(30));
    }

    #[test]
    fn test_config_path_location() {
        if let Ok(path) = AppSettings::get_config_path() {
            assert!(path.ends_with("quillpad/settings.json"));
        }
    }
}
