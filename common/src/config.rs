use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Slide configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlideConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub output_dir: PathBuf,
    pub ffmpeg_path: Option<String>,
    pub log_path: Option<PathBuf>,
    /// No timeout when unset.
    pub request_timeout_secs: Option<u64>,
}

impl Default for SlideConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            output_dir: PathBuf::from("."),
            ffmpeg_path: None,
            log_path: None,
            request_timeout_secs: None,
        }
    }
}

impl SlideConfig {
    /// Get config file path; `SLIDE_CONFIG` points at an explicit file.
    pub fn config_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os("SLIDE_CONFIG").filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(path));
        }
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find config directory"))?
            .join("slide");

        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir.join("config.json"))
    }

    /// Load configuration from the user config file, then apply env overrides.
    pub async fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = Self::load_from(&path).await?;
        config.apply_env();
        Ok(config)
    }

    /// Load configuration from an explicit file; a missing file yields defaults.
    pub async fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = tokio::fs::read_to_string(path).await?;
            let config: SlideConfig = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub async fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        self.save_to(&path).await
    }

    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }

    pub fn apply_env(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| var(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = get("GEMINI_API_KEY").or_else(|| get("API_KEY")) {
            self.api_key = Some(key);
        }
        if let Some(model) = get("SLIDE_MODEL") {
            self.model = model;
        }
        if let Some(url) = get("GEMINI_BASE_URL") {
            self.base_url = url;
        }
        if let Some(dir) = get("SLIDE_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(path) = get("SLIDE_FFMPEG_PATH") {
            self.ffmpeg_path = Some(path);
        }
        if let Some(path) = get("SLIDE_LOG_PATH") {
            self.log_path = Some(PathBuf::from(path));
        }
    }

    /// Log file location: configured path, else `<data dir>/slide/slide.log`.
    pub fn resolved_log_path(&self) -> PathBuf {
        if let Some(path) = &self.log_path {
            return path.clone();
        }
        dirs::data_local_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("slide")
            .join("slide.log")
    }

    /// Key with all but the last four characters hidden, for display.
    pub fn masked_api_key(&self) -> Option<String> {
        let key = self.api_key.as_deref()?;
        let count = key.chars().count();
        if count <= 4 {
            return Some("****".to_string());
        }
        let visible: String = key.chars().skip(count - 4).collect();
        Some(format!("****{visible}"))
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("API_KEY", "fallback-key"),
            ("SLIDE_MODEL", "gemini-2.5-pro"),
            ("SLIDE_OUTPUT_DIR", "/tmp/decks"),
            ("SLIDE_FFMPEG_PATH", "  "),
        ]
        .into_iter()
        .collect();

        let mut config = SlideConfig::default();
        config.apply_overrides(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.api_key.as_deref(), Some("fallback-key"));
        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.output_dir, PathBuf::from("/tmp/decks"));
        assert_eq!(config.ffmpeg_path, None);
        assert!(config.has_api_key());
    }

    #[test]
    fn test_gemini_key_wins_over_generic_key() {
        let mut config = SlideConfig::default();
        config.apply_overrides(|name| match name {
            "GEMINI_API_KEY" => Some("gemini".into()),
            "API_KEY" => Some("generic".into()),
            _ => None,
        });
        assert_eq!(config.api_key.as_deref(), Some("gemini"));
    }

    #[test]
    fn test_masked_api_key() {
        let mut config = SlideConfig::default();
        assert_eq!(config.masked_api_key(), None);
        config.api_key = Some("AIzaSyExample1234".into());
        assert_eq!(config.masked_api_key().as_deref(), Some("****1234"));
        config.api_key = Some("abc".into());
        assert_eq!(config.masked_api_key().as_deref(), Some("****"));
    }

    #[tokio::test]
    async fn test_save_and_load_roundtrip_with_partial_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");

        // Missing file falls back to defaults.
        assert_eq!(SlideConfig::load_from(&path).await.unwrap(), SlideConfig::default());

        tokio::fs::write(&path, r#"{"model":"gemini-2.0-flash"}"#)
            .await
            .unwrap();
        let config = SlideConfig::load_from(&path).await.unwrap();
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);

        let mut changed = config.clone();
        changed.api_key = Some("k".into());
        changed.save_to(&path).await.unwrap();
        assert_eq!(SlideConfig::load_from(&path).await.unwrap(), changed);
    }
}
