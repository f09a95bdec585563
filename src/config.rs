use crate::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 公開スプレッドシートのxlsx URL
    pub sheet_url: Option<String>,
    pub output_dir: PathBuf,
    pub locales_dir: PathBuf,
    pub fetch: FetchConfig,
    pub extract: ExtractConfig,
    pub resize: ResizeConfig,
}

/// ダウンロードの再試行設定
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub timeout_seconds: u64,
}

/// PDF画像抽出の既定値
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub output_dir: PathBuf,
    pub max_width: u32,
    pub quality: u8,
}

/// WebP一括縮小の既定値
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeConfig {
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sheet_url: None,
            output_dir: PathBuf::from("cards-data"),
            locales_dir: PathBuf::from("locales"),
            fetch: FetchConfig::default(),
            extract: ExtractConfig::default(),
            resize: ResizeConfig::default(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 500,
            timeout_seconds: 60,
        }
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("images/cards-webp"),
            max_width: 800,
            quality: 85,
        }
    }
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            max_width: 200,
            max_height: 280,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CatalogError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("card-catalog").join("config.json"))
    }

    pub fn set_sheet_url(&mut self, url: String) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(CatalogError::Config(format!("URLが不正です: {}", url)));
        }
        self.sheet_url = Some(url);
        self.save()
    }

    pub fn set_output_dir(&mut self, dir: PathBuf) -> Result<()> {
        self.output_dir = dir;
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.sheet_url.is_none());
        assert_eq!(config.output_dir, PathBuf::from("cards-data"));
        assert_eq!(config.fetch.max_attempts, 3);
        assert_eq!(config.resize.max_width, 200);
        assert_eq!(config.resize.max_height, 280);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"sheet_url": null, "output_dir": "out", "fetch": {"max_attempts": 5}}"#)
                .unwrap();
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.fetch.max_attempts, 5);
        assert_eq!(config.fetch.base_delay_ms, 500);
        assert_eq!(config.locales_dir, PathBuf::from("locales"));
    }

    #[test]
    fn test_set_sheet_url_rejects_non_http() {
        let mut config = Config::default();
        let err = config.set_sheet_url("ftp://example.com/sheet.xlsx".into()).unwrap_err();
        assert!(matches!(err, CatalogError::Config(_)));
    }
}
