use crate::error::{BasmiError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const SERVICE_URL_ENV: &str = "BASMI_SERVICE_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 解析サービスのベースURL
    pub service_url: String,
    pub timeout_seconds: u64,
    /// JPEG再エンコード品質 (0.0-1.0)
    pub image_quality: f32,
    /// 結果ファイル（省略時は設定ディレクトリ）
    pub store_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_url: "http://192.168.0.179:8000".into(),
            timeout_seconds: 120,
            image_quality: 0.7,
            store_path: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| BasmiError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("basmi"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// 結果ファイルのパス
    pub fn results_path(&self) -> Result<PathBuf> {
        match &self.store_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join("results.json")),
        }
    }

    /// 解析サービスURL（環境変数を優先）
    pub fn service_url(&self) -> String {
        match std::env::var(SERVICE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => url.trim().to_string(),
            _ => self.service_url.clone(),
        }
    }

    pub fn set_service_url(&mut self, url: String) -> Result<()> {
        let url = url.trim().to_string();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(BasmiError::Config(format!(
                "URLは http:// または https:// で始めてください: {}",
                url
            )));
        }
        self.service_url = url;
        Ok(())
    }

    pub fn set_timeout(&mut self, seconds: u64) -> Result<()> {
        if seconds == 0 {
            return Err(BasmiError::Config("タイムアウトは1秒以上にしてください".into()));
        }
        self.timeout_seconds = seconds;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.timeout_seconds == 0 {
            return Err(BasmiError::Config("タイムアウトは1秒以上にしてください".into()));
        }
        if !(0.0..=1.0).contains(&self.image_quality) {
            return Err(BasmiError::Config(format!(
                "image_quality は 0.0〜1.0 で指定してください: {}",
                self.image_quality
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config.timeout_seconds, 120);
        assert_eq!(config.image_quality, 0.7);
        assert!(config.store_path.is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.set_service_url("http://localhost:9000".into()).unwrap();
        config.set_timeout(30).unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.service_url, "http://localhost:9000");
        assert_eq!(loaded.timeout_seconds, 30);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"timeout_seconds": 5}"#).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.timeout_seconds, 5);
        assert_eq!(loaded.service_url, Config::default().service_url);
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = Config::default();
        assert!(config.set_service_url("ftp://example".into()).is_err());
        assert!(config.set_timeout(0).is_err());

        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"image_quality": 3.0}"#).unwrap();
        assert!(matches!(Config::load_from(&path), Err(BasmiError::Config(_))));
    }

    #[test]
    fn test_rejects_zero_timeout_in_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"timeout_seconds": 0}"#).unwrap();
        assert!(matches!(Config::load_from(&path), Err(BasmiError::Config(_))));
    }

    #[test]
    fn test_results_path_override() {
        let config = Config {
            store_path: Some(PathBuf::from("/tmp/basmi-results.json")),
            ..Default::default()
        };
        assert_eq!(config.results_path().unwrap(), PathBuf::from("/tmp/basmi-results.json"));
    }
}
