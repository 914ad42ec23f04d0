use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::logger::exe_dir;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the builder service the GUI calls.
    pub api_url: String,
    pub bind_addr: String,
    /// Browser command; the URL is appended as the final argument.
    pub browser: Option<Vec<String>>,
    pub log_dir: Option<PathBuf>,
    pub icon_path: Option<PathBuf>,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:8000".to_string(),
            bind_addr: "127.0.0.1:8000".to_string(),
            browser: None,
            log_dir: None,
            icon_path: None,
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    pub fn path() -> PathBuf {
        exe_dir().join("config.json")
    }

    pub fn load() -> Self {
        Self::load_from(&Self::path()).with_env(|key| std::env::var(key).ok())
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(s) => serde_json::from_str::<Config>(&s).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Non-empty environment values override the file.
    pub fn with_env(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| var(key).filter(|v| !v.trim().is_empty());
        if let Some(v) = var("HAZMEL_API_URL") { self.api_url = v; }
        if let Some(v) = var("HAZMEL_BIND") { self.bind_addr = v; }
        if let Some(v) = var("HAZMEL_BROWSER") {
            self.browser = Some(v.split_whitespace().map(str::to_string).collect());
        }
        if let Some(v) = var("HAZMEL_LOG_DIR") { self.log_dir = Some(PathBuf::from(v)); }
        self
    }

    pub fn log_path(&self, file_name: &str) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(exe_dir).join(file_name)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let s = serde_json::to_string_pretty(self)?;
        fs::write(path, s)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn missing_or_broken_file_falls_back_to_defaults() {
        let dir = std::env::temp_dir();
        assert_eq!(Config::load_from(&dir.join("hazmel-no-such-config.json")), Config::default());

        let broken = dir.join(format!("hazmel-broken-{}.json", std::process::id()));
        fs::write(&broken, "{ not json").unwrap();
        assert_eq!(Config::load_from(&broken), Config::default());
        let _ = fs::remove_file(&broken);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let path = std::env::temp_dir().join(format!("hazmel-partial-{}.json", std::process::id()));
        fs::write(&path, r#"{"api_url": "http://10.0.0.2:9000"}"#).unwrap();
        let cfg = Config::load_from(&path);
        assert_eq!(cfg.api_url, "http://10.0.0.2:9000");
        assert_eq!(cfg.request_timeout_secs, 30);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn save_then_load() {
        let path = std::env::temp_dir().join(format!("hazmel-saved-{}.json", std::process::id()));
        let cfg = Config {
            browser: Some(vec!["/usr/bin/firefox".into(), "-P".into(), "main".into()]),
            ..Config::default()
        };
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path), cfg);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn env_overrides_non_empty_values() {
        let env: HashMap<&str, &str> = [
            ("HAZMEL_API_URL", "http://localhost:1234"),
            ("HAZMEL_BIND", "  "),
            ("HAZMEL_BROWSER", "firefox -P main"),
        ]
        .into_iter()
        .collect();
        let cfg = Config::default().with_env(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.api_url, "http://localhost:1234");
        assert_eq!(cfg.bind_addr, "127.0.0.1:8000");
        assert_eq!(cfg.browser, Some(vec!["firefox".to_string(), "-P".to_string(), "main".to_string()]));
    }
}
