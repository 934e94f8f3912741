use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

use crate::analysis::{Catalogue, DreamAnalyzer};
use crate::session::SessionConfig;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub speech: SpeechConfig,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct SpeechConfig {
    #[serde(default = "default_locale")]
    pub locale: String,
    pub nats_url: String,
    /// Confidence assumed when the recognizer reports none
    #[serde(default = "default_confidence")]
    pub default_confidence: f32,
}

#[derive(Debug, Deserialize)]
pub struct SessionSettings {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnalysisConfig {
    /// JSON keyword catalogue replacing the built-in one
    pub catalogue_path: Option<String>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

fn default_locale() -> String {
    "en-US".to_string()
}

fn default_confidence() -> f32 {
    0.95
}

fn default_tick_interval_ms() -> u64 {
    1000
}

impl Config {
    /// Load a config file, overridden by `DREAM_JOURNAL__SECTION__KEY` variables
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("DREAM_JOURNAL").separator("__"))
            .build()
            .with_context(|| format!("Failed to load config {}", path))?;

        Ok(settings.try_deserialize()?)
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            locale: self.speech.locale.clone(),
            tick_interval: Duration::from_millis(self.session.tick_interval_ms.max(1)),
            default_confidence: self.speech.default_confidence,
            ..SessionConfig::default()
        }
    }

    pub fn analyzer(&self) -> Result<DreamAnalyzer> {
        match &self.analysis.catalogue_path {
            Some(path) => Ok(DreamAnalyzer::new(Catalogue::from_json_file(path)?)),
            None => Ok(DreamAnalyzer::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_with_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[service]
name = "dream-journal"

[service.http]
bind = "127.0.0.1"
port = 3030

[speech]
nats_url = "nats://localhost:4222"
"#
        )
        .unwrap();

        let cfg = Config::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(cfg.service.http.port, 3030);
        assert_eq!(cfg.speech.locale, "en-US");
        assert_eq!(cfg.session.tick_interval_ms, 1000);

        let session = cfg.session_config();
        assert_eq!(session.tick_interval, Duration::from_secs(1));
        assert_eq!(session.default_confidence, 0.95);
        assert!(cfg.analysis.catalogue_path.is_none());
        assert_eq!(cfg.analyzer().unwrap().catalogue(), Catalogue::builtin());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(Config::load("/nonexistent/dream-journal").is_err());
    }
}
