use anyhow::Result;
use serde::Deserialize;

/// Default base URL of the transcription/summarization service.
const DEFAULT_BASE_URL: &str = "https://140.115.59.61:8003";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub audio: AudioConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the remote ASR/summarize API.
    pub base_url: String,
    /// Default summarization language tag (en, zh, zh-TW, zh-CN).
    pub language: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    /// Directory where kept recordings are written.
    pub recordings_path: String,
    pub sample_rate: u32,
    pub channels: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
                language: "en".to_string(),
            },
            audio: AudioConfig {
                recordings_path: "recordings".to_string(),
                sample_rate: 48_000,
                channels: 1,
            },
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("service.base_url", DEFAULT_BASE_URL)?
            .set_default("service.language", "en")?
            .set_default("audio.recordings_path", "recordings")?
            .set_default("audio.sample_rate", 48_000)?
            .set_default("audio.channels", 1)?
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Load from an explicit config file, or fall back to built-in defaults.
    pub fn load_or_default(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_service() {
        let cfg = Config::default();
        assert_eq!(cfg.service.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.service.language, "en");
        assert_eq!(cfg.audio.channels, 1);
        assert_eq!(cfg.audio.sample_rate, 48_000);
    }

    #[test]
    fn load_or_default_without_file_uses_defaults() {
        let cfg = Config::load_or_default(None).unwrap();
        assert_eq!(cfg.service.base_url, Config::default().service.base_url);
    }
}
