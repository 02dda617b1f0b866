use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_SETTINGS_FILE: &str = "client.toml";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub backend_url: Url,
    pub enrichment_url: Url,
    pub request_timeout: Duration,
    pub event_buffer: usize,
}

impl Default for ClientSettings {
    fn default() -> Self {
        let local = Url::parse("http://127.0.0.1:5001").expect("static url");
        Self {
            backend_url: local.clone(),
            enrichment_url: local,
            request_timeout: Duration::from_secs(10),
            event_buffer: 256,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    backend_url: Option<String>,
    enrichment_url: Option<String>,
    request_timeout_ms: Option<u64>,
    event_buffer: Option<usize>,
}

pub fn load_settings() -> Result<ClientSettings> {
    load_settings_from(Path::new(DEFAULT_SETTINGS_FILE), |key| std::env::var(key).ok())
}

pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ClientSettings> {
    let mut settings = ClientSettings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        let file_cfg = toml::from_str::<FileSettings>(&raw)
            .with_context(|| format!("invalid settings file '{}'", path.display()))?;
        apply_file(&mut settings, file_cfg)?;
    }

    apply_env(&mut settings, env)?;
    Ok(settings)
}

fn apply_file(settings: &mut ClientSettings, file_cfg: FileSettings) -> Result<()> {
    if let Some(v) = file_cfg.backend_url {
        settings.backend_url = parse_url("backend_url", &v)?;
    }
    if let Some(v) = file_cfg.enrichment_url {
        settings.enrichment_url = parse_url("enrichment_url", &v)?;
    }
    if let Some(v) = file_cfg.request_timeout_ms {
        settings.request_timeout = timeout_from_ms("request_timeout_ms", v)?;
    }
    if let Some(v) = file_cfg.event_buffer {
        settings.event_buffer = v.max(1);
    }
    Ok(())
}

fn apply_env(settings: &mut ClientSettings, env: impl Fn(&str) -> Option<String>) -> Result<()> {
    let lookup = |primary: &str, alias: &str| env(alias).or_else(|| env(primary));

    if let Some(v) = lookup("ROSTER_BACKEND_URL", "APP__BACKEND_URL") {
        settings.backend_url = parse_url("ROSTER_BACKEND_URL", &v)?;
    }
    if let Some(v) = lookup("ROSTER_ENRICHMENT_URL", "APP__ENRICHMENT_URL") {
        settings.enrichment_url = parse_url("ROSTER_ENRICHMENT_URL", &v)?;
    }
    if let Some(v) = lookup("ROSTER_REQUEST_TIMEOUT_MS", "APP__REQUEST_TIMEOUT_MS") {
        settings.request_timeout = parse_timeout_ms("ROSTER_REQUEST_TIMEOUT_MS", &v)?;
    }
    Ok(())
}

fn parse_timeout_ms(name: &str, raw: &str) -> Result<Duration> {
    let ms = raw
        .trim()
        .parse::<u64>()
        .with_context(|| format!("{name} is not a number of milliseconds: {raw}"))?;
    timeout_from_ms(name, ms)
}

fn timeout_from_ms(name: &str, ms: u64) -> Result<Duration> {
    if ms == 0 {
        anyhow::bail!("{name} must be greater than zero");
    }
    Ok(Duration::from_millis(ms))
}

pub fn parse_url(name: &str, raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).with_context(|| format!("{name} is not a valid url: {raw}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        anyhow::bail!("{name} must start with http:// or https://");
    }
    Ok(url)
}
