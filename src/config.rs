use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_UPSTREAM_URL: &str = "https://api.prospeo.io/email-finder";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    /// Full URL of the email-finder endpoint.
    pub upstream_url: String,
    pub upstream_timeout_ms: u64,
    /// Directory served as the front-end (index.html and assets).
    pub static_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self::from_lookup(|key| std::env::var(key).ok())?;

        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Upstream URL: {}", config.upstream_url);
        tracing::debug!("Upstream timeout: {}ms", config.upstream_timeout_ms);
        tracing::debug!("Static dir: {}", config.static_dir.display());
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            port: var("PORT")
                .unwrap_or_else(|| "3000".to_string())
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            upstream_url: validate_upstream_url(
                var("PROSPEO_API_URL")
                    .map(|url| url.trim().to_string())
                    .unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string()),
            )?,
            upstream_timeout_ms: var("UPSTREAM_TIMEOUT_MS")
                .unwrap_or_else(|| "30000".to_string())
                .trim()
                .parse::<u64>()
                .map_err(|_| anyhow::anyhow!("UPSTREAM_TIMEOUT_MS must be a whole number"))
                .and_then(|ms| {
                    if ms == 0 {
                        anyhow::bail!("UPSTREAM_TIMEOUT_MS must be greater than zero");
                    }
                    Ok(ms)
                })?,
            static_dir: var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("public")),
        })
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_millis(self.upstream_timeout_ms)
    }
}

fn validate_upstream_url(raw: String) -> anyhow::Result<String> {
    let parsed = url::Url::parse(&raw)
        .map_err(|e| anyhow::anyhow!("PROSPEO_API_URL is not a valid URL: {}", e))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        anyhow::bail!("PROSPEO_API_URL must start with http:// or https://");
    }
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.upstream_url, DEFAULT_UPSTREAM_URL);
        assert_eq!(config.upstream_timeout(), Duration::from_secs(30));
        assert_eq!(config.static_dir, PathBuf::from("public"));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("PORT", "8080"),
            ("PROSPEO_API_URL", "http://localhost:9999/email-finder"),
            ("UPSTREAM_TIMEOUT_MS", "1500"),
            ("STATIC_DIR", "/srv/www"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.upstream_url, "http://localhost:9999/email-finder");
        assert_eq!(config.upstream_timeout_ms, 1500);
        assert_eq!(config.static_dir, PathBuf::from("/srv/www"));
    }

    #[test]
    fn test_blank_port_falls_back_to_default() {
        let config = load(&[("PORT", "  ")]).unwrap();
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(load(&[("PORT", "not-a-port")]).is_err());
        assert!(load(&[("PORT", "70000")]).is_err());
        assert!(load(&[("PROSPEO_API_URL", "ftp://example.com")]).is_err());
        assert!(load(&[("PROSPEO_API_URL", "api.prospeo.io")]).is_err());
        assert!(load(&[("UPSTREAM_TIMEOUT_MS", "0")]).is_err());
        assert!(load(&[("UPSTREAM_TIMEOUT_MS", "-5")]).is_err());
    }
}
