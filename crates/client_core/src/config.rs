use std::{fs, path::Path, time::Duration};

use anyhow::{anyhow, Context};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "https://jsonplaceholder.typicode.com/users";
pub const SETTINGS_FILE: &str = "people.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub api_base_url: String,
    pub toast_ttl: Duration,
    pub search_debounce: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            toast_ttl: Duration::from_secs(5),
            search_debounce: Duration::from_millis(300),
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_base_url: Option<String>,
    toast_ttl_ms: Option<u64>,
    search_debounce_ms: Option<u64>,
    request_timeout_secs: Option<u64>,
}

/// Defaults, then `people.toml` in the working directory, then environment overrides.
pub fn load_settings() -> ClientSettings {
    load_settings_from(Path::new(SETTINGS_FILE), |name| std::env::var(name).ok())
}

pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => apply_file_settings(&mut settings, file_cfg),
            Err(err) => tracing::warn!(
                path = %path.display(),
                "ignoring unreadable settings file: {err}"
            ),
        }
    }

    if let Some(v) = env("PEOPLE_API_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = env("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Some(ms) = env("APP__TOAST_TTL_MS").and_then(|v| v.parse::<u64>().ok()) {
        settings.toast_ttl = Duration::from_millis(ms);
    }
    if let Some(ms) = env("APP__SEARCH_DEBOUNCE_MS").and_then(|v| v.parse::<u64>().ok()) {
        settings.search_debounce = Duration::from_millis(ms);
    }
    if let Some(secs) = env("APP__REQUEST_TIMEOUT_SECS").and_then(|v| v.parse::<u64>().ok()) {
        settings.request_timeout = Duration::from_secs(secs);
    }

    settings
}

fn apply_file_settings(settings: &mut ClientSettings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.api_base_url {
        settings.api_base_url = v;
    }
    if let Some(ms) = file_cfg.toast_ttl_ms {
        settings.toast_ttl = Duration::from_millis(ms);
    }
    if let Some(ms) = file_cfg.search_debounce_ms {
        settings.search_debounce = Duration::from_millis(ms);
    }
    if let Some(secs) = file_cfg.request_timeout_secs {
        settings.request_timeout = Duration::from_secs(secs);
    }
}

/// Validates an API collection URL and strips trailing slashes so `{base}/{id}` joins cleanly.
pub fn normalize_api_base_url(raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(DEFAULT_API_BASE_URL.to_string());
    }

    let parsed = Url::parse(trimmed).with_context(|| format!("invalid API base url '{trimmed}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(anyhow!(
            "unsupported API base url scheme '{}' (expected http or https)",
            parsed.scheme()
        ));
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        env,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn missing_file_yields_defaults() {
        let settings = load_settings_from(Path::new("/nonexistent/people.toml"), no_env);
        assert_eq!(settings, ClientSettings::default());
        assert_eq!(settings.toast_ttl, Duration::from_secs(5));
    }

    #[test]
    fn file_values_are_overridden_by_env() {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let path = env::temp_dir().join(format!("people_settings_test_{suffix}.toml"));
        fs::write(
            &path,
            "api_base_url = \"http://file.local/users\"\ntoast_ttl_ms = 1500\nsearch_debounce_ms = 50\n",
        )
        .expect("write settings");

        let vars = HashMap::from([("APP__API_BASE_URL", "http://env.local/users")]);
        let settings = load_settings_from(&path, |name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(settings.api_base_url, "http://env.local/users");
        assert_eq!(settings.toast_ttl, Duration::from_millis(1500));
        assert_eq!(settings.search_debounce, Duration::from_millis(50));
        assert_eq!(settings.request_timeout, Duration::from_secs(30));

        fs::remove_file(path).expect("cleanup");
    }

    #[test]
    fn normalizes_trailing_slash_and_rejects_other_schemes() {
        assert_eq!(
            normalize_api_base_url("http://localhost:3000/users/").expect("valid"),
            "http://localhost:3000/users"
        );
        assert_eq!(
            normalize_api_base_url("  ").expect("default"),
            DEFAULT_API_BASE_URL
        );
        assert!(normalize_api_base_url("ftp://example.com/users").is_err());
        assert!(normalize_api_base_url("not a url").is_err());
    }
}
