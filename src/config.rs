//! Runtime settings resolved from CLI flags, the environment and `.env`.
//!
//! Priority (highest to lowest): CLI flag, environment variable, default.

use std::time::Duration;

use crate::error::AppError;

pub const ENV_API_URL: &str = "PARTNERS_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "PARTNERS_TIMEOUT_SECS";
pub const ENV_PAGE_SIZE: &str = "PARTNERS_PAGE_SIZE";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PAGE_SIZE: u32 = 25;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Base URL of the partnerships API, without trailing slash.
    pub api_url: Option<String>,
    pub timeout: Duration,
    pub page_size: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Settings {
    /// Load settings, letting `api_url_flag` override the environment.
    pub fn load(api_url_flag: Option<&str>) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(api_url_flag, |key| std::env::var(key).ok())
    }

    fn from_lookup(api_url_flag: Option<&str>, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = Self::default();

        let api_url = api_url_flag
            .map(str::to_string)
            .or_else(|| lookup(ENV_API_URL))
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());

        let timeout = match lookup(ENV_TIMEOUT_SECS) {
            Some(raw) => Duration::from_secs(
                raw.trim()
                    .parse()
                    .map_err(|e| AppError::config(format!("Invalid {ENV_TIMEOUT_SECS} '{raw}': {e}")))?,
            ),
            None => defaults.timeout,
        };

        let page_size = match lookup(ENV_PAGE_SIZE) {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or_else(|| AppError::config(format!("Invalid {ENV_PAGE_SIZE} '{raw}': expected a positive integer")))?,
            None => defaults.page_size,
        };

        Ok(Self {
            api_url,
            timeout,
            page_size,
        })
    }

    /// The API base URL, required by every network command.
    pub fn require_api_url(&self) -> Result<&str, AppError> {
        self.api_url
            .as_deref()
            .ok_or_else(|| AppError::config(format!("Missing {ENV_API_URL} in environment (.env) or --api-url.")))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let settings = Settings::from_lookup(None, lookup(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.require_api_url().unwrap_err().exit_code(), 2);
    }

    #[test]
    fn flag_overrides_environment_and_trailing_slash_is_trimmed() {
        let env = lookup(&[(ENV_API_URL, "https://env.example/api")]);
        let settings = Settings::from_lookup(Some("https://flag.example/api/"), env).unwrap();
        assert_eq!(settings.require_api_url().unwrap(), "https://flag.example/api");
    }

    #[test]
    fn reads_numeric_settings() {
        let env = lookup(&[(ENV_TIMEOUT_SECS, "5"), (ENV_PAGE_SIZE, "50")]);
        let settings = Settings::from_lookup(None, env).unwrap();
        assert_eq!(settings.timeout, Duration::from_secs(5));
        assert_eq!(settings.page_size, 50);
    }

    #[test]
    fn rejects_zero_page_size() {
        let err = Settings::from_lookup(None, lookup(&[(ENV_PAGE_SIZE, "0")])).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
