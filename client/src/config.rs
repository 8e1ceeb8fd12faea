//! Client configuration.
//!
//! The backend base URL is baked into the bundle at compile time from
//! `TORAXVIEW_API_URL`; the remaining knobs are timing and validation
//! constants shared by the analysis flow.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_API_BASE_URL: &str = "https://backend-toraxview.onrender.com";
pub const DEFAULT_NOTICE_TTL_MS: u64 = 3_000;
pub const DEFAULT_REDIRECT_DELAY_MS: u64 = 3_000;
pub const DEFAULT_MIN_OBSERVATION_CHARS: usize = 10;
/// Period of the app-wide tick that expires notices and fires redirects.
pub const TICK_INTERVAL_MS: u32 = 250;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL without trailing slash.
    pub api_base_url: String,
    /// Lifetime of a transient notice.
    pub notice_ttl_ms: u64,
    /// Delay between a successful save and the redirect to history.
    pub redirect_delay_ms: u64,
    /// Minimum trimmed length of the observation before saving.
    pub min_observation_chars: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            notice_ttl_ms: DEFAULT_NOTICE_TTL_MS,
            redirect_delay_ms: DEFAULT_REDIRECT_DELAY_MS,
            min_observation_chars: DEFAULT_MIN_OBSERVATION_CHARS,
        }
    }
}

impl ClientConfig {
    /// Build config from the values captured at compile time.
    ///
    /// Optional:
    /// - `TORAXVIEW_API_URL`: backend base URL
    /// - `TORAXVIEW_NOTICE_TTL_MS`: default 3000
    /// - `TORAXVIEW_REDIRECT_DELAY_MS`: default 3000
    /// - `TORAXVIEW_MIN_OBSERVATION_CHARS`: default 10
    #[must_use]
    pub fn load() -> Self {
        Self::from_values(
            option_env!("TORAXVIEW_API_URL"),
            option_env!("TORAXVIEW_NOTICE_TTL_MS"),
            option_env!("TORAXVIEW_REDIRECT_DELAY_MS"),
            option_env!("TORAXVIEW_MIN_OBSERVATION_CHARS"),
        )
    }

    /// Build config from raw optional strings; blank or unparseable values
    /// fall back to defaults.
    #[must_use]
    pub fn from_values(
        api_url: Option<&str>,
        notice_ttl_ms: Option<&str>,
        redirect_delay_ms: Option<&str>,
        min_observation_chars: Option<&str>,
    ) -> Self {
        let api_base_url = api_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_API_BASE_URL)
            .trim_end_matches('/')
            .to_owned();
        Self {
            api_base_url,
            notice_ttl_ms: parse_or(notice_ttl_ms, DEFAULT_NOTICE_TTL_MS),
            redirect_delay_ms: parse_or(redirect_delay_ms, DEFAULT_REDIRECT_DELAY_MS),
            min_observation_chars: parse_or(min_observation_chars, DEFAULT_MIN_OBSERVATION_CHARS),
        }
    }
}

fn parse_or<T: std::str::FromStr>(raw: Option<&str>, default: T) -> T {
    raw.and_then(|v| v.trim().parse::<T>().ok()).unwrap_or(default)
}
