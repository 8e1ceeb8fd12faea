use super::*;

#[test]
fn from_values_defaults_when_unset() {
    let cfg = ClientConfig::from_values(None, None, None, None);
    assert_eq!(cfg, ClientConfig::default());
    assert_eq!(cfg.api_base_url, DEFAULT_API_BASE_URL);
    assert_eq!(cfg.min_observation_chars, 10);
}

#[test]
fn from_values_trims_trailing_slashes() {
    let cfg = ClientConfig::from_values(Some(" https://api.example.test// "), None, None, None);
    assert_eq!(cfg.api_base_url, "https://api.example.test");
}

#[test]
fn from_values_blank_url_falls_back() {
    let cfg = ClientConfig::from_values(Some("   "), None, None, None);
    assert_eq!(cfg.api_base_url, DEFAULT_API_BASE_URL);
}

#[test]
fn from_values_parses_overrides() {
    let cfg = ClientConfig::from_values(Some("http://localhost:8000"), Some("1500"), Some("500"), Some("20"));
    assert_eq!(cfg.api_base_url, "http://localhost:8000");
    assert_eq!(cfg.notice_ttl_ms, 1500);
    assert_eq!(cfg.redirect_delay_ms, 500);
    assert_eq!(cfg.min_observation_chars, 20);
}

#[test]
fn from_values_ignores_garbage_numbers() {
    let cfg = ClientConfig::from_values(None, Some("soon"), Some("-1"), Some("ten"));
    assert_eq!(cfg.notice_ttl_ms, DEFAULT_NOTICE_TTL_MS);
    assert_eq!(cfg.redirect_delay_ms, DEFAULT_REDIRECT_DELAY_MS);
    assert_eq!(cfg.min_observation_chars, DEFAULT_MIN_OBSERVATION_CHARS);
}
