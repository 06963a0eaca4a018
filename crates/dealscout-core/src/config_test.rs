use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated with valid defaults.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("DEALSCOUT_CATALOG_API_KEY", "catalog-key");
    m.insert("DEALSCOUT_DIRECTORY_URL", "https://directory.example.com");
    m.insert("DEALSCOUT_DIRECTORY_KEY", "anon-key");
    m
}

#[test]
fn parse_environment_known_values() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "DEALSCOUT_ENV"));
}

#[test]
fn build_app_config_fails_without_catalog_api_key() {
    let mut map = full_env();
    map.remove("DEALSCOUT_CATALOG_API_KEY");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "DEALSCOUT_CATALOG_API_KEY"),
        "expected MissingEnvVar(DEALSCOUT_CATALOG_API_KEY), got: {result:?}"
    );
}

#[test]
fn build_app_config_treats_blank_api_key_as_missing() {
    let mut map = full_env();
    map.insert("DEALSCOUT_CATALOG_API_KEY", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::MissingEnvVar(_))));
}

#[test]
fn build_app_config_fails_without_any_directory() {
    let mut map = full_env();
    map.remove("DEALSCOUT_DIRECTORY_URL");
    map.remove("DEALSCOUT_DIRECTORY_KEY");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "DEALSCOUT_DIRECTORY_URL"),
        "expected MissingEnvVar(DEALSCOUT_DIRECTORY_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_requires_directory_key_with_url() {
    let mut map = full_env();
    map.remove("DEALSCOUT_DIRECTORY_KEY");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "DEALSCOUT_DIRECTORY_KEY"),
        "expected MissingEnvVar(DEALSCOUT_DIRECTORY_KEY), got: {result:?}"
    );
}

#[test]
fn build_app_config_falls_back_to_dealers_file() {
    let mut map = full_env();
    map.remove("DEALSCOUT_DIRECTORY_URL");
    map.remove("DEALSCOUT_DIRECTORY_KEY");
    map.insert("DEALSCOUT_DEALERS_PATH", "./config/dealers.yaml");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.directory,
        DirectorySource::File(PathBuf::from("./config/dealers.yaml"))
    );
}

#[test]
fn build_app_config_succeeds_with_defaults() {
    let map = full_env();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.catalog_url, DEFAULT_CATALOG_URL);
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "dealscout/0.1 (inventory-search)");
    assert_eq!(cfg.page_size, 50);
    assert_eq!(cfg.max_pages, 10);
    assert_eq!(cfg.inter_page_delay_ms, 250);
    assert_eq!(cfg.suggest_debounce_ms, 300);
    assert_eq!(cfg.status_settle_ms, 300);
    assert_eq!(cfg.suggestion_limit, 10);
    assert_eq!(cfg.results_per_page, 21);
    assert!(matches!(cfg.directory, DirectorySource::Rest { .. }));
}

#[test]
fn build_app_config_overrides_paging_budget() {
    let mut map = full_env();
    map.insert("DEALSCOUT_PAGE_SIZE", "25");
    map.insert("DEALSCOUT_MAX_PAGES", "4");
    map.insert("DEALSCOUT_INTER_PAGE_DELAY_MS", "0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.page_size, 25);
    assert_eq!(cfg.max_pages, 4);
    assert_eq!(cfg.inter_page_delay_ms, 0);
}

#[test]
fn build_app_config_rejects_non_numeric_page_size() {
    let mut map = full_env();
    map.insert("DEALSCOUT_PAGE_SIZE", "fifty");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "DEALSCOUT_PAGE_SIZE"),
        "expected InvalidEnvVar(DEALSCOUT_PAGE_SIZE), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_zero_page_size() {
    let mut map = full_env();
    map.insert("DEALSCOUT_PAGE_SIZE", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "DEALSCOUT_PAGE_SIZE"));
}

#[test]
fn build_app_config_rejects_invalid_settle_delay() {
    let mut map = full_env();
    map.insert("DEALSCOUT_STATUS_SETTLE_MS", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "DEALSCOUT_STATUS_SETTLE_MS")
    );
}

#[test]
fn debug_output_redacts_secrets() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("catalog-key"), "{rendered}");
    assert!(!rendered.contains("anon-key"), "{rendered}");
    assert!(rendered.contains("[redacted]"));
}
