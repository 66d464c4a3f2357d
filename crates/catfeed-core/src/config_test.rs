use std::collections::HashMap;
use std::env::VarError;

use super::build_app_config;
use crate::{ConfigError, Environment};

/// Builds a lookup function over a fixed set of env vars.
fn lookup_from<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key: &str| map.get(key).cloned().ok_or(VarError::NotPresent)
}

fn minimal_vars() -> Vec<(&'static str, &'static str)> {
    vec![
        ("CATFEED_BASE_URL", "https://shop.example.com/rest/V1"),
        ("CATFEED_ADMIN_TOKEN", "secret-token"),
    ]
}

#[test]
fn missing_base_url_is_an_error() {
    let result = build_app_config(lookup_from(&[("CATFEED_ADMIN_TOKEN", "t")]));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref var)) if var == "CATFEED_BASE_URL")
    );
}

#[test]
fn missing_admin_token_is_an_error() {
    let result = build_app_config(lookup_from(&[(
        "CATFEED_BASE_URL",
        "https://shop.example.com/rest/V1",
    )]));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref var)) if var == "CATFEED_ADMIN_TOKEN")
    );
}

#[test]
fn minimal_config_applies_documented_defaults() {
    let vars = minimal_vars();
    let config = build_app_config(lookup_from(&vars)).expect("minimal config should load");

    assert_eq!(config.env, Environment::Development);
    assert_eq!(config.log_level, "info");
    assert_eq!(config.request_timeout_secs, 30);
    assert_eq!(config.max_retries, 2);
    assert_eq!(config.retry_backoff_base_ms, 500);
    assert_eq!(config.page_size, 100);
    assert_eq!(config.max_pages, 20);
    assert_eq!(config.category_batch_size, 25);
    assert_eq!(config.inventory_batch_size, 40);
    assert_eq!(config.max_concurrent, 15);
    assert_eq!(config.inter_chunk_delay_ms, 80);
    assert_eq!(config.pipeline_deadline_secs, None);
}

#[test]
fn overrides_are_parsed() {
    let mut vars = minimal_vars();
    vars.push(("CATFEED_ENV", "production"));
    vars.push(("CATFEED_PAGE_SIZE", "50"));
    vars.push(("CATFEED_MAX_CONCURRENT", "8"));
    vars.push(("CATFEED_PIPELINE_DEADLINE_SECS", "600"));

    let config = build_app_config(lookup_from(&vars)).expect("config should load");
    assert_eq!(config.env, Environment::Production);
    assert_eq!(config.page_size, 50);
    assert_eq!(config.max_concurrent, 8);
    assert_eq!(config.pipeline_deadline_secs, Some(600));
}

#[test]
fn non_numeric_page_size_is_an_error() {
    let mut vars = minimal_vars();
    vars.push(("CATFEED_PAGE_SIZE", "lots"));
    let result = build_app_config(lookup_from(&vars));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CATFEED_PAGE_SIZE")
    );
}

#[test]
fn zero_page_size_is_an_error() {
    let mut vars = minimal_vars();
    vars.push(("CATFEED_PAGE_SIZE", "0"));
    let result = build_app_config(lookup_from(&vars));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CATFEED_PAGE_SIZE")
    );
}

#[test]
fn zero_max_pages_is_an_error() {
    let mut vars = minimal_vars();
    vars.push(("CATFEED_MAX_PAGES", "0"));
    let result = build_app_config(lookup_from(&vars));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CATFEED_MAX_PAGES")
    );
}

#[test]
fn unknown_environment_falls_back_to_development() {
    let mut vars = minimal_vars();
    vars.push(("CATFEED_ENV", "staging"));
    let config = build_app_config(lookup_from(&vars)).expect("config should load");
    assert_eq!(config.env, Environment::Development);
}

#[test]
fn debug_output_redacts_the_admin_token() {
    let vars = minimal_vars();
    let config = build_app_config(lookup_from(&vars)).expect("config should load");
    let rendered = format!("{config:?}");
    assert!(!rendered.contains("secret-token"));
    assert!(rendered.contains("[redacted]"));
}
