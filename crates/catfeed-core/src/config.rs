use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_nonzero_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let value = parse_u32(var, default)?;
        if value == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(value)
    };

    let base_url = require("CATFEED_BASE_URL")?;
    let admin_token = require("CATFEED_ADMIN_TOKEN")?;

    let env = parse_environment(&or_default("CATFEED_ENV", "development"));
    let log_level = or_default("CATFEED_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("CATFEED_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("CATFEED_USER_AGENT", "catfeed/0.1 (catalog-export)");
    let max_retries = parse_u32("CATFEED_MAX_RETRIES", "2")?;
    let retry_backoff_base_ms = parse_u64("CATFEED_RETRY_BACKOFF_BASE_MS", "500")?;

    let page_size = parse_nonzero_u32("CATFEED_PAGE_SIZE", "100")?;
    let max_pages = parse_nonzero_u32("CATFEED_MAX_PAGES", "20")?;
    let category_batch_size = parse_usize("CATFEED_CATEGORY_BATCH_SIZE", "25")?;
    let inventory_batch_size = parse_usize("CATFEED_INVENTORY_BATCH_SIZE", "40")?;
    let max_concurrent = parse_usize("CATFEED_MAX_CONCURRENT", "15")?;
    let inter_chunk_delay_ms = parse_u64("CATFEED_INTER_CHUNK_DELAY_MS", "80")?;

    let pipeline_deadline_secs = match lookup("CATFEED_PIPELINE_DEADLINE_SECS") {
        Ok(raw) => Some(raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: "CATFEED_PIPELINE_DEADLINE_SECS".to_string(),
            reason: e.to_string(),
        })?),
        Err(_) => None,
    };

    Ok(AppConfig {
        base_url,
        admin_token,
        env,
        log_level,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_ms,
        page_size,
        max_pages,
        category_batch_size,
        inventory_batch_size,
        max_concurrent,
        inter_chunk_delay_ms,
        pipeline_deadline_secs,
    })
}

fn parse_environment(raw: &str) -> Environment {
    match raw.to_ascii_lowercase().as_str() {
        "production" | "prod" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
