use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// The browser user agent the original page fetches identified as.
const DEFAULT_FETCH_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a set variable holds an unparseable value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a set variable holds an unparseable value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// The parsing/validation logic is decoupled from the actual environment so it
/// can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
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

    let env = parse_environment(&or_default("DAIHYO_ENV", "development"));
    let bind_addr = parse_addr("DAIHYO_BIND_ADDR", "0.0.0.0:8080")?;
    let log_level = or_default("DAIHYO_LOG_LEVEL", "info");

    let search_base_url = or_default(
        "DAIHYO_SEARCH_BASE_URL",
        "https://ecosia1-477268798017.europe-west1.run.app",
    );
    let search_timeout_secs = parse_u64("DAIHYO_SEARCH_TIMEOUT_SECS", "10")?;

    let fetch_timeout_secs = parse_u64("DAIHYO_FETCH_TIMEOUT_SECS", "10")?;
    let fetch_user_agent = or_default("DAIHYO_FETCH_USER_AGENT", DEFAULT_FETCH_USER_AGENT);
    let fetch_max_retries = parse_u32("DAIHYO_FETCH_MAX_RETRIES", "2")?;
    let fetch_backoff_base_ms = parse_u64("DAIHYO_FETCH_BACKOFF_BASE_MS", "500")?;

    let oracle_base_url = or_default("DAIHYO_ORACLE_BASE_URL", "https://openrouter.ai/api/v1");
    let oracle_model = or_default("DAIHYO_ORACLE_MODEL", "openai/gpt-oss-20b:free");
    let oracle_timeout_secs = parse_u64("DAIHYO_ORACLE_TIMEOUT_SECS", "120")?;

    let registry_base_url = or_default(
        "DAIHYO_REGISTRY_BASE_URL",
        "https://www.houjin-bangou.nta.go.jp",
    );
    let registry_timeout_secs = parse_u64("DAIHYO_REGISTRY_TIMEOUT_SECS", "10")?;

    let sheets_base_url = or_default("DAIHYO_SHEETS_BASE_URL", "https://sheets.googleapis.com");
    let sheets_timeout_secs = parse_u64("DAIHYO_SHEETS_TIMEOUT_SECS", "30")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        search_base_url,
        search_timeout_secs,
        fetch_timeout_secs,
        fetch_user_agent,
        fetch_max_retries,
        fetch_backoff_base_ms,
        oracle_base_url,
        oracle_model,
        oracle_timeout_secs,
        registry_base_url,
        registry_timeout_secs,
        sheets_base_url,
        sheets_timeout_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
