//! Configuration loader: merges defaults, config.toml, .env, and env vars.

use std::path::Path;

use common::{AppConfig, Error};

fn parse_positive_u64(raw: &str, env_name: &str) -> Result<u64, Error> {
    let parsed = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| Error::Config(format!("{env_name} must be an integer > 0")))?;
    if parsed == 0 {
        return Err(Error::Config(format!("{env_name} must be an integer > 0")));
    }
    Ok(parsed)
}

fn parse_bool(raw: &str) -> bool {
    let lowered = raw.trim().to_ascii_lowercase();
    lowered != "0" && lowered != "false" && lowered != "no" && lowered != "off"
}

fn validate_config(config: &AppConfig) -> Result<(), Error> {
    let mut issues: Vec<String> = Vec::new();

    if config.port == 0 {
        issues.push("port must be > 0".into());
    }
    if config.ttl_seconds == 0 {
        issues.push("ttl_seconds must be > 0".into());
    }
    if config.database_path.trim().is_empty() {
        issues.push("database_path must not be empty".into());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "Invalid config:\n - {}",
            issues.join("\n - ")
        )))
    }
}

/// Load server configuration from defaults, an optional config file,
/// and environment overrides, in that order.
pub fn load_config(config_path: &Path) -> Result<AppConfig, Error> {
    // 1. Load .env from the working directory or a parent.
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    // 2. Start with defaults.
    let mut config = AppConfig::default();

    // 3. Overlay the config file when present.
    if config_path.exists() {
        let contents = std::fs::read_to_string(config_path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", config_path.display(), e))
        })?;
        config = toml::from_str(&contents).map_err(|e| {
            Error::Config(format!("Failed to parse {}: {}", config_path.display(), e))
        })?;
    }

    // 4. Override with environment variables (highest priority).
    if let Ok(raw) = std::env::var("PORT") {
        config.port = raw
            .trim()
            .parse::<u16>()
            .map_err(|_| Error::Config("PORT must be an integer in 1-65535".into()))?;
    }
    if let Ok(path) = std::env::var("DATABASE_PATH") {
        config.database_path = path;
    }
    if let Ok(raw) = std::env::var("TTL_SECONDS") {
        config.ttl_seconds = parse_positive_u64(&raw, "TTL_SECONDS")?;
    }
    if let Ok(raw) = std::env::var("RECORD_LOSSES") {
        config.record_losses = parse_bool(&raw);
    }

    // 5. Validate everything at once.
    validate_config(&config)?;

    Ok(config)
}
