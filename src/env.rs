use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

use tracing::warn;

/// Load `<cwd>/.env` into the process env. Variables already set win.
/// Returns whether a file was loaded.
///
/// Runs before logging is set up, so the caller reports the outcome.
pub fn load_env(cwd: &Path) -> Result<bool, dotenvy::Error> {
    let file = cwd.join(".env");
    if !file.exists() {
        return Ok(false);
    }
    dotenvy::from_path(&file)?;
    Ok(true)
}

pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Parse `key`, falling back to `default` when unset or malformed.
pub fn env_parse_or<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
{
    let Ok(raw) = std::env::var(key) else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(v) => v,
        Err(_) => {
            warn!(key, value = %raw, fallback = %default, "invalid value, using default");
            default
        }
    }
}
