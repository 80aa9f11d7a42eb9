use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::app::AppConfig;
use crate::env::{env_or, env_parse_or};
use crate::error::ConfigError;

pub const CONFIG_DIR: &str = ".ddev";
pub const CONFIG_FILE: &str = "config.yaml";

const DEFAULT_STOP_TIMEOUT_SECS: i32 = 60;
const DEFAULT_ROUTER_NAME: &str = "ddev-router";
const DEFAULT_APP_TYPE: &str = "php";

/// Runtime knobs read from the process environment (after `.env` is loaded).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Grace period handed to the runtime when stopping a container.
    pub stop_timeout_secs: i32,
    pub router_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            stop_timeout_secs: DEFAULT_STOP_TIMEOUT_SECS,
            router_name: DEFAULT_ROUTER_NAME.to_string(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            stop_timeout_secs: env_parse_or("DDEV_STOP_TIMEOUT", DEFAULT_STOP_TIMEOUT_SECS),
            router_name: env_or("DDEV_ROUTER_NAME", DEFAULT_ROUTER_NAME),
        }
    }
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_DIR).join(CONFIG_FILE)
}

pub fn has_marker(dir: &Path) -> bool {
    config_path(dir).is_file()
}

/// Nearest directory at or above `start` holding `.ddev/config.yaml`.
///
/// Relative starts resolve against the working directory.
pub fn locate(start: &Path) -> Result<PathBuf, ConfigError> {
    let cwd = std::env::current_dir().map_err(|source| ConfigError::Read {
        path: start.to_path_buf(),
        source,
    })?;
    locate_in(&cwd, start)
}

/// [`locate`] with relative starts resolved against `base`.
///
/// The start is made absolute and lexically cleaned before the walk, which
/// takes at most one step per component and so ends at the filesystem root.
pub fn locate_in(base: &Path, start: &Path) -> Result<PathBuf, ConfigError> {
    let mut dir = clean(&base.join(start));
    if has_marker(&dir) {
        return Ok(dir);
    }

    for _ in 0..dir.components().count() {
        let Some(parent) = dir.parent().map(Path::to_path_buf) else {
            break;
        };
        dir = parent;
        if has_marker(&dir) {
            debug!(root = %dir.display(), "found config marker");
            return Ok(dir);
        }
    }

    Err(ConfigError::NotFound {
        start: start.to_path_buf(),
    })
}

/// Drops `.` and resolves `..` against the preceding component.
fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for part in path.components() {
        match part {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    name: Option<String>,
    #[serde(rename = "type")]
    app_type: Option<String>,
    docroot: Option<String>,
}

/// Reads the app config under `root`. Unknown keys are ignored.
pub fn load_app_config(root: &Path) -> Result<AppConfig, ConfigError> {
    let path = config_path(root);
    let text = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;

    // An empty file deserializes to unit, not a mapping.
    let raw: RawConfig = if text.trim().is_empty() {
        RawConfig::default()
    } else {
        serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?
    };

    let name = raw
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .or_else(|| {
            root.file_name()
                .map(|n| n.to_string_lossy().into_owned())
        })
        .unwrap_or_default();
    if name.is_empty() {
        return Err(ConfigError::Invalid {
            path,
            reason: "app name is empty".to_string(),
        });
    }

    Ok(AppConfig {
        name,
        app_type: raw
            .app_type
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_APP_TYPE.to_string()),
        docroot: raw.docroot.unwrap_or_default(),
        root: root.to_path_buf(),
    })
}
