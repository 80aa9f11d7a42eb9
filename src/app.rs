use std::fmt;
use std::path::{Path, PathBuf};

use crate::config;
use crate::error::ConfigError;

pub const DOMAIN: &str = "ddev.local";

/// Environment kinds this build knows how to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Platform {
    Local,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Local => "local",
        }
    }

    /// Value of the platform marker label on this kind's containers.
    pub fn marker_value(&self) -> &'static str {
        match self {
            Platform::Local => "ddev",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds an app's config from its root directory.
pub type Initializer = fn(&Path) -> Result<AppConfig, ConfigError>;

/// Kind-to-initializer table, built once at startup and handed to discovery.
#[derive(Debug, Clone)]
pub struct PlatformTable {
    entries: Vec<(Platform, Initializer)>,
}

impl PlatformTable {
    pub fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn builtin() -> Self {
        Self::empty().with(Platform::Local, config::load_app_config)
    }

    /// Registers `init` for `platform`, replacing any earlier entry.
    pub fn with(mut self, platform: Platform, init: Initializer) -> Self {
        self.entries.retain(|(p, _)| *p != platform);
        self.entries.push((platform, init));
        self
    }

    pub fn get(&self, platform: Platform) -> Option<Initializer> {
        self.entries
            .iter()
            .find(|(p, _)| *p == platform)
            .map(|(_, init)| *init)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Platform, Initializer)> + '_ {
        self.entries.iter().copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub name: String,
    pub app_type: String,
    pub docroot: String,
    pub root: PathBuf,
}

/// A development environment found through its containers.
///
/// `Degraded` apps have lost their on-disk config; name and type come from the
/// labels on the web container so the user can still see and remove them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Application {
    WellFormed {
        platform: Platform,
        config: AppConfig,
    },
    Degraded {
        platform: Platform,
        root: PathBuf,
        name: String,
        app_type: String,
    },
}

impl Application {
    pub fn name(&self) -> &str {
        match self {
            Application::WellFormed { config, .. } => &config.name,
            Application::Degraded { name, .. } => name,
        }
    }

    pub fn app_type(&self) -> &str {
        match self {
            Application::WellFormed { config, .. } => &config.app_type,
            Application::Degraded { app_type, .. } => app_type,
        }
    }

    pub fn root(&self) -> &Path {
        match self {
            Application::WellFormed { config, .. } => &config.root,
            Application::Degraded { root, .. } => root,
        }
    }

    pub fn platform(&self) -> Platform {
        match self {
            Application::WellFormed { platform, .. } | Application::Degraded { platform, .. } => {
                *platform
            }
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}.{DOMAIN}", self.name())
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Application::Degraded { .. })
    }
}
