use std::fmt;

use tracing::warn;

use crate::app::Application;
use crate::config;
use crate::error::RuntimeError;
use crate::labels::{self, LabelSet};
use crate::runtime::ContainerRuntime;

pub const SITE_STOPPED: &str = "stopped";
pub const SITE_NOT_FOUND: &str = "not found";
pub const SITE_DIR_MISSING: &str = "app directory missing";
pub const SITE_CONFIG_MISSING: &str = ".ddev/config.yaml missing";
pub const SITE_QUERY_FAILED: &str = "status unavailable";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteStatus {
    /// Web container is up; carries the runtime's state string.
    Running(String),
    Stopped,
    NotFound,
    DirMissing,
    ConfigMissing,
}

impl fmt::Display for SiteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteStatus::Running(state) => f.write_str(state),
            SiteStatus::Stopped => f.write_str(SITE_STOPPED),
            SiteStatus::NotFound => f.write_str(SITE_NOT_FOUND),
            SiteStatus::DirMissing => f.write_str(SITE_DIR_MISSING),
            SiteStatus::ConfigMissing => f.write_str(SITE_CONFIG_MISSING),
        }
    }
}

/// Derive the status of `app` from its root directory and its web container.
pub async fn site_status<R: ContainerRuntime>(
    runtime: &R,
    app: &Application,
) -> Result<SiteStatus, RuntimeError> {
    if !app.root().is_dir() {
        return Ok(SiteStatus::DirMissing);
    }
    if !config::has_marker(app.root()) {
        return Ok(SiteStatus::ConfigMissing);
    }

    let query = LabelSet::new()
        .with(labels::SITE_NAME, app.name())
        .with(labels::SERVICE, labels::WEB_SERVICE);
    let web = runtime.find_by_labels(&query).await?;

    Ok(match web.first() {
        None => SiteStatus::NotFound,
        Some(c) if c.state == "running" => SiteStatus::Running(c.state.clone()),
        Some(_) => SiteStatus::Stopped,
    })
}

/// Status text for one listing row. A failed runtime query only affects this
/// app's row.
pub async fn status_label<R: ContainerRuntime>(runtime: &R, app: &Application) -> String {
    match site_status(runtime, app).await {
        Ok(status) => status.to_string(),
        Err(e) => {
            warn!(site = app.name(), error = %e, "could not determine status");
            SITE_QUERY_FAILED.to_string()
        }
    }
}

/// How a status string should be highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Treatment {
    Warning,
    Error,
    Normal,
}

impl Treatment {
    pub fn classify(status: &str) -> Self {
        if status.contains(SITE_STOPPED) {
            Treatment::Warning
        } else if [
            SITE_NOT_FOUND,
            SITE_DIR_MISSING,
            SITE_CONFIG_MISSING,
            SITE_QUERY_FAILED,
        ]
            .iter()
            .any(|s| status.contains(s))
        {
            Treatment::Error
        } else {
            Treatment::Normal
        }
    }
}
