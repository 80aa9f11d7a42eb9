//! Maps labeled web containers back to applications.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::app::{Application, Platform, PlatformTable};
use crate::config;
use crate::error::{ConfigError, DiscoveryError};
use crate::labels::{self, LabelSet};
use crate::runtime::{ContainerRecord, ContainerRuntime};

#[derive(Debug, Default)]
pub struct Discovery {
    /// Per kind, in the order the runtime returned the containers.
    pub apps: BTreeMap<Platform, Vec<Application>>,
    pub failures: Vec<DiscoveryError>,
}

impl Discovery {
    pub fn all(&self) -> impl Iterator<Item = &Application> {
        self.apps.values().flatten()
    }

    pub fn find(&self, name: &str) -> Option<&Application> {
        self.all().find(|a| a.name() == name)
    }
}

/// One discovery pass over every kind in `table`.
///
/// A failed query only drops its own kind; containers that cannot be
/// correlated are skipped without affecting their siblings. Failures are
/// logged here and returned in [`Discovery::failures`].
pub async fn discover<R: ContainerRuntime>(runtime: &R, table: &PlatformTable) -> Discovery {
    let mut found = Discovery::default();

    for (platform, init) in table.iter() {
        let query = LabelSet::new()
            .with(labels::PLATFORM, platform.marker_value())
            .with(labels::SERVICE, labels::WEB_SERVICE);

        let containers = match runtime.find_by_labels(&query).await {
            Ok(c) => c,
            Err(source) => {
                warn!(%platform, error = %source, "container query failed");
                found.failures.push(DiscoveryError::Query { platform, source });
                continue;
            }
        };

        let mut apps = Vec::with_capacity(containers.len());
        for container in &containers {
            let Some(root) = container.label(labels::APP_ROOT) else {
                debug!(container = %container.display_name(), "no app root label, skipping");
                continue;
            };
            let root = PathBuf::from(root);

            match init(&root) {
                Ok(config) => apps.push(Application::WellFormed { platform, config }),
                Err(e) => match recover(platform, root, container, &e) {
                    Ok(app) => apps.push(app),
                    Err(failure) => {
                        warn!(%platform, error = %failure, "skipping container");
                        found.failures.push(failure);
                    }
                },
            }
        }
        found.apps.insert(platform, apps);
    }

    found
}

fn recover(
    platform: Platform,
    root: PathBuf,
    container: &ContainerRecord,
    cause: &ConfigError,
) -> Result<Application, DiscoveryError> {
    let Some(name) = container
        .label(labels::SITE_NAME)
        .filter(|n| !n.is_empty())
    else {
        return Err(DiscoveryError::Unrecoverable {
            container: container.display_name(),
            root,
        });
    };
    debug!(site = name, error = %cause, "config unusable, recovering app from labels");

    Ok(Application::Degraded {
        platform,
        root,
        name: name.to_string(),
        app_type: container.label(labels::APP_TYPE).unwrap_or_default().to_string(),
    })
}

/// The app whose root contains `start`.
pub fn active_app(table: &PlatformTable, start: &Path) -> Result<Application, ConfigError> {
    let root = config::locate(start)?;
    let platform = Platform::Local;
    let init = table.get(platform).unwrap_or(config::load_app_config);
    let config = init(&root)?;
    Ok(Application::WellFormed { platform, config })
}
