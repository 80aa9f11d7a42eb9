use tracing::info;

use crate::app::Application;
use crate::error::TeardownError;
use crate::labels::{self, LabelSet};
use crate::router::Router;
use crate::runtime::{ContainerRuntime, RemoveOptions};

/// What a successful teardown did, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeardownReport {
    pub stopped: Vec<String>,
    pub removed_containers: Vec<String>,
    pub removed_volumes: Vec<String>,
}

/// Stop and remove every container of `app`, reclaim its compose volumes, then
/// let the router reconcile.
///
/// Works from labels alone, so it also cleans up apps whose config was deleted.
/// The first failing step ends the teardown.
pub async fn cleanup<R, T>(
    runtime: &R,
    router: &T,
    app: &Application,
    stop_timeout_secs: i32,
) -> Result<TeardownReport, TeardownError>
where
    R: ContainerRuntime,
    T: Router,
{
    let mut report = TeardownReport::default();
    let site = app.name();

    let query = LabelSet::new().with(labels::SITE_NAME, site);
    let containers = runtime
        .find_by_labels(&query)
        .await
        .map_err(|source| TeardownError::ListContainers {
            app: site.to_string(),
            source,
        })?;

    for c in containers.iter().filter(|c| c.is_active()) {
        let name = c.display_name();
        info!(container = %name, "stopping container");
        runtime
            .stop_container(&c.id, stop_timeout_secs)
            .await
            .map_err(|source| TeardownError::Stop {
                container: name.clone(),
                source,
            })?;
        report.stopped.push(name);
    }

    let opts = RemoveOptions {
        remove_volumes: true,
        force: true,
    };
    for c in &containers {
        let name = c.display_name();
        info!(container = %name, "removing container");
        runtime
            .remove_container(&c.id, opts)
            .await
            .map_err(|source| TeardownError::RemoveContainer {
                container: name.clone(),
                source,
            })?;
        report.removed_containers.push(name);
    }

    let project = labels::project_name(site);
    let volumes = runtime
        .list_volumes()
        .await
        .map_err(|source| TeardownError::ListVolumes { source })?;
    for v in volumes
        .iter()
        .filter(|v| v.labels.get(labels::COMPOSE_PROJECT) == Some(&project))
    {
        info!(volume = %v.name, "removing volume");
        runtime
            .remove_volume(&v.name)
            .await
            .map_err(|source| TeardownError::RemoveVolume {
                volume: v.name.clone(),
                source,
            })?;
        report.removed_volumes.push(v.name.clone());
    }

    router
        .reconcile()
        .await
        .map_err(|source| TeardownError::Router { source })?;

    Ok(report)
}
