use tracing::{debug, info};

use crate::error::RuntimeError;
use crate::labels::{self, LabelSet};
use crate::runtime::{ContainerRecord, ContainerRuntime, RemoveOptions};

pub const ROUTER_NOT_RUNNING: &str = "not running";

/// Shared ingress in front of every app.
#[allow(async_fn_in_trait)]
pub trait Router {
    /// Bring the router in line with the apps that currently exist.
    async fn reconcile(&self) -> Result<(), RuntimeError>;
}

/// Whether any container carries the platform marker label.
///
/// Only label presence counts: a stopped but not yet removed container still
/// reports true.
pub async fn any_running<R: ContainerRuntime>(runtime: &R) -> Result<bool, RuntimeError> {
    let containers = runtime.find_by_labels(&LabelSet::new()).await?;
    Ok(containers
        .iter()
        .any(|c| c.labels.contains_key(labels::PLATFORM)))
}

async fn find_named<R: ContainerRuntime>(
    runtime: &R,
    name: &str,
) -> Result<Option<ContainerRecord>, RuntimeError> {
    let containers = runtime.find_by_labels(&LabelSet::new()).await?;
    Ok(containers.into_iter().find(|c| c.display_name() == name))
}

/// State of the router container, or [`ROUTER_NOT_RUNNING`].
pub async fn router_status<R: ContainerRuntime>(
    runtime: &R,
    name: &str,
) -> Result<String, RuntimeError> {
    Ok(find_named(runtime, name)
        .await?
        .map(|c| c.state)
        .unwrap_or_else(|| ROUTER_NOT_RUNNING.to_string()))
}

/// Router that is itself a container on the runtime. It is shut down once no
/// managed containers are left and otherwise left alone.
pub struct RuntimeRouter<'a, R> {
    runtime: &'a R,
    name: String,
    stop_timeout_secs: i32,
}

impl<'a, R: ContainerRuntime> RuntimeRouter<'a, R> {
    pub fn new(runtime: &'a R, name: impl Into<String>, stop_timeout_secs: i32) -> Self {
        Self {
            runtime,
            name: name.into(),
            stop_timeout_secs,
        }
    }
}

impl<R: ContainerRuntime> Router for RuntimeRouter<'_, R> {
    async fn reconcile(&self) -> Result<(), RuntimeError> {
        if any_running(self.runtime).await? {
            debug!(router = %self.name, "managed containers remain, keeping router");
            return Ok(());
        }

        let Some(router) = find_named(self.runtime, &self.name).await? else {
            return Ok(());
        };
        if router.is_active() {
            info!(router = %self.name, "stopping router");
            self.runtime
                .stop_container(&router.id, self.stop_timeout_secs)
                .await?;
        }
        self.runtime
            .remove_container(
                &router.id,
                RemoveOptions {
                    remove_volumes: true,
                    force: true,
                },
            )
            .await
    }
}
