use std::collections::HashMap;

use bollard::models::ContainerSummary;
use bollard::query_parameters::{
    ListContainersOptionsBuilder, ListVolumesOptions, RemoveContainerOptionsBuilder,
    RemoveVolumeOptions, StopContainerOptionsBuilder,
};
use bollard::Docker;
use tracing::debug;

use crate::error::RuntimeError;
use crate::labels::LabelSet;
use crate::runtime::{ContainerRecord, ContainerRuntime, RemoveOptions, VolumeRecord};

/// [`ContainerRuntime`] backed by the Docker Engine API.
#[derive(Debug, Clone)]
pub struct DockerRuntime {
    client: Docker,
}

impl DockerRuntime {
    /// Connects through `DOCKER_HOST` or the platform's default socket.
    pub fn connect() -> Result<Self, RuntimeError> {
        let client = Docker::connect_with_local_defaults()?;
        Ok(Self { client })
    }

    /// The engine answers a ping.
    pub async fn available(&self) -> bool {
        self.client.ping().await.is_ok()
    }
}

fn to_record(c: ContainerSummary) -> ContainerRecord {
    ContainerRecord {
        id: c.id.unwrap_or_default(),
        names: c.names.unwrap_or_default(),
        state: c
            .state
            .map(|s| s.to_string().to_lowercase())
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "unknown".to_string()),
        labels: c.labels.unwrap_or_default(),
    }
}

impl ContainerRuntime for DockerRuntime {
    async fn find_by_labels(&self, labels: &LabelSet) -> Result<Vec<ContainerRecord>, RuntimeError> {
        let mut filters: HashMap<String, Vec<String>> = HashMap::new();
        if !labels.is_empty() {
            filters.insert("label".to_string(), labels.to_filters());
        }
        let opts = ListContainersOptionsBuilder::default()
            .all(true)
            .filters(&filters)
            .build();

        let found = self.client.list_containers(Some(opts)).await?;
        debug!(count = found.len(), filters = ?labels.to_filters(), "listed containers");
        Ok(found.into_iter().map(to_record).collect())
    }

    async fn list_volumes(&self) -> Result<Vec<VolumeRecord>, RuntimeError> {
        let resp = self.client.list_volumes(None::<ListVolumesOptions>).await?;
        Ok(resp
            .volumes
            .unwrap_or_default()
            .into_iter()
            .map(|v| VolumeRecord {
                name: v.name,
                labels: v.labels,
            })
            .collect())
    }

    async fn stop_container(&self, id: &str, timeout_secs: i32) -> Result<(), RuntimeError> {
        let opts = StopContainerOptionsBuilder::default().t(timeout_secs).build();
        self.client.stop_container(id, Some(opts)).await?;
        Ok(())
    }

    async fn remove_container(&self, id: &str, opts: RemoveOptions) -> Result<(), RuntimeError> {
        let opts = RemoveContainerOptionsBuilder::default()
            .v(opts.remove_volumes)
            .force(opts.force)
            .build();
        self.client.remove_container(id, Some(opts)).await?;
        Ok(())
    }

    async fn remove_volume(&self, name: &str) -> Result<(), RuntimeError> {
        self.client
            .remove_volume(name, None::<RemoveVolumeOptions>)
            .await?;
        Ok(())
    }
}
