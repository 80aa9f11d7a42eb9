//! The slice of the container runtime API this crate consumes.
//!
//! `DockerRuntime` in [`crate::docker`] is the real implementation; tests use
//! an in-memory fake.

use std::collections::HashMap;

use crate::error::RuntimeError;
use crate::labels::LabelSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerRecord {
    pub id: String,
    pub names: Vec<String>,
    pub state: String,
    pub labels: HashMap<String, String>,
}

impl ContainerRecord {
    /// First name without the runtime's leading slash, or the short id.
    pub fn display_name(&self) -> String {
        match self.names.first() {
            Some(name) if !name.trim_start_matches('/').is_empty() => {
                name.trim_start_matches('/').to_string()
            }
            _ => self.id.chars().take(12).collect(),
        }
    }

    /// Running, restarting and paused containers must be stopped before removal.
    pub fn is_active(&self) -> bool {
        matches!(self.state.as_str(), "running" | "restarting" | "paused")
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeRecord {
    pub name: String,
    pub labels: HashMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveOptions {
    /// Also remove anonymous volumes attached to the container.
    pub remove_volumes: bool,
    pub force: bool,
}

#[allow(async_fn_in_trait)]
pub trait ContainerRuntime {
    /// Containers in any state carrying every label in `labels`. An empty set lists all.
    async fn find_by_labels(&self, labels: &LabelSet) -> Result<Vec<ContainerRecord>, RuntimeError>;
    async fn list_volumes(&self) -> Result<Vec<VolumeRecord>, RuntimeError>;
    /// Stop with `timeout_secs` of grace before the runtime kills the container.
    async fn stop_container(&self, id: &str, timeout_secs: i32) -> Result<(), RuntimeError>;
    async fn remove_container(&self, id: &str, opts: RemoveOptions) -> Result<(), RuntimeError>;
    async fn remove_volume(&self, name: &str) -> Result<(), RuntimeError>;
}
