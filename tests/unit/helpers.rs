//! In-memory runtime and router that record every call.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::rc::Rc;

use ddev_sweep::error::RuntimeError;
use ddev_sweep::labels::{self, LabelSet};
use ddev_sweep::router::Router;
use ddev_sweep::runtime::{ContainerRecord, ContainerRuntime, RemoveOptions, VolumeRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Find(Vec<String>),
    ListVolumes,
    Stop(String, i32),
    Remove(String),
    RemoveVolume(String),
    Reconcile,
}

pub type CallLog = Rc<RefCell<Vec<Call>>>;

#[derive(Default)]
pub struct FakeRuntime {
    containers: RefCell<Vec<ContainerRecord>>,
    volumes: RefCell<Vec<VolumeRecord>>,
    pub calls: CallLog,
    fail_find: RefCell<HashSet<Vec<String>>>,
    fail_stop: HashSet<String>,
    fail_remove: HashSet<String>,
    fail_remove_volume: HashSet<String>,
    fail_list_volumes: bool,
}

fn rejected<T>(what: &str) -> Result<T, RuntimeError> {
    Err(RuntimeError::Rejected(format!("{what} rejected by fake runtime")))
}

impl FakeRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_container(self, c: ContainerRecord) -> Self {
        self.containers.borrow_mut().push(c);
        self
    }

    pub fn with_volume(self, v: VolumeRecord) -> Self {
        self.volumes.borrow_mut().push(v);
        self
    }

    /// Queries for exactly `labels` fail.
    pub fn failing_find(self, labels: &LabelSet) -> Self {
        self.fail_find.borrow_mut().insert(labels.to_filters());
        self
    }

    pub fn failing_stop(mut self, id: &str) -> Self {
        self.fail_stop.insert(id.to_string());
        self
    }

    pub fn failing_remove(mut self, id: &str) -> Self {
        self.fail_remove.insert(id.to_string());
        self
    }

    pub fn failing_remove_volume(mut self, name: &str) -> Self {
        self.fail_remove_volume.insert(name.to_string());
        self
    }

    pub fn failing_list_volumes(mut self) -> Self {
        self.fail_list_volumes = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Calls that change runtime state, in order.
    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Stop(..) | Call::Remove(_) | Call::RemoveVolume(_) | Call::Reconcile))
            .collect()
    }

    pub fn container_ids(&self) -> Vec<String> {
        self.containers.borrow().iter().map(|c| c.id.clone()).collect()
    }

    pub fn volume_names(&self) -> Vec<String> {
        self.volumes.borrow().iter().map(|v| v.name.clone()).collect()
    }

    pub fn router(&self) -> FakeRouter {
        FakeRouter {
            calls: Rc::clone(&self.calls),
            fail: false,
        }
    }
}

impl ContainerRuntime for FakeRuntime {
    async fn find_by_labels(&self, labels: &LabelSet) -> Result<Vec<ContainerRecord>, RuntimeError> {
        let filters = labels.to_filters();
        self.calls.borrow_mut().push(Call::Find(filters.clone()));
        if self.fail_find.borrow().contains(&filters) {
            return rejected("container list");
        }
        Ok(self
            .containers
            .borrow()
            .iter()
            .filter(|c| labels.matches(&c.labels))
            .cloned()
            .collect())
    }

    async fn list_volumes(&self) -> Result<Vec<VolumeRecord>, RuntimeError> {
        self.calls.borrow_mut().push(Call::ListVolumes);
        if self.fail_list_volumes {
            return rejected("volume list");
        }
        Ok(self.volumes.borrow().clone())
    }

    async fn stop_container(&self, id: &str, timeout_secs: i32) -> Result<(), RuntimeError> {
        self.calls
            .borrow_mut()
            .push(Call::Stop(id.to_string(), timeout_secs));
        if self.fail_stop.contains(id) {
            return rejected("stop");
        }
        for c in self.containers.borrow_mut().iter_mut().filter(|c| c.id == id) {
            c.state = "exited".to_string();
        }
        Ok(())
    }

    async fn remove_container(&self, id: &str, opts: RemoveOptions) -> Result<(), RuntimeError> {
        assert!(opts.force && opts.remove_volumes, "removal must be forced with volumes");
        self.calls.borrow_mut().push(Call::Remove(id.to_string()));
        if self.fail_remove.contains(id) {
            return rejected("remove");
        }
        self.containers.borrow_mut().retain(|c| c.id != id);
        Ok(())
    }

    async fn remove_volume(&self, name: &str) -> Result<(), RuntimeError> {
        self.calls
            .borrow_mut()
            .push(Call::RemoveVolume(name.to_string()));
        if self.fail_remove_volume.contains(name) {
            return rejected("volume remove");
        }
        self.volumes.borrow_mut().retain(|v| v.name != name);
        Ok(())
    }
}

pub struct FakeRouter {
    calls: CallLog,
    pub fail: bool,
}

impl Router for FakeRouter {
    async fn reconcile(&self) -> Result<(), RuntimeError> {
        self.calls.borrow_mut().push(Call::Reconcile);
        if self.fail {
            return rejected("reconcile");
        }
        Ok(())
    }
}

// ── Fixtures ──────────────────────────────────────────────────────────────────

pub fn container(id: &str, name: &str, state: &str, labels: &[(&str, &str)]) -> ContainerRecord {
    ContainerRecord {
        id: id.to_string(),
        names: vec![format!("/{name}")],
        state: state.to_string(),
        labels: labels
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}

/// A web container labeled the way ddev labels it.
pub fn web_container(id: &str, site: &str, root: &Path, state: &str) -> ContainerRecord {
    let root = root.to_string_lossy();
    container(
        id,
        &format!("ddev-{site}-web"),
        state,
        &[
            (labels::PLATFORM, "ddev"),
            (labels::SERVICE, labels::WEB_SERVICE),
            (labels::SITE_NAME, site),
            (labels::APP_TYPE, "drupal8"),
            (labels::APP_ROOT, root.as_ref()),
        ],
    )
}

pub fn db_container(id: &str, site: &str, state: &str) -> ContainerRecord {
    container(
        id,
        &format!("ddev-{site}-db"),
        state,
        &[
            (labels::PLATFORM, "ddev"),
            (labels::SERVICE, "db"),
            (labels::SITE_NAME, site),
        ],
    )
}

pub fn volume(name: &str, project: &str) -> VolumeRecord {
    let mut labels = HashMap::new();
    labels.insert(labels::COMPOSE_PROJECT.to_string(), project.to_string());
    VolumeRecord {
        name: name.to_string(),
        labels,
    }
}

/// Writes `<root>/.ddev/config.yaml`.
pub fn write_config(root: &Path, name: &str, app_type: &str) {
    fs::create_dir_all(root.join(".ddev")).expect("mkdir .ddev");
    fs::write(
        root.join(".ddev").join("config.yaml"),
        format!("name: {name}\ntype: {app_type}\n"),
    )
    .expect("write config");
}
