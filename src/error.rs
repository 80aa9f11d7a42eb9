use std::path::PathBuf;
use thiserror::Error;

use crate::app::Platform;

/// A call against the container runtime failed.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Docker(#[from] bollard::errors::Error),

    /// Refusal reported by a runtime that is not backed by the Docker API,
    /// such as the in-memory runtime the unit tests drive.
    #[error("{0}")]
    Rejected(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no .ddev/config.yaml file was found in {} or any parent", start.display())]
    NotFound { start: PathBuf },

    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid config at {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },
}

/// Failures recorded during a discovery pass. None of them abort the pass.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("could not query {platform} containers: {source}")]
    Query {
        platform: Platform,
        #[source]
        source: RuntimeError,
    },

    #[error("container {container} at {} has no usable config and no site name label", root.display())]
    Unrecoverable { container: String, root: PathBuf },
}

/// Teardown stops at the first failing step; the variant names the object involved.
#[derive(Debug, Error)]
pub enum TeardownError {
    #[error("could not list containers for {app}: {source}")]
    ListContainers {
        app: String,
        #[source]
        source: RuntimeError,
    },

    #[error("could not stop container {container}: {source}")]
    Stop {
        container: String,
        #[source]
        source: RuntimeError,
    },

    #[error("could not remove container {container}: {source}")]
    RemoveContainer {
        container: String,
        #[source]
        source: RuntimeError,
    },

    #[error("could not list volumes: {source}")]
    ListVolumes {
        #[source]
        source: RuntimeError,
    },

    #[error("could not remove volume {volume}: {source}")]
    RemoveVolume {
        volume: String,
        #[source]
        source: RuntimeError,
    },

    #[error("router reconcile failed: {source}")]
    Router {
        #[source]
        source: RuntimeError,
    },
}
