//! Discovery and teardown of ddev-style development environments.
//!
//! Apps are found through labels on their containers. [`registry::discover`]
//! builds the working set, [`status::site_status`] describes each app and
//! [`teardown::cleanup`] removes an app's containers and volumes.

pub mod app;
pub mod config;
pub mod docker;
pub mod env;
pub mod error;
pub mod labels;
pub mod registry;
pub mod router;
pub mod runtime;
pub mod status;
pub mod teardown;
pub mod ui;
