use std::collections::{BTreeMap, HashMap};

/// Present on every container this tool manages.
pub const PLATFORM: &str = "com.ddev.platform";
pub const SERVICE: &str = "com.docker.compose.service";
pub const APP_ROOT: &str = "com.ddev.approot";
pub const SITE_NAME: &str = "com.ddev.site-name";
pub const APP_TYPE: &str = "com.ddev.app-type";
/// Set by compose on the volumes it creates for a project.
pub const COMPOSE_PROJECT: &str = "com.docker.compose.project";

pub const WEB_SERVICE: &str = "web";
pub const PROJECT_PREFIX: &str = "ddev";

/// Key/value labels an object must carry to match a query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSet {
    entries: BTreeMap<String, String>,
}

impl LabelSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// True when every entry is present with an equal value in `labels`.
    pub fn matches(&self, labels: &HashMap<String, String>) -> bool {
        self.entries
            .iter()
            .all(|(k, v)| labels.get(k).is_some_and(|have| have == v))
    }

    /// Docker `label=` filter values, one per entry.
    pub fn to_filters(&self) -> Vec<String> {
        self.iter().map(|(k, v)| format!("{k}={v}")).collect()
    }
}

/// Compose project name for a site, which is also the label on its volumes.
pub fn project_name(site: &str) -> String {
    format!("{PROJECT_PREFIX}{}", site.to_lowercase())
}
