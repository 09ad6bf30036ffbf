use anyhow::Result;
use chrono::Duration;
use serde::Deserialize;
use tracing::info;

use crate::tracker::error::Error;
use crate::tracker::Entry;
use crate::tracker::Project;

use super::Config;
use super::Store;
use super::CURRENT_VERSION;

/// The version-0 layout: a flat list of projects whose names are full
/// `/`-separated paths, hierarchy implied by the names alone.
#[derive(Debug, Deserialize, Default)]
struct LegacyStore {
    #[serde(default)]
    config: Config,
    #[serde(default)]
    projects: Vec<LegacyProject>,
}

#[derive(Debug, Deserialize)]
struct LegacyProject {
    name: String,
    #[serde(default)]
    is_running: bool,
    #[serde(default)]
    is_archived: bool,
    #[serde(default)]
    entries: Vec<Entry>,
}

/// Brings a parsed document up to the current layout. Documents already at
/// the current version deserialize directly; version-0 documents get their
/// flat name list rebuilt into a real tree.
pub fn upgrade(value: serde_json::Value) -> Result<Store> {
    let version = value
        .pointer("/config/version")
        .and_then(serde_json::Value::as_u64)
        .unwrap_or(0);
    if version >= u64::from(CURRENT_VERSION) {
        return Ok(serde_json::from_value(value)?);
    }

    let legacy: LegacyStore = serde_json::from_value(value)?;
    info!("Upgrading flat project list to the tree layout");

    let mut projects = legacy.projects;
    // Sorted names put parents before their children, so every record lands
    // on a node inserted for it rather than on an auto-created stub.
    projects.sort_by(|a, b| a.name.cmp(&b.name));

    let mut root = Project::default();
    for legacy_project in projects {
        match root.insert(&legacy_project.name) {
            Err(Error::EmptyName) => continue,
            // Already present as an auto-created intermediate: fill it in.
            Ok(_) | Err(_) => {}
        }
        let Some(node) = root.node_mut(&legacy_project.name) else {
            continue;
        };
        node.is_running = legacy_project.is_running;
        node.is_archived = legacy_project.is_archived;
        node.entries = legacy_project.entries;
        for entry in &mut node.entries {
            // Old files wrote the zero time instead of omitting `end`.
            if entry.end.is_some_and(|end| end < entry.start) {
                entry.end = None;
                entry.duration = Duration::zero();
            }
        }
    }

    let mut config = legacy.config;
    config.version = CURRENT_VERSION;
    Ok(Store { config, root })
}
