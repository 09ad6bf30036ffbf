use std::fs::File;
use std::io::ErrorKind;
use std::io::Read;
use std::io::Write;
use std::path::Path;

use anyhow::Result;
use fs4::fs_std::FileExt;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::tracker::Project;

pub mod migrate;

pub const CURRENT_VERSION: u32 = 1;
pub const DEFAULT_DATE_FORMAT: &str = "%m/%d";
pub const DEFAULT_TIME_FORMAT: &str = "%H:%M:%S";

/// How dates and times are rendered in reports, plus the storage format
/// revision the document was written with.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub date_format: String,
    #[serde(default)]
    pub time_format: String,
    #[serde(default)]
    pub version: u32,
}

/// The whole persisted document: one config, one project tree. Everything
/// the tool needs lives in a single JSON file that is read in full, mutated
/// in memory and written back in full.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone, Default)]
pub struct Store {
    #[serde(default)]
    pub config: Config,
    #[serde(default)]
    pub root: Project,
}

impl Store {
    fn fresh() -> Self {
        let mut store = Store::default();
        store.config.version = CURRENT_VERSION;
        store.apply_defaults();
        store
    }

    fn apply_defaults(&mut self) {
        if self.config.date_format.is_empty() {
            self.config.date_format = DEFAULT_DATE_FORMAT.to_string();
        }
        if self.config.time_format.is_empty() {
            self.config.time_format = DEFAULT_TIME_FORMAT.to_string();
        }
    }

    /// Reads the document at `path`, upgrading older layouts as needed. A
    /// missing file yields a fresh empty store.
    pub fn load(path: &Path) -> Result<Store> {
        let mut file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No store at {path:?}, starting fresh");
                return Ok(Store::fresh());
            }
            Err(e) => return Err(e.into()),
        };

        file.lock_shared()?;
        let mut text = String::new();
        let read = file.read_to_string(&mut text);
        file.unlock()?;
        read?;

        if text.trim().is_empty() {
            return Ok(Store::fresh());
        }

        let value: serde_json::Value = serde_json::from_str(&text)?;
        let mut store = migrate::upgrade(value)?;
        store.apply_defaults();
        Ok(store)
    }

    /// Writes the document back out, sorting children first so the
    /// serialized order is stable across runs.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        self.root.canonicalize();
        let out = serde_json::to_vec(self)?;

        let mut file = File::create(path)?;
        file.lock_exclusive()?;
        let written = file.write_all(&out).and_then(|()| file.flush());
        file.unlock()?;
        written?;

        debug!("Saved {} bytes to {path:?}", out.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::{Duration, TimeZone, Utc};
    use tempfile::tempdir;

    use crate::utils::logging::TEST_LOGGING;

    use super::{Store, CURRENT_VERSION, DEFAULT_DATE_FORMAT, DEFAULT_TIME_FORMAT};

    #[test]
    fn test_missing_file_yields_fresh_store() -> Result<()> {
        let dir = tempdir()?;
        let store = Store::load(&dir.path().join("absent.json"))?;

        assert!(store.root.children.is_empty());
        assert_eq!(store.config.version, CURRENT_VERSION);
        assert_eq!(store.config.date_format, DEFAULT_DATE_FORMAT);
        assert_eq!(store.config.time_format, DEFAULT_TIME_FORMAT);
        Ok(())
    }

    #[test]
    fn test_round_trip_is_insertion_order_independent() -> Result<()> {
        *TEST_LOGGING;
        let dir = tempdir()?;
        let path = dir.path().join("tally.json");

        let start = Utc.with_ymd_and_hms(2026, 3, 15, 9, 0, 0).unwrap();

        let mut first = Store::fresh();
        first.root.insert("school/cs193")?;
        first.root.insert("home/garden")?;
        let garden = first.root.node_mut("home/garden").unwrap();
        garden.start(start, Some("weeding".into()))?;
        garden.stop(start + Duration::hours(2), None)?;
        first.save(&path)?;

        let mut second = Store::fresh();
        second.root.insert("home/garden")?;
        second.root.insert("school/cs193")?;
        let garden = second.root.node_mut("home/garden").unwrap();
        garden.start(start, Some("weeding".into()))?;
        garden.stop(start + Duration::hours(2), None)?;

        let loaded = Store::load(&path)?;
        second.root.canonicalize();
        assert_eq!(loaded.root, second.root);
        Ok(())
    }

    #[test]
    fn test_load_fills_missing_formats() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("tally.json");
        std::fs::write(
            &path,
            r#"{"config":{"date_format":"%d.%m.%Y","version":1},"root":{"name":""}}"#,
        )?;

        let store = Store::load(&path)?;
        assert_eq!(store.config.date_format, "%d.%m.%Y");
        assert_eq!(store.config.time_format, DEFAULT_TIME_FORMAT);
        Ok(())
    }
}
