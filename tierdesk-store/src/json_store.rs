//! JSON file store — `root/<product>/<relationship>.heuristic` for active
//! records, `root/<product>/expired/…` for archived ones, `.notes` alongside.
//!
//! The file contents are the raw `Params`/`Value` row arrays, so records
//! written by the legacy system load unchanged.

use std::path::{Path, PathBuf};

use anyhow::Context;

use tierdesk_core::params::ParamTable;

use crate::{ContractKey, HeuristicStore, Status, StoredHeuristic};

const HEURISTIC_EXT: &str = "heuristic";
const NOTES_EXT: &str = "notes";
const ARCHIVE_DIR: &str = "expired";

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn active_path(&self, key: &ContractKey, ext: &str) -> PathBuf {
        self.root.join(&key.product).join(key.file_stem()).with_extension(ext)
    }

    fn archived_path(&self, key: &ContractKey, ext: &str) -> PathBuf {
        self.root
            .join(&key.product)
            .join(ARCHIVE_DIR)
            .join(key.file_stem())
            .with_extension(ext)
    }

    /// Read whichever of the two locations exists, active first.
    fn read_either(&self, key: &ContractKey, ext: &str) -> anyhow::Result<Option<(String, Status)>> {
        for (path, status) in [
            (self.active_path(key, ext), Status::Active),
            (self.archived_path(key, ext), Status::Archived),
        ] {
            if path.is_file() {
                let content = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path.display()))?;
                return Ok(Some((content, status)));
            }
        }
        Ok(None)
    }

    fn write_active(&self, key: &ContractKey, ext: &str, content: &str) -> anyhow::Result<()> {
        let path = self.active_path(key, ext);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content).with_context(|| format!("writing {}", path.display()))
    }
}

impl HeuristicStore for JsonFileStore {
    fn load(&self, key: &ContractKey) -> anyhow::Result<Option<StoredHeuristic>> {
        match self.read_either(key, HEURISTIC_EXT)? {
            Some((content, status)) => {
                let table: ParamTable = serde_json::from_str(&content)
                    .with_context(|| format!("malformed heuristic record for {key:?}"))?;
                Ok(Some(StoredHeuristic { table, status }))
            }
            None => Ok(None),
        }
    }

    fn save(&self, key: &ContractKey, table: &ParamTable) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(table)?;
        self.write_active(key, HEURISTIC_EXT, &json)
    }

    fn load_notes(&self, key: &ContractKey) -> anyhow::Result<Option<String>> {
        match self.read_either(key, NOTES_EXT)? {
            Some((content, _)) => {
                let notes: String = serde_json::from_str(&content)
                    .with_context(|| format!("malformed notes for {key:?}"))?;
                Ok(Some(notes))
            }
            None => Ok(None),
        }
    }

    fn save_notes(&self, key: &ContractKey, notes: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string(notes)?;
        self.write_active(key, NOTES_EXT, &json)
    }
}
