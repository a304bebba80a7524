//! Workspace discovery and structure

use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::core::backup::{self, BackupError};
use crate::core::store::RecordStore;

const STK_DIR: &str = ".stk";
const STORE_FILE: &str = "inventory.csv";
const CONFIG_FILE: &str = "config.yaml";

/// A directory holding a `.stk/` folder with the saved inventory
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Root directory of the workspace (parent of .stk/)
    root: PathBuf,
}

impl Workspace {
    /// Find the workspace root by walking up from the current directory
    pub fn discover() -> Result<Self, WorkspaceError> {
        let current =
            std::env::current_dir().map_err(|e| WorkspaceError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find the workspace root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, WorkspaceError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| WorkspaceError::IoError(format!("{}: {}", start.display(), e)))?;

        loop {
            if current.join(STK_DIR).is_dir() {
                debug!(root = %current.display(), "workspace found");
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(WorkspaceError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Open an explicit workspace path, or discover one from the current directory
    pub fn open(explicit: Option<&Path>) -> Result<Self, WorkspaceError> {
        match explicit {
            Some(path) => Self::discover_from(path),
            None => Self::discover(),
        }
    }

    /// Create the workspace structure at the given path
    ///
    /// With `force`, an existing config is rewritten but saved items are kept.
    pub fn init(path: &Path, force: bool) -> Result<Self, WorkspaceError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        let stk_dir = root.join(STK_DIR);
        if stk_dir.exists() && !force {
            return Err(WorkspaceError::AlreadyExists(root));
        }

        std::fs::create_dir_all(&stk_dir).map_err(|e| WorkspaceError::IoError(e.to_string()))?;
        std::fs::write(stk_dir.join(CONFIG_FILE), Self::default_config())
            .map_err(|e| WorkspaceError::IoError(e.to_string()))?;

        let workspace = Self { root };
        if !workspace.store_path().exists() {
            workspace.save_store(&RecordStore::new())?;
        }
        Ok(workspace)
    }

    fn default_config() -> &'static str {
        r#"# Stocktake workspace configuration

# Image shown for items without an image URL
# placeholder_image: "https://via.placeholder.com/100"

# Heading of the printable count sheet
# report_title: "Stock Count Sheet"

# Default output format for `stk list` (auto, tsv, json, csv, md, id)
# default_format: auto

# Remote spreadsheet used by `stk pull` / `stk push`
# remote:
#   base_url: "https://sheets.googleapis.com"
#   spreadsheet_id: ""
#   sheet: "inventory"
#   token: ""            # or STK_REMOTE_TOKEN

# Extra import header synonyms
# headers:
#   quantity: ["on hand", "Bestand"]
"#
    }

    /// Get the workspace root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .stk directory
    pub fn stk_dir(&self) -> PathBuf {
        self.root.join(STK_DIR)
    }

    pub fn config_path(&self) -> PathBuf {
        self.stk_dir().join(CONFIG_FILE)
    }

    /// Saved inventory, in backup format
    pub fn store_path(&self) -> PathBuf {
        self.stk_dir().join(STORE_FILE)
    }

    /// Load the saved inventory; a missing file is an empty store
    pub fn load_store(&self) -> Result<RecordStore, WorkspaceError> {
        let path = self.store_path();
        if !path.exists() {
            return Ok(RecordStore::new());
        }
        Ok(backup::load(&path)?)
    }

    /// Save the inventory, replacing the previous file
    pub fn save_store(&self, store: &RecordStore) -> Result<(), WorkspaceError> {
        let path = self.store_path();
        let tmp = path.with_extension("csv.tmp");
        backup::export(store, &tmp)?;
        std::fs::rename(&tmp, &path).map_err(|e| WorkspaceError::IoError(e.to_string()))?;
        debug!(items = store.len(), path = %path.display(), "inventory saved");
        Ok(())
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum WorkspaceError {
    #[error("Not a stocktake workspace (searched from {searched_from})")]
    #[diagnostic(
        code(stk::workspace::not_found),
        help("Run `stk init` to create a workspace here, or pass --workspace")
    )]
    NotFound { searched_from: PathBuf },

    #[error("Workspace already exists at {0}")]
    #[diagnostic(code(stk::workspace::exists), help("Use --force to rewrite the configuration"))]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    #[diagnostic(code(stk::workspace::io))]
    IoError(String),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Backup(#[from] BackupError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::item::NewItem;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_structure() {
        let tmp = TempDir::new().unwrap();
        let ws = Workspace::init(tmp.path(), false).unwrap();

        assert!(ws.stk_dir().is_dir());
        assert!(ws.config_path().is_file());
        assert!(ws.store_path().is_file());
        assert!(ws.load_store().unwrap().is_empty());
    }

    #[test]
    fn test_init_twice_requires_force() {
        let tmp = TempDir::new().unwrap();
        Workspace::init(tmp.path(), false).unwrap();
        assert!(matches!(
            Workspace::init(tmp.path(), false),
            Err(WorkspaceError::AlreadyExists(_))
        ));
        assert!(Workspace::init(tmp.path(), true).is_ok());
    }

    #[test]
    fn test_force_keeps_saved_items() {
        let tmp = TempDir::new().unwrap();
        let ws = Workspace::init(tmp.path(), false).unwrap();
        let mut store = RecordStore::new();
        store
            .add(NewItem {
                sku: "A".to_string(),
                name: "Apple".to_string(),
                ..NewItem::default()
            })
            .unwrap();
        ws.save_store(&store).unwrap();

        let ws = Workspace::init(tmp.path(), true).unwrap();
        assert_eq!(ws.load_store().unwrap().len(), 1);
    }

    #[test]
    fn test_discover_from_subdirectory() {
        let tmp = TempDir::new().unwrap();
        Workspace::init(tmp.path(), false).unwrap();
        let nested = tmp.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();

        let ws = Workspace::discover_from(&nested).unwrap();
        assert_eq!(ws.root(), tmp.path().canonicalize().unwrap());
    }

    #[test]
    fn test_discover_fails_outside_workspace() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            Workspace::discover_from(tmp.path()),
            Err(WorkspaceError::NotFound { .. })
        ));
    }
}
