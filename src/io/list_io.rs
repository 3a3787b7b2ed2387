use std::fs;
use std::path::{Path, PathBuf};

use crate::io::lock::{DirLock, LockError};
use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry};
use crate::model::colour::ColourMode;
use crate::model::key::ListKey;
use crate::model::list::{ItemRef, List, Node, Nodes};
use crate::ops::item_ops::{self, ItemError};
use crate::parse::parse_list;

/// Error type for list storage and list editing
#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error("invalid list name: {0}")]
    InvalidName(String),
    #[error("list name {0} is already taken")]
    AlreadyExists(ListKey),
    #[error("list {0} does not exist")]
    NotFound(String),
    #[error("could not access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Locked(#[from] LockError),
    #[error(transparent)]
    Item(#[from] ItemError),
}

/// Coarse classification of a [`ListError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidName,
    AlreadyExists,
    NotFound,
    IoFailure,
    StaleReference,
    Malformed,
}

impl ListError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ListError::InvalidName(_) => ErrorKind::InvalidName,
            ListError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            ListError::NotFound(_) => ErrorKind::NotFound,
            ListError::Io { .. } | ListError::Locked(_) => ErrorKind::IoFailure,
            ListError::Item(ItemError::StaleReference { .. }) => ErrorKind::StaleReference,
            ListError::Item(ItemError::MissingMarker(_) | ItemError::InvalidPath(_)) => {
                ErrorKind::Malformed
            }
        }
    }

    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        ListError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Read a list file's text. Bytes that aren't UTF-8 decode to U+FFFD.
pub(crate) fn read_list_text(path: &Path) -> Result<String, ListError> {
    let bytes = fs::read(path).map_err(|e| ListError::io(path, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Where a list lives and how to parse it
#[derive(Debug, Clone)]
struct ListFile {
    key: ListKey,
    dir: PathBuf,
    colours: ColourMode,
}

impl ListFile {
    fn path(&self) -> PathBuf {
        self.dir.join(self.key.file_name())
    }

    fn read(&self) -> Result<String, ListError> {
        read_list_text(&self.path())
    }

    fn load(self) -> Result<ListDocument, ListError> {
        let list = parse_list(&self.read()?, self.colours);
        Ok(ListDocument { file: self, list })
    }

    /// Read the file fresh, apply `edit` to its lines and write it back,
    /// all under the directory lock.
    fn rewrite<T>(
        &self,
        edit: impl FnOnce(&mut Vec<String>) -> Result<T, ItemError>,
    ) -> Result<T, ListError> {
        let _lock = DirLock::acquire_default(&self.dir)?;

        let mut lines = item_ops::split_lines(&self.read()?);
        let out = edit(&mut lines)?;
        let content = item_ops::join_lines(&lines);

        let path = self.path();
        if let Err(e) = recovery::atomic_write(&path, content.as_bytes()) {
            recovery::log_recovery(
                &self.dir,
                RecoveryEntry::new(RecoveryCategory::Write, "list write failed")
                    .field("Target", self.key.file_name())
                    .field("Error", e.to_string())
                    .body(content),
            );
            return Err(ListError::io(&path, e));
        }
        Ok(out)
    }
}

/// One list file and the tree parsed from it.
///
/// Line numbers in the tree only hold for the file content they were parsed
/// from, so every mutation consumes the document and hands back a
/// [`StaleList`] that has to be reloaded before the list can be read again.
#[derive(Debug, Clone)]
pub struct ListDocument {
    file: ListFile,
    list: List,
}

impl ListDocument {
    /// Open and parse `<dir>/<key>.list`
    pub fn open(dir: &Path, key: &ListKey, colours: ColourMode) -> Result<Self, ListError> {
        let file = ListFile {
            key: key.clone(),
            dir: dir.to_path_buf(),
            colours,
        };
        if !file.path().is_file() {
            return Err(ListError::NotFound(key.to_string()));
        }
        file.load()
    }

    /// Parse the file again, discarding the current tree
    pub fn reload(self) -> Result<Self, ListError> {
        self.file.load()
    }

    pub fn key(&self) -> &ListKey {
        &self.file.key
    }

    pub fn path(&self) -> PathBuf {
        self.file.path()
    }

    pub fn list(&self) -> &List {
        &self.list
    }

    pub fn name(&self) -> &str {
        &self.list.name
    }

    pub fn colour(&self) -> &str {
        &self.list.colour
    }

    pub fn items(&self) -> &Nodes {
        &self.list.items
    }

    pub fn item_count(&self) -> usize {
        self.list.item_count()
    }

    pub fn item_at_line(&self, line: usize) -> Option<&Node> {
        self.list.item_at_line(line)
    }

    /// Append `Item <path>` to the list and re-sort the items
    pub fn add_item(self, path: &str) -> Result<StaleList, ListError> {
        self.file.rewrite(|lines| item_ops::add_item(lines, path))?;
        Ok(StaleList { file: self.file })
    }

    /// Replace the referenced item's path and re-sort the items
    pub fn alter_item(self, item: &ItemRef, new_path: &str) -> Result<StaleList, ListError> {
        self.file
            .rewrite(|lines| item_ops::alter_item(lines, item, new_path))?;
        Ok(StaleList { file: self.file })
    }

    /// Delete the referenced item. The removed line goes to the recovery log.
    pub fn remove_item(self, item: &ItemRef) -> Result<StaleList, ListError> {
        let removed = self
            .file
            .rewrite(|lines| item_ops::remove_item(lines, item))?;
        recovery::log_recovery(
            &self.file.dir,
            RecoveryEntry::new(RecoveryCategory::Delete, "item removed")
                .field("List", self.file.key.as_str())
                .field("Line", item.line.to_string())
                .body(removed),
        );
        Ok(StaleList { file: self.file })
    }
}

/// A list whose file changed after its tree was parsed
#[derive(Debug)]
#[must_use = "a stale list has to be reloaded before it can be read"]
pub struct StaleList {
    file: ListFile,
}

impl StaleList {
    pub fn key(&self) -> &ListKey {
        &self.file.key
    }

    pub fn reload(self) -> Result<ListDocument, ListError> {
        self.file.load()
    }
}
