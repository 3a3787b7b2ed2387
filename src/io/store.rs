use std::fs;
use std::io::{self, ErrorKind as IoErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::io::config_io;
use crate::io::list_io::{self, ListDocument, ListError};
use crate::io::lock::DirLock;
use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry};
use crate::model::colour::{Colour, ColourMode};
use crate::model::config::Config;
use crate::model::key::{ListKey, flatten, is_valid_file_key};
use crate::model::list::List;
use crate::parse::serialize_list;

/// A directory of `.list` files
#[derive(Debug, Clone)]
pub struct ListStore {
    dir: PathBuf,
    colours: ColourMode,
    world_writable: bool,
}

/// What the overview shows for one list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSummary {
    pub key: ListKey,
    pub name: String,
    pub colour: String,
    pub item_count: usize,
}

impl ListStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        ListStore {
            dir: dir.into(),
            colours: ColourMode::default(),
            world_writable: false,
        }
    }

    /// The store described by a config, relative to `root`
    pub fn from_config(root: &Path, config: &Config) -> Self {
        ListStore {
            dir: config_io::lists_dir(root, config),
            colours: config.display.colours,
            world_writable: config.store.world_writable,
        }
    }

    pub fn with_colours(mut self, colours: ColourMode) -> Self {
        self.colours = colours;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn validate(&self, key: &str) -> Result<ListKey, ListError> {
        ListKey::parse(key).ok_or_else(|| ListError::InvalidName(key.to_string()))
    }

    /// Whether `<key>.list` exists. Invalid keys never exist.
    pub fn exists(&self, key: &str) -> bool {
        ListKey::parse(key).is_some_and(|k| self.dir.join(k.file_name()).is_file())
    }

    /// Every valid list file name in the directory, in directory order.
    /// A directory that doesn't exist yet holds no lists.
    pub fn list_all(&self) -> Result<Vec<String>, ListError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == IoErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ListError::io(&self.dir, e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ListError::io(&self.dir, e))?;
            if let Some(name) = entry.file_name().to_str()
                && is_valid_file_key(name)
            {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    /// All list keys, sorted
    pub fn keys(&self) -> Result<Vec<ListKey>, ListError> {
        let mut keys: Vec<ListKey> = self
            .list_all()?
            .iter()
            .filter_map(|name| ListKey::from_file_name(name))
            .collect();
        keys.sort();
        Ok(keys)
    }

    /// Name, colour and item count of every list, sorted by key
    pub fn summaries(&self) -> Result<Vec<ListSummary>, ListError> {
        self.keys()?
            .into_iter()
            .map(|key| {
                let doc = ListDocument::open(&self.dir, &key, self.colours)?;
                Ok(ListSummary {
                    name: doc.name().to_string(),
                    colour: doc.colour().to_string(),
                    item_count: doc.item_count(),
                    key,
                })
            })
            .collect()
    }

    pub fn open(&self, key: &str) -> Result<ListDocument, ListError> {
        let key = self.validate(key)?;
        ListDocument::open(&self.dir, &key, self.colours)
    }

    /// Create an empty list named `display_name`, returning its key.
    pub fn create(&self, display_name: &str) -> Result<ListKey, ListError> {
        self.create_with_colour(display_name, None)
    }

    /// Create an empty list with an explicit `Colour` header
    pub fn create_with_colour(
        &self,
        display_name: &str,
        colour: Option<Colour>,
    ) -> Result<ListKey, ListError> {
        if display_name.contains(['\n', '\r']) {
            return Err(ListError::InvalidName(display_name.to_string()));
        }
        let key = ListKey::parse(&flatten(display_name))
            .ok_or_else(|| ListError::InvalidName(display_name.to_string()))?;
        fs::create_dir_all(&self.dir).map_err(|e| ListError::io(&self.dir, e))?;
        let _lock = DirLock::acquire_default(&self.dir)?;
        if self.exists(key.as_str()) {
            return Err(ListError::AlreadyExists(key));
        }

        let path = self.dir.join(key.file_name());
        let content = serialize_list(&List::new(display_name, colour));

        // The list only appears once its content is complete
        let mut tmp = new_list_file(&self.dir).map_err(|e| ListError::io(&self.dir, e))?;
        tmp.write_all(content.as_bytes())
            .and_then(|()| tmp.flush())
            .map_err(|e| ListError::io(&path, e))?;
        if self.world_writable {
            make_world_writable(tmp.path()).map_err(|e| ListError::io(&path, e))?;
        }
        match tmp.persist_noclobber(&path) {
            Ok(_) => Ok(key),
            Err(e) if e.error.kind() == IoErrorKind::AlreadyExists => {
                Err(ListError::AlreadyExists(key))
            }
            Err(e) => Err(ListError::io(&path, e.error)),
        }
    }

    /// Delete a list. Its last contents go to the recovery log.
    pub fn remove(&self, key: &str) -> Result<(), ListError> {
        let key = self.validate(key)?;
        let path = self.dir.join(key.file_name());
        if !path.is_file() {
            return Err(ListError::NotFound(key.to_string()));
        }

        let _lock = DirLock::acquire_default(&self.dir)?;
        if !path.is_file() {
            return Err(ListError::NotFound(key.to_string()));
        }
        let contents = list_io::read_list_text(&path)?;
        fs::remove_file(&path).map_err(|e| ListError::io(&path, e))?;
        recovery::log_recovery(
            &self.dir,
            RecoveryEntry::new(RecoveryCategory::Delete, "list deleted")
                .field("List", key.as_str())
                .body(contents),
        );
        Ok(())
    }
}

/// A temp file in `dir` with the mode a plain `File::create` would give
#[cfg(unix)]
fn new_list_file(dir: &Path) -> io::Result<NamedTempFile> {
    use std::os::unix::fs::PermissionsExt;
    tempfile::Builder::new()
        .permissions(fs::Permissions::from_mode(0o666))
        .tempfile_in(dir)
}

#[cfg(not(unix))]
fn new_list_file(dir: &Path) -> io::Result<NamedTempFile> {
    NamedTempFile::new_in(dir)
}

#[cfg(unix)]
fn make_world_writable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o777))
}

#[cfg(not(unix))]
fn make_world_writable(_path: &Path) -> io::Result<()> {
    Ok(())
}
