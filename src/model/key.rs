use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// File extension carried by every list file
pub const LIST_EXTENSION: &str = ".list";

static FILE_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9_()-]+\.list$").expect("file key pattern"));

static DISALLOWED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9_()-]").expect("disallowed chars pattern"));

/// Whether `file_name` is a valid list file name: lowercase letters, digits,
/// `_-()`, followed by a literal `.list`.
pub fn is_valid_file_key(file_name: &str) -> bool {
    FILE_KEY_RE.is_match(file_name)
}

/// Flatten a display name into a candidate key.
///
/// Spaces become underscores, ASCII letters are lowercased, and anything not
/// allowed in a key is dropped. The result has no `.list` suffix and may be
/// empty, so callers still validate it.
pub fn flatten(name: &str) -> String {
    let lowered = name.replace(' ', "_").to_ascii_lowercase();
    DISALLOWED_RE.replace_all(&lowered, "").into_owned()
}

/// A validated list key (the file name without its `.list` extension)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListKey(String);

impl ListKey {
    /// Accept `key` if `key.list` is a valid list file name
    pub fn parse(key: &str) -> Option<ListKey> {
        if is_valid_file_key(&format!("{}{}", key, LIST_EXTENSION)) {
            Some(ListKey(key.to_string()))
        } else {
            None
        }
    }

    /// Accept a full file name like `groceries.list`
    pub fn from_file_name(file_name: &str) -> Option<ListKey> {
        if !is_valid_file_key(file_name) {
            return None;
        }
        file_name
            .strip_suffix(LIST_EXTENSION)
            .map(|key| ListKey(key.to_string()))
    }

    /// Derive the key a display name would be stored under
    pub fn from_display_name(name: &str) -> Option<ListKey> {
        ListKey::parse(&flatten(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn file_name(&self) -> String {
        format!("{}{}", self.0, LIST_EXTENSION)
    }
}

impl fmt::Display for ListKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
