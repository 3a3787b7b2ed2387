use crate::model::list::ItemRef;
use crate::parse::{BEGIN_ITEMS, END_ITEMS, ITEM_PREFIX};

/// Error type for edits to a list file's raw lines
#[derive(Debug, thiserror::Error)]
pub enum ItemError {
    #[error("list file has no {0} marker")]
    MissingMarker(&'static str),
    #[error("line {line} no longer holds the expected item (found {found:?}); reload the list")]
    StaleReference { line: usize, found: Option<String> },
    #[error("invalid item path {0:?}: must be non-empty and on a single line")]
    InvalidPath(String),
}

/// Split file content into lines the way mutations see them.
/// A trailing newline yields a final empty line, so joining restores it.
pub fn split_lines(source: &str) -> Vec<String> {
    source.split('\n').map(str::to_string).collect()
}

pub fn join_lines(lines: &[String]) -> String {
    lines.join("\n")
}

/// Index of the begin marker and of the first end marker after it
fn item_region(lines: &[String]) -> Result<(usize, usize), ItemError> {
    let begin = lines
        .iter()
        .position(|l| l == BEGIN_ITEMS)
        .ok_or(ItemError::MissingMarker(BEGIN_ITEMS))?;
    let end = lines[begin + 1..]
        .iter()
        .position(|l| l == END_ITEMS)
        .map(|offset| begin + 1 + offset)
        .ok_or(ItemError::MissingMarker(END_ITEMS))?;
    Ok((begin, end))
}

fn validate_path(path: &str) -> Result<(), ItemError> {
    if path.trim().is_empty() || path.contains(['\n', '\r']) {
        return Err(ItemError::InvalidPath(path.to_string()));
    }
    Ok(())
}

/// Resolve an item reference to a line index, checking that it still points
/// at the item the caller saw.
fn resolve(lines: &[String], item: &ItemRef) -> Result<usize, ItemError> {
    let (begin, end) = item_region(lines)?;
    let stale = |found: Option<&String>| ItemError::StaleReference {
        line: item.line,
        found: found.cloned(),
    };

    let idx = item.line.checked_sub(1).ok_or_else(|| stale(None))?;
    if idx <= begin || idx >= end {
        return Err(stale(lines.get(idx)));
    }

    let line = &lines[idx];
    let Some(path) = line.strip_prefix(ITEM_PREFIX) else {
        return Err(stale(Some(line)));
    };
    if let Some(expected) = &item.expected
        && expected != path
    {
        return Err(stale(Some(line)));
    }
    Ok(idx)
}

/// Sort the item region as whole lines, leaving header and footer alone.
pub fn sort_items(lines: &mut [String]) -> Result<(), ItemError> {
    let (begin, end) = item_region(lines)?;
    lines[begin + 1..end].sort();
    Ok(())
}

/// Insert `Item <path>` just before the end marker, then sort.
pub fn add_item(lines: &mut Vec<String>, path: &str) -> Result<(), ItemError> {
    validate_path(path)?;
    let (_, end) = item_region(lines)?;
    lines.insert(end, format!("{}{}", ITEM_PREFIX, path));
    sort_items(lines)
}

/// Replace the referenced item line with `Item <new_path>`, then sort.
pub fn alter_item(lines: &mut [String], item: &ItemRef, new_path: &str) -> Result<(), ItemError> {
    validate_path(new_path)?;
    let idx = resolve(lines, item)?;
    lines[idx] = format!("{}{}", ITEM_PREFIX, new_path);
    sort_items(lines)
}

/// Delete the referenced item line. Everything else keeps its order.
/// Returns the removed line.
pub fn remove_item(lines: &mut Vec<String>, item: &ItemRef) -> Result<String, ItemError> {
    let idx = resolve(lines, item)?;
    Ok(lines.remove(idx))
}
