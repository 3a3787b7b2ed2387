use crate::model::list::List;
use crate::parse::{BEGIN_ITEMS, COLOUR_PREFIX, END_ITEMS, ITEM_PREFIX, NAME_PREFIX};

/// Serialize a list to its canonical file form.
///
/// A `Colour` header is only written when the colour came from one. Item lines
/// are sorted the same way mutations sort them, so the output of a parsed file
/// matches what the next mutation would have written for it.
pub fn serialize_list(list: &List) -> String {
    let mut lines = Vec::new();
    lines.push(format!("{}{}", NAME_PREFIX, list.name));
    if list.colour_from_header {
        lines.push(format!("{}{}", COLOUR_PREFIX, list.colour));
    }
    lines.push(String::new());
    lines.push(BEGIN_ITEMS.to_string());

    let mut items: Vec<String> = list
        .items
        .item_paths()
        .into_iter()
        .map(|path| format!("{}{}", ITEM_PREFIX, path))
        .collect();
    items.sort();
    lines.extend(items);

    lines.push(END_ITEMS.to_string());
    lines.push(String::new());
    lines.join("\n")
}
