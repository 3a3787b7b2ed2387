use crate::model::colour::ColourMode;
use crate::model::list::{ItemSpan, List};
use crate::parse::{BEGIN_ITEMS, COLOUR_PREFIX, END_ITEMS, ITEM_PREFIX, NAME_PREFIX};

/// Parse a list file from its source text.
///
/// The header (everything before `BeginItems`) supplies the name and colour;
/// the last `Name`/`Colour` line wins. Each `Item` line up to `EndItems` is
/// inserted into the tree with its 1-based line number. Anything else is
/// skipped. Without a `Colour` header the colour is picked by `colours`.
pub fn parse_list(source: &str, colours: ColourMode) -> List {
    let lines: Vec<&str> = source.split('\n').collect();
    let mut name = String::new();
    let mut header_colour = None;

    let mut idx = 0;
    while idx < lines.len() && lines[idx] != BEGIN_ITEMS {
        let line = lines[idx];
        if let Some(rest) = line.strip_prefix(NAME_PREFIX) {
            name = rest.to_string();
        } else if let Some(rest) = line.strip_prefix(COLOUR_PREFIX) {
            header_colour = Some(rest.to_string());
        }
        idx += 1;
    }

    let mut list = List::new(name, None);
    list.colour_from_header = header_colour.is_some();
    list.colour = match header_colour {
        Some(colour) => colour,
        None => colours.pick(&list.name).to_string(),
    };

    // Step past the begin marker
    idx += 1;
    while idx < lines.len() && lines[idx] != END_ITEMS {
        if let Some(path) = lines[idx].strip_prefix(ITEM_PREFIX) {
            let line_no = idx + 1;
            list.items.insert(path, line_no, path, colours);
            list.item_span = Some(ItemSpan::extend(list.item_span, line_no));
        }
        idx += 1;
    }

    list
}
