pub mod list_parser;
pub mod list_serializer;

pub use list_parser::parse_list;
pub use list_serializer::serialize_list;

/// Marker line opening the item region
pub const BEGIN_ITEMS: &str = "BeginItems";
/// Marker line closing the item region
pub const END_ITEMS: &str = "EndItems";

pub const NAME_PREFIX: &str = "Name ";
pub const COLOUR_PREFIX: &str = "Colour ";
pub const ITEM_PREFIX: &str = "Item ";
