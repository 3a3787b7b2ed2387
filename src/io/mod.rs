pub mod config_io;
pub mod list_io;
pub mod lock;
pub mod recovery;
pub mod store;

pub use list_io::{ErrorKind, ListDocument, ListError, StaleList};
pub use store::{ListStore, ListSummary};
