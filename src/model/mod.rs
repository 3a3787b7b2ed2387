pub mod colour;
pub mod config;
pub mod key;
pub mod list;

pub use colour::*;
pub use config::*;
pub use key::*;
pub use list::*;
