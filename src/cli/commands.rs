use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tl",
    about = concat!("tinylist v", env!("CARGO_PKG_VERSION"), " - small lists in plain text"),
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different root directory (holds tinylist.toml)
    #[arg(short = 'C', long = "root", global = true)]
    pub root: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show all lists
    Lists,
    /// Create a new list
    New(NewArgs),
    /// Delete a list
    Delete(DeleteArgs),
    /// Show a list's items with their line numbers
    Show(ShowArgs),
    /// Add an item (use `sublist:item` to nest)
    Add(AddArgs),
    /// Change the item on a line
    Alter(AlterArgs),
    /// Remove the item on a line
    Rm(RmArgs),
    /// Show the recovery log
    Recovery(RecoveryArgs),
}

#[derive(Args)]
pub struct NewArgs {
    /// Display name; the key is derived from it
    pub name: String,
    /// Colour (green, red, blue, orange, purple, yellow)
    #[arg(long)]
    pub colour: Option<String>,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// List key
    pub key: String,
    /// Must be exactly `delete`
    #[arg(long)]
    pub confirm: Option<String>,
}

#[derive(Args)]
pub struct ShowArgs {
    /// List key
    pub key: String,
}

#[derive(Args)]
pub struct AddArgs {
    /// List key
    pub key: String,
    /// Item path, e.g. `fruit:apple`
    pub path: String,
}

#[derive(Args)]
pub struct AlterArgs {
    /// List key
    pub key: String,
    /// Line number shown by `tl show`
    pub line: usize,
    /// New item path
    pub path: String,
    /// Refuse unless the line still holds this item path
    #[arg(long)]
    pub expect: Option<String>,
}

#[derive(Args)]
pub struct RmArgs {
    /// List key
    pub key: String,
    /// Line number shown by `tl show`
    pub line: usize,
    /// Refuse unless the line still holds this item path
    #[arg(long)]
    pub expect: Option<String>,
}

#[derive(Args)]
pub struct RecoveryArgs {
    /// Maximum number of entries to show
    #[arg(long, default_value = "10")]
    pub limit: usize,
}
