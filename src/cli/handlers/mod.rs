use std::path::PathBuf;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::recovery;
use crate::io::{ListDocument, ListStore};
use crate::model::colour::Colour;
use crate::model::list::ItemRef;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let store = open_store(cli.root.as_deref())?;

    match cli.command {
        Commands::Lists => cmd_lists(&store, json),
        Commands::New(args) => cmd_new(&store, args, json),
        Commands::Delete(args) => cmd_delete(&store, args),
        Commands::Show(args) => cmd_show(&store, args, json),
        Commands::Add(args) => cmd_add(&store, args, json),
        Commands::Alter(args) => cmd_alter(&store, args, json),
        Commands::Rm(args) => cmd_rm(&store, args, json),
        Commands::Recovery(args) => cmd_recovery(&store, args, json),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn open_store(root: Option<&str>) -> Result<ListStore, Box<dyn std::error::Error>> {
    let root = match root {
        Some(dir) => std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?,
        None => std::env::current_dir()?,
    };
    let config = config_io::load_config(&root)?;
    Ok(ListStore::from_config(&root, &config))
}

fn item_ref(line: usize, expect: Option<String>) -> ItemRef {
    ItemRef {
        line,
        expected: expect,
    }
}

fn print_list(doc: &ListDocument, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        let out = list_to_json(doc.key(), doc.list());
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for line in format_list(doc.list()) {
            println!("{}", line);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_lists(store: &ListStore, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let summaries = store.summaries()?;
    if json {
        let out: Vec<_> = summaries.iter().map(summary_to_json).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if summaries.is_empty() {
        println!("no lists yet (create one with `tl new <NAME>`)");
    } else {
        for line in format_summaries(&summaries) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_new(store: &ListStore, args: NewArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let colour = match args.colour.as_deref() {
        None => None,
        Some(name) => Some(Colour::from_name(name).ok_or_else(|| {
            format!(
                "unknown colour '{}' (expected: green, red, blue, orange, purple, yellow)",
                name
            )
        })?),
    };

    let key = store.create_with_colour(&args.name, colour)?;
    if json {
        println!("{}", serde_json::json!({ "key": key.as_str() }));
    } else {
        println!("created {}", key);
    }
    Ok(())
}

fn cmd_delete(store: &ListStore, args: DeleteArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.confirm.as_deref() != Some("delete") {
        return Err(format!(
            "refusing to delete {}: confirm with `--confirm delete`",
            args.key
        )
        .into());
    }
    store.remove(&args.key)?;
    println!("removed {}", args.key);
    Ok(())
}

fn cmd_show(
    store: &ListStore,
    args: ShowArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = store.open(&args.key)?;
    print_list(&doc, json)
}

fn cmd_add(store: &ListStore, args: AddArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let doc = store.open(&args.key)?.add_item(&args.path)?.reload()?;
    print_list(&doc, json)
}

fn cmd_alter(
    store: &ListStore,
    args: AlterArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let item = item_ref(args.line, args.expect);
    let doc = store
        .open(&args.key)?
        .alter_item(&item, &args.path)?
        .reload()?;
    print_list(&doc, json)
}

fn cmd_rm(store: &ListStore, args: RmArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let item = item_ref(args.line, args.expect);
    let doc = store.open(&args.key)?.remove_item(&item)?.reload()?;
    print_list(&doc, json)
}

fn cmd_recovery(
    store: &ListStore,
    args: RecoveryArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let entries = recovery::read_recovery_entries(store.dir(), Some(args.limit));
    if json {
        let out: Vec<_> = entries.iter().map(recovery_to_json).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if entries.is_empty() {
        println!("recovery log is empty");
    } else {
        for entry in &entries {
            print!("{}", entry.to_markdown());
        }
    }
    Ok(())
}
