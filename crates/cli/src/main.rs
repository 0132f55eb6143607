//! MindMap CLI - create, edit and browse mind maps from the terminal.

mod logger;
mod terminal;

use anyhow::{bail, Context, Result};
use api::{
    delete_document, set_lock_stored, BlankRenderer, Edit, EditOutcome, FileStore, LockState,
    MindMap, NodeId, Session, StoreConfig,
};
use clap::{Parser, Subcommand};
use glam::Vec2;
use logger::MapLogger;
use std::path::PathBuf;
use terminal::{TerminalAuth, TerminalConfirm};

/// MindMap CLI - work with stored mind maps
#[derive(Parser)]
#[command(name = "mindmap")]
#[command(about = "Command-line interface for mind map documents")]
struct Cli {
    /// Directory holding the maps (default: $MINDMAP_HOME or ~/Documents/MindMap)
    #[arg(short, long, global = true)]
    dir: Option<PathBuf>,

    /// Log more (-v debug, -vv trace) and echo log lines to stderr
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty map
    New { name: String },

    /// Print a map's outline and node positions
    Show { name: String },

    /// Add a node
    Add {
        name: String,
        /// Name of the new node
        child: String,
        /// Path of the parent node, e.g. "Flights/Hotel" (default: root)
        #[arg(short, long, default_value = "")]
        parent: String,
        /// Canvas position as x,y
        #[arg(long, value_parser = parse_point)]
        at: Vec2,
    },

    /// Rename a node; renaming the root renames the map
    Rename {
        name: String,
        path: String,
        new_name: String,
    },

    /// Move a node
    Move {
        name: String,
        path: String,
        /// Canvas position as x,y
        #[arg(long, value_parser = parse_point)]
        to: Vec2,
    },

    /// Remove a node and everything under it
    Remove { name: String, path: String },

    /// Apply a JSON edit, e.g. {"type": "rename", "id": "...", "name": "..."}
    Apply { name: String, json: String },

    /// List maps
    List {
        /// Only the N most recently modified
        #[arg(short, long)]
        recent: Option<usize>,
    },

    /// List maps whose name contains TEXT (case-sensitive)
    Search { text: String },

    /// Copy a map file into the store
    Import { file: PathBuf },

    /// Require authentication to open a map
    Lock { name: String },

    /// Stop requiring authentication
    Unlock { name: String },

    /// Delete a map and its preview
    Delete {
        name: String,
        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = logger::level_from(cli.verbose);
    if let Err(e) = MapLogger::init(level, cli.verbose > 0) {
        eprintln!("warning: logging disabled: {e:#}");
    }

    let config = match cli.dir {
        Some(dir) => StoreConfig::new(dir),
        None => StoreConfig::from_env(),
    };
    let store = FileStore::open(config).context("Failed to open map directory")?;

    match cli.command {
        Commands::New { name } => {
            Session::create(store, BlankRenderer::default(), &name)?;
            println!("Created {name:?}");
            Ok(())
        }
        Commands::Show { name } => show(store, &name),
        Commands::Add {
            name,
            child,
            parent,
            at,
        } => edit(store, &name, |map| {
            Ok(Edit::AddChild {
                parent: resolve(map, &parent)?,
                name: child,
                position: at,
            })
        }),
        Commands::Rename {
            name,
            path,
            new_name,
        } => edit(store, &name, |map| {
            Ok(Edit::Rename {
                id: resolve(map, &path)?,
                name: new_name,
            })
        }),
        Commands::Move { name, path, to } => edit(store, &name, |map| {
            Ok(Edit::Move {
                id: resolve(map, &path)?,
                position: to,
            })
        }),
        Commands::Remove { name, path } => edit(store, &name, |map| {
            Ok(Edit::Remove {
                id: resolve(map, &path)?,
            })
        }),
        Commands::Apply { name, json } => edit(store, &name, |_| {
            serde_json::from_str(&json).context("Invalid edit JSON")
        }),
        Commands::List { recent } => {
            let files = match recent {
                Some(limit) => store.list_recent(limit)?,
                None => store.list_all()?,
            };
            print_listing(&store, &files);
            Ok(())
        }
        Commands::Search { text } => {
            print_listing(&store, &store.search(&text)?);
            Ok(())
        }
        Commands::Import { file } => {
            let doc = store
                .import_file(&file)
                .with_context(|| format!("Failed to import {}", file.display()))?;
            println!("Imported {:?}", doc.key());
            Ok(())
        }
        Commands::Lock { name } => toggle_lock(&store, &name, LockState::Locked),
        Commands::Unlock { name } => toggle_lock(&store, &name, LockState::Regular),
        Commands::Delete { name, yes } => {
            let deleted = if yes {
                smol::block_on(delete_document(&store, &name, &true))?
            } else {
                smol::block_on(delete_document(&store, &name, &TerminalConfirm))?
            };
            if deleted {
                println!("Deleted {name:?}");
            }
            Ok(())
        }
    }
}

fn open(store: FileStore, name: &str) -> Result<Session> {
    let auth = TerminalAuth {
        subject: name.to_string(),
    };
    smol::block_on(Session::open(store, BlankRenderer::default(), name, &auth))
        .with_context(|| format!("Failed to open {name:?}"))
}

/// Opens `name`, builds an edit against its tree and applies it.
fn edit(store: FileStore, name: &str, build: impl FnOnce(&MindMap) -> Result<Edit>) -> Result<()> {
    let mut session = open(store, name)?;
    let edit = build(&session.document().map)?;

    match session.mutate(edit)? {
        EditOutcome::Applied {
            created,
            modified,
            deleted,
        } => {
            for id in created {
                println!("Added {id}");
            }
            for id in modified {
                println!("Updated {id}");
            }
            if !deleted.is_empty() {
                println!("Removed {} node(s)", deleted.len());
            }
            Ok(())
        }
        EditOutcome::DeletionRequested { key } => {
            bail!("{key:?} is the root; use `mindmap delete {key:?}` to delete the whole map")
        }
    }
}

fn show(store: FileStore, name: &str) -> Result<()> {
    let session = open(store, name)?;
    let doc = session.document();
    let size = doc.frame.size();

    println!("{}", doc.map);
    println!(
        "canvas {}x{}, {}, {} node(s)",
        size.width(),
        size.height(),
        doc.state,
        doc.map.len()
    );
    for node in doc.map.iter() {
        let depth = doc.map.depth(node.id()).unwrap_or(0);
        let position = match node.position() {
            Some(p) => format!("({}, {})", p.x(), p.y()),
            None => "(unplaced)".to_string(),
        };
        println!("{}{} {} {}", "  ".repeat(depth), node.name(), position, node.id());
    }
    Ok(())
}

fn print_listing(store: &FileStore, files: &[String]) {
    let summaries = store.summaries(files);
    if summaries.is_empty() {
        println!("No maps found.");
        return;
    }

    for summary in summaries {
        let modified = summary
            .modified
            .map(|time| time.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        let lock = if summary.is_locked() { " [locked]" } else { "" };
        println!("{modified}  {}{lock}", summary.key);
    }
}

fn toggle_lock(store: &FileStore, name: &str, desired: LockState) -> Result<()> {
    if !store.exists(name) {
        bail!("No map named {name:?}");
    }

    let auth = TerminalAuth {
        subject: name.to_string(),
    };
    let outcome = smol::block_on(api::Authenticator::authenticate(&auth));
    set_lock_stored(store, name, desired, outcome)
        .with_context(|| format!("Failed to change lock on {name:?}"))?;

    println!("{name:?} is {desired}");
    Ok(())
}

/// Finds a node by `/`-separated names below the root. An empty path is the
/// root itself; each step takes the first child with that name.
fn resolve(map: &MindMap, path: &str) -> Result<NodeId> {
    let mut id = map.root_id();
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        id = map
            .children(id)
            .find(|child| child.name() == segment)
            .map(|child| child.id())
            .with_context(|| format!("No node {segment:?} on path {path:?}"))?;
    }
    Ok(id)
}

fn parse_point(s: &str) -> std::result::Result<Vec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got {s:?}"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| format!("{v:?} isn't a number"))
    };
    Ok(Vec2::new(parse(x)?, parse(y)?))
}
