use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;

use cpp_type_index::{Config, Declaration, IndexerError, NodeId, Program, Result};

#[derive(Parser)]
#[command(name = "cpp-type-index")]
#[command(about = "Cross-file C/C++ type tree and scoped name resolution")]
#[command(version)]
#[command(after_long_help = r#"
EXAMPLES:
    # Resolve a qualified name against every header under ./include
    cpp-type-index resolve "net::Socket::Handle" include

    # Resolve an unqualified name as seen from inside a scope
    cpp-type-index resolve Buffer . --context net::Socket

    # Print the merged type tree as JSON
    cpp-type-index tree src --format json

    # Show load and index statistics
    cpp-type-index stats
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (defaults to .cpp-type-index.toml in the loaded directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a possibly qualified type name
    Resolve {
        /// Name to resolve, e.g. `A::B::T`
        name: String,

        /// File or directory to load
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Qualified scope to resolve from (defaults to global scope)
        #[arg(long)]
        context: Option<String>,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Print the merged type tree
    Tree {
        /// File or directory to load
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Show load and index statistics
    Stats {
        /// File or directory to load
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

#[derive(Serialize)]
struct ContributorView {
    kind: String,
    name: String,
    location: Option<String>,
}

impl From<&Declaration> for ContributorView {
    fn from(decl: &Declaration) -> Self {
        Self {
            kind: decl.kind.to_string(),
            name: decl.name.clone(),
            location: decl.location.as_ref().map(|l| l.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ResolveView {
    name: String,
    context: String,
    found: bool,
    qualified_name: Option<String>,
    contributors: Vec<ContributorView>,
}

#[derive(Serialize)]
struct TreeEntryView {
    qualified_name: String,
    depth: usize,
    contributors: Vec<ContributorView>,
}

fn load_config(explicit: Option<&Path>, path: &Path) -> Result<Config> {
    if let Some(file) = explicit {
        return Config::load(file);
    }
    let dir = if path.is_dir() {
        path
    } else {
        path.parent().unwrap_or(Path::new("."))
    };
    Config::discover(dir)
}

fn load(config_path: Option<&Path>, path: &Path) -> Result<Program> {
    let config = load_config(config_path, path)?;
    let mut program = Program::with_config(config);
    program.load_program(path);
    Ok(program)
}

fn contributors(program: &Program, node: NodeId) -> Vec<ContributorView> {
    program
        .contributors(node)
        .into_iter()
        .filter(|decl| !decl.kind.is_file())
        .map(ContributorView::from)
        .collect()
}

pub fn resolve(
    config_path: Option<&Path>,
    path: &Path,
    name: &str,
    context: Option<&str>,
    format: &str,
) -> Result<()> {
    let program = load(config_path, path)?;

    let scope = match context {
        Some(ctx) => program
            .resolve_from_root(ctx)
            .ok_or_else(|| IndexerError::ScopeNotFound(ctx.to_string()))?,
        None => program.root(),
    };

    let node = program.resolve(name, scope);
    let view = ResolveView {
        name: name.to_string(),
        context: program.qualified_name(scope),
        found: node.is_some(),
        qualified_name: node.map(|n| program.qualified_name(n)),
        contributors: node.map(|n| contributors(&program, n)).unwrap_or_default(),
    };

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&view).unwrap_or_default());
        return Ok(());
    }

    match view.qualified_name {
        Some(qualified) => {
            println!("{}", qualified);
            for contributor in &view.contributors {
                match &contributor.location {
                    Some(location) => {
                        println!("  {} {} at {}", contributor.kind, contributor.name, location)
                    }
                    None => println!("  {} {}", contributor.kind, contributor.name),
                }
            }
        }
        None => println!("{}: not found", name),
    }

    Ok(())
}

pub fn print_tree(config_path: Option<&Path>, path: &Path, format: &str) -> Result<()> {
    let program = load(config_path, path)?;
    let tree = program.tree();

    let entries: Vec<TreeEntryView> = tree
        .walk()
        .into_iter()
        .filter(|(node, _)| *node != tree.root())
        .map(|(node, depth)| TreeEntryView {
            qualified_name: tree.qualified_name(node),
            depth,
            contributors: contributors(&program, node),
        })
        .collect();

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&entries).unwrap_or_default());
        return Ok(());
    }

    for entry in &entries {
        let simple = entry
            .qualified_name
            .rsplit(cpp_type_index::SCOPE_SEPARATOR)
            .next()
            .unwrap_or("");
        let kinds: Vec<&str> = entry.contributors.iter().map(|c| c.kind.as_str()).collect();
        println!(
            "{}{} [{}]",
            "  ".repeat(entry.depth - 1),
            simple,
            kinds.join(", ")
        );
    }

    Ok(())
}

pub fn show_stats(config_path: Option<&Path>, path: &Path) -> Result<()> {
    let config = load_config(config_path, path)?;
    let mut program = Program::with_config(config);
    let report = program.load_program(path);
    let stats = program.stats();

    println!("Index Statistics:");
    println!("  Files found: {}", report.files_found);
    println!("  Files loaded: {}", report.files_loaded);
    println!("  Files failed: {}", report.files_failed);
    println!("  Declarations: {}", stats.declarations);
    println!("  Indexed declarations: {}", stats.indexed_declarations);
    println!("  Type tree nodes: {}", stats.tree_nodes);

    Ok(())
}
