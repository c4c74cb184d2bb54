//! CLI entry point for the `cgraph` command-line tool.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

use compound_graph::cli::commands;
use compound_graph::GraphError;

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(
    name = "cgraph",
    about = "Inspect and query compound graph element files"
)]
struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Enable debug logging
    #[arg(long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summary counts for an element file
    Info {
        /// Path to the JSON element file
        file: PathBuf,
    },
    /// Show a single element
    Get {
        /// Path to the JSON element file
        file: PathBuf,
        /// Element ID
        id: String,
    },
    /// List elements matching a selector
    Query {
        /// Path to the JSON element file
        file: PathBuf,
        /// Selector, e.g. "node[weight > 2]" or "#a > node"
        selector: String,
    },
    /// List the ancestors of a node, nearest first
    Parents {
        /// Path to the JSON element file
        file: PathBuf,
        /// Node ID
        id: String,
    },
    /// List adjacent nodes and connecting edges
    Neighbors {
        /// Path to the JSON element file
        file: PathBuf,
        /// Node ID
        id: String,
    },
    /// Report every element or parent link the builder discarded
    Check {
        /// Path to the JSON element file
        file: PathBuf,
    },
    /// Export the normalized element description as JSON
    Export {
        /// Path to the JSON element file
        file: PathBuf,
        /// Pretty-print JSON
        #[arg(long)]
        pretty: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    let json = cli.format == OutputFormat::Json;

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new().filter_level(level).init();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let result = match cli.command {
        Commands::Info { file } => commands::cmd_info(&file, json, &mut out),
        Commands::Get { file, id } => commands::cmd_get(&file, &id, json, &mut out),
        Commands::Query { file, selector } => {
            commands::cmd_query(&file, &selector, json, &mut out)
        }
        Commands::Parents { file, id } => commands::cmd_parents(&file, &id, json, &mut out),
        Commands::Neighbors { file, id } => commands::cmd_neighbors(&file, &id, json, &mut out),
        Commands::Check { file } => commands::cmd_check(&file, json, &mut out),
        Commands::Export { file, pretty } => commands::cmd_export(&file, pretty, &mut out),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        let code = match &e {
            GraphError::Io(_) => 1,
            GraphError::Json(_) | GraphError::InvalidSpec(_) => 2,
            GraphError::Selector(_) => 3,
            GraphError::ElementNotFound(_) | GraphError::NotANode(_) => 4,
            _ => 5,
        };
        process::exit(code);
    }
}
