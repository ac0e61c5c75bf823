// CLI Layer
// ユーザー入力の受付とコマンドルーティング

pub mod command_context;
pub mod commands;

use crate::adapters::generator::GeneratorTarget;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tessera - Schema Graph Normalizer
///
/// Turns a schema-graph snapshot into a normalized, language-neutral IR
/// and renders it as schema descriptions or type definitions.
#[derive(Parser, Debug)]
#[command(name = "tessera")]
#[command(author = "Tessera Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Schema graph normalization CLI tool")]
#[command(long_about = "Tessera - Schema Graph Normalizer

Reads a schema-graph snapshot (tables, enums, relation sets) and produces a
normalized intermediate representation with resolved relations.

Tessera helps you:
  • Classify storage columns into a closed set of column types
  • Resolve relation fields, falling back to foreign keys
  • Render Prisma schemas and TypeScript type definitions
  • Validate referential integrity of the normalized schema")]
#[command(propagate_version = true)]
#[command(after_help = "GETTING STARTED:
  1. Initialize a new project:      tessera init
  2. Export your schema graph:      Edit schema/graph.yaml
  3. Inspect the normalized schema: tessera summary
  4. Generate a Prisma schema:      tessera generate --target prisma

For detailed help on each command, use: tessera <command> --help")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new project
    ///
    /// Creates the configuration file and an example schema-graph snapshot.
    ///
    /// EXAMPLES:
    ///   # Initialize in the current directory
    ///   tessera init
    ///
    ///   # Overwrite an existing configuration
    ///   tessera init --force
    Init {
        /// Force initialization even if config exists
        #[arg(short, long)]
        force: bool,
    },

    /// Normalize the schema graph and print its summary
    ///
    /// EXAMPLES:
    ///   # Summarize the configured snapshot
    ///   tessera summary
    ///
    ///   # Dump the normalized IR as JSON
    ///   tessera summary --json
    Summary {
        /// Schema-graph snapshot (YAML or JSON)
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Print the normalized IR as JSON instead of the summary
        #[arg(long)]
        json: bool,
    },

    /// Generate a schema description or type definitions
    ///
    /// EXAMPLES:
    ///   # Write the Prisma schema to the configured output
    ///   tessera generate --target prisma
    ///
    ///   # Use a custom prelude
    ///   tessera generate --target prisma --base base.prisma
    ///
    ///   # Print type definitions to stdout
    ///   tessera generate --target types --stdout
    Generate {
        /// Generation target (prisma, types)
        #[arg(short, long, value_name = "TARGET")]
        target: GeneratorTarget,

        /// Schema-graph snapshot (YAML or JSON)
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Base prelude placed at the top of the Prisma schema
        #[arg(short, long, value_name = "FILE")]
        base: Option<PathBuf>,

        /// Output file (defaults to the configured output)
        #[arg(short, long, value_name = "FILE", conflicts_with = "stdout")]
        output: Option<PathBuf>,

        /// Print the generated document instead of writing a file
        #[arg(long)]
        stdout: bool,
    },

    /// Validate the normalized schema
    ///
    /// Checks relation fields, index fields and enum references of the
    /// normalized schema.
    ///
    /// EXAMPLES:
    ///   # Validate the configured snapshot
    ///   tessera validate
    ///
    ///   # Validate a specific snapshot
    ///   tessera validate --input ./exported/graph.json
    Validate {
        /// Schema-graph snapshot (YAML or JSON)
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,
    },
}
