//! Command-line interface for the Solace front end.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use solace::pipeline::{BuildOptions, Emit};

#[derive(Parser)]
#[command(name = "solace")]
#[command(about = "Smart-contract AST construction and type resolution", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build the AST of a parse tree and emit it
    Build {
        /// Parse tree serialized as JSON
        tree: PathBuf,

        /// Output form
        #[arg(long, value_enum, default_value_t = EmitArg::Json)]
        emit: EmitArg,

        /// Skip the forward-reference pass
        #[arg(long)]
        no_resolve: bool,

        /// Original source text, used to render diagnostics
        #[arg(long)]
        source: Option<PathBuf>,

        /// Write output here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the ABI of every contract (or one) as JSON
    Abi {
        tree: PathBuf,

        #[arg(long)]
        contract: Option<String>,
    },

    /// Decode a serialized AST (JSON or envelope) and print it as JSON
    Decode { input: PathBuf },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum EmitArg {
    Json,
    Envelope,
    Ir,
}

impl From<EmitArg> for Emit {
    fn from(arg: EmitArg) -> Self {
        match arg {
            EmitArg::Json => Emit::Json,
            EmitArg::Envelope => Emit::Envelope,
            EmitArg::Ir => Emit::Ir,
        }
    }
}

pub fn build_options(emit: EmitArg, no_resolve: bool) -> BuildOptions {
    BuildOptions {
        resolve_forward_references: !no_resolve,
        emit: emit.into(),
    }
}
