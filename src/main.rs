//! Solace CLI entry point.

mod cli;
mod diagnostics;

use std::path::{Path, PathBuf};

use clap::Parser;
use cli::{Cli, Command};
use ropey::Rope;
use solace::pipeline::{self, PipelineResult};
use solace_ast::serialize::to_json_pretty;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Build {
            tree,
            emit,
            no_resolve,
            source,
            output,
        } => build(&tree, cli::build_options(emit, no_resolve), source, output),
        Command::Abi { tree, contract } => abi(&tree, contract.as_deref()),
        Command::Decode { input } => decode(&input),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn build(
    tree: &Path,
    options: solace::BuildOptions,
    source: Option<PathBuf>,
    output: Option<PathBuf>,
) -> PipelineResult<()> {
    let root = pipeline::load_parse_tree(tree)?;
    let built = pipeline::build(&root, &options)?;

    let source_text = source.and_then(|path| {
        match std::fs::File::open(&path).and_then(Rope::from_reader) {
            Ok(text) => Some((path, text)),
            Err(e) => {
                eprintln!("cannot read {}: {e}", path.display());
                None
            }
        }
    });
    for diag in &built.diagnostics {
        match &source_text {
            Some((path, text)) => {
                diagnostics::print_diagnostic(diag, text, &path.display().to_string())
            }
            None => eprintln!("{}", diagnostics::format_plain(diag)),
        }
    }

    let bytes = pipeline::emit(&built, options.emit)?;
    match output {
        Some(path) => pipeline::write(&path, &bytes),
        None => pipeline::write_stream(std::io::stdout().lock(), &bytes),
    }
}

fn abi(tree: &Path, contract: Option<&str>) -> PipelineResult<()> {
    let root = pipeline::load_parse_tree(tree)?;
    let built = pipeline::build(&root, &solace::BuildOptions::default())?;
    for diag in &built.diagnostics {
        eprintln!("{}", diagnostics::format_plain(diag));
    }
    let methods = pipeline::abi(&built, contract)?;
    let json = to_json_pretty(&methods)? + "\n";
    pipeline::write_stream(std::io::stdout().lock(), json.as_bytes())
}

fn decode(input: &Path) -> PipelineResult<()> {
    let bytes = pipeline::read(input)?;
    let node = pipeline::decode(&bytes)?;
    let json = to_json_pretty(&node)? + "\n";
    pipeline::write_stream(std::io::stdout().lock(), json.as_bytes())
}
