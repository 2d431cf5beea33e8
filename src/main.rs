//! Generates the parsers for the parsing-with-zippers benchmark from a
//! grammar description.

use anyhow::Result;
use clap::{Parser, Subcommand};
use codegen::Backend;
use grammar::GrammarDescription;
use std::path::PathBuf;

mod config;
mod generate;

use config::{Config, DEFAULT_GRAMMAR};

#[derive(Parser)]
#[command(name = "pwzgen", version, about = "Generate benchmark parsers from a grammar description.")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the token module and every selected backend's parser
    Generate {
        #[arg(short, long, default_value = DEFAULT_GRAMMAR)]
        grammar: PathBuf,
        /// Output directory
        #[arg(short, long)]
        output: PathBuf,
        /// Start symbol; repeatable [default: file_input]
        #[arg(short, long = "start")]
        start: Vec<String>,
        /// Backend to generate; repeatable [default: all]
        #[arg(short = 'p', long = "backend")]
        backends: Vec<Backend>,
        /// Number of worker threads
        #[arg(short, long)]
        jobs: Option<usize>,
    },
    /// Print the grammar, one production per line
    Show {
        #[arg(short, long, default_value = DEFAULT_GRAMMAR)]
        grammar: PathBuf,
        /// Print the grammar as parsed, before normalization
        #[arg(long)]
        untransformed: bool,
    },
    /// Print how each terminal is classified
    Tokens {
        #[arg(short, long, default_value = DEFAULT_GRAMMAR)]
        grammar: PathBuf,
    },
    /// List the available backends
    List,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_default_env()
        .format_timestamp(None)
        .init();

    match cli.command {
        Command::Generate {
            grammar,
            output,
            start,
            backends,
            jobs,
        } => {
            let config = Config::new(grammar, output)
                .with_start_symbols(start)
                .with_backends(backends)
                .with_jobs(jobs);
            generate::run(&config)?;
        }
        Command::Show {
            grammar,
            untransformed,
        } => {
            let grammar = generate::load_grammar(&grammar, !untransformed)?;
            print!("{}", grammar.pretty());
        }
        Command::Tokens { grammar } => {
            let grammar = generate::load_grammar(&grammar, true)?;
            let desc = GrammarDescription::new(grammar, Vec::new())?;
            for line in generate::token_report(&desc) {
                println!("{}", line);
            }
        }
        Command::List => {
            for backend in Backend::ALL {
                println!("{:<16} {}", backend.name(), backend.file_name());
            }
        }
    }
    Ok(())
}
