use anyhow::{Context, Result};
use codegen::{generate_tokens, TOKENS_FILE};
use grammar::{Grammar, GrammarDescription};
use log::info;
use rayon::prelude::*;
use std::fs;
use std::path::Path;

use crate::config::Config;

pub fn load_grammar(path: &Path, transform: bool) -> Result<Grammar> {
    let grammar = if transform {
        Grammar::from_file(path)
    } else {
        Grammar::untransformed_from_file(path)
    };
    let grammar = grammar.with_context(|| format!("failed to load grammar {}", path.display()))?;
    info!(
        "Grammar has {} rules, {} non-terminals, {} terminals",
        grammar.rules().len(),
        grammar.non_terminals().len(),
        grammar.terminals().len()
    );
    Ok(grammar)
}

/// Render every selected backend and write the results under the output
/// directory. Nothing is written unless every backend succeeds.
pub fn run(config: &Config) -> Result<()> {
    config.validate()?;
    let grammar = load_grammar(&config.grammar, true)?;
    let desc = GrammarDescription::new(grammar, config.start_symbols.clone())?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.jobs.unwrap_or(0))
        .build()?;
    let outputs = pool.install(|| {
        config
            .backends
            .par_iter()
            .map(|backend| {
                backend
                    .generate(&desc)
                    .map(|lines| (*backend, lines))
                    .with_context(|| format!("backend {} failed", backend))
            })
            .collect::<Result<Vec<_>>>()
    })?;
    let tokens = generate_tokens(&desc)?;

    fs::create_dir_all(&config.output)
        .with_context(|| format!("failed to create {}", config.output.display()))?;
    write_lines(&config.output.join(TOKENS_FILE), &tokens)?;
    for (backend, lines) in &outputs {
        let dir = config.output.join(backend.name());
        fs::create_dir_all(&dir).with_context(|| format!("failed to create {}", dir.display()))?;
        write_lines(&dir.join(backend.file_name()), lines)?;
    }
    info!(
        "Wrote {} backends to {}",
        outputs.len(),
        config.output.display()
    );
    Ok(())
}

fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    fs::write(path, lines.join("\n")).with_context(|| format!("failed to write {}", path.display()))
}

/// The token classification, one terminal per line.
pub fn token_report(desc: &GrammarDescription) -> Vec<String> {
    let tokens = desc.tokens();
    desc.terminal_names()
        .iter()
        .map(|(terminal, name)| {
            let tag = tokens
                .tag_of(name)
                .map_or_else(|| "-".to_owned(), |tag| tag.to_string());
            let ty = tokens
                .typed
                .iter()
                .find(|(typed, _)| typed == name)
                .map_or("", |(_, ty)| ty.as_str());
            format!("{:<12} {:<16} {:>4} {}", terminal.0, name, tag, ty)
                .trim_end()
                .to_owned()
        })
        .collect()
}
