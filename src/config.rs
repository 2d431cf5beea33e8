use anyhow::{bail, Result};
use codegen::Backend;
use std::path::PathBuf;

pub const DEFAULT_GRAMMAR: &str = "grammars/python-3.4.grammar";
pub const DEFAULT_START: &str = "file_input";

/// Everything a `generate` run needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub grammar: PathBuf,
    pub output: PathBuf,
    pub start_symbols: Vec<String>,
    /// Backends to run, in order. Empty selects all of them.
    pub backends: Vec<Backend>,
    /// Worker threads; None lets the pool decide.
    pub jobs: Option<usize>,
}

impl Config {
    pub fn new(grammar: PathBuf, output: PathBuf) -> Self {
        Config {
            grammar,
            output,
            start_symbols: vec![DEFAULT_START.to_owned()],
            backends: Backend::ALL.to_vec(),
            jobs: None,
        }
    }

    pub fn with_start_symbols(mut self, start_symbols: Vec<String>) -> Self {
        if !start_symbols.is_empty() {
            self.start_symbols = start_symbols;
        }
        self
    }

    pub fn with_backends(mut self, mut backends: Vec<Backend>) -> Self {
        if !backends.is_empty() {
            let mut seen = Vec::with_capacity(backends.len());
            backends.retain(|b| {
                let fresh = !seen.contains(b);
                seen.push(*b);
                fresh
            });
            self.backends = backends;
        }
        self
    }

    pub fn with_jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    /// Reject a configuration before any work is done.
    pub fn validate(&self) -> Result<()> {
        if self.start_symbols.is_empty() {
            bail!("at least one start symbol is required");
        }
        if self.output.as_os_str().is_empty() {
            bail!("an output directory is required");
        }
        if self.output.is_file() {
            bail!("output path {} is a file", self.output.display());
        }
        if self.jobs == Some(0) {
            bail!("the number of jobs must be positive");
        }
        Ok(())
    }
}
