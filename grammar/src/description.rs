use indexmap::{IndexMap, IndexSet};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};
use crate::tokens::{TokenKind, NAMELESS_TAG_BASE};
use crate::{Grammar, Terminal};

static TOKEN_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9_]*$").unwrap());

/// The grammar's terminals by category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenCollection {
    /// Sorted.
    pub named: Vec<String>,
    /// `TOKEN_1`, `TOKEN_2`, ... in discovery order.
    pub nameless: Vec<String>,
    /// Sorted `(name, payload type)` pairs.
    pub typed: Vec<(String, String)>,
}

impl TokenCollection {
    /// Every token name: named, then nameless, then typed.
    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.named
            .iter()
            .chain(self.nameless.iter())
            .map(String::as_str)
            .chain(self.typed.iter().map(|(name, _)| name.as_str()))
    }

    pub fn is_typed(&self, name: &str) -> bool {
        self.typed.iter().any(|(typed, _)| typed == name)
    }

    pub fn len(&self) -> usize {
        self.named.len() + self.nameless.len() + self.typed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The numeric tag of a token.
    ///
    /// Tokens of the fixed table use their table tag. Nameless tokens follow
    /// the table, and named tokens outside the table follow those.
    pub fn tag_of(&self, name: &str) -> Option<u32> {
        if let Some(kind) = TokenKind::from_name(name) {
            return Some(kind.tag());
        }
        if let Some(i) = self.nameless.iter().position(|n| n == name) {
            return Some(NAMELESS_TAG_BASE + i as u32);
        }
        self.named
            .iter()
            .filter(|n| TokenKind::from_name(n).is_none())
            .position(|n| n == name)
            .map(|i| NAMELESS_TAG_BASE + (self.nameless.len() + i) as u32)
    }
}

/// A finished grammar along with everything a code generator needs to know
/// about it.
#[derive(Debug, Clone)]
pub struct GrammarDescription {
    grammar: Grammar,
    start_symbols: Vec<String>,
    terminal_names: IndexMap<Terminal, String>,
    tokens: TokenCollection,
}

impl GrammarDescription {
    /// Classify the grammar's terminals. Every start symbol must name a rule.
    pub fn new(grammar: Grammar, start_symbols: Vec<String>) -> Result<Self> {
        if let Some(unknown) = start_symbols.iter().find(|s| grammar.rule(s).is_none()) {
            return Err(Error::UnknownStartSymbol(unknown.clone()));
        }
        let (terminal_names, tokens) = classify(grammar.terminals());
        debug!(
            "classified {} named, {} nameless and {} typed tokens",
            tokens.named.len(),
            tokens.nameless.len(),
            tokens.typed.len()
        );
        Ok(GrammarDescription {
            grammar,
            start_symbols,
            terminal_names,
            tokens,
        })
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn start_symbols(&self) -> &[String] {
        &self.start_symbols
    }

    pub fn tokens(&self) -> &TokenCollection {
        &self.tokens
    }

    /// The token name a terminal is emitted as.
    pub fn terminal_name(&self, terminal: &Terminal) -> Option<&str> {
        self.terminal_names.get(terminal).map(String::as_str)
    }

    pub fn terminal_names(&self) -> &IndexMap<Terminal, String> {
        &self.terminal_names
    }
}

fn classify(terminals: &IndexSet<Terminal>) -> (IndexMap<Terminal, String>, TokenCollection) {
    let mut names = IndexMap::with_capacity(terminals.len());
    let mut tokens = TokenCollection::default();

    for terminal in terminals {
        let value = terminal.0.as_str();
        let name = if TOKEN_NAME_RE.is_match(value) {
            let name = value.to_uppercase();
            match TokenKind::from_name(&name).and_then(TokenKind::payload_type) {
                Some(ty) => {
                    if !tokens.is_typed(&name) {
                        tokens.typed.push((name.clone(), ty.to_owned()));
                    }
                }
                None => push_unique(&mut tokens.named, &name),
            }
            name
        } else if let Some(kind) = TokenKind::operator(value) {
            let name = kind.name().to_owned();
            push_unique(&mut tokens.named, &name);
            name
        } else {
            let name = format!("TOKEN_{}", tokens.nameless.len() + 1);
            tokens.nameless.push(name.clone());
            name
        };
        names.insert(terminal.clone(), name);
    }

    tokens.named.sort();
    tokens.typed.sort();
    (names, tokens)
}

fn push_unique(names: &mut Vec<String>, name: &str) {
    if !names.iter().any(|n| n == name) {
        names.push(name.to_owned());
    }
}
