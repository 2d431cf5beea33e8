//! Grammar descriptions in the Python grammar dialect.
//!
//! A description file is tokenized, split into rules and parsed into a tree
//! of productions. Normalization then turns every repetition, optional block
//! and nested group into a synthesized rule, and alias reduction inlines
//! rules that only rename another symbol. The result is a [`Grammar`] made of
//! flat sequences of terminals and non-terminals, which a
//! [`GrammarDescription`] pairs with start symbols and a token
//! classification for code generation.

use indexmap::{IndexMap, IndexSet};
use log::debug;
use std::fmt::{self, Display};
use std::path::Path;
use std::str::FromStr;

mod description;
mod error;
mod lexer;
mod normalize;
mod parser;
mod reduce;
pub mod tokens;

pub use description::{GrammarDescription, TokenCollection};
pub use error::{Error, ErrorCategory, Result};
pub use lexer::{tokenize, tokenize_file};
pub use normalize::{NameSynthesizer, Normalizer, SynthesisKind};
pub use parser::parse_rules;
pub use reduce::{is_alias, reduce_aliases};
pub use tokens::{Token, TokenClass, TokenKind};

/// A token-class value, e.g. `NAME` or the spelling of a literal like `+`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Terminal(pub String);

impl Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Terminal {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A reference to a rule by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NonTerminal(pub String);

impl Display for NonTerminal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NonTerminal {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Repetition marker attached to a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    None,
    /// `*`
    List,
    /// `+`
    NonEmptyList,
}

impl Repeat {
    pub fn is_repeated(self) -> bool {
        self != Repeat::None
    }
}

impl Display for Repeat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Repeat::None => Ok(()),
            Repeat::List => write!(f, "*"),
            Repeat::NonEmptyList => write!(f, "+"),
        }
    }
}

/// Names the variant of a [`Symbol`] in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolTag {
    Terminal,
    Literal,
    NonTerminal,
    Group,
}

impl Display for SymbolTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            SymbolTag::Terminal => "Terminal",
            SymbolTag::Literal => "Literal",
            SymbolTag::NonTerminal => "NonTerminal",
            SymbolTag::Group => "ProductionGroup",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    /// An upper-case bare word.
    Terminal(Terminal),
    /// A quoted string.
    Literal(Terminal),
    NonTerminal(NonTerminal),
    Group(ProductionGroup),
}

impl Symbol {
    pub fn tag(&self) -> SymbolTag {
        match self {
            Symbol::Terminal(_) => SymbolTag::Terminal,
            Symbol::Literal(_) => SymbolTag::Literal,
            Symbol::NonTerminal(_) => SymbolTag::NonTerminal,
            Symbol::Group(_) => SymbolTag::Group,
        }
    }

    /// The terminal value of a terminal or literal.
    pub fn as_terminal(&self) -> Option<&Terminal> {
        match self {
            Symbol::Terminal(t) | Symbol::Literal(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_non_terminal(&self) -> Option<&NonTerminal> {
        match self {
            Symbol::NonTerminal(nt) => Some(nt),
            _ => None,
        }
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Symbol::Terminal(t) => write!(f, "{}", t),
            Symbol::Literal(t) if t.0.contains('\'') => write!(f, "\"{}\"", t),
            Symbol::Literal(t) => write!(f, "'{}'", t),
            Symbol::NonTerminal(nt) => write!(f, "{}", nt),
            Symbol::Group(group) => write!(f, "{}", group),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub symbol: Symbol,
    pub repeat: Repeat,
}

impl Component {
    pub fn new(symbol: Symbol) -> Self {
        Component {
            symbol,
            repeat: Repeat::None,
        }
    }

    pub fn repeated(symbol: Symbol, repeat: Repeat) -> Self {
        Component { symbol, repeat }
    }
}

impl From<Symbol> for Component {
    fn from(symbol: Symbol) -> Self {
        Component::new(symbol)
    }
}

impl Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.symbol, self.repeat)
    }
}

/// One alternative: a sequence of components. Empty for epsilon.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Production {
    pub components: Vec<Component>,
}

impl Production {
    pub fn new(components: Vec<Component>) -> Self {
        Production { components }
    }

    pub fn empty() -> Self {
        Production::default()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, component) in self.components.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", component)?;
        }
        Ok(())
    }
}

/// An alternation of productions. Implicit groups are the top-level body of
/// a rule and print without brackets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductionGroup {
    pub optional: bool,
    pub implicit: bool,
    pub productions: Vec<Production>,
}

impl ProductionGroup {
    pub fn implicit(productions: Vec<Production>) -> Self {
        ProductionGroup {
            optional: false,
            implicit: true,
            productions,
        }
    }

    fn alternatives(&self) -> String {
        self.productions
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

impl Display for ProductionGroup {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.implicit {
            write!(f, "{}", self.alternatives())
        } else if self.optional {
            write!(f, "[{}]", self.alternatives())
        } else {
            write!(f, "({})", self.alternatives())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub name: String,
    pub groups: Vec<ProductionGroup>,
}

impl Rule {
    pub fn new(name: &str, group: ProductionGroup) -> Self {
        Rule {
            name: name.to_owned(),
            groups: vec![group],
        }
    }

    /// The rule's group, if it has exactly one.
    pub fn single_group(&self) -> Option<&ProductionGroup> {
        match self.groups.as_slice() {
            [group] => Some(group),
            _ => None,
        }
    }

    /// All symbols of the rule, including those inside nested groups.
    fn walk_symbols<'a>(&'a self, visit: &mut impl FnMut(&'a Symbol)) {
        fn walk_group<'a>(group: &'a ProductionGroup, visit: &mut impl FnMut(&'a Symbol)) {
            for production in &group.productions {
                for component in &production.components {
                    visit(&component.symbol);
                    if let Symbol::Group(inner) = &component.symbol {
                        walk_group(inner, visit);
                    }
                }
            }
        }
        for group in &self.groups {
            walk_group(group, visit);
        }
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:", self.name)?;
        for group in &self.groups {
            let body = group.to_string();
            if body.is_empty() || body.starts_with(' ') {
                write!(f, "{}", body)?;
            } else {
                write!(f, " {}", body)?;
            }
        }
        Ok(())
    }
}

/// Rules keyed by name, in declaration order.
pub type GrammarDict = IndexMap<String, Rule>;

/// A validated set of rules along with every symbol they reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    rules: GrammarDict,
    terminals: IndexSet<Terminal>,
    non_terminals: IndexSet<NonTerminal>,
}

impl Grammar {
    /// Tally the referenced symbols and check that every non-terminal has a
    /// defining rule.
    pub fn new(rules: GrammarDict) -> Result<Self> {
        let mut terminals = IndexSet::new();
        let mut non_terminals = IndexSet::new();
        for rule in rules.values() {
            rule.walk_symbols(&mut |symbol| match symbol {
                Symbol::Terminal(t) | Symbol::Literal(t) => {
                    terminals.insert(t.clone());
                }
                Symbol::NonTerminal(nt) => {
                    non_terminals.insert(nt.clone());
                }
                Symbol::Group(_) => (),
            });
        }

        let missing: Vec<String> = non_terminals
            .iter()
            .filter(|nt| !rules.contains_key(&nt.0))
            .map(|nt| nt.0.clone())
            .collect();
        if !missing.is_empty() {
            return Err(Error::MissingDefinitions(missing));
        }

        debug!(
            "grammar has {} rules, {} terminals, {} non-terminals",
            rules.len(),
            terminals.len(),
            non_terminals.len()
        );
        Ok(Grammar {
            rules,
            terminals,
            non_terminals,
        })
    }

    /// Read, normalize and reduce a grammar file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let tokens = lexer::tokenize_file(path, true)?;
        build(&tokens, true)
    }

    /// Parse a grammar without normalizing or reducing it.
    pub fn untransformed_from_str(s: &str) -> Result<Self> {
        let tokens = lexer::tokenize(s, true)?;
        build(&tokens, false)
    }

    pub fn untransformed_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let tokens = lexer::tokenize_file(path, true)?;
        build(&tokens, false)
    }

    pub fn rules(&self) -> &GrammarDict {
        &self.rules
    }

    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    /// Terminals in the order they are first referenced.
    pub fn terminals(&self) -> &IndexSet<Terminal> {
        &self.terminals
    }

    pub fn non_terminals(&self) -> &IndexSet<NonTerminal> {
        &self.non_terminals
    }

    /// Display one production per line.
    pub fn pretty(&self) -> Pretty<'_> {
        Pretty(self)
    }
}

impl Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rule in self.rules.values() {
            writeln!(f, "{}", rule)?;
        }
        Ok(())
    }
}

impl FromStr for Grammar {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let tokens = lexer::tokenize(s, true)?;
        build(&tokens, true)
    }
}

/// Multi-line rendering of a grammar, see [`Grammar::pretty`].
pub struct Pretty<'a>(&'a Grammar);

impl Display for Pretty<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rule in self.0.rules.values() {
            writeln!(f, "{}:", rule.name)?;
            for group in &rule.groups {
                for production in &group.productions {
                    if production.is_empty() {
                        writeln!(f, "  |")?;
                    } else {
                        writeln!(f, "  | {}", production)?;
                    }
                }
            }
        }
        Ok(())
    }
}

fn build(tokens: &[Token], transform: bool) -> Result<Grammar> {
    let mut rules = parser::parse_rules(tokens)?;
    debug!("parsed {} rules", rules.len());
    if transform {
        rules = Normalizer::new().transform_grammar(&rules)?;
        debug!("normalized grammar has {} rules", rules.len());
        reduce::reduce_aliases(&mut rules)?;
        debug!("reduced grammar has {} rules", rules.len());
    }
    Grammar::new(rules)
}
