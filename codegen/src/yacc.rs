//! Shared layout of the LR-style parser-generator grammar files.

use grammar::{GrammarDescription, Production, Rule};

use crate::common::{component_names, production_label, single_group};
use crate::error::{Error, Result};

/// What differs between the parser-generator input dialects.
pub(crate) struct Dialect {
    pub name: &'static str,
    /// Delimiters around the OCaml prelude.
    pub header: (&'static str, &'static str),
    /// Maximum number of symbols in one production.
    pub max_components: Option<usize>,
    /// Write rules with a single production on one line.
    pub inline_single: bool,
}

pub(crate) fn generate(dialect: &Dialect, desc: &GrammarDescription) -> Result<Vec<String>> {
    let tokens = desc.tokens();
    let untyped = tokens.named.iter().chain(tokens.nameless.iter());

    let mut lines: Vec<String> = vec![
        "/* Prelude */".to_owned(),
        dialect.header.0.to_owned(),
        "let seq (p : (string * Pyast.ast list)) : Pyast.ast = Pyast.Ast (fst p, snd p)".to_owned(),
        "let tok (s : string) : Pyast.ast = seq (s, [])".to_owned(),
        dialect.header.1.to_owned(),
        String::new(),
        "/* Token Definitions */".to_owned(),
    ];
    lines.extend(untyped.clone().map(|name| format!("%token {}_", name)));
    lines.extend(
        tokens
            .typed
            .iter()
            .map(|(name, ty)| format!("%token <{}> {}_", ty, name)),
    );

    lines.push(String::new());
    lines.push("/* Start Symbols */".to_owned());
    lines.extend(
        desc.start_symbols()
            .iter()
            .map(|start| format!("%start <Pyast.ast> {}", start)),
    );
    lines.extend(vec![String::new(), "%%".to_owned(), String::new()]);

    lines.push("/* Token Parsers */".to_owned());
    lines.extend(untyped.map(|name| format!("{}: {}_ {{ tok \"{}\" }}", name, name, name)));
    lines.extend(
        tokens
            .typed
            .iter()
            .map(|(name, _)| format!("{}: {}_ {{ tok $1 }}", name, name)),
    );

    lines.push(String::new());
    lines.push("/* Main Grammar Parsers */".to_owned());
    for rule in desc.grammar().rules().values() {
        rule_lines(dialect, desc, rule, &mut lines)?;
    }
    lines.push(String::new());
    Ok(lines)
}

fn rule_lines(
    dialect: &Dialect,
    desc: &GrammarDescription,
    rule: &Rule,
    lines: &mut Vec<String>,
) -> Result<()> {
    let group = single_group(rule)?;
    if let [production] = group.productions.as_slice() {
        if dialect.inline_single {
            let production = production_line(dialect, desc, rule, production, None)?;
            lines.push(format!("{}: {}", rule.name, production));
            return Ok(());
        }
    }

    let single = group.productions.len() == 1;
    lines.push(format!("{}:", rule.name));
    for (i, production) in group.productions.iter().enumerate() {
        let index = if single { None } else { Some(i + 1) };
        let production = production_line(dialect, desc, rule, production, index)?;
        lines.push(format!("    | {}", production));
    }
    Ok(())
}

/// The production's symbols followed by its semantic action.
fn production_line(
    dialect: &Dialect,
    desc: &GrammarDescription,
    rule: &Rule,
    production: &Production,
    index: Option<usize>,
) -> Result<String> {
    let parts = component_names(desc, rule, production, "")?;
    if let Some(limit) = dialect.max_components {
        if parts.len() > limit {
            return Err(Error::TooManyComponents {
                backend: dialect.name,
                rule: rule.name.clone(),
                count: parts.len(),
                limit,
            });
        }
    }
    let arguments: Vec<String> = (1..=parts.len()).map(|i| format!("${}", i)).collect();
    Ok(format!(
        "{} {{ seq (\"{}\", [ {} ]) }}",
        parts.join(" "),
        production_label(&rule.name, index),
        arguments.join("; ")
    ))
}
