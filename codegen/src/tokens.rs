//! The token module (`pytokens.ml`) every generated parser opens.

use grammar::{GrammarDescription, TokenCollection, TokenKind};

use crate::common::token_tag;
use crate::error::Result;

const PYTOKENS_ML: &str = r#"open Core

type ast = Pyast.ast

type tag = int
type lab = string
type token_pair = (tag * lab)

type token =
    | {token_type_def}

let string_of_token (t : token) : string =
    match t with
    | {string_of_token_clauses}

let token_pair_of_token (t : token) : token_pair =
    match t with
    | {token_pair_of_token_clauses}

let string_token_assoc : (string * token) list =
    [ {string_token_assoc_elements}
    ]

let token_of_string (s : string) : token =
    let pat_match (pat : string) : bool = Str.string_match (Str.regexp pat) s 0 in
    let matched (s : string) : string = Str.matched_group 1 s in
    if {token_of_string_patterns}
    else try  List.Assoc.find_exn ~equal:String.equal string_token_assoc s
         with Not_found -> failwith ("Could not find token '" ^ s ^ "' in string_token_assoc.")

let token_pair_of_string (s : string) : token_pair = token_pair_of_token (token_of_string s)
"#;

pub(crate) fn generate(desc: &GrammarDescription) -> Result<Vec<String>> {
    let tokens = desc.tokens();
    let untyped: Vec<&str> = tokens
        .named
        .iter()
        .chain(tokens.nameless.iter())
        .map(String::as_str)
        .collect();

    let mut type_def: Vec<String> = untyped.iter().map(|name| format!("{}_", name)).collect();
    let mut string_clauses: Vec<String> = untyped
        .iter()
        .map(|name| format!("{}_ -> \"{}\"", name, name))
        .collect();
    let mut pair_clauses = Vec::with_capacity(tokens.len());
    for name in &untyped {
        pair_clauses.push(format!(
            "{}_ -> ({}, \"{}\")",
            name,
            token_tag(tokens, name)?,
            name
        ));
    }
    for (name, ty) in &tokens.typed {
        type_def.push(format!("{}_ of {}", name, ty));
        string_clauses.push(format!("{}_ s -> s", name));
        pair_clauses.push(format!("{}_ s -> ({}, s)", name, token_tag(tokens, name)?));
    }
    let assoc: Vec<String> = untyped
        .iter()
        .map(|name| format!("(\"{}\", {}_)", name, name))
        .collect();

    let text = PYTOKENS_ML
        .replace("{token_type_def}", &type_def.join("\n    | "))
        .replace("{string_of_token_clauses}", &string_clauses.join("\n    | "))
        .replace("{token_pair_of_token_clauses}", &pair_clauses.join("\n    | "))
        .replace("{string_token_assoc_elements}", &assoc.join("\n    ; "))
        .replace("{token_of_string_patterns}", &string_patterns(tokens));
    Ok(text.split('\n').map(str::to_owned).collect())
}

/// Conditions of `token_of_string` for the amorphous and parameterized
/// tokens the grammar uses.
fn string_patterns(tokens: &TokenCollection) -> String {
    let present = |kind: &TokenKind| tokens.all().any(|name| name == kind.name());
    let amorphous = TokenKind::amorphous()
        .filter(present)
        .map(|kind| format!("pat_match \"^{}$\" then {}_", kind.name(), kind.name()));
    let parameterized = TokenKind::parameterized().filter(present).map(|kind| {
        format!(
            r#"pat_match "^{} \"\\(.*\\)\"$" then {}_ (matched s)"#,
            kind.name(),
            kind.name()
        )
    });
    let patterns: Vec<String> = amorphous.chain(parameterized).collect();
    if patterns.is_empty() {
        "false then assert false".to_owned()
    } else {
        patterns.join("\n    else if ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grammar::Grammar;

    fn generate_for(input: &str, start: &str) -> Vec<String> {
        let grammar: Grammar = input.parse().unwrap();
        generate(&GrammarDescription::new(grammar, vec![start.to_owned()]).unwrap()).unwrap()
    }

    fn section<'a>(lines: &'a [String], header: &str) -> Vec<&'a str> {
        lines
            .iter()
            .skip_while(|l| !l.starts_with(header))
            .skip(1)
            .take_while(|l| !l.is_empty())
            .map(String::as_str)
            .collect()
    }

    #[test]
    fn token_module() {
        let lines = generate_for("s: NAME '+' '?' NEWLINE\n", "s");
        assert_eq!(lines[0], "open Core");
        assert_eq!(
            section(&lines, "type token ="),
            vec!["    | NEWLINE_", "    | PLUS_", "    | TOKEN_1_", "    | NAME_ of string"]
        );
        assert_eq!(
            section(&lines, "let token_pair_of_token"),
            vec![
                "    match t with",
                "    | NEWLINE_ -> (79, \"NEWLINE\")",
                "    | PLUS_ -> (26, \"PLUS\")",
                "    | TOKEN_1_ -> (86, \"TOKEN_1\")",
                "    | NAME_ s -> (83, s)",
            ]
        );
        assert_eq!(
            section(&lines, "let string_token_assoc"),
            vec![
                "    [ (\"NEWLINE\", NEWLINE_)",
                "    ; (\"PLUS\", PLUS_)",
                "    ; (\"TOKEN_1\", TOKEN_1_)",
                "    ]",
            ]
        );
        assert!(lines.contains(&"    if pat_match \"^NEWLINE$\" then NEWLINE_".to_owned()));
        assert!(lines.contains(
            &r#"    else if pat_match "^NAME \"\\(.*\\)\"$" then NAME_ (matched s)"#.to_owned()
        ));
        assert!(!lines.iter().any(|l| l.contains("^NUMBER")));
    }

    #[test]
    fn no_patterns() {
        let lines = generate_for("s: '+' s | '-'\n", "s");
        assert!(lines.contains(&"    if false then assert false".to_owned()));
    }
}
