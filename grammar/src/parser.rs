use crate::error::{Error, Result};
use crate::tokens::{Token, TokenKind};
use crate::{
    Component, GrammarDict, NonTerminal, Production, ProductionGroup, Repeat, Rule, Symbol,
    Terminal,
};

/// Split a token stream into rules and parse each of them.
///
/// A rule starts at the NAME in front of a COLON and runs up to the NAME in
/// front of the next COLON.
pub fn parse_rules(tokens: &[Token]) -> Result<GrammarDict> {
    let mut starts = Vec::new();
    for (idx, tok) in tokens.iter().enumerate() {
        if tok.kind == TokenKind::Colon {
            if idx == 0 {
                return Err(Error::MalformedRule {
                    line: tok.line,
                    message: "rule has no name".to_owned(),
                });
            }
            starts.push(idx - 1);
        }
    }

    let first = starts.first().copied().unwrap_or(tokens.len());
    if let Some(tok) = tokens[..first].iter().find(|tok| !is_layout(tok.kind)) {
        return Err(Error::MalformedRule {
            line: tok.line,
            message: format!("unexpected {} before the first rule", tok),
        });
    }

    let mut rules = GrammarDict::new();
    for (i, start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(tokens.len());
        let rule = parse_rule(&tokens[*start..end])?;
        if rules.contains_key(&rule.name) {
            return Err(Error::DuplicateRule(rule.name));
        }
        rules.insert(rule.name.clone(), rule);
    }
    Ok(rules)
}

fn is_layout(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Newline | TokenKind::Indent | TokenKind::Dedent | TokenKind::EndMarker
    )
}

fn parse_rule(slice: &[Token]) -> Result<Rule> {
    let tokens: Vec<&Token> = slice
        .iter()
        .filter(|tok| tok.kind != TokenKind::Newline)
        .collect();

    let line = slice.first().map(|tok| tok.line).unwrap_or_default();
    let name = match tokens.as_slice() {
        [name, colon, ..] if name.kind == TokenKind::Name && colon.kind == TokenKind::Colon => {
            *name
        }
        _ => {
            return Err(Error::MalformedRule {
                line,
                message: "expected a rule name followed by ':'".to_owned(),
            })
        }
    };

    let name = name.param();
    let mut parser = RuleParser {
        rule: name,
        tokens,
        idx: 2,
    };
    if parser.peek().is_none() {
        return Err(Error::MalformedRule {
            line,
            message: format!("rule {} has an empty body", name),
        });
    }

    let mut group = ProductionGroup::implicit(Vec::new());
    parser.parse_group(&mut group, None)?;
    lift_nested_group(&mut group);
    Ok(Rule::new(name, group))
}

/// Replace a body consisting of a single plain group with that group.
fn lift_nested_group(group: &mut ProductionGroup) {
    let liftable = match group.productions.as_slice() {
        [production] => matches!(
            production.components.as_slice(),
            [Component {
                symbol: Symbol::Group(inner),
                repeat: Repeat::None,
            }] if !inner.optional
        ),
        _ => false,
    };
    if !liftable {
        return;
    }
    let component = group
        .productions
        .pop()
        .and_then(|mut production| production.components.pop());
    if let Some(Component {
        symbol: Symbol::Group(mut inner),
        ..
    }) = component
    {
        inner.implicit = true;
        *group = inner;
    }
}

struct RuleParser<'a> {
    rule: &'a str,
    tokens: Vec<&'a Token>,
    idx: usize,
}

impl<'a> RuleParser<'a> {
    /// The next significant token. Indentation tokens are skipped.
    fn peek(&mut self) -> Option<&'a Token> {
        while let Some(tok) = self.tokens.get(self.idx) {
            let tok: &'a Token = *tok;
            match tok.kind {
                TokenKind::Indent | TokenKind::Dedent | TokenKind::EndMarker => self.idx += 1,
                _ => return Some(tok),
            }
        }
        None
    }

    fn next(&mut self) -> Option<&'a Token> {
        let tok = self.peek()?;
        self.idx += 1;
        Some(tok)
    }

    fn unexpected(&self, tok: &Token) -> Error {
        Error::UnexpectedToken {
            rule: self.rule.to_owned(),
            token: tok.to_string(),
            line: tok.line,
            column: tok.column,
        }
    }

    /// Parse alternatives into `group` up to and including `closer`, then
    /// a repetition marker applying to the whole group.
    fn parse_group(
        &mut self,
        group: &mut ProductionGroup,
        closer: Option<TokenKind>,
    ) -> Result<Repeat> {
        loop {
            let (production, more) = self.parse_production()?;
            group.productions.push(production);
            if !more {
                break;
            }
        }

        match (self.next(), closer) {
            (None, None) => Ok(Repeat::None),
            (None, Some(_)) => Err(Error::UnclosedGroup {
                rule: self.rule.to_owned(),
            }),
            (Some(tok), Some(closer)) if tok.kind == closer => {
                let repeat = match self.peek().map(|tok| tok.kind) {
                    Some(TokenKind::Star) => Repeat::List,
                    Some(TokenKind::Plus) => Repeat::NonEmptyList,
                    _ => return Ok(Repeat::None),
                };
                self.idx += 1;
                Ok(repeat)
            }
            (Some(tok), _) => Err(self.unexpected(tok)),
        }
    }

    /// Parse one alternative. The flag is set when the alternative was
    /// ended by `|` and another one follows.
    fn parse_production(&mut self) -> Result<(Production, bool)> {
        let mut components: Vec<Component> = Vec::new();
        while let Some(tok) = self.peek() {
            match tok.kind {
                TokenKind::RPar | TokenKind::RSqr => break,
                TokenKind::Pipe => {
                    self.idx += 1;
                    return Ok((Production::new(components), true));
                }
                TokenKind::LPar | TokenKind::LSqr => {
                    self.idx += 1;
                    let (optional, closer) = if tok.kind == TokenKind::LSqr {
                        (true, TokenKind::RSqr)
                    } else {
                        (false, TokenKind::RPar)
                    };
                    let mut group = ProductionGroup {
                        optional,
                        implicit: false,
                        productions: Vec::new(),
                    };
                    let repeat = self.parse_group(&mut group, Some(closer))?;
                    components.push(Component::repeated(Symbol::Group(group), repeat));
                }
                TokenKind::Star | TokenKind::Plus => {
                    self.idx += 1;
                    let last = components
                        .last_mut()
                        .ok_or_else(|| Error::DanglingRepetition {
                            rule: self.rule.to_owned(),
                            line: tok.line,
                        })?;
                    last.repeat = if tok.kind == TokenKind::Star {
                        Repeat::List
                    } else {
                        Repeat::NonEmptyList
                    };
                }
                TokenKind::Name => {
                    self.idx += 1;
                    components.push(self.name_symbol(tok)?.into());
                }
                TokenKind::String => {
                    self.idx += 1;
                    components.push(Symbol::Literal(Terminal::from(tok.param())).into());
                }
                _ => return Err(self.unexpected(tok)),
            }
        }
        Ok((Production::new(components), false))
    }

    fn name_symbol(&self, tok: &Token) -> Result<Symbol> {
        let name = tok.param();
        if is_cased(name, char::is_uppercase) {
            Ok(Symbol::Terminal(Terminal::from(name)))
        } else if is_cased(name, char::is_lowercase) {
            Ok(Symbol::NonTerminal(NonTerminal::from(name)))
        } else {
            Err(Error::MixedCaseName {
                rule: self.rule.to_owned(),
                name: name.to_owned(),
            })
        }
    }
}

/// At least one letter, and every letter satisfies `case`.
fn is_cased(s: &str, case: fn(char) -> bool) -> bool {
    let mut letters = s.chars().filter(|c| c.is_alphabetic()).peekable();
    letters.peek().is_some() && letters.all(case)
}
