//! The fixed token vocabulary shared by the grammar lexer, the token
//! classifier and every generated parser.
//!
//! A token's tag is its position in the table. Generated parsers compare tags
//! rather than names, so the order of this table is part of the output format.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt::{self, Display};

/// Broad category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    Newline,
    Indent,
    Dedent,
    EndMarker,
    Op,
    Keyword,
    Name,
    Number,
    String,
}

impl TokenClass {
    /// Classes whose tokens carry a payload.
    pub fn is_parameterized(self) -> bool {
        matches!(self, TokenClass::Name | TokenClass::Number | TokenClass::String)
    }

    /// Classes whose tokens have no spelling of their own.
    pub fn is_amorphous(self) -> bool {
        matches!(
            self,
            TokenClass::Newline | TokenClass::Indent | TokenClass::Dedent | TokenClass::EndMarker
        )
    }
}

macro_rules! token_table {
    ($( $variant:ident => ($name:expr, $literal:expr, $class:ident) ),* $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum TokenKind {
            $( $variant ),*
        }

        impl TokenKind {
            /// Every token kind in tag order.
            pub const ALL: &'static [TokenKind] = &[ $( TokenKind::$variant ),* ];

            /// The canonical upper-case name, e.g. `L_PAR`.
            pub fn name(self) -> &'static str {
                match self {
                    $( TokenKind::$variant => $name ),*
                }
            }

            /// The spelling in source text. Empty for amorphous and
            /// parameterized tokens.
            pub fn literal(self) -> &'static str {
                match self {
                    $( TokenKind::$variant => $literal ),*
                }
            }

            pub fn class(self) -> TokenClass {
                match self {
                    $( TokenKind::$variant => TokenClass::$class ),*
                }
            }
        }
    };
}

token_table! {
    Arrow => ("ARROW", "->", Op),
    At => ("AT", "@", Op),
    Semicolon => ("SEMICOLON", ";", Op),
    Colon => ("COLON", ":", Op),
    Comma => ("COMMA", ",", Op),
    Dot => ("DOT", ".", Op),
    Ellipsis => ("ELLIPSIS", "...", Op),
    Tilde => ("TILDE", "~", Op),
    LPar => ("L_PAR", "(", Op),
    RPar => ("R_PAR", ")", Op),
    LSqr => ("L_SQR", "[", Op),
    RSqr => ("R_SQR", "]", Op),
    LBrc => ("L_BRC", "{", Op),
    RBrc => ("R_BRC", "}", Op),
    Eq => ("EQ", "=", Op),
    EqEq => ("EQ_EQ", "==", Op),
    BangEq => ("BANG_EQ", "!=", Op),
    Lt => ("LT", "<", Op),
    Le => ("LE", "<=", Op),
    LtLt => ("LT_LT", "<<", Op),
    LtLtEq => ("LT_LT_EQ", "<<=", Op),
    Gt => ("GT", ">", Op),
    Ge => ("GE", ">=", Op),
    GtGt => ("GT_GT", ">>", Op),
    GtGtEq => ("GT_GT_EQ", ">>=", Op),
    Ne => ("NE", "<>", Op),
    Plus => ("PLUS", "+", Op),
    PlusEq => ("PLUS_EQ", "+=", Op),
    Dash => ("DASH", "-", Op),
    DashEq => ("DASH_EQ", "-=", Op),
    Star => ("STAR", "*", Op),
    StarEq => ("STAR_EQ", "*=", Op),
    StarStar => ("STAR_STAR", "**", Op),
    StarStarEq => ("STAR_STAR_EQ", "**=", Op),
    Slash => ("SLASH", "/", Op),
    SlashEq => ("SLASH_EQ", "/=", Op),
    SlashSlash => ("SLASH_SLASH", "//", Op),
    SlashSlashEq => ("SLASH_SLASH_EQ", "//=", Op),
    Per => ("PER", "%", Op),
    PerEq => ("PER_EQ", "%=", Op),
    Ampersand => ("AMPERSAND", "&", Op),
    AmpersandEq => ("AMPERSAND_EQ", "&=", Op),
    Pipe => ("PIPE", "|", Op),
    PipeEq => ("PIPE_EQ", "|=", Op),
    Caret => ("CARET", "^", Op),
    CaretEq => ("CARET_EQ", "^=", Op),
    And => ("AND", "and", Keyword),
    As => ("AS", "as", Keyword),
    Assert => ("ASSERT", "assert", Keyword),
    Break => ("BREAK", "break", Keyword),
    Class => ("CLASS", "class", Keyword),
    Continue => ("CONTINUE", "continue", Keyword),
    Def => ("DEF", "def", Keyword),
    Del => ("DEL", "del", Keyword),
    Elif => ("ELIF", "elif", Keyword),
    Else => ("ELSE", "else", Keyword),
    Except => ("EXCEPT", "except", Keyword),
    False => ("FALSE", "False", Keyword),
    Finally => ("FINALLY", "finally", Keyword),
    For => ("FOR", "for", Keyword),
    From => ("FROM", "from", Keyword),
    Global => ("GLOBAL", "global", Keyword),
    If => ("IF", "if", Keyword),
    Import => ("IMPORT", "import", Keyword),
    In => ("IN", "in", Keyword),
    Is => ("IS", "is", Keyword),
    Lambda => ("LAMBDA", "lambda", Keyword),
    None => ("NONE", "None", Keyword),
    Nonlocal => ("NONLOCAL", "nonlocal", Keyword),
    Not => ("NOT", "not", Keyword),
    Or => ("OR", "or", Keyword),
    Pass => ("PASS", "pass", Keyword),
    Raise => ("RAISE", "raise", Keyword),
    Return => ("RETURN", "return", Keyword),
    True => ("TRUE", "True", Keyword),
    Try => ("TRY", "try", Keyword),
    While => ("WHILE", "while", Keyword),
    With => ("WITH", "with", Keyword),
    Yield => ("YIELD", "yield", Keyword),
    Newline => ("NEWLINE", "", Newline),
    Indent => ("INDENT", "", Indent),
    Dedent => ("DEDENT", "", Dedent),
    EndMarker => ("ENDMARKER", "", EndMarker),
    Name => ("NAME", "", Name),
    Number => ("NUMBER", "", Number),
    String => ("STRING", "", String),
}

/// Tag assigned to the first synthesized `TOKEN_n` name. Later ones follow
/// sequentially.
pub const NAMELESS_TAG_BASE: u32 = TokenKind::ALL.len() as u32;

/// Payload type of parameterized tokens in generated code.
pub const PAYLOAD_TYPE: &str = "string";

/// Longest operator spelling in the table.
pub const MAX_OPERATOR_LEN: usize = 3;

static BY_NAME: Lazy<HashMap<&'static str, TokenKind>> =
    Lazy::new(|| TokenKind::ALL.iter().map(|kind| (kind.name(), *kind)).collect());

static OPERATORS: Lazy<HashMap<&'static str, TokenKind>> = Lazy::new(|| {
    TokenKind::ALL
        .iter()
        .filter(|kind| kind.class() == TokenClass::Op)
        .map(|kind| (kind.literal(), *kind))
        .collect()
});

static KEYWORDS: Lazy<HashMap<&'static str, TokenKind>> = Lazy::new(|| {
    TokenKind::ALL
        .iter()
        .filter(|kind| kind.class() == TokenClass::Keyword)
        .map(|kind| (kind.literal(), *kind))
        .collect()
});

impl TokenKind {
    /// Numeric tag used by generated parsers.
    pub fn tag(self) -> u32 {
        self as u32
    }

    /// Look up a kind by its canonical name.
    pub fn from_name(name: &str) -> Option<TokenKind> {
        BY_NAME.get(name).copied()
    }

    /// Look up an operator by its spelling.
    pub fn operator(literal: &str) -> Option<TokenKind> {
        OPERATORS.get(literal).copied()
    }

    /// Look up a keyword by its spelling.
    pub fn keyword(literal: &str) -> Option<TokenKind> {
        KEYWORDS.get(literal).copied()
    }

    /// The payload type for parameterized kinds.
    pub fn payload_type(self) -> Option<&'static str> {
        if self.class().is_parameterized() {
            Some(PAYLOAD_TYPE)
        } else {
            None
        }
    }

    /// Amorphous kinds in tag order.
    pub fn amorphous() -> impl Iterator<Item = TokenKind> {
        TokenKind::ALL
            .iter()
            .copied()
            .filter(|kind| kind.class().is_amorphous())
    }

    /// Parameterized kinds in tag order.
    pub fn parameterized() -> impl Iterator<Item = TokenKind> {
        TokenKind::ALL
            .iter()
            .copied()
            .filter(|kind| kind.class().is_parameterized())
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A classified token with its source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Text carried by NAME, NUMBER and STRING tokens.
    pub param: Option<String>,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, line: usize, column: usize) -> Self {
        Token {
            kind,
            param: None,
            line,
            column,
        }
    }

    pub fn with_param(kind: TokenKind, param: &str, line: usize, column: usize) -> Self {
        Token {
            kind,
            param: Some(param.to_owned()),
            line,
            column,
        }
    }

    pub fn param(&self) -> &str {
        self.param.as_deref().unwrap_or("")
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.param {
            Some(ref param) => write!(f, "{} \"{}\"", self.kind, param),
            None => write!(f, "{}", self.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_follow_table_order() {
        let tests = vec![
            (TokenKind::Arrow, 0),
            (TokenKind::Semicolon, 2),
            (TokenKind::Colon, 3),
            (TokenKind::CaretEq, 45),
            (TokenKind::And, 46),
            (TokenKind::Del, 53),
            (TokenKind::Pass, 71),
            (TokenKind::Newline, 79),
            (TokenKind::Name, 83),
            (TokenKind::String, 85),
        ];
        for (kind, tag) in tests {
            assert_eq!(kind.tag(), tag, "kind: {}", kind);
        }
        assert_eq!(NAMELESS_TAG_BASE, 86);
    }

    #[test]
    fn lookups() {
        assert_eq!(TokenKind::operator("**="), Some(TokenKind::StarStarEq));
        assert_eq!(TokenKind::operator("<>"), Some(TokenKind::Ne));
        assert_eq!(TokenKind::operator("$"), None);
        assert_eq!(TokenKind::keyword("None"), Some(TokenKind::None));
        assert_eq!(TokenKind::keyword("none"), None);
        assert_eq!(TokenKind::from_name("L_SQR"), Some(TokenKind::LSqr));
        assert_eq!(TokenKind::from_name("TOKEN_1"), None);
    }

    #[test]
    fn operators_fit_lookahead() {
        for kind in TokenKind::ALL {
            if kind.class() == TokenClass::Op {
                assert!(kind.literal().len() <= MAX_OPERATOR_LEN, "kind: {}", kind);
            }
        }
    }

    #[test]
    fn payload_types() {
        let names: Vec<_> = TokenKind::parameterized().map(TokenKind::name).collect();
        assert_eq!(names, vec!["NAME", "NUMBER", "STRING"]);
        assert_eq!(TokenKind::Number.payload_type(), Some("string"));
        assert_eq!(TokenKind::Newline.payload_type(), None);
    }

    #[test]
    fn display_token() {
        let tok = Token::with_param(TokenKind::Name, "expr", 1, 0);
        assert_eq!(tok.to_string(), "NAME \"expr\"");
        assert_eq!(Token::new(TokenKind::LPar, 1, 0).to_string(), "L_PAR");
    }
}
