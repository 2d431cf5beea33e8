//! Menhir grammar file (`pymen.mly`).

use grammar::GrammarDescription;

use crate::error::Result;
use crate::yacc::{self, Dialect};

/// Menhir's `$i` keywords stop at `$9`.
pub const MAX_COMPONENTS: usize = 9;

const MENHIR: Dialect = Dialect {
    name: "menhir",
    header: ("%{", "%}"),
    max_components: Some(MAX_COMPONENTS),
    inline_single: true,
};

pub(crate) fn generate(desc: &GrammarDescription) -> Result<Vec<String>> {
    yacc::generate(&MENHIR, desc)
}
