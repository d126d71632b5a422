use std::fmt;

/// Glyph for the empty word.
pub const EPSILON: &str = "\u{03b5}";
/// Glyph for "no witness exists".
pub const BOTTOM: &str = "\u{22a5}";

/// Opaque input symbol. A `Symbol` never spells epsilon; transitions carry
/// `Option<Symbol>` with `None` marking epsilon moves, so the normalizer
/// below is the only way to produce one.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(String);

impl Symbol {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Maps every accepted spelling of "no symbol" to `None` and anything else
/// to an opaque `Symbol`. Epsilon spellings: absent, blank, "eps" or
/// "epsilon" in any ASCII case, and the epsilon glyph itself.
pub fn normalize_symbol(raw: Option<&str>) -> Option<Symbol> {
    let s = raw?.trim();
    if s.is_empty()
        || s.eq_ignore_ascii_case("eps")
        || s.eq_ignore_ascii_case("epsilon")
        || s == EPSILON
    {
        return None;
    }
    Some(Symbol(s.to_owned()))
}
