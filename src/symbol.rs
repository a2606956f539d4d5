use std::fmt;

use crate::error::ConfigError;

/// Key reserved for restarting a finished game
pub const RESTART_KEY: char = ' ';

/// One answer key. Stored uppercase so `q` and `Q` are the same symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(char);

impl Symbol {
    pub fn new(c: char) -> Self {
        Self(c.to_ascii_uppercase())
    }

    pub fn as_char(&self) -> char {
        self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<char> for Symbol {
    fn from(c: char) -> Self {
        Symbol::new(c)
    }
}

/// The closed set of symbols a game draws from and accepts.
///
/// Order matters: a symbol's position is the staff line it is drawn on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<Symbol>,
}

impl Alphabet {
    /// Build an alphabet from a string of keys, e.g. `"QWERT"`.
    pub fn from_keys(keys: &str) -> Result<Self, ConfigError> {
        let mut symbols: Vec<Symbol> = Vec::with_capacity(keys.len());
        for c in keys.chars() {
            if c.is_whitespace() || c.is_control() || c == RESTART_KEY {
                return Err(ConfigError::InvalidSymbol(c));
            }
            let symbol = Symbol::new(c);
            if symbols.contains(&symbol) {
                return Err(ConfigError::DuplicateSymbol(symbol.as_char()));
            }
            symbols.push(symbol);
        }

        if symbols.is_empty() {
            return Err(ConfigError::EmptyAlphabet);
        }

        Ok(Self { symbols })
    }

    /// Map a raw key press to a symbol, or `None` for keys outside the alphabet
    pub fn map_key(&self, c: char) -> Option<Symbol> {
        let candidate = Symbol::new(c);
        self.contains(candidate).then_some(candidate)
    }

    pub fn contains(&self, symbol: Symbol) -> bool {
        self.symbols.contains(&symbol)
    }

    pub fn position(&self, symbol: Symbol) -> Option<usize> {
        self.symbols.iter().position(|s| *s == symbol)
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Space separated key list used in prompts, e.g. `Q W E R T`
    pub fn key_list(&self) -> String {
        self.symbols
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self {
            symbols: "QWERT".chars().map(Symbol::new).collect(),
        }
    }
}
