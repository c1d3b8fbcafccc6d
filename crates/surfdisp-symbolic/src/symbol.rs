//! Named free variables

use std::fmt;
use std::sync::Arc;

/// Value domain of a symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Domain {
    /// Fixed by complex conjugation
    #[default]
    Real,
    /// Conjugates to a distinct atom `conj(name)`
    Complex,
}

/// A named symbolic variable. Symbols order lexicographically by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol {
    name: Arc<str>,
    domain: Domain,
}

impl Symbol {
    pub fn new(name: &str, domain: Domain) -> Self {
        Symbol {
            name: Arc::from(name),
            domain,
        }
    }

    pub fn real(name: &str) -> Self {
        Symbol::new(name, Domain::Real)
    }

    pub fn complex(name: &str) -> Self {
        Symbol::new(name, Domain::Complex)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn is_real(&self) -> bool {
        self.domain == Domain::Real
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Create one symbol per whitespace-separated name.
pub fn symbols(names: &str, domain: Domain) -> Vec<Symbol> {
    names
        .split_whitespace()
        .map(|name| Symbol::new(name, domain))
        .collect()
}
