//! Symbol representations: the host-provided `Symbol` and the lightweight
//! `CachedSymbol` projection stored in the resolution cache.
//!
//! `Symbol` is read-only input owned by the host's code-intelligence layer;
//! the engine never mutates it. `CachedSymbol` keeps only what navigation
//! and member matching need, so it stays cheap to persist.

use crate::types::{Location, Position, Range, SymbolKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A named declaration reported by the host's document symbol provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub name: String,
    /// Name of the enclosing class/interface; empty for top-level declarations.
    pub container_name: String,
    pub kind: SymbolKind,
    pub location: Location,
}

impl Symbol {
    pub fn new(
        name: impl Into<String>,
        container_name: impl Into<String>,
        kind: SymbolKind,
        location: Location,
    ) -> Self {
        Self {
            name: name.into(),
            container_name: container_name.into(),
            kind,
            location,
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.location.file_path
    }
}

/// Persistence-friendly projection of a `Symbol`.
///
/// Only the start position is kept: it is all the navigation command needs,
/// and it keeps persisted cache payloads small.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedSymbol {
    pub file_path: PathBuf,
    pub start_line: u32,
    pub start_column: u16,
    pub name: String,
    pub container_name: String,
    pub kind: SymbolKind,
}

impl CachedSymbol {
    pub fn start(&self) -> Position {
        Position::new(self.start_line, self.start_column)
    }

    /// Navigation target for this symbol.
    pub fn location(&self) -> Location {
        Location::new(self.file_path.clone(), Range::point(self.start()))
    }
}

impl From<&Symbol> for CachedSymbol {
    fn from(symbol: &Symbol) -> Self {
        Self {
            file_path: symbol.location.file_path.clone(),
            start_line: symbol.location.range.start_line,
            start_column: symbol.location.range.start_column,
            name: symbol.name.clone(),
            container_name: symbol.container_name.clone(),
            kind: symbol.kind,
        }
    }
}

/// Project a full symbol list into cached form, preserving order.
pub fn to_cached_symbols(symbols: &[Symbol]) -> Vec<CachedSymbol> {
    symbols.iter().map(CachedSymbol::from).collect()
}
