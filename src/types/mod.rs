use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// A line/column position in a document, zero-based as reported by hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u16,
}

impl Position {
    pub fn new(line: u32, column: u16) -> Self {
        Self { line, column }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start_line: u32,
    pub start_column: u16,
    pub end_line: u32,
    pub end_column: u16,
}

impl Range {
    pub fn new(start_line: u32, start_column: u16, end_line: u32, end_column: u16) -> Self {
        Self {
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }

    /// A zero-width range at the given position.
    pub fn point(position: Position) -> Self {
        Self::new(position.line, position.column, position.line, position.column)
    }

    pub fn start(&self) -> Position {
        Position::new(self.start_line, self.start_column)
    }

    pub fn contains(&self, line: u32, column: u16) -> bool {
        if line < self.start_line || line > self.end_line {
            return false;
        }

        if line == self.start_line && column < self.start_column {
            return false;
        }

        if line == self.end_line && column > self.end_column {
            return false;
        }

        true
    }
}

/// A file path plus source range, as returned by the host's definition lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file_path: PathBuf,
    pub range: Range,
}

impl Location {
    pub fn new(file_path: impl Into<PathBuf>, range: Range) -> Self {
        Self {
            file_path: file_path.into(),
            range,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    Class,
    Interface,
    Property,
    Method,
    Function,
    Module,
    Constant,
    Variable,
    Other,
}

impl SymbolKind {
    /// Member kinds that can override or implement a parent member.
    pub fn is_member(&self) -> bool {
        matches!(self, SymbolKind::Property | SymbolKind::Method)
    }

    /// Kinds that can declare a heritage clause.
    pub fn is_container(&self) -> bool {
        matches!(self, SymbolKind::Class | SymbolKind::Interface)
    }

    /// Parse from string with a default fallback for unknown values
    pub fn from_str_with_default(s: &str) -> Self {
        s.parse().unwrap_or(SymbolKind::Other)
    }
}

impl FromStr for SymbolKind {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Class" => Ok(SymbolKind::Class),
            "Interface" => Ok(SymbolKind::Interface),
            "Property" => Ok(SymbolKind::Property),
            "Method" => Ok(SymbolKind::Method),
            "Function" => Ok(SymbolKind::Function),
            "Module" => Ok(SymbolKind::Module),
            "Constant" => Ok(SymbolKind::Constant),
            "Variable" => Ok(SymbolKind::Variable),
            "Other" => Ok(SymbolKind::Other),
            _ => Err("Unknown symbol kind"),
        }
    }
}
