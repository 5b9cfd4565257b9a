//! Heritage-clause extraction via lightweight pattern matching.
//!
//! This is a deliberate heuristic layered on top of host-provided symbol
//! lists, not a parser: it locates `extends`/`implements` clauses inside a
//! declaration header and pulls out parent names. Every function fails softly
//! (`None`/empty) when the text does not match, which happens routinely while
//! the user is mid-edit and symbol ranges lag behind the document.

use crate::symbol::Symbol;
use crate::types::{Position, Range, SymbolKind};
use regex::Regex;
use std::sync::LazyLock;

/// Whole-document fast-path: is there any base class declared at all?
static BASE_CLASS_PRESENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"class\s+\w+\s*(?:<[^>]*>)?\s*extends\s").expect("Invalid regex"));

/// Whole-document fast-path: is there any `implements` clause at all?
static INTERFACE_PRESENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"implements\s").expect("Invalid regex"));

/// Captures the base-class name (word/dot characters) after `extends`.
static EXTENDS_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"extends\s+([\w.]+)").expect("Invalid regex"));

pub fn has_base_class(document_text: &str) -> bool {
    BASE_CLASS_PRESENCE.is_match(document_text)
}

pub fn has_interfaces(document_text: &str) -> bool {
    INTERFACE_PRESENCE.is_match(document_text)
}

/// Slice the document text covered by a symbol range.
///
/// Out-of-bounds lines and columns clamp to what the document actually
/// contains, so a stale symbol range can never panic the pass.
pub fn text_in_range(document_text: &str, range: &Range) -> String {
    let lines: Vec<&str> = document_text.lines().collect();
    let start_line = range.start_line as usize;
    if start_line >= lines.len() {
        return String::new();
    }
    let end_line = (range.end_line as usize).min(lines.len() - 1);
    if end_line < start_line {
        return String::new();
    }
    let start_column = range.start_column as usize;
    let end_column = range.end_column as usize;

    if start_line == end_line {
        let line = lines[start_line];
        let start = start_column.min(line.len());
        let end = end_column.min(line.len()).max(start);
        return line.get(start..end).unwrap_or("").to_string();
    }

    let mut parts = Vec::with_capacity(end_line - start_line + 1);
    let first = lines[start_line];
    parts.push(first.get(start_column.min(first.len())..).unwrap_or(""));
    for line in &lines[start_line + 1..end_line] {
        parts.push(line);
    }
    let last = lines[end_line];
    parts.push(last.get(..end_column.min(last.len())).unwrap_or(last));
    parts.join("\n")
}

/// Extract the declaration header of a class/interface symbol: the text
/// between the declared name and the opening body brace.
///
/// Returns `None` when the `keyword name` pattern is not literally present in
/// the symbol's range, e.g. while the user is editing the declaration line.
pub fn declaration_header(document_text: &str, declaration: &Symbol) -> Option<String> {
    let ranged = text_in_range(document_text, &declaration.location.range);
    if ranged.is_empty() {
        return None;
    }

    let keywords: &[&str] = match declaration.kind {
        SymbolKind::Class => &["class"],
        SymbolKind::Interface => &["interface"],
        // Hosts occasionally report classes with a generic kind.
        _ => &["class", "interface"],
    };

    for keyword in keywords {
        let needle = format!("{keyword} {}", declaration.name);
        if let Some(index) = ranged.find(&needle) {
            let rest = &ranged[index + needle.len()..];
            let header = match rest.find('{') {
                Some(brace) => &rest[..brace],
                None => rest,
            };
            return Some(header.to_string());
        }
    }
    None
}

/// Base-class name from a declaration header, reduced to its last dotted
/// segment (namespace-qualified references resolve against locally-visible
/// names only).
pub fn base_class_name(header: &str) -> Option<String> {
    let captures = EXTENDS_NAME.captures(header)?;
    let name = last_segment(captures.get(1)?.as_str());
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Implemented-interface names from a declaration header.
///
/// The clause is comma-split, so multi-parameter generic arguments produce
/// fragments; `strip_generics` drops complete argument lists and the leftover
/// fragments simply never resolve. Same tolerance as matching does.
pub fn interface_names(header: &str) -> Vec<String> {
    let Some(index) = header.find("implements") else {
        return Vec::new();
    };
    let clause = &header[index + "implements".len()..];
    let clause = match clause.find('{') {
        Some(brace) => &clause[..brace],
        None => clause,
    };

    clause
        .split(',')
        .map(|raw| last_segment(&strip_generics(raw.trim())).to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Remove a generic argument list: everything from the first `<` through the
/// last `>`. Names without a complete pair are returned unchanged.
pub fn strip_generics(name: &str) -> String {
    match (name.find('<'), name.rfind('>')) {
        (Some(open), Some(close)) if open < close => {
            let mut stripped = String::with_capacity(name.len());
            stripped.push_str(&name[..open]);
            stripped.push_str(&name[close + 1..]);
            stripped
        }
        _ => name.to_string(),
    }
}

/// Last segment of a dotted name (`Shapes.Animal` -> `Animal`).
pub fn last_segment(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// Locate the parent-name token inside a declaration so definition lookup
/// can be issued at it. The scan is limited to the header (before the body
/// brace) and requires word boundaries on both sides.
pub fn parent_token_position(
    document_text: &str,
    declaration_range: &Range,
    parent_name: &str,
) -> Option<Position> {
    if parent_name.is_empty() {
        return None;
    }
    let ranged = text_in_range(document_text, declaration_range);
    let header = match ranged.find('{') {
        Some(brace) => &ranged[..brace],
        None => ranged.as_str(),
    };

    for (line_offset, line) in header.lines().enumerate() {
        if let Some(column) = find_word(line, parent_name) {
            let line_number = declaration_range.start_line + line_offset as u32;
            let column = if line_offset == 0 {
                declaration_range.start_column as usize + column
            } else {
                column
            };
            return Some(Position::new(line_number, column as u16));
        }
    }
    None
}

/// First word-boundary occurrence of `word` in `line`.
fn find_word(line: &str, word: &str) -> Option<usize> {
    let mut search_from = 0;
    while let Some(found) = line[search_from..].find(word) {
        let start = search_from + found;
        let end = start + word.len();
        let before_ok = start == 0
            || !line[..start]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_alphanumeric() || c == '_');
        let after_ok = end >= line.len()
            || !line[end..]
                .chars()
                .next()
                .is_some_and(|c| c.is_alphanumeric() || c == '_');
        if before_ok && after_ok {
            return Some(start);
        }
        search_from = end;
    }
    None
}
