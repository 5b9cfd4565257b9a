//! Annotation generation: deciding whether a child member genuinely
//! overrides/implements a parent member and producing the descriptor the UI
//! layer renders.

use crate::symbol::{CachedSymbol, Symbol};
use crate::types::Range;
use serde::{Deserialize, Serialize};

/// The role a parent plays in a heritage clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParentRole {
    BaseClass,
    Interface,
}

impl ParentRole {
    pub fn label(&self, parent_name: &str) -> String {
        match self {
            ParentRole::BaseClass => format!("overrides {parent_name}"),
            ParentRole::Interface => format!("implements {parent_name}"),
        }
    }
}

/// A clickable annotation on a child member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Range of the member-name token in the child file.
    pub range: Range,
    /// Label text, e.g. "overrides Animal" / "implements Drawable".
    pub label: String,
    /// The parent member declaration this annotation jumps to.
    pub target: CachedSymbol,
}

/// Generate annotations for every child member that matches a member of the
/// resolved parent.
///
/// A match requires equal names, the parent member's container to be the
/// parent symbol itself, and the parent member's container to differ from
/// the child member's own container. The last condition filters out false
/// positives when parent and child happen to live in the same file and a
/// naive name match would pair a member with itself.
///
/// A child member with no matching parent member yields no annotation.
pub fn annotations_for_parent(
    child_members: &[Symbol],
    parent_name: &str,
    role: ParentRole,
    parent_members: &[CachedSymbol],
) -> Vec<Annotation> {
    let mut annotations = Vec::new();
    for child in child_members {
        let matched = parent_members.iter().find(|parent_member| {
            parent_member.name == child.name
                && parent_member.container_name == parent_name
                && parent_member.container_name != child.container_name
        });
        let Some(parent_member) = matched else {
            continue;
        };

        annotations.push(Annotation {
            range: member_name_range(child),
            label: role.label(parent_name),
            target: parent_member.clone(),
        });
    }
    annotations
}

/// The member-name token range: the symbol's start position extended by the
/// name length, so the annotation sits on the member-name token.
fn member_name_range(member: &Symbol) -> Range {
    let start = member.location.range.start();
    Range::new(
        start.line,
        start.column,
        start.line,
        start.column.saturating_add(member.name.len() as u16),
    )
}
