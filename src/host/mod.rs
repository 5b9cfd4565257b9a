//! Collaborator traits for the editor host.
//!
//! The engine never talks to an editor directly; everything it needs from
//! the host (document text, symbol lists, definition lookup, annotation
//! rendering, navigation, durable key-value state) comes in through these
//! narrow contracts. Async methods carry an explicit `Send` bound so
//! resolutions can run as spawned tasks.
//!
//! Failures cross this boundary as `HostError`; "nothing found" is an empty
//! vector or `None`, never an error.

use crate::annotate::Annotation;
use crate::error::HostResult;
use crate::symbol::Symbol;
use crate::types::{Location, Position};
use std::future::Future;
use std::path::Path;

/// Access to full document text, needed for heritage-clause extraction.
pub trait DocumentSource: Send + Sync {
    fn document_text(&self, file: &Path) -> impl Future<Output = HostResult<String>> + Send;
}

/// The host's document symbol provider ("list symbols" capability).
///
/// Implementations may need to open the target file first; that is the
/// host's concern, not the engine's.
pub trait SymbolSource: Send + Sync {
    fn list_symbols(&self, file: &Path) -> impl Future<Output = HostResult<Vec<Symbol>>> + Send;
}

/// The host's "find definition" capability.
///
/// Returns zero or more candidate declaration sites for the identifier token
/// at the given position. Zero candidates is an expected outcome (built-in or
/// unresolvable types).
pub trait DefinitionSource: Send + Sync {
    fn find_definition(
        &self,
        file: &Path,
        position: Position,
    ) -> impl Future<Output = HostResult<Vec<Location>>> + Send;
}

/// UI layer that displays annotations.
///
/// Replaces previously shown annotations for the file with the new set; the
/// implementation is responsible for visual diffing and clearing stale ones.
pub trait AnnotationSink: Send + Sync {
    fn render(
        &self,
        file: &Path,
        annotations: Vec<Annotation>,
    ) -> impl Future<Output = HostResult<()>> + Send;
}

/// Opens a target location, optionally in a split view.
pub trait Navigator: Send + Sync {
    fn navigate(
        &self,
        target: Location,
        side_by_side: bool,
    ) -> impl Future<Output = HostResult<()>> + Send;
}

/// Durable key-value persistence scoped to the current workspace, in the
/// style of an editor Memento store. Synchronous on purpose: hosts back this
/// with in-memory state they flush themselves.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
}

/// Everything the engine needs from its host, bundled for one generic
/// parameter. Blanket-implemented for any type providing the parts.
pub trait Host:
    DocumentSource
    + SymbolSource
    + DefinitionSource
    + AnnotationSink
    + Navigator
    + KeyValueStore
    + Send
    + Sync
    + 'static
{
}

impl<T> Host for T where
    T: DocumentSource
        + SymbolSource
        + DefinitionSource
        + AnnotationSink
        + Navigator
        + KeyValueStore
        + Send
        + Sync
        + 'static
{
}
