//! Shared mock host for integration tests: records every collaborator call
//! so tests can assert how many cross-file lookups a pass performed.

// Not every test binary exercises every helper.
#![allow(dead_code)]

use overlens::{
    Annotation, AnnotationSink, DefinitionSource, DocumentSource, HostError, HostResult,
    KeyValueStore, Location, Navigator, Position, Symbol, SymbolSource,
};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

#[derive(Default)]
pub struct MockHost {
    documents: Mutex<HashMap<PathBuf, String>>,
    symbols: Mutex<HashMap<PathBuf, Vec<Symbol>>>,
    definitions: Mutex<HashMap<PathBuf, Vec<Location>>>,
    failing_symbol_files: Mutex<HashSet<PathBuf>>,
    store: Mutex<HashMap<String, String>>,

    pub list_symbol_calls: Mutex<Vec<PathBuf>>,
    pub find_definition_calls: Mutex<Vec<(PathBuf, Position)>>,
    pub rendered: Mutex<Vec<(PathBuf, Vec<Annotation>)>>,
    pub navigations: Mutex<Vec<(Location, bool)>>,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_document(&self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.documents.lock().insert(path.into(), text.into());
    }

    pub fn set_symbols(&self, path: impl Into<PathBuf>, symbols: Vec<Symbol>) {
        self.symbols.lock().insert(path.into(), symbols);
    }

    /// Definition lookups issued from `path` resolve to these locations,
    /// regardless of position (the mock host has no real language smarts).
    pub fn set_definitions(&self, path: impl Into<PathBuf>, locations: Vec<Location>) {
        self.definitions.lock().insert(path.into(), locations);
    }

    pub fn fail_symbols_for(&self, path: impl Into<PathBuf>) {
        self.failing_symbol_files.lock().insert(path.into());
    }

    pub fn seed_store(&self, key: &str, value: impl Into<String>) {
        self.store.lock().insert(key.to_string(), value.into());
    }

    pub fn stored(&self, key: &str) -> Option<String> {
        self.store.lock().get(key).cloned()
    }

    pub fn list_symbol_count(&self, path: &Path) -> usize {
        self.list_symbol_calls
            .lock()
            .iter()
            .filter(|p| p.as_path() == path)
            .count()
    }

    pub fn find_definition_count(&self) -> usize {
        self.find_definition_calls.lock().len()
    }

    pub fn last_rendered(&self, path: &Path) -> Option<Vec<Annotation>> {
        self.rendered
            .lock()
            .iter()
            .rev()
            .find(|(p, _)| p.as_path() == path)
            .map(|(_, annotations)| annotations.clone())
    }

    pub fn render_count(&self, path: &Path) -> usize {
        self.rendered
            .lock()
            .iter()
            .filter(|(p, _)| p.as_path() == path)
            .count()
    }
}

impl DocumentSource for MockHost {
    async fn document_text(&self, file: &Path) -> HostResult<String> {
        self.documents
            .lock()
            .get(file)
            .cloned()
            .ok_or_else(|| HostError::DocumentRead {
                path: file.to_path_buf(),
                reason: "no such document".to_string(),
            })
    }
}

impl SymbolSource for MockHost {
    async fn list_symbols(&self, file: &Path) -> HostResult<Vec<Symbol>> {
        self.list_symbol_calls.lock().push(file.to_path_buf());
        if self.failing_symbol_files.lock().contains(file) {
            return Err(HostError::SymbolProvider {
                path: file.to_path_buf(),
                reason: "provider unavailable".to_string(),
            });
        }
        Ok(self.symbols.lock().get(file).cloned().unwrap_or_default())
    }
}

impl DefinitionSource for MockHost {
    async fn find_definition(&self, file: &Path, position: Position) -> HostResult<Vec<Location>> {
        self.find_definition_calls
            .lock()
            .push((file.to_path_buf(), position));
        Ok(self.definitions.lock().get(file).cloned().unwrap_or_default())
    }
}

impl AnnotationSink for MockHost {
    async fn render(&self, file: &Path, annotations: Vec<Annotation>) -> HostResult<()> {
        self.rendered.lock().push((file.to_path_buf(), annotations));
        Ok(())
    }
}

impl Navigator for MockHost {
    async fn navigate(&self, target: Location, side_by_side: bool) -> HostResult<()> {
        self.navigations.lock().push((target, side_by_side));
        Ok(())
    }
}

impl KeyValueStore for MockHost {
    fn get(&self, key: &str) -> Option<String> {
        self.store.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        self.store.lock().insert(key.to_string(), value);
    }
}
