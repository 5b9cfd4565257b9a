//! Parent-symbol resolution: a single linear function with ordered fallback
//! steps, short-circuiting on first success.
//!
//! 1. Local match against the current file's symbols (no cache involved:
//!    local resolution is cheap and re-derived from live symbols).
//! 2. Cache hit by (current file, parent name).
//! 3. Definition lookup at the parent-name token; no location means the
//!    parent is a built-in or unresolvable type, an expected non-error.
//! 4. Cache hit by the resolved parent file path (populated earlier by some
//!    other child file referencing the same parent).
//! 5. Fresh symbol fetch on the parent file, creating a new cache entry.
//!
//! When definition lookup yields several candidates only the first is used:
//! single inheritance resolution per name is assumed, a known inherited
//! simplification.

use crate::annotate::ParentRole;
use crate::cache::{CacheEntry, ResolutionCache};
use crate::error::AnalysisResult;
use crate::host::Host;
use crate::parsing;
use crate::symbol::{CachedSymbol, Symbol, to_cached_symbols};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

/// A parent name extracted from a declaration header, tagged with its role.
/// Ephemeral: recomputed on every analysis pass, never cached on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentReference {
    pub name: String,
    pub role: ParentRole,
}

impl ParentReference {
    pub fn base_class(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: ParentRole::BaseClass,
        }
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: ParentRole::Interface,
        }
    }
}

/// Where a successful resolution came from. Drives nothing functionally but
/// keeps traces and tests honest about cache behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionOrigin {
    /// Parent declared in the current file.
    CurrentFile,
    /// Served from the resolution cache.
    Cache,
    /// Fetched through definition lookup + symbol listing.
    Fetched,
}

/// A resolved parent: its canonical name plus the member symbols to match
/// child members against.
#[derive(Debug, Clone)]
pub struct ResolvedParent {
    pub parent_name: String,
    pub role: ParentRole,
    pub members: Vec<CachedSymbol>,
    pub origin: ResolutionOrigin,
}

/// Everything one resolution needs, owned so it can move into a spawned task.
#[derive(Debug, Clone)]
pub struct ResolutionRequest {
    pub file: PathBuf,
    pub document_text: Arc<String>,
    pub symbols: Arc<Vec<Symbol>>,
    pub class_symbol: Symbol,
    pub parent: ParentReference,
}

/// Property/method symbols belonging to the given class, in document order.
pub fn class_members(symbols: &[Symbol], class_name: &str) -> Vec<Symbol> {
    symbols
        .iter()
        .filter(|s| s.kind.is_member() && s.container_name == class_name)
        .cloned()
        .collect()
}

pub struct ParentResolver<H> {
    host: Arc<H>,
    cache: Arc<ResolutionCache>,
}

impl<H: Host> ParentResolver<H> {
    pub fn new(host: Arc<H>, cache: Arc<ResolutionCache>) -> Self {
        Self { host, cache }
    }

    /// Resolve one parent reference for one class. `Ok(None)` is the
    /// expected outcome for unresolvable parents (built-ins, broken code).
    pub async fn resolve(&self, request: &ResolutionRequest) -> AnalysisResult<Option<ResolvedParent>> {
        let target = parsing::strip_generics(&request.parent.name);
        if target.is_empty() {
            return Ok(None);
        }
        let role = request.parent.role;
        let child_file = request.file.to_string_lossy().to_string();
        let child_member_names: Vec<String> =
            class_members(&request.symbols, &request.class_symbol.name)
                .iter()
                .map(|s| s.name.clone())
                .collect();

        // Step 1: local match. The container-is-not-itself condition keeps
        // the declaration line from being mistaken for a member.
        let local_declaration = request.symbols.iter().find(|s| {
            parsing::strip_generics(&s.name) == target && s.container_name != s.name
        });
        if let Some(declaration) = local_declaration {
            let mut members: Vec<&Symbol> = request
                .symbols
                .iter()
                .filter(|s| s.container_name == declaration.name)
                .collect();
            members.push(declaration);
            let members: Vec<CachedSymbol> =
                members.into_iter().map(CachedSymbol::from).collect();
            debug!(parent = %target, "parent resolved in current file");
            return Ok(Some(ResolvedParent {
                parent_name: declaration.name.clone(),
                role,
                members,
                origin: ResolutionOrigin::CurrentFile,
            }));
        }

        // Step 2: cache hit for this (child file, parent name) pair.
        if let Some(entry) = self.cache.find_by_child(&child_file, &target) {
            self.cache
                .refresh_children(&entry.parent_file_path, &target, child_member_names);
            self.persist_cache();
            debug!(parent = %target, "parent served from cache by child file");
            return Ok(Some(ResolvedParent {
                parent_name: target,
                role,
                members: entry.parent_members,
                origin: ResolutionOrigin::Cache,
            }));
        }

        // Step 3: cross-file definition lookup at the parent-name token.
        let Some(position) = parsing::parent_token_position(
            &request.document_text,
            &request.class_symbol.location.range,
            &target,
        ) else {
            debug!(parent = %target, "parent token not found in declaration text");
            return Ok(None);
        };
        let locations = self.host.find_definition(&request.file, position).await?;
        let Some(location) = locations.into_iter().next() else {
            debug!(parent = %target, "no definition location for parent");
            return Ok(None);
        };
        let parent_path = location.file_path.to_string_lossy().to_string();

        // Step 4: another child already resolved this parent file.
        if let Some(entry) = self.cache.find_by_parent_path(&parent_path) {
            self.cache
                .register_child(&parent_path, &child_file, &target, child_member_names);
            self.persist_cache();
            debug!(parent = %target, file = %parent_path, "parent served from cache by file path");
            return Ok(Some(ResolvedParent {
                parent_name: target,
                role,
                members: entry.parent_members,
                origin: ResolutionOrigin::Cache,
            }));
        }

        // Step 5: fresh fetch of the parent file's symbols.
        let parent_symbols = self.host.list_symbols(&location.file_path).await?;
        let members = to_cached_symbols(&parent_symbols);
        let inserted = self.cache.insert_if_absent(CacheEntry::new(
            parent_path.clone(),
            child_file,
            target.clone(),
            child_member_names,
            members.clone(),
        ));
        if !inserted {
            // A concurrent resolution won the race; this fetch was redundant
            // but its result is still valid for the running pass.
            debug!(file = %parent_path, "cache entry appeared concurrently, keeping fetched symbols");
        }
        self.persist_cache();
        Ok(Some(ResolvedParent {
            parent_name: target,
            role,
            members,
            origin: ResolutionOrigin::Fetched,
        }))
    }

    fn persist_cache(&self) {
        if let Err(e) = self.cache.save(self.host.as_ref()) {
            warn!("Failed to persist resolution cache: {e}");
        }
    }
}
