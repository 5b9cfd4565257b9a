//! Analysis orchestration: per-document passes from trigger to rendered
//! annotations, plus the save/clear/navigate entry points the host wires its
//! events into.
//!
//! A pass walks Idle -> Scanning -> Resolving -> Annotated: presence
//! fast-path, symbol listing, heritage extraction per class, one concurrent
//! resolution task per (class, parent) pair, then aggregation and hand-off
//! to the annotation sink. Passes are debounced per file with a generation
//! counter; a newer trigger supersedes an older one before it starts, but
//! in-flight collaborator calls are never cancelled, so a stale pass may
//! render late and is immediately overwritten by the newer pass.
//!
//! Unexpected collaborator errors are caught here, logged, and degrade to
//! "no annotations this pass"; the cache is only mutated after successful
//! fetches, so a failed pass cannot corrupt it.

use crate::annotate::{Annotation, annotations_for_parent};
use crate::cache::ResolutionCache;
use crate::config::{self, Settings};
use crate::error::AnalysisResult;
use crate::host::Host;
use crate::parsing;
use crate::resolve::{
    ParentReference, ParentResolver, ResolutionRequest, class_members,
};
use crate::symbol::CachedSymbol;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, warn};

pub struct AnalysisEngine<H> {
    host: Arc<H>,
    cache: Arc<ResolutionCache>,
    settings: RwLock<Settings>,
    /// Per-file debounce generations. A scheduled pass only runs if its
    /// generation is still current when the quiet window elapses.
    generations: DashMap<PathBuf, u64>,
}

impl<H: Host> AnalysisEngine<H> {
    /// Create an engine, loading persisted cache state from the host store.
    pub fn new(host: Arc<H>, settings: Settings) -> Self {
        config::set_global_debug(settings.debug);
        let cache = Arc::new(ResolutionCache::load(host.as_ref()));
        debug!(entries = cache.len(), "resolution cache loaded");
        Self {
            host,
            cache,
            settings: RwLock::new(settings),
            generations: DashMap::new(),
        }
    }

    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    /// Configuration-changed event: swap in freshly loaded settings.
    pub fn update_settings(&self, settings: Settings) {
        config::set_global_debug(settings.debug);
        *self.settings.write() = settings;
    }

    /// Document-change hook: coalesce triggers within the configured quiet
    /// window, then run a full pass. Ordering across passes is not
    /// guaranteed; the latest render wins.
    pub fn schedule_analysis(self: &Arc<Self>, file: PathBuf) {
        let generation = {
            let mut slot = self.generations.entry(file.clone()).or_insert(0);
            *slot += 1;
            *slot
        };
        let quiet = Duration::from_millis(self.settings.read().annotations.debounce_ms);
        let engine = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            let current = engine.generations.get(&file).map(|g| *g).unwrap_or(0);
            if current != generation {
                return; // superseded by a newer trigger
            }
            if let Err(e) = engine.analyze(&file).await {
                warn!(file = %file.display(), "analysis pass failed: {e}");
            }
            // Drop the counter once the pass ran and no newer trigger
            // claimed it, so the map stays bounded by in-flight files.
            engine.generations.remove_if(&file, |_, g| *g == generation);
        });
    }

    /// Number of files with a scheduled or in-flight debounced pass.
    pub fn pending_analyses(&self) -> usize {
        self.generations.len()
    }

    /// Document-save hook: drop every cache entry whose parent file is the
    /// saved file (its member list is assumed stale), then refresh the saved
    /// document's own annotations.
    pub fn handle_save(self: &Arc<Self>, file: &Path) {
        let removed = self.cache.invalidate_file(&file.to_string_lossy());
        if removed > 0 {
            debug!(file = %file.display(), removed, "invalidated cache entries on save");
            self.persist_cache();
        }
        self.schedule_analysis(file.to_path_buf());
    }

    /// User-invoked "clear cache" command.
    pub fn clear_cache(&self) {
        self.cache.clear();
        self.persist_cache();
    }

    /// "Navigate to parent declaration" command.
    pub async fn navigate_to_parent(&self, target: &CachedSymbol) -> AnalysisResult<()> {
        let side_by_side = self.settings.read().annotations.open_side_by_side;
        self.host.navigate(target.location(), side_by_side).await?;
        Ok(())
    }

    /// One full analysis pass over a document. Returns the aggregate
    /// annotation list after handing it to the annotation sink.
    pub async fn analyze(&self, file: &Path) -> AnalysisResult<Vec<Annotation>> {
        let text = self.host.document_text(file).await?;

        // Scanning: files without any heritage clause skip all further work.
        if !parsing::has_base_class(&text) && !parsing::has_interfaces(&text) {
            self.host.render(file, Vec::new()).await?;
            return Ok(Vec::new());
        }

        let symbols = self.host.list_symbols(file).await?;
        if symbols.is_empty() {
            self.host.render(file, Vec::new()).await?;
            return Ok(Vec::new());
        }

        let text = Arc::new(text);
        let symbols = Arc::new(symbols);
        let requests = self.collect_requests(file, &text, &symbols);
        debug!(file = %file.display(), relationships = requests.len(), "resolving parents");

        // Resolving: one task per (class, parent) relationship, wait-for-all
        // with no timeout. A failed relationship is skipped, not fatal.
        let mut tasks = JoinSet::new();
        for request in requests {
            let host = Arc::clone(&self.host);
            let cache = Arc::clone(&self.cache);
            tasks.spawn(async move {
                let resolver = ParentResolver::new(host, cache);
                let members = class_members(&request.symbols, &request.class_symbol.name);
                match resolver.resolve(&request).await {
                    Ok(Some(parent)) => annotations_for_parent(
                        &members,
                        &parent.parent_name,
                        parent.role,
                        &parent.members,
                    ),
                    Ok(None) => Vec::new(),
                    Err(e) => {
                        warn!(
                            class = %request.class_symbol.name,
                            parent = %request.parent.name,
                            "skipping relationship: {e}"
                        );
                        Vec::new()
                    }
                }
            });
        }

        let mut annotations = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(list) => annotations.extend(list),
                Err(e) => warn!("resolution task failed to join: {e}"),
            }
        }

        // Annotated: the sink diffs against previously shown annotations.
        self.host.render(file, annotations.clone()).await?;
        Ok(annotations)
    }

    /// Enumerate the document's classes/interfaces and extract one request
    /// per declared parent relationship.
    fn collect_requests(
        &self,
        file: &Path,
        text: &Arc<String>,
        symbols: &Arc<Vec<crate::symbol::Symbol>>,
    ) -> Vec<ResolutionRequest> {
        let mut seen = HashSet::new();
        let mut container_names = Vec::new();
        for symbol in symbols.iter() {
            if !symbol.container_name.is_empty() && seen.insert(symbol.container_name.clone()) {
                container_names.push(symbol.container_name.clone());
            }
        }

        let mut requests = Vec::new();
        for class_name in container_names {
            let Some(class_symbol) = symbols.iter().find(|s| s.name == class_name) else {
                continue;
            };
            let Some(header) = parsing::declaration_header(text, class_symbol) else {
                continue;
            };

            let mut parents = Vec::new();
            if let Some(base) = parsing::base_class_name(&header) {
                parents.push(ParentReference::base_class(base));
            }
            for interface in parsing::interface_names(&header) {
                parents.push(ParentReference::interface(interface));
            }

            for parent in parents {
                requests.push(ResolutionRequest {
                    file: file.to_path_buf(),
                    document_text: Arc::clone(text),
                    symbols: Arc::clone(symbols),
                    class_symbol: class_symbol.clone(),
                    parent,
                });
            }
        }
        requests
    }

    fn persist_cache(&self) {
        if let Err(e) = self.cache.save(self.host.as_ref()) {
            warn!("Failed to persist resolution cache: {e}");
        }
    }
}
