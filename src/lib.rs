/// The main library module for overlens
// Debug macro for consistent verbose output
#[macro_export]
macro_rules! debug_print {
    ($($arg:tt)*) => {
        if $crate::config::is_global_debug_enabled() {
            eprintln!("DEBUG: {}", format!($($arg)*));
        }
    };
}

pub mod annotate;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod host;
pub mod parsing;
pub mod resolve;
pub mod symbol;
pub mod types;

// Explicit exports for better API clarity
pub use annotate::{Annotation, ParentRole};
pub use cache::{CacheEntry, ResolutionCache};
pub use config::Settings;
pub use engine::AnalysisEngine;
pub use error::{
    AnalysisError, AnalysisResult, CacheError, CacheResult, HostError, HostResult,
};
pub use host::{
    AnnotationSink, DefinitionSource, DocumentSource, Host, KeyValueStore, Navigator,
    SymbolSource,
};
pub use resolve::{ParentResolver, ResolvedParent, ResolutionOrigin};
pub use symbol::{CachedSymbol, Symbol};
pub use types::{Location, Position, Range, SymbolKind};
