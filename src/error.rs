//! Error types for the parent-resolution engine
//!
//! This module provides structured error types using thiserror. Expected
//! "not found" outcomes (no heritage clause, no definition location, no
//! matching parent member) are modeled as `Option`/empty values at each
//! layer and never appear here.

use std::path::PathBuf;
use thiserror::Error;

/// Failures reported by the host collaborators.
#[derive(Error, Debug)]
pub enum HostError {
    #[error("Document symbol provider failed for '{path}': {reason}")]
    SymbolProvider { path: PathBuf, reason: String },

    #[error("Definition provider failed for '{path}': {reason}")]
    DefinitionProvider { path: PathBuf, reason: String },

    #[error("Failed to read document '{path}': {reason}")]
    DocumentRead { path: PathBuf, reason: String },

    #[error("Failed to render annotations for '{path}': {reason}")]
    Render { path: PathBuf, reason: String },

    #[error("Navigation to '{path}' failed: {reason}")]
    Navigation { path: PathBuf, reason: String },
}

/// Errors specific to cache persistence.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Failed to serialize cache state: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Key-value store rejected write for key '{key}': {reason}")]
    StoreWrite { key: String, reason: String },
}

/// Main error type for analysis passes.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Configuration errors
    #[error("Invalid configuration: {reason}")]
    ConfigError { reason: String },

    /// General errors for cases where we need to preserve existing behavior
    #[error("{0}")]
    General(String),
}

impl AnalysisError {
    /// Get a stable status code for this error type.
    pub fn status_code(&self) -> &'static str {
        match self {
            Self::Host(HostError::SymbolProvider { .. }) => "SYMBOL_PROVIDER_ERROR",
            Self::Host(HostError::DefinitionProvider { .. }) => "DEFINITION_PROVIDER_ERROR",
            Self::Host(HostError::DocumentRead { .. }) => "DOCUMENT_READ_ERROR",
            Self::Host(HostError::Render { .. }) => "RENDER_ERROR",
            Self::Host(HostError::Navigation { .. }) => "NAVIGATION_ERROR",
            Self::Cache(_) => "CACHE_ERROR",
            Self::ConfigError { .. } => "CONFIG_ERROR",
            Self::General(_) => "GENERAL_ERROR",
        }
    }
}

/// Result type alias for analysis operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Result type alias for host collaborator calls
pub type HostResult<T> = Result<T, HostError>;

/// Result type alias for cache persistence
pub type CacheResult<T> = Result<T, CacheError>;

/// Helper trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add context to an error
    fn context(self, msg: &str) -> Result<T, AnalysisError>;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: &str) -> Result<T, AnalysisError> {
        self.map_err(|e| AnalysisError::General(format!("{msg}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_are_stable() {
        let err = AnalysisError::Host(HostError::SymbolProvider {
            path: PathBuf::from("/a.ts"),
            reason: "provider not ready".into(),
        });
        assert_eq!(err.status_code(), "SYMBOL_PROVIDER_ERROR");

        let err: AnalysisError = CacheError::StoreWrite {
            key: "overlens.resolution-cache".into(),
            reason: "quota".into(),
        }
        .into();
        assert_eq!(err.status_code(), "CACHE_ERROR");
    }

    #[test]
    fn test_error_context_wraps_message() {
        let result: Result<(), std::io::Error> = Err(std::io::Error::other("boom"));
        let err = result.context("loading cache").unwrap_err();
        assert!(err.to_string().contains("loading cache"));
        assert!(err.to_string().contains("boom"));
    }
}
