//! Caching analyzer for prepared-statement workloads
//!
//! Wraps the analyzer with an LRU cache of analyzed statements keyed by the
//! shared AST pointer, so re-preparing the same parsed statement skips the
//! analysis entirely.

use super::analyzer::{AnalyzedStatement, SemanticAnalyzer};
use crate::error::Result;
use crate::parsing::ast::Statement;
use crate::types::schema::SchemaModel;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Default capacity for the analysis cache.
const DEFAULT_CACHE_CAPACITY: usize = 500;

/// A caching wrapper around [`SemanticAnalyzer`].
pub struct CachingAnalyzer {
    analyzer: SemanticAnalyzer,
    /// Keyed by the `Arc` pointer identity of the parsed statement.
    cache: LruCache<usize, Arc<AnalyzedStatement>>,
}

impl CachingAnalyzer {
    pub fn new(model: SchemaModel) -> Self {
        Self::with_capacity(model, DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(model: SchemaModel, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .unwrap_or_else(|| NonZeroUsize::new(DEFAULT_CACHE_CAPACITY).unwrap());
        CachingAnalyzer {
            analyzer: SemanticAnalyzer::new(model),
            cache: LruCache::new(capacity),
        }
    }

    /// Analyzes a shared statement, reusing a cached result when the same
    /// `Arc` has been analyzed before.
    pub fn analyze(&mut self, statement: Arc<Statement>) -> Result<Arc<AnalyzedStatement>> {
        let cache_key = Arc::as_ptr(&statement) as usize;

        if let Some(analyzed) = self.cache.get(&cache_key) {
            tracing::debug!("analysis cache hit");
            return Ok(analyzed.clone());
        }

        let analyzed = Arc::new(self.analyzer.analyze(&statement)?);
        self.cache.put(cache_key, analyzed.clone());
        Ok(analyzed)
    }

    pub fn analyzer(&self) -> &SemanticAnalyzer {
        &self.analyzer
    }
}
