//! Semantic analysis for SQL statements
//!
//! This module decides whether a parsed statement is well-formed with
//! respect to scoping and typing. It resolves table and column references,
//! infers expression types by unification, validates join constraints and
//! compound queries, and produces the statement's result columns along
//! with the tables it reads and writes.

pub mod analyzer;
pub mod caching_analyzer;
pub mod inference;
pub mod query;
pub mod scope;

// Further impl blocks on the query checker
mod dml;
mod expression;
mod table_expr;

#[cfg(test)]
mod test_support;

pub use analyzer::{AnalyzedStatement, OutputColumn, SemanticAnalyzer};
pub use caching_analyzer::CachingAnalyzer;
pub use inference::{InferenceContext, InferredType};
pub use scope::{FromScope, InferredQuery, InferredQueryColumn, SelectScope};
