//! Static semantic analysis for SQLite-flavored SQL
//!
//! Given a parsed statement tree and a schema model, this crate decides
//! whether the statement is well-formed with respect to scoping and typing,
//! and reports the inferred result columns: name, base type, nullability,
//! origin alias, and primary-key flag. It also records which tables the
//! statement reads and writes.
//!
//! The parser lives outside this crate; [`parsing::ast`] defines the tree
//! it is expected to produce. Analysis is driven by [`SemanticAnalyzer`]
//! against a [`SchemaModel`].

pub mod error;
pub mod parsing;
pub mod semantic;
pub mod types;

pub use error::{Error, ErrorClass, PositionedError, Result};
pub use semantic::{AnalyzedStatement, CachingAnalyzer, OutputColumn, SemanticAnalyzer};
pub use types::{BaseType, ColumnType, Name, SchemaColumn, SchemaModel, SchemaTable};
