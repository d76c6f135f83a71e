//! Abstract syntax tree for SQL statements
//!
//! The statement is the root node, describing the syntactic structure of a
//! SQL statement. Built by a parser, consumed by the semantic analyzer.
//! Every node carries the source span it was parsed from, so analysis
//! failures can point back at the offending text.

pub mod dml;
pub mod expressions;
pub mod query;

pub use dml::{DeleteStatement, InsertSource, InsertStatement, UpdateStatement};
pub use expressions::{
    BinaryOp, Expression, ExpressionKind, FunctionArguments, InSet, Literal, Raise, SimilarityOp,
    UnaryOp,
};
pub use query::{
    CommonTableExpression, CompoundExpression, CompoundOperator, CompoundTerm, Direction,
    GroupByClause, JoinConstraint, JoinKind, JoinOperator, Limit, ObjectName, OrderingTerm,
    ResultColumn, SelectCore, SelectStatement, TableExpression, TableInvocation, WithClause,
};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Source span of an AST node, in one-based lines and columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceInfo {
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl SourceInfo {
    pub fn new(start_line: u32, start_column: u32, end_line: u32, end_column: u32) -> Self {
        SourceInfo {
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }
}

impl fmt::Display for SourceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.start_line, self.start_column)
    }
}

/// SQL statements understood by the analyzer.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Select(SelectStatement),
    Insert(InsertStatement),
    Update(UpdateStatement),
    Delete(DeleteStatement),
}
