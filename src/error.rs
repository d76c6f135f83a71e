//! Error types for the analyzer

use crate::parsing::ast::SourceInfo;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PositionedError>;

/// Broad classification of analysis failures, used by callers that react to
/// the category rather than the specific message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    NotFound,
    Ambiguous,
    TypeConflict,
    ArityMismatch,
    Structural,
    Unsupported,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // Name resolution errors
    #[error("table not found: {0}")]
    TableNotFound(String),

    #[error("column not found: {0}")]
    ColumnNotFound(String),

    #[error("function not found: {0}")]
    FunctionNotFound(String),

    #[error("ambiguous column reference: {0}")]
    AmbiguousColumn(String),

    // Type errors
    #[error("type conflict: {left} vs {right}")]
    TypeConflict { left: String, right: String },

    // Arity errors
    #[error("function {name} expects {expected} arguments, got {found}")]
    FunctionArity {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("subquery must produce exactly one column, got {0}")]
    SubqueryWidth(usize),

    #[error("expected {expected} columns, got {found}")]
    WidthMismatch { expected: usize, found: usize },

    #[error("compound query sides have {left} and {right} columns")]
    CompoundWidth { left: usize, right: usize },

    // Structural errors
    #[error("duplicate table name or alias: {0}")]
    DuplicateAlias(String),

    #[error("duplicate column: {0}")]
    DuplicateColumn(String),

    #[error("NATURAL JOIN cannot have an ON or USING constraint")]
    NaturalJoinConstraint,

    #[error("NATURAL JOIN has no columns in common")]
    NaturalJoinNoCommonColumns,

    #[error("USING column {0} must exist on both sides of the join")]
    UsingColumnMissing(String),

    #[error("SELECT * requires a FROM clause")]
    WildcardWithoutFrom,

    #[error("expression column requires an alias")]
    ExpressionRequiresAlias,

    #[error("VALUES requires at least one row")]
    EmptyValues,

    #[error("DISTINCT is not allowed for function {0}")]
    DistinctNotAllowed(String),

    #[error("wildcard argument is not allowed for function {0}")]
    WildcardNotAllowed(String),

    // Unsupported features
    #[error("table-valued functions are not supported")]
    TableFunctionUnsupported,
}

impl Error {
    /// Classifies the error for callers that only care about the category.
    pub fn class(&self) -> ErrorClass {
        match self {
            Error::TableNotFound(_) | Error::ColumnNotFound(_) | Error::FunctionNotFound(_) => {
                ErrorClass::NotFound
            }
            Error::AmbiguousColumn(_) => ErrorClass::Ambiguous,
            Error::TypeConflict { .. } => ErrorClass::TypeConflict,
            Error::FunctionArity { .. }
            | Error::SubqueryWidth(_)
            | Error::WidthMismatch { .. }
            | Error::CompoundWidth { .. } => ErrorClass::ArityMismatch,
            Error::DuplicateAlias(_)
            | Error::DuplicateColumn(_)
            | Error::NaturalJoinConstraint
            | Error::NaturalJoinNoCommonColumns
            | Error::UsingColumnMissing(_)
            | Error::WildcardWithoutFrom
            | Error::ExpressionRequiresAlias
            | Error::EmptyValues
            | Error::DistinctNotAllowed(_)
            | Error::WildcardNotAllowed(_) => ErrorClass::Structural,
            Error::TableFunctionUnsupported => ErrorClass::Unsupported,
        }
    }

    /// Attaches the span of the node that triggered the failure.
    pub fn at(self, at: SourceInfo) -> PositionedError {
        PositionedError { error: self, at }
    }
}

/// An analysis failure located at the smallest enclosing AST node.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{error} at {at}")]
pub struct PositionedError {
    pub error: Error,
    pub at: SourceInfo,
}

impl PositionedError {
    pub fn class(&self) -> ErrorClass {
        self.error.class()
    }
}
