//! Data modification statements: INSERT, UPDATE, DELETE

use super::SourceInfo;
use super::expressions::Expression;
use super::query::{ObjectName, SelectStatement};
use crate::types::name::Name;

/// Source of data for INSERT statements.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertSource {
    /// VALUES: explicit rows to insert.
    Values(Vec<Vec<Expression>>),
    /// SELECT: rows from a query.
    Select(Box<SelectStatement>),
    /// DEFAULT VALUES: a single row of defaults.
    DefaultValues,
}

/// INSERT INTO: inserts new rows into a table.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    pub table: ObjectName,
    /// Columns to insert into. None means all columns in table order.
    pub columns: Option<Vec<Name>>,
    pub source: InsertSource,
    pub span: SourceInfo,
}

/// UPDATE: updates rows in a table.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    pub table: ObjectName,
    pub set: Vec<(Name, Expression)>,
    pub r#where: Option<Expression>,
    pub span: SourceInfo,
}

/// DELETE: deletes rows from a table.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStatement {
    pub table: ObjectName,
    pub r#where: Option<Expression>,
    pub span: SourceInfo,
}
