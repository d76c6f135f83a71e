//! SELECT statements: compound queries, table expressions, CTEs

use super::SourceInfo;
use super::expressions::Expression;
use crate::types::name::Name;

/// A possibly schema-qualified table name.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectName {
    pub schema_name: Option<Name>,
    pub table_name: Name,
    pub span: SourceInfo,
}

impl ObjectName {
    pub fn new(table_name: impl Into<Name>) -> Self {
        ObjectName {
            schema_name: None,
            table_name: table_name.into(),
            span: SourceInfo::default(),
        }
    }
}

/// A full SELECT statement: WITH clause, compound body, ORDER BY and LIMIT.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    pub with: Option<WithClause>,
    pub compound: CompoundExpression,
    pub order_by: Vec<OrderingTerm>,
    pub limit: Option<Limit>,
    pub span: SourceInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WithClause {
    pub recursive: bool,
    pub tables: Vec<CommonTableExpression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommonTableExpression {
    pub name: Name,
    /// Optional column rename list: `WITH t(a, b) AS (...)`.
    pub column_names: Option<Vec<Name>>,
    pub query: SelectStatement,
    pub span: SourceInfo,
}

/// A tree of set operations over SELECT cores and VALUES blocks.
#[derive(Debug, Clone, PartialEq)]
pub enum CompoundExpression {
    Term(CompoundTerm),
    Compound {
        op: CompoundOperator,
        left: Box<CompoundExpression>,
        right: Box<CompoundExpression>,
        span: SourceInfo,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompoundOperator {
    Union,
    UnionAll,
    Intersect,
    Except,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CompoundTerm {
    Select(SelectCore),
    Values {
        rows: Vec<Vec<Expression>>,
        span: SourceInfo,
    },
}

/// A single SELECT core: result columns, FROM, WHERE, GROUP BY/HAVING.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectCore {
    pub distinct: bool,
    pub columns: Vec<ResultColumn>,
    pub from: Option<TableExpression>,
    pub r#where: Option<Expression>,
    pub group_by: Option<GroupByClause>,
    pub span: SourceInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupByClause {
    pub by: Vec<Expression>,
    pub having: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResultColumn {
    /// `*`.
    Wildcard(SourceInfo),
    /// `T.*`.
    TableWildcard(Name, SourceInfo),
    /// `expr [AS alias]`.
    Expression {
        expr: Expression,
        alias: Option<Name>,
    },
}

/// A table reference in FROM position, possibly with an argument list
/// (table-valued function syntax, which the analyzer rejects).
#[derive(Debug, Clone, PartialEq)]
pub struct TableInvocation {
    pub table: ObjectName,
    pub arguments: Option<Vec<Expression>>,
}

/// A FROM item: a table, a subquery, or a join of two items.
#[derive(Debug, Clone, PartialEq)]
pub enum TableExpression {
    Table {
        invocation: TableInvocation,
        alias: Option<Name>,
        span: SourceInfo,
    },
    Subquery {
        query: Box<SelectStatement>,
        alias: Option<Name>,
        span: SourceInfo,
    },
    Join {
        left: Box<TableExpression>,
        right: Box<TableExpression>,
        op: JoinOperator,
        constraint: JoinConstraint,
        span: SourceInfo,
    },
}

impl TableExpression {
    pub fn span(&self) -> SourceInfo {
        match self {
            TableExpression::Table { span, .. }
            | TableExpression::Subquery { span, .. }
            | TableExpression::Join { span, .. } => *span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinOperator {
    pub kind: JoinKind,
    pub natural: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Cross,
}

#[derive(Debug, Clone, PartialEq)]
pub enum JoinConstraint {
    None,
    On(Expression),
    Using(Vec<Name>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderingTerm {
    pub expr: Expression,
    pub direction: Direction,
    pub span: SourceInfo,
}

/// Sort direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Limit {
    pub limit: Expression,
    pub offset: Option<Expression>,
}
