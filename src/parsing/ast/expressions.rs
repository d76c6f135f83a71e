//! SQL expressions and operators

use super::SourceInfo;
use super::query::{ObjectName, SelectStatement};
use crate::types::data_type::BaseType;
use crate::types::name::Name;

/// An expression node with its source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub span: SourceInfo,
}

impl Expression {
    pub fn new(kind: ExpressionKind, span: SourceInfo) -> Self {
        Expression { kind, span }
    }

    /// Returns the referenced column, when this is a bare column reference.
    pub fn as_column(&self) -> Option<(Option<&Name>, &Name)> {
        match &self.kind {
            ExpressionKind::Column { table, name } => Some((table.as_ref(), name)),
            _ => None,
        }
    }
}

impl From<ExpressionKind> for Expression {
    fn from(kind: ExpressionKind) -> Self {
        Expression {
            kind,
            span: SourceInfo::default(),
        }
    }
}

/// Expression variants, e.g. `a + 7 > b`. Can be nested.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    /// A literal value.
    Literal(Literal),
    /// A named bind parameter (`:x`, `@x`, `$x`; positional `?` parameters
    /// are named by position, e.g. `?1`).
    BindParameter(Name),
    /// A column reference, optionally qualified with a table name or alias.
    Column {
        table: Option<Name>,
        name: Name,
    },
    /// CAST(expr AS type), with the declared type already resolved to its
    /// base type.
    Cast {
        expr: Box<Expression>,
        target: BaseType,
    },
    /// expr COLLATE collation-name.
    Collate {
        expr: Box<Expression>,
        collation: Name,
    },
    /// A function call.
    Function {
        name: Name,
        arguments: FunctionArguments,
    },
    /// LIKE / GLOB / MATCH / REGEXP, possibly negated.
    Similarity {
        op: SimilarityOp,
        negated: bool,
        input: Box<Expression>,
        pattern: Box<Expression>,
        escape: Option<Box<Expression>>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
    },
    Between {
        negated: bool,
        input: Box<Expression>,
        low: Box<Expression>,
        high: Box<Expression>,
    },
    In {
        negated: bool,
        input: Box<Expression>,
        set: InSet,
    },
    /// EXISTS (select).
    Exists(Box<SelectStatement>),
    /// CASE [input] WHEN .. THEN .. [ELSE ..] END.
    Case {
        input: Option<Box<Expression>>,
        whens: Vec<(Expression, Expression)>,
        r#else: Option<Box<Expression>>,
    },
    /// A parenthesized subquery used as a scalar value.
    ScalarSubquery(Box<SelectStatement>),
    /// RAISE(...) inside a trigger body.
    Raise(Raise),
}

/// Expression literal values.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Integer(i64),
    Float(f64),
    String(String),
    Blob(Vec<u8>),
    CurrentTime,
    CurrentDate,
    CurrentTimestamp,
}

/// Argument list of a function call.
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionArguments {
    /// `f(*)`.
    Wildcard,
    /// `f([DISTINCT] a, b, ...)`.
    Expressions {
        distinct: bool,
        arguments: Vec<Expression>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimilarityOp {
    Like,
    Glob,
    Match,
    Regexp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Concatenate, // a || b
    Multiply,    // a * b
    Divide,      // a / b
    Modulo,      // a % b
    Add,         // a + b
    Subtract,    // a - b
    ShiftLeft,   // a << b
    ShiftRight,  // a >> b
    BitAnd,      // a & b
    BitOr,       // a | b
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Equal,
    NotEqual,
    Is,
    IsNot,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate, // -a
    BitNot, // ~a
    Not,    // NOT a
    IsNull, // a ISNULL
    NotNull, // a NOTNULL
}

/// The right-hand side of an IN expression.
#[derive(Debug, Clone, PartialEq)]
pub enum InSet {
    /// `a IN (1, 2, 3)`.
    List(Vec<Expression>),
    /// `a IN (SELECT ...)`.
    Query(Box<SelectStatement>),
    /// `a IN table`.
    Table(ObjectName),
}

/// RAISE(...) forms.
#[derive(Debug, Clone, PartialEq)]
pub enum Raise {
    Ignore,
    Rollback(String),
    Abort(String),
    Fail(String),
}
