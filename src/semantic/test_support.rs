//! Shared fixtures and AST builders for statement-level tests

use crate::error::Result;
use crate::parsing::ast::{
    BinaryOp, CommonTableExpression, CompoundExpression, CompoundOperator, CompoundTerm,
    Direction, Expression, ExpressionKind, FunctionArguments, GroupByClause, InSet,
    JoinConstraint, JoinKind, JoinOperator, Limit, Literal, ObjectName, OrderingTerm,
    ResultColumn, SelectCore, SelectStatement, SourceInfo, Statement, TableExpression,
    TableInvocation, UnaryOp, WithClause,
};
use crate::semantic::analyzer::{AnalyzedStatement, SemanticAnalyzer};
use crate::types::data_type::{BaseType, ColumnType};
use crate::types::name::Name;
use crate::types::schema::{SchemaColumn, SchemaModel, SchemaTable};

pub fn test_model() -> SchemaModel {
    SchemaModel::new()
        .with_table(SchemaTable::new(
            "users",
            vec![
                SchemaColumn::new("id", ColumnType::not_null(BaseType::Integer)).primary_key(),
                SchemaColumn::new("name", ColumnType::not_null(BaseType::String)),
                SchemaColumn::new("email", ColumnType::nullable(BaseType::String)),
            ],
        ))
        .with_table(SchemaTable::new(
            "orders",
            vec![
                SchemaColumn::new("id", ColumnType::not_null(BaseType::Integer)).primary_key(),
                SchemaColumn::new("user_id", ColumnType::not_null(BaseType::Integer)),
                SchemaColumn::new("amount", ColumnType::nullable(BaseType::Float)),
            ],
        ))
        .with_table(SchemaTable::new(
            "tags",
            vec![SchemaColumn::new(
                "tag",
                ColumnType::not_null(BaseType::String),
            )],
        ))
}

pub fn analyze(statement: &Statement) -> Result<AnalyzedStatement> {
    SemanticAnalyzer::new(test_model()).analyze(statement)
}

// Expressions

pub fn col(name: &str) -> Expression {
    ExpressionKind::Column {
        table: None,
        name: Name::new(name),
    }
    .into()
}

pub fn qcol(table: &str, name: &str) -> Expression {
    ExpressionKind::Column {
        table: Some(Name::new(table)),
        name: Name::new(name),
    }
    .into()
}

pub fn integer(value: i64) -> Expression {
    ExpressionKind::Literal(Literal::Integer(value)).into()
}

pub fn float(value: f64) -> Expression {
    ExpressionKind::Literal(Literal::Float(value)).into()
}

pub fn string(value: &str) -> Expression {
    ExpressionKind::Literal(Literal::String(value.into())).into()
}

pub fn null() -> Expression {
    ExpressionKind::Literal(Literal::Null).into()
}

pub fn param(name: &str) -> Expression {
    ExpressionKind::BindParameter(Name::new(name)).into()
}

pub fn bin(op: BinaryOp, left: Expression, right: Expression) -> Expression {
    ExpressionKind::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
    .into()
}

pub fn unary(op: UnaryOp, operand: Expression) -> Expression {
    ExpressionKind::Unary {
        op,
        operand: Box::new(operand),
    }
    .into()
}

pub fn cast(expr: Expression, target: BaseType) -> Expression {
    ExpressionKind::Cast {
        expr: Box::new(expr),
        target,
    }
    .into()
}

pub fn func(name: &str, arguments: Vec<Expression>) -> Expression {
    ExpressionKind::Function {
        name: Name::new(name),
        arguments: FunctionArguments::Expressions {
            distinct: false,
            arguments,
        },
    }
    .into()
}

pub fn func_distinct(name: &str, arguments: Vec<Expression>) -> Expression {
    ExpressionKind::Function {
        name: Name::new(name),
        arguments: FunctionArguments::Expressions {
            distinct: true,
            arguments,
        },
    }
    .into()
}

pub fn count_star() -> Expression {
    wildcard_call("count")
}

pub fn wildcard_call(name: &str) -> Expression {
    ExpressionKind::Function {
        name: Name::new(name),
        arguments: FunctionArguments::Wildcard,
    }
    .into()
}

pub fn like(input: Expression, pattern: Expression) -> Expression {
    ExpressionKind::Similarity {
        op: crate::parsing::ast::SimilarityOp::Like,
        negated: false,
        input: Box::new(input),
        pattern: Box::new(pattern),
        escape: None,
    }
    .into()
}

pub fn between(input: Expression, low: Expression, high: Expression) -> Expression {
    ExpressionKind::Between {
        negated: false,
        input: Box::new(input),
        low: Box::new(low),
        high: Box::new(high),
    }
    .into()
}

pub fn in_list(input: Expression, items: Vec<Expression>) -> Expression {
    ExpressionKind::In {
        negated: false,
        input: Box::new(input),
        set: InSet::List(items),
    }
    .into()
}

pub fn in_query(input: Expression, query: SelectStatement) -> Expression {
    ExpressionKind::In {
        negated: false,
        input: Box::new(input),
        set: InSet::Query(Box::new(query)),
    }
    .into()
}

pub fn in_table(input: Expression, table: &str) -> Expression {
    ExpressionKind::In {
        negated: false,
        input: Box::new(input),
        set: InSet::Table(ObjectName::new(table)),
    }
    .into()
}

pub fn exists(query: SelectStatement) -> Expression {
    ExpressionKind::Exists(Box::new(query)).into()
}

pub fn scalar(query: SelectStatement) -> Expression {
    ExpressionKind::ScalarSubquery(Box::new(query)).into()
}

pub fn case_when(
    input: Option<Expression>,
    whens: Vec<(Expression, Expression)>,
    r#else: Option<Expression>,
) -> Expression {
    ExpressionKind::Case {
        input: input.map(Box::new),
        whens,
        r#else: r#else.map(Box::new),
    }
    .into()
}

// Result columns

pub fn expr_col(expr: Expression) -> ResultColumn {
    ResultColumn::Expression { expr, alias: None }
}

pub fn aliased(expr: Expression, alias: &str) -> ResultColumn {
    ResultColumn::Expression {
        expr,
        alias: Some(Name::new(alias)),
    }
}

pub fn star() -> ResultColumn {
    ResultColumn::Wildcard(SourceInfo::default())
}

pub fn table_star(name: &str) -> ResultColumn {
    ResultColumn::TableWildcard(Name::new(name), SourceInfo::default())
}

// Table expressions

pub fn table(name: &str) -> TableExpression {
    TableExpression::Table {
        invocation: TableInvocation {
            table: ObjectName::new(name),
            arguments: None,
        },
        alias: None,
        span: SourceInfo::default(),
    }
}

pub fn table_as(name: &str, alias: &str) -> TableExpression {
    TableExpression::Table {
        invocation: TableInvocation {
            table: ObjectName::new(name),
            arguments: None,
        },
        alias: Some(Name::new(alias)),
        span: SourceInfo::default(),
    }
}

pub fn table_with_args(name: &str, arguments: Vec<Expression>) -> TableExpression {
    TableExpression::Table {
        invocation: TableInvocation {
            table: ObjectName::new(name),
            arguments: Some(arguments),
        },
        alias: None,
        span: SourceInfo::default(),
    }
}

pub fn subquery_table(query: SelectStatement, alias: Option<&str>) -> TableExpression {
    TableExpression::Subquery {
        query: Box::new(query),
        alias: alias.map(Name::new),
        span: SourceInfo::default(),
    }
}

fn join_with(
    left: TableExpression,
    right: TableExpression,
    natural: bool,
    constraint: JoinConstraint,
) -> TableExpression {
    TableExpression::Join {
        left: Box::new(left),
        right: Box::new(right),
        op: JoinOperator {
            kind: JoinKind::Inner,
            natural,
        },
        constraint,
        span: SourceInfo::default(),
    }
}

pub fn join_on(
    left: TableExpression,
    right: TableExpression,
    predicate: Expression,
) -> TableExpression {
    join_with(left, right, false, JoinConstraint::On(predicate))
}

pub fn cross_join(left: TableExpression, right: TableExpression) -> TableExpression {
    join_with(left, right, false, JoinConstraint::None)
}

pub fn natural_join(left: TableExpression, right: TableExpression) -> TableExpression {
    join_with(left, right, true, JoinConstraint::None)
}

pub fn natural_join_on(
    left: TableExpression,
    right: TableExpression,
    predicate: Expression,
) -> TableExpression {
    join_with(left, right, true, JoinConstraint::On(predicate))
}

pub fn join_using(
    left: TableExpression,
    right: TableExpression,
    names: &[&str],
) -> TableExpression {
    join_with(
        left,
        right,
        false,
        JoinConstraint::Using(names.iter().map(|n| Name::new(*n)).collect()),
    )
}

// Select statements

pub struct SelectBuilder {
    columns: Vec<ResultColumn>,
    from: Option<TableExpression>,
    r#where: Option<Expression>,
    group_by: Option<GroupByClause>,
    order_by: Vec<OrderingTerm>,
    limit: Option<Limit>,
    with: Vec<CommonTableExpression>,
}

pub fn select(columns: Vec<ResultColumn>) -> SelectBuilder {
    SelectBuilder {
        columns,
        from: None,
        r#where: None,
        group_by: None,
        order_by: Vec::new(),
        limit: None,
        with: Vec::new(),
    }
}

impl SelectBuilder {
    pub fn from(mut self, table_expr: TableExpression) -> Self {
        self.from = Some(table_expr);
        self
    }

    pub fn where_clause(mut self, predicate: Expression) -> Self {
        self.r#where = Some(predicate);
        self
    }

    pub fn group_by(mut self, by: Vec<Expression>) -> Self {
        self.group_by = Some(GroupByClause { by, having: None });
        self
    }

    pub fn having(mut self, predicate: Expression) -> Self {
        match &mut self.group_by {
            Some(group_by) => group_by.having = Some(predicate),
            None => {
                self.group_by = Some(GroupByClause {
                    by: Vec::new(),
                    having: Some(predicate),
                })
            }
        }
        self
    }

    pub fn order_by(mut self, expr: Expression) -> Self {
        self.order_by.push(OrderingTerm {
            expr,
            direction: Direction::Asc,
            span: SourceInfo::default(),
        });
        self
    }

    pub fn limit(mut self, limit: Expression) -> Self {
        self.limit = Some(Limit {
            limit,
            offset: None,
        });
        self
    }

    pub fn limit_offset(mut self, limit: Expression, offset: Expression) -> Self {
        self.limit = Some(Limit {
            limit,
            offset: Some(offset),
        });
        self
    }

    pub fn with(mut self, name: &str, column_names: Option<&[&str]>, query: SelectStatement) -> Self {
        self.with.push(CommonTableExpression {
            name: Name::new(name),
            column_names: column_names
                .map(|names| names.iter().map(|n| Name::new(*n)).collect()),
            query,
            span: SourceInfo::default(),
        });
        self
    }

    pub fn build(self) -> SelectStatement {
        SelectStatement {
            with: if self.with.is_empty() {
                None
            } else {
                Some(WithClause {
                    recursive: false,
                    tables: self.with,
                })
            },
            compound: CompoundExpression::Term(CompoundTerm::Select(SelectCore {
                distinct: false,
                columns: self.columns,
                from: self.from,
                r#where: self.r#where,
                group_by: self.group_by,
                span: SourceInfo::default(),
            })),
            order_by: self.order_by,
            limit: self.limit,
            span: SourceInfo::default(),
        }
    }

    pub fn stmt(self) -> Statement {
        Statement::Select(self.build())
    }
}

pub fn compound(
    left: SelectStatement,
    op: CompoundOperator,
    right: SelectStatement,
) -> SelectStatement {
    SelectStatement {
        with: None,
        compound: CompoundExpression::Compound {
            op,
            left: Box::new(left.compound),
            right: Box::new(right.compound),
            span: SourceInfo::default(),
        },
        order_by: Vec::new(),
        limit: None,
        span: SourceInfo::default(),
    }
}

pub fn values(rows: Vec<Vec<Expression>>) -> SelectStatement {
    SelectStatement {
        with: None,
        compound: CompoundExpression::Term(CompoundTerm::Values {
            rows,
            span: SourceInfo::default(),
        }),
        order_by: Vec::new(),
        limit: None,
        span: SourceInfo::default(),
    }
}
