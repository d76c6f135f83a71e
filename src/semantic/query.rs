//! Query-level inference: select cores, compound queries, CTEs
//!
//! `QueryChecker` drives a whole statement check. It owns the inference
//! context and the read/write tracking for the statement; expression and
//! table-expression inference live in sibling modules as further impl
//! blocks on the same type.

use super::inference::InferenceContext;
use super::scope::{InferredQuery, InferredQueryColumn, SelectScope};
use crate::error::{Error, Result};
use crate::parsing::ast::{
    CompoundExpression, CompoundTerm, ResultColumn, SelectCore, SelectStatement,
};
use crate::types::data_type::BaseType;
use crate::types::name::Name;
use crate::types::schema::{SchemaModel, SchemaTable};

/// Ordered, de-duplicated set of schema tables a statement touches.
#[derive(Debug, Default)]
pub struct ReferenceTracker {
    tables: Vec<SchemaTable>,
}

impl ReferenceTracker {
    pub fn record(&mut self, table: &SchemaTable) {
        let seen = self.tables.iter().any(|t| {
            t.schema_name == table.schema_name && t.table_name == table.table_name
        });
        if !seen {
            self.tables.push(table.clone());
        }
    }

    pub fn tables(&self) -> &[SchemaTable] {
        &self.tables
    }

    pub fn into_tables(self) -> Vec<SchemaTable> {
        self.tables
    }
}

/// Checker state for a single statement.
pub struct QueryChecker<'m> {
    pub(super) model: &'m SchemaModel,
    pub(super) cx: InferenceContext,
    pub(super) reads: ReferenceTracker,
    pub(super) writes: ReferenceTracker,
}

impl<'m> QueryChecker<'m> {
    pub fn new(model: &'m SchemaModel) -> Self {
        QueryChecker {
            model,
            cx: InferenceContext::new(),
            reads: ReferenceTracker::default(),
            writes: ReferenceTracker::default(),
        }
    }

    /// Infers the result type of a full SELECT statement under the given
    /// scope: CTEs first, then the compound body, then ORDER BY and LIMIT.
    pub fn infer_query(
        &mut self,
        scope: &SelectScope<'_>,
        statement: &SelectStatement,
    ) -> Result<InferredQuery> {
        let mut cte_scope = scope.child();
        if let Some(with) = &statement.with {
            // Left fold: each CTE body is inferred under the scope extended
            // with the CTEs before it.
            for cte in &with.tables {
                let body = self.infer_query(&cte_scope, &cte.query)?;
                let query = match &cte.column_names {
                    Some(names) => body.rename(names).map_err(|e| e.at(cte.span))?,
                    None => body,
                };
                cte_scope.cte_variables.insert(cte.name.clone(), query);
            }
        }

        let result = self.infer_compound(&cte_scope, &statement.compound)?;

        for term in &statement.order_by {
            // A bare name that matches a result column orders by it; any
            // other expression must type on its own.
            if let Some((None, name)) = term.expr.as_column()
                && result.column(name).is_some()
            {
                continue;
            }
            self.require_expression(&cte_scope, &term.expr, BaseType::Any)?;
        }

        // LIMIT and OFFSET are evaluated outside the select's FROM scope.
        if let Some(limit) = &statement.limit {
            self.require_expression(scope, &limit.limit, BaseType::Integer)?;
            if let Some(offset) = &limit.offset {
                self.require_expression(scope, offset, BaseType::Integer)?;
            }
        }

        Ok(result)
    }

    pub(super) fn infer_compound(
        &mut self,
        scope: &SelectScope<'_>,
        compound: &CompoundExpression,
    ) -> Result<InferredQuery> {
        match compound {
            CompoundExpression::Term(term) => self.infer_compound_term(scope, term),
            CompoundExpression::Compound {
                left, right, span, ..
            } => {
                let left_query = self.infer_compound(scope, left)?;
                let right_query = self.infer_compound(scope, right)?;
                if left_query.columns.len() != right_query.columns.len() {
                    return Err(Error::CompoundWidth {
                        left: left_query.columns.len(),
                        right: right_query.columns.len(),
                    }
                    .at(*span));
                }
                let mut columns = Vec::with_capacity(left_query.columns.len());
                for (left_column, right_column) in
                    left_query.columns.iter().zip(&right_query.columns)
                {
                    let unified = self
                        .cx
                        .unify(&left_column.inferred_type, &right_column.inferred_type)
                        .map_err(|e| e.at(*span))?;
                    columns.push(InferredQueryColumn {
                        inferred_type: unified,
                        ..left_column.clone()
                    });
                }
                Ok(InferredQuery { columns })
            }
        }
    }

    fn infer_compound_term(
        &mut self,
        scope: &SelectScope<'_>,
        term: &CompoundTerm,
    ) -> Result<InferredQuery> {
        match term {
            CompoundTerm::Select(core) => self.infer_select_core(scope, core),
            CompoundTerm::Values { rows, span } => {
                let Some(first) = rows.first() else {
                    return Err(Error::EmptyValues.at(*span));
                };
                let mut types = Vec::with_capacity(first.len());
                for expr in first {
                    types.push(self.infer_expression(scope, expr)?);
                }
                for row in &rows[1..] {
                    if row.len() != first.len() {
                        return Err(Error::WidthMismatch {
                            expected: first.len(),
                            found: row.len(),
                        }
                        .at(*span));
                    }
                    for (expr, slot) in row.iter().zip(types.iter_mut()) {
                        let inferred = self.infer_expression(scope, expr)?;
                        *slot = self
                            .cx
                            .unify(slot, &inferred)
                            .map_err(|e| e.at(expr.span))?;
                    }
                }
                Ok(InferredQuery {
                    columns: types
                        .into_iter()
                        .map(|inferred_type| InferredQueryColumn {
                            column_name: Name::new(""),
                            from_alias: None,
                            inferred_type,
                            primary_key: false,
                        })
                        .collect(),
                })
            }
        }
    }

    fn infer_select_core(
        &mut self,
        scope: &SelectScope<'_>,
        core: &SelectCore,
    ) -> Result<InferredQuery> {
        let child = match &core.from {
            Some(table_expr) => {
                let from_scope = self.table_expr_scope(scope, table_expr)?;
                scope.child_with_from(from_scope)
            }
            None => scope.child(),
        };
        if let Some(table_expr) = &core.from {
            self.validate_table_expr(&child, table_expr)?;
        }

        if let Some(predicate) = &core.r#where {
            self.require_expression(&child, predicate, BaseType::Boolean)?;
        }

        if let Some(group_by) = &core.group_by {
            for expr in &group_by.by {
                self.require_expression(&child, expr, BaseType::Any)?;
            }
            if let Some(having) = &group_by.having {
                self.require_expression(&child, having, BaseType::Boolean)?;
            }
        }

        let mut columns = Vec::new();
        for result_column in &core.columns {
            match result_column {
                ResultColumn::Wildcard(span) => {
                    let from = child
                        .from_clause
                        .as_ref()
                        .ok_or_else(|| Error::WildcardWithoutFrom.at(*span))?;
                    columns.extend(from.wildcard.columns.iter().cloned());
                }
                ResultColumn::TableWildcard(name, span) => {
                    if child.from_clause.is_none() {
                        return Err(Error::WildcardWithoutFrom.at(*span));
                    }
                    let query = child.resolve_from_alias(name).map_err(|e| e.at(*span))?;
                    columns.extend(query.columns.iter().cloned());
                }
                ResultColumn::Expression { expr, alias } => {
                    let inferred_type = self.infer_expression(&child, expr)?;
                    match (expr.as_column(), alias) {
                        // A bare column reference keeps its provenance; an
                        // alias only overrides the output name.
                        (Some((table, name)), _) => {
                            let resolved = child
                                .resolve_column(table, name)
                                .map_err(|e| e.at(expr.span))?;
                            columns.push(InferredQueryColumn {
                                column_name: alias
                                    .clone()
                                    .unwrap_or_else(|| resolved.column_name.clone()),
                                from_alias: resolved.from_alias.clone(),
                                inferred_type,
                                primary_key: resolved.primary_key,
                            });
                        }
                        (None, Some(alias)) => columns.push(InferredQueryColumn {
                            column_name: alias.clone(),
                            from_alias: None,
                            inferred_type,
                            primary_key: false,
                        }),
                        (None, None) => {
                            return Err(Error::ExpressionRequiresAlias.at(expr.span));
                        }
                    }
                }
            }
        }

        Ok(InferredQuery { columns })
    }
}
