//! FROM clause scope construction and join validation

use super::query::QueryChecker;
use super::scope::{FromScope, SelectScope};
use crate::error::{Error, Result};
use crate::parsing::ast::{JoinConstraint, TableExpression};
use crate::types::data_type::BaseType;

impl<'m> QueryChecker<'m> {
    /// Builds the `FromScope` a table expression contributes: bindings for
    /// every named table or aliased subquery, and the flattened wildcard.
    /// Name-structural join rules (NATURAL, USING) are checked here while
    /// both sides are still separate.
    pub(super) fn table_expr_scope(
        &mut self,
        scope: &SelectScope<'_>,
        table_expr: &TableExpression,
    ) -> Result<FromScope> {
        match table_expr {
            TableExpression::Table {
                invocation,
                alias,
                span,
            } => {
                if invocation.arguments.is_some() {
                    return Err(Error::TableFunctionUnsupported.at(*span));
                }
                let reads = &mut self.reads;
                let query = scope
                    .resolve_table_reference(&invocation.table, &mut |table| reads.record(table))
                    .map_err(|e| e.at(*span))?;
                let binding = alias
                    .clone()
                    .unwrap_or_else(|| invocation.table.table_name.clone());
                let query = query.under_alias(&binding);
                let mut from_scope = FromScope {
                    wildcard: query.clone(),
                    ..FromScope::default()
                };
                from_scope.bind(binding, query).map_err(|e| e.at(*span))?;
                Ok(from_scope)
            }

            TableExpression::Subquery { query, alias, span } => {
                let inferred = self.infer_query(scope, query)?;
                let mut from_scope = FromScope::default();
                match alias {
                    Some(alias) => {
                        let aliased = inferred.under_alias(alias);
                        from_scope.wildcard = aliased.clone();
                        from_scope.bind(alias.clone(), aliased).map_err(|e| e.at(*span))?;
                    }
                    // Without an alias the columns are only reachable
                    // through the wildcard.
                    None => from_scope.wildcard = inferred,
                }
                Ok(from_scope)
            }

            TableExpression::Join {
                left,
                right,
                op,
                constraint,
                span,
            } => {
                let mut left_scope = self.table_expr_scope(scope, left)?;
                let right_scope = self.table_expr_scope(scope, right)?;

                if op.natural {
                    match constraint {
                        JoinConstraint::On(_) | JoinConstraint::Using(_) => {
                            return Err(Error::NaturalJoinConstraint.at(*span));
                        }
                        JoinConstraint::None => {
                            let shared = left_scope.wildcard.columns.iter().any(|column| {
                                right_scope.wildcard.column(&column.column_name).is_some()
                            });
                            if !shared {
                                return Err(Error::NaturalJoinNoCommonColumns.at(*span));
                            }
                        }
                    }
                } else if let JoinConstraint::Using(names) = constraint {
                    for name in names {
                        let on_both = left_scope.wildcard.column(name).is_some()
                            && right_scope.wildcard.column(name).is_some();
                        if !on_both {
                            return Err(Error::UsingColumnMissing(name.to_string()).at(*span));
                        }
                    }
                }

                left_scope.merge(right_scope).map_err(|e| e.at(*span))?;
                Ok(left_scope)
            }
        }
    }

    /// Type-checks join predicates under the scope that contains the fully
    /// constructed FROM clause, so an ON expression sees both sides and any
    /// enclosing scope.
    pub(super) fn validate_table_expr(
        &mut self,
        scope: &SelectScope<'_>,
        table_expr: &TableExpression,
    ) -> Result<()> {
        if let TableExpression::Join {
            left,
            right,
            constraint,
            ..
        } = table_expr
        {
            self.validate_table_expr(scope, left)?;
            self.validate_table_expr(scope, right)?;
            if let JoinConstraint::On(predicate) = constraint {
                self.require_expression(scope, predicate, BaseType::Boolean)?;
            }
        }
        Ok(())
    }
}
