//! Statement checks for INSERT, UPDATE, DELETE
//!
//! These reuse the expression checker; their own job is target-table
//! validation, column-list checks, and source/target width and type
//! agreement. Target tables are tracked as writes.

use super::inference::InferredType;
use super::query::QueryChecker;
use super::scope::{FromScope, InferredQuery, SelectScope};
use crate::error::{Error, Result};
use crate::parsing::ast::{
    DeleteStatement, InsertSource, InsertStatement, ObjectName, SourceInfo, UpdateStatement,
};
use crate::types::data_type::BaseType;
use crate::types::schema::{SchemaColumn, SchemaTable};

impl<'m> QueryChecker<'m> {
    fn resolve_write_target(&mut self, name: &ObjectName, span: SourceInfo) -> Result<SchemaTable> {
        let table = self
            .model
            .find_table(name.schema_name.as_ref(), &name.table_name)
            .cloned()
            .ok_or_else(|| Error::TableNotFound(name.table_name.to_string()).at(span))?;
        self.writes.record(&table);
        Ok(table)
    }

    /// A scope exposing the target table's columns, for WHERE and SET
    /// expressions.
    fn table_scope(&self, table: &SchemaTable) -> FromScope {
        let query = InferredQuery::from_table(table).under_alias(&table.table_name);
        let mut from_scope = FromScope {
            wildcard: query.clone(),
            ..FromScope::default()
        };
        // The table name was just resolved, so binding it cannot collide.
        from_scope
            .bind(table.table_name.clone(), query)
            .expect("fresh scope has no bindings");
        from_scope
    }

    pub(super) fn check_insert(&mut self, insert: &InsertStatement) -> Result<InferredQuery> {
        let table = self.resolve_write_target(&insert.table, insert.table.span)?;

        let targets: Vec<SchemaColumn> = match &insert.columns {
            Some(names) => {
                let mut targets: Vec<SchemaColumn> = Vec::with_capacity(names.len());
                for name in names {
                    if targets.iter().any(|c| &c.column_name == name) {
                        return Err(Error::DuplicateColumn(name.to_string()).at(insert.span));
                    }
                    let column = table
                        .get_column(name)
                        .ok_or_else(|| Error::ColumnNotFound(name.to_string()).at(insert.span))?;
                    targets.push(column.clone());
                }
                targets
            }
            None => table.columns.clone(),
        };

        let scope = SelectScope::root(self.model);
        match &insert.source {
            InsertSource::Values(rows) => {
                if rows.is_empty() {
                    return Err(Error::EmptyValues.at(insert.span));
                }
                for row in rows {
                    if row.len() != targets.len() {
                        return Err(Error::WidthMismatch {
                            expected: targets.len(),
                            found: row.len(),
                        }
                        .at(insert.span));
                    }
                    for (expr, target) in row.iter().zip(&targets) {
                        let inferred = self.infer_expression(&scope, expr)?;
                        self.cx
                            .unify(&inferred, &InferredType::Concrete(target.column_type))
                            .map_err(|e| e.at(expr.span))?;
                    }
                }
            }
            InsertSource::Select(select) => {
                let query = self.infer_query(&scope, select)?;
                if query.columns.len() != targets.len() {
                    return Err(Error::WidthMismatch {
                        expected: targets.len(),
                        found: query.columns.len(),
                    }
                    .at(select.span));
                }
                for (column, target) in query.columns.iter().zip(&targets) {
                    self.cx
                        .unify(
                            &column.inferred_type,
                            &InferredType::Concrete(target.column_type),
                        )
                        .map_err(|e| e.at(select.span))?;
                }
            }
            InsertSource::DefaultValues => {}
        }

        Ok(InferredQuery::default())
    }

    pub(super) fn check_update(&mut self, update: &UpdateStatement) -> Result<InferredQuery> {
        let table = self.resolve_write_target(&update.table, update.table.span)?;
        let root = SelectScope::root(self.model);
        let scope = root.child_with_from(self.table_scope(&table));

        for (column_name, expr) in &update.set {
            let target = table
                .get_column(column_name)
                .ok_or_else(|| Error::ColumnNotFound(column_name.to_string()).at(update.span))?;
            let inferred = self.infer_expression(&scope, expr)?;
            self.cx
                .unify(&inferred, &InferredType::Concrete(target.column_type))
                .map_err(|e| e.at(expr.span))?;
        }

        if let Some(predicate) = &update.r#where {
            self.require_expression(&scope, predicate, BaseType::Boolean)?;
        }

        Ok(InferredQuery::default())
    }

    pub(super) fn check_delete(&mut self, delete: &DeleteStatement) -> Result<InferredQuery> {
        let table = self.resolve_write_target(&delete.table, delete.table.span)?;
        let root = SelectScope::root(self.model);
        let scope = root.child_with_from(self.table_scope(&table));

        if let Some(predicate) = &delete.r#where {
            self.require_expression(&scope, predicate, BaseType::Boolean)?;
        }

        Ok(InferredQuery::default())
    }
}
