//! Statement-level analyzer facade
//!
//! `SemanticAnalyzer` runs the whole check for one statement and returns
//! the concrete output: result columns with provenance, plus the tables the
//! statement reads and writes.

use super::query::QueryChecker;
use super::scope::{InferredQuery, SelectScope};
use crate::error::Result;
use crate::parsing::ast::Statement;
use crate::types::data_type::ColumnType;
use crate::types::name::Name;
use crate::types::schema::{SchemaModel, SchemaTable};
use serde::{Deserialize, Serialize};

/// One result column of an analyzed statement, with its type fully
/// resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputColumn {
    pub name: Name,
    /// The FROM binding the column came through, for bare column
    /// references.
    pub from_alias: Option<Name>,
    pub column_type: ColumnType,
    pub primary_key: bool,
}

/// Output of semantic analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedStatement {
    /// Result columns, in select order. Empty for DML statements.
    pub columns: Vec<OutputColumn>,
    /// Tables the statement reads, in first-reference order, de-duplicated.
    pub references: Vec<SchemaTable>,
    /// Tables the statement writes.
    pub writes: Vec<SchemaTable>,
}

/// Checks statements against a schema model.
pub struct SemanticAnalyzer {
    model: SchemaModel,
}

impl SemanticAnalyzer {
    pub fn new(model: SchemaModel) -> Self {
        SemanticAnalyzer { model }
    }

    pub fn model(&self) -> &SchemaModel {
        &self.model
    }

    /// Checks one statement. Either the statement is fully well-typed, or
    /// the first failure is returned with its source position.
    pub fn analyze(&self, statement: &Statement) -> Result<AnalyzedStatement> {
        let mut checker = QueryChecker::new(&self.model);
        let query = match statement {
            Statement::Select(select) => {
                let scope = SelectScope::root(&self.model);
                checker.infer_query(&scope, select)?
            }
            Statement::Insert(insert) => checker.check_insert(insert)?,
            Statement::Update(update) => checker.check_update(update)?,
            Statement::Delete(delete) => checker.check_delete(delete)?,
        };
        tracing::debug!(
            "analyzed statement: {} columns, {} reads, {} writes",
            query.columns.len(),
            checker.reads.tables().len(),
            checker.writes.tables().len()
        );
        Ok(Self::finish(checker, query))
    }

    fn finish(checker: QueryChecker<'_>, query: InferredQuery) -> AnalyzedStatement {
        let columns: Vec<OutputColumn> = query
            .columns
            .iter()
            .map(|column| OutputColumn {
                name: column.column_name.clone(),
                from_alias: column.from_alias.clone(),
                column_type: checker.cx.concrete(&column.inferred_type),
                primary_key: column.primary_key,
            })
            .collect();
        AnalyzedStatement {
            columns,
            references: checker.reads.into_tables(),
            writes: checker.writes.into_tables(),
        }
    }
}
