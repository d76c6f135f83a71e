//! Name resolution scopes
//!
//! A `SelectScope` is what a statement's names resolve against: the schema
//! model at the root, CTE bindings added by `WITH`, and a `FromScope` built
//! from the `FROM` clause. Scopes nest by borrowing their parent, so a
//! subquery extends the enclosing query's scope without copying it.

use super::inference::InferredType;
use crate::error::Error;
use crate::parsing::ast::ObjectName;
use crate::types::name::Name;
use crate::types::schema::{SchemaModel, SchemaTable};
use std::collections::HashMap;

/// One column of an inferred query, with provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct InferredQueryColumn {
    pub column_name: Name,
    /// The FROM binding this column came through, when it came from one.
    pub from_alias: Option<Name>,
    pub inferred_type: InferredType,
    pub primary_key: bool,
}

/// The inferred type of a query: its ordered result columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InferredQuery {
    pub columns: Vec<InferredQueryColumn>,
}

impl InferredQuery {
    /// The query a schema table produces when referenced in FROM position.
    pub fn from_table(table: &SchemaTable) -> Self {
        InferredQuery {
            columns: table
                .columns
                .iter()
                .map(|column| InferredQueryColumn {
                    column_name: column.column_name.clone(),
                    from_alias: None,
                    inferred_type: InferredType::Concrete(column.column_type),
                    primary_key: column.primary_key,
                })
                .collect(),
        }
    }

    pub fn column(&self, name: &Name) -> Option<&InferredQueryColumn> {
        self.columns.iter().find(|c| &c.column_name == name)
    }

    /// A copy with every column re-attributed to the given FROM binding.
    pub fn under_alias(&self, alias: &Name) -> Self {
        InferredQuery {
            columns: self
                .columns
                .iter()
                .map(|column| InferredQueryColumn {
                    from_alias: Some(alias.clone()),
                    ..column.clone()
                })
                .collect(),
        }
    }

    /// A copy with columns renamed positionally, as in `WITH t(a, b)`.
    /// The rename list must cover every column.
    pub fn rename(&self, names: &[Name]) -> Result<Self, Error> {
        if names.len() != self.columns.len() {
            return Err(Error::WidthMismatch {
                expected: self.columns.len(),
                found: names.len(),
            });
        }
        Ok(InferredQuery {
            columns: self
                .columns
                .iter()
                .zip(names)
                .map(|(column, name)| InferredQueryColumn {
                    column_name: name.clone(),
                    ..column.clone()
                })
                .collect(),
        })
    }
}

/// The bindings a FROM clause contributes: named table aliases in
/// insertion order, plus the flattened wildcard column list.
#[derive(Debug, Clone, Default)]
pub struct FromScope {
    /// Alias (or table name) bindings, in FROM order. Kept as a vector
    /// because unqualified resolution searches in insertion order.
    pub from_variables: Vec<(Name, InferredQuery)>,
    /// The columns `*` expands to.
    pub wildcard: InferredQuery,
}

impl FromScope {
    pub fn get(&self, name: &Name) -> Option<&InferredQuery> {
        self.from_variables
            .iter()
            .find(|(bound, _)| bound == name)
            .map(|(_, query)| query)
    }

    /// Adds a named binding, rejecting duplicates.
    pub fn bind(&mut self, name: Name, query: InferredQuery) -> Result<(), Error> {
        if self.get(&name).is_some() {
            return Err(Error::DuplicateAlias(name.to_string()));
        }
        self.from_variables.push((name, query));
        Ok(())
    }

    /// Merges another FROM scope into this one, as a join does.
    pub fn merge(&mut self, other: FromScope) -> Result<(), Error> {
        for (name, query) in other.from_variables {
            self.bind(name, query)?;
        }
        self.wildcard.columns.extend(other.wildcard.columns);
        Ok(())
    }
}

/// A resolution scope. The root scope holds only the schema model; child
/// scopes add CTE bindings and FROM clauses.
#[derive(Debug)]
pub struct SelectScope<'a> {
    pub parent: Option<&'a SelectScope<'a>>,
    pub model: &'a SchemaModel,
    pub cte_variables: HashMap<Name, InferredQuery>,
    pub from_clause: Option<FromScope>,
}

impl<'a> SelectScope<'a> {
    pub fn root(model: &'a SchemaModel) -> Self {
        SelectScope {
            parent: None,
            model,
            cte_variables: HashMap::new(),
            from_clause: None,
        }
    }

    /// An empty child scope; names not found in it fall through to `self`.
    pub fn child(&self) -> SelectScope<'_> {
        SelectScope {
            parent: Some(self),
            model: self.model,
            cte_variables: HashMap::new(),
            from_clause: None,
        }
    }

    /// A child scope with a FROM clause attached.
    pub fn child_with_from(&self, from_clause: FromScope) -> SelectScope<'_> {
        SelectScope {
            parent: Some(self),
            model: self.model,
            cte_variables: HashMap::new(),
            from_clause: Some(from_clause),
        }
    }

    /// Resolves a column reference, searching enclosing scopes for
    /// correlated references when this scope has no match.
    pub fn resolve_column(
        &self,
        table: Option<&Name>,
        column: &Name,
    ) -> Result<&InferredQueryColumn, Error> {
        if let Some(from) = &self.from_clause {
            match table {
                Some(table_name) => {
                    if let Some(query) = from.get(table_name) {
                        // The alias is bound here, so the column must be in
                        // it; enclosing scopes cannot rescue a bad column.
                        return query
                            .column(column)
                            .ok_or_else(|| Error::ColumnNotFound(column.to_string()));
                    }
                }
                None => {
                    let mut found = None;
                    for (_, query) in &from.from_variables {
                        if let Some(resolved) = query.column(column) {
                            if found.is_some() {
                                return Err(Error::AmbiguousColumn(column.to_string()));
                            }
                            found = Some(resolved);
                        }
                    }
                    if let Some(resolved) = found {
                        return Ok(resolved);
                    }
                }
            }
        }

        match self.parent {
            Some(parent) => parent.resolve_column(table, column),
            None => Err(match table {
                Some(table_name) => Error::TableNotFound(table_name.to_string()),
                None => Error::ColumnNotFound(column.to_string()),
            }),
        }
    }

    /// Resolves a FROM binding by name, for `T.*`.
    pub fn resolve_from_alias(&self, name: &Name) -> Result<&InferredQuery, Error> {
        if let Some(from) = &self.from_clause
            && let Some(query) = from.get(name)
        {
            return Ok(query);
        }
        match self.parent {
            Some(parent) => parent.resolve_from_alias(name),
            None => Err(Error::TableNotFound(name.to_string())),
        }
    }

    /// Resolves a table reference to its inferred query. A schema-less name
    /// is first tried against CTE bindings, then the catalog. Catalog hits
    /// are reported through `on_reference` so the caller can track reads.
    pub fn resolve_table_reference(
        &self,
        name: &ObjectName,
        on_reference: &mut dyn FnMut(&SchemaTable),
    ) -> Result<InferredQuery, Error> {
        if name.schema_name.is_none()
            && let Some(query) = self.find_cte(&name.table_name)
        {
            return Ok(query.clone());
        }
        match self
            .model
            .find_table(name.schema_name.as_ref(), &name.table_name)
        {
            Some(table) => {
                on_reference(table);
                Ok(InferredQuery::from_table(table))
            }
            None => Err(Error::TableNotFound(name.table_name.to_string())),
        }
    }

    fn find_cte(&self, name: &Name) -> Option<&InferredQuery> {
        if let Some(query) = self.cte_variables.get(name) {
            return Some(query);
        }
        self.parent.and_then(|parent| parent.find_cte(name))
    }
}
