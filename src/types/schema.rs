//! Schema model: the read-only catalog of tables and built-in functions

use super::data_type::ColumnType;
use super::functions::{FunctionSignature, builtin_functions};
use super::name::Name;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A column of a catalog table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaColumn {
    pub column_name: Name,
    pub column_type: ColumnType,
    pub primary_key: bool,
}

impl SchemaColumn {
    pub fn new(name: impl Into<Name>, column_type: ColumnType) -> Self {
        SchemaColumn {
            column_name: name.into(),
            column_type,
            primary_key: false,
        }
    }

    /// Marks this column as the primary key. Primary keys are not nullable.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.column_type.nullable = false;
        self
    }
}

/// A catalog table. Tables are immutable once handed to the analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaTable {
    pub schema_name: Name,
    pub table_name: Name,
    pub columns: Vec<SchemaColumn>,
}

impl SchemaTable {
    /// Creates a table in the default `main` schema.
    pub fn new(table_name: impl Into<Name>, columns: Vec<SchemaColumn>) -> Self {
        SchemaTable {
            schema_name: Name::new("main"),
            table_name: table_name.into(),
            columns,
        }
    }

    pub fn in_schema(mut self, schema_name: impl Into<Name>) -> Self {
        self.schema_name = schema_name.into();
        self
    }

    pub fn get_column(&self, name: &Name) -> Option<&SchemaColumn> {
        self.columns.iter().find(|c| &c.column_name == name)
    }
}

// Formats the table as a SQL CREATE TABLE statement.
impl fmt::Display for SchemaTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CREATE TABLE {} (", self.table_name)?;
        for (i, column) in self.columns.iter().enumerate() {
            write!(f, "  {} {}", column.column_name, column.column_type.base)?;
            if column.primary_key {
                write!(f, " PRIMARY KEY")?;
            }
            if !column.column_type.nullable && !column.primary_key {
                write!(f, " NOT NULL")?;
            }
            if i < self.columns.len() - 1 {
                writeln!(f, ",")?;
            }
        }
        writeln!(f, "\n)")
    }
}

/// The catalog the analyzer resolves names against: tables plus built-in
/// function signatures. Immutable during analysis, so it can be shared
/// freely across concurrent statement checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaModel {
    tables: Vec<SchemaTable>,
    functions: HashMap<Name, FunctionSignature>,
}

impl SchemaModel {
    /// An empty catalog with the default built-in function set.
    pub fn new() -> Self {
        SchemaModel {
            tables: Vec::new(),
            functions: builtin_functions(),
        }
    }

    pub fn with_table(mut self, table: SchemaTable) -> Self {
        self.tables.push(table);
        self
    }

    pub fn with_function(mut self, signature: FunctionSignature) -> Self {
        self.functions.insert(signature.name.clone(), signature);
        self
    }

    /// Looks up a table. Without an explicit schema qualifier the first
    /// table with a matching name wins, regardless of schema.
    pub fn find_table(&self, schema_name: Option<&Name>, table_name: &Name) -> Option<&SchemaTable> {
        self.tables.iter().find(|t| {
            &t.table_name == table_name
                && schema_name.is_none_or(|schema| &t.schema_name == schema)
        })
    }

    pub fn find_function(&self, name: &Name) -> Option<&FunctionSignature> {
        self.functions.get(name)
    }

    pub fn tables(&self) -> &[SchemaTable] {
        &self.tables
    }
}

impl Default for SchemaModel {
    fn default() -> Self {
        Self::new()
    }
}
