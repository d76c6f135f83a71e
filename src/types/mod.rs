//! Core data model: identifiers, the type lattice, and the schema catalog

pub mod data_type;
pub mod functions;
pub mod name;
pub mod schema;

pub use data_type::{BaseType, ColumnType};
pub use functions::{ArgumentType, FunctionSignature};
pub use name::Name;
pub use schema::{SchemaColumn, SchemaModel, SchemaTable};
