//! Built-in function signatures

use super::data_type::{BaseType, ColumnType};
use super::name::Name;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The declared type of a function argument or output: either a concrete
/// column type, or a type variable scoped to the signature. The same
/// variable name may appear in several positions; each call site
/// instantiates it with one fresh inference variable, which is how
/// `coalesce(a, b)` forces both arguments and the output to agree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArgumentType {
    Concrete(ColumnType),
    Variable(Name),
}

/// Signature of a built-in scalar or aggregate function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSignature {
    pub name: Name,
    pub fixed_arguments: Vec<ArgumentType>,
    pub variable_argument: Option<ArgumentType>,
    pub output: ArgumentType,
    pub allow_wildcard: bool,
    pub allow_distinct: bool,
}

impl FunctionSignature {
    pub fn new(name: impl Into<Name>, output: ArgumentType) -> Self {
        FunctionSignature {
            name: name.into(),
            fixed_arguments: Vec::new(),
            variable_argument: None,
            output,
            allow_wildcard: false,
            allow_distinct: false,
        }
    }

    pub fn fixed(mut self, argument: ArgumentType) -> Self {
        self.fixed_arguments.push(argument);
        self
    }

    pub fn variadic(mut self, argument: ArgumentType) -> Self {
        self.variable_argument = Some(argument);
        self
    }

    pub fn wildcard(mut self) -> Self {
        self.allow_wildcard = true;
        self
    }

    pub fn distinct(mut self) -> Self {
        self.allow_distinct = true;
        self
    }
}

fn var(name: &str) -> ArgumentType {
    ArgumentType::Variable(Name::new(name))
}

fn not_null(base: BaseType) -> ArgumentType {
    ArgumentType::Concrete(ColumnType::not_null(base))
}

fn nullable(base: BaseType) -> ArgumentType {
    ArgumentType::Concrete(ColumnType::nullable(base))
}

/// The default SQLite built-in catalog.
pub fn builtin_functions() -> HashMap<Name, FunctionSignature> {
    let signatures = vec![
        FunctionSignature::new("abs", var("a")).fixed(var("a")),
        FunctionSignature::new("coalesce", var("a"))
            .fixed(var("a"))
            .variadic(var("a")),
        FunctionSignature::new("count", not_null(BaseType::Integer))
            .fixed(var("a"))
            .wildcard()
            .distinct(),
        FunctionSignature::new("ifnull", var("a")).fixed(var("a")).fixed(var("a")),
        FunctionSignature::new("instr", nullable(BaseType::Integer))
            .fixed(nullable(BaseType::String))
            .fixed(nullable(BaseType::String)),
        FunctionSignature::new("length", nullable(BaseType::Integer))
            .fixed(nullable(BaseType::String)),
        FunctionSignature::new("lower", nullable(BaseType::String))
            .fixed(nullable(BaseType::String)),
        FunctionSignature::new("upper", nullable(BaseType::String))
            .fixed(nullable(BaseType::String)),
        FunctionSignature::new("ltrim", nullable(BaseType::String))
            .fixed(nullable(BaseType::String))
            .variadic(nullable(BaseType::String)),
        FunctionSignature::new("rtrim", nullable(BaseType::String))
            .fixed(nullable(BaseType::String))
            .variadic(nullable(BaseType::String)),
        FunctionSignature::new("trim", nullable(BaseType::String))
            .fixed(nullable(BaseType::String))
            .variadic(nullable(BaseType::String)),
        FunctionSignature::new("max", var("a")).fixed(var("a")).distinct(),
        FunctionSignature::new("min", var("a")).fixed(var("a")).distinct(),
        FunctionSignature::new("nullif", nullable(BaseType::Any))
            .fixed(var("a"))
            .fixed(var("a")),
        FunctionSignature::new("random", not_null(BaseType::Integer)),
        FunctionSignature::new("replace", nullable(BaseType::String))
            .fixed(nullable(BaseType::String))
            .fixed(nullable(BaseType::String))
            .fixed(nullable(BaseType::String)),
        FunctionSignature::new("round", nullable(BaseType::Float))
            .fixed(nullable(BaseType::Number))
            .variadic(nullable(BaseType::Integer)),
        FunctionSignature::new("substr", nullable(BaseType::String))
            .fixed(nullable(BaseType::String))
            .fixed(nullable(BaseType::Integer))
            .variadic(nullable(BaseType::Integer)),
        FunctionSignature::new("sum", var("a")).fixed(var("a")).distinct(),
        FunctionSignature::new("total", not_null(BaseType::Float))
            .fixed(nullable(BaseType::Number))
            .distinct(),
        FunctionSignature::new("avg", nullable(BaseType::Float))
            .fixed(nullable(BaseType::Number))
            .distinct(),
        FunctionSignature::new("group_concat", nullable(BaseType::String))
            .fixed(var("a"))
            .variadic(nullable(BaseType::String))
            .distinct(),
        FunctionSignature::new("typeof", not_null(BaseType::String)).fixed(var("a")),
        FunctionSignature::new("date", nullable(BaseType::DateTime))
            .fixed(nullable(BaseType::Any))
            .variadic(nullable(BaseType::String)),
        FunctionSignature::new("time", nullable(BaseType::DateTime))
            .fixed(nullable(BaseType::Any))
            .variadic(nullable(BaseType::String)),
        FunctionSignature::new("datetime", nullable(BaseType::DateTime))
            .fixed(nullable(BaseType::Any))
            .variadic(nullable(BaseType::String)),
        FunctionSignature::new("julianday", nullable(BaseType::Float))
            .fixed(nullable(BaseType::Any))
            .variadic(nullable(BaseType::String)),
        FunctionSignature::new("strftime", nullable(BaseType::String))
            .fixed(nullable(BaseType::String))
            .fixed(nullable(BaseType::Any))
            .variadic(nullable(BaseType::String)),
    ];

    signatures
        .into_iter()
        .map(|s| (s.name.clone(), s))
        .collect()
}
