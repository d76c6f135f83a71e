//! The column type lattice

use serde::{Deserialize, Serialize};
use std::fmt;

/// Base (storage-class) types. `Any` is the top of the lattice, `Number`
/// sits above `Integer` and `Float`, the remaining types are incomparable
/// leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaseType {
    Integer,
    Float,
    Number,
    String,
    Blob,
    Boolean,
    DateTime,
    DateTimeOffset,
    Any,
}

impl BaseType {
    /// The meet of two base types, or `None` when they conflict.
    pub fn unify(self, other: BaseType) -> Option<BaseType> {
        use BaseType::*;
        match (self, other) {
            (a, b) if a == b => Some(a),
            (Any, t) | (t, Any) => Some(t),
            (Number, Integer) | (Integer, Number) => Some(Integer),
            (Number, Float) | (Float, Number) => Some(Float),
            _ => None,
        }
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseType::Integer => write!(f, "INTEGER"),
            BaseType::Float => write!(f, "FLOAT"),
            BaseType::Number => write!(f, "NUMBER"),
            BaseType::String => write!(f, "TEXT"),
            BaseType::Blob => write!(f, "BLOB"),
            BaseType::Boolean => write!(f, "BOOLEAN"),
            BaseType::DateTime => write!(f, "DATETIME"),
            BaseType::DateTimeOffset => write!(f, "DATETIMEOFFSET"),
            BaseType::Any => write!(f, "ANY"),
        }
    }
}

/// A fully-known column type: a base type plus nullability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnType {
    pub base: BaseType,
    pub nullable: bool,
}

impl ColumnType {
    pub fn new(base: BaseType, nullable: bool) -> Self {
        ColumnType { base, nullable }
    }

    pub fn not_null(base: BaseType) -> Self {
        ColumnType {
            base,
            nullable: false,
        }
    }

    pub fn nullable(base: BaseType) -> Self {
        ColumnType {
            base,
            nullable: true,
        }
    }

    /// Unifies two concrete types: the base meet with the nullability
    /// disjunction. `None` when the bases conflict.
    pub fn unify(self, other: ColumnType) -> Option<ColumnType> {
        self.base.unify(other.base).map(|base| ColumnType {
            base,
            nullable: self.nullable || other.nullable,
        })
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)?;
        if !self.nullable {
            write!(f, " NOT NULL")?;
        }
        Ok(())
    }
}
