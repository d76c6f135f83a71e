//! Type inference: inferred types, unification variables, and the
//! per-statement inference context
//!
//! Every statement check owns one `InferenceContext`. Variables are
//! allocated from it, bindings are append-only, and unification refines
//! bindings as constraints are discovered while walking the tree.

use crate::error::Error;
use crate::types::data_type::{BaseType, ColumnType};
use crate::types::name::Name;
use std::collections::HashMap;

/// A unification variable, an index into the owning context's binding table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeVariable(usize);

/// A type as known so far during inference.
#[derive(Debug, Clone, PartialEq)]
pub enum InferredType {
    /// Fully known.
    Concrete(ColumnType),
    /// An unknown, possibly bound in the context.
    Variable(TypeVariable),
    /// Base type fixed, nullability inherited from `parent` at concretion
    /// time. Comparison results use this: `a = b` is a Boolean that is null
    /// whenever its operands are.
    Dependent {
        parent: Box<InferredType>,
        base: BaseType,
    },
    /// Must unify with one of the listed concretes. Family constraints like
    /// "a number" are expressed this way.
    OneOf(Vec<ColumnType>),
}

impl InferredType {
    /// The constraint family for a base type: both nullabilities, non-null
    /// first so it wins as the concretion default.
    pub fn family(base: BaseType) -> Self {
        InferredType::OneOf(vec![ColumnType::not_null(base), ColumnType::nullable(base)])
    }

    pub fn any() -> Self {
        Self::family(BaseType::Any)
    }

    pub fn string() -> Self {
        Self::family(BaseType::String)
    }

    pub fn number() -> Self {
        Self::family(BaseType::Number)
    }

    pub fn integer() -> Self {
        Self::family(BaseType::Integer)
    }

    pub fn boolean() -> Self {
        Self::family(BaseType::Boolean)
    }

    pub fn dependent(parent: InferredType, base: BaseType) -> Self {
        InferredType::Dependent {
            parent: Box::new(parent),
            base,
        }
    }
}

impl From<ColumnType> for InferredType {
    fn from(column_type: ColumnType) -> Self {
        InferredType::Concrete(column_type)
    }
}

/// Inference state for a single statement check.
#[derive(Debug, Default)]
pub struct InferenceContext {
    /// Bindings keyed by variable id. Append-only; a binding is only ever
    /// replaced by a refinement of itself.
    bindings: Vec<Option<InferredType>>,
    /// Bind-parameter variables, so every mention of `:x` shares one type.
    parameters: HashMap<Name, TypeVariable>,
}

impl InferenceContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh unbound variable.
    pub fn anonymous_variable(&mut self) -> InferredType {
        let variable = TypeVariable(self.bindings.len());
        self.bindings.push(None);
        InferredType::Variable(variable)
    }

    /// The variable for a bind parameter. Idempotent: the same name yields
    /// the same variable for the lifetime of this context.
    pub fn variable(&mut self, parameter: &Name) -> InferredType {
        if let Some(variable) = self.parameters.get(parameter) {
            return InferredType::Variable(*variable);
        }
        let variable = TypeVariable(self.bindings.len());
        self.bindings.push(None);
        self.parameters.insert(parameter.clone(), variable);
        InferredType::Variable(variable)
    }

    /// Follows variable-to-variable bindings to the representative.
    fn find(&self, mut variable: TypeVariable) -> TypeVariable {
        while let Some(InferredType::Variable(next)) = &self.bindings[variable.0] {
            variable = *next;
        }
        variable
    }

    /// Computes the most general type refining both inputs, updating
    /// variable bindings along the way. Fails on conflicting bases.
    pub fn unify(&mut self, left: &InferredType, right: &InferredType) -> Result<InferredType, Error> {
        use InferredType::*;

        match (left, right) {
            (Variable(l), Variable(r)) => {
                let left_root = self.find(*l);
                let right_root = self.find(*r);
                if left_root == right_root {
                    return Ok(Variable(left_root));
                }
                let left_bound = self.bindings[left_root.0].clone();
                let right_bound = self.bindings[right_root.0].clone();
                match (left_bound, right_bound) {
                    (None, _) => {
                        self.bindings[left_root.0] = Some(Variable(right_root));
                        Ok(Variable(right_root))
                    }
                    (Some(_), None) => {
                        self.bindings[right_root.0] = Some(Variable(left_root));
                        Ok(Variable(left_root))
                    }
                    (Some(left_bound), Some(right_bound)) => {
                        let merged = self.unify(&left_bound, &right_bound)?;
                        self.bindings[right_root.0] = Some(merged);
                        self.bindings[left_root.0] = Some(Variable(right_root));
                        Ok(Variable(right_root))
                    }
                }
            }

            (Variable(v), other) | (other, Variable(v)) => {
                let root = self.find(*v);
                match self.bindings[root.0].clone() {
                    None => self.bindings[root.0] = Some(other.clone()),
                    Some(bound) => {
                        let merged = self.unify(&bound, other)?;
                        self.bindings[root.0] = Some(merged);
                    }
                }
                Ok(Variable(root))
            }

            (Concrete(a), Concrete(b)) => match a.unify(*b) {
                Some(unified) => Ok(Concrete(unified)),
                None => Err(self.conflict(left, right)),
            },

            (Dependent { parent: lp, base: lb }, Dependent { base: rb, .. }) => {
                match lb.unify(*rb) {
                    Some(base) => Ok(Dependent {
                        parent: lp.clone(),
                        base,
                    }),
                    None => Err(self.conflict(left, right)),
                }
            }

            (Dependent { parent, base }, Concrete(c)) | (Concrete(c), Dependent { parent, base }) => {
                let Some(base) = base.unify(c.base) else {
                    return Err(self.conflict(left, right));
                };
                let parent = if c.nullable {
                    // Propagate the nullability into the parent; Any leaves
                    // the parent's base untouched.
                    Box::new(self.unify(parent, &Concrete(ColumnType::nullable(BaseType::Any)))?)
                } else {
                    parent.clone()
                };
                Ok(Dependent { parent, base })
            }

            (Dependent { parent, base }, OneOf(members))
            | (OneOf(members), Dependent { parent, base }) => {
                let mut bases: Vec<BaseType> = Vec::new();
                for member in members {
                    if let Some(unified) = base.unify(member.base)
                        && !bases.contains(&unified)
                    {
                        bases.push(unified);
                    }
                }
                match bases.as_slice() {
                    [] => Err(self.conflict(left, right)),
                    [only] => Ok(Dependent {
                        parent: parent.clone(),
                        base: *only,
                    }),
                    _ => Ok(Dependent {
                        parent: parent.clone(),
                        base: *base,
                    }),
                }
            }

            (OneOf(members), Concrete(c)) | (Concrete(c), OneOf(members)) => {
                let mut filtered: Vec<ColumnType> = Vec::new();
                for member in members {
                    if let Some(unified) = member.unify(*c)
                        && !filtered.contains(&unified)
                    {
                        filtered.push(unified);
                    }
                }
                self.narrowed(filtered, left, right)
            }

            (OneOf(a), OneOf(b)) => {
                let mut filtered: Vec<ColumnType> = Vec::new();
                for x in a {
                    for y in b {
                        if let Some(unified) = x.unify(*y)
                            && !filtered.contains(&unified)
                        {
                            filtered.push(unified);
                        }
                    }
                }
                self.narrowed(filtered, left, right)
            }
        }
    }

    /// Imposes a base-type constraint without changing nullability.
    pub fn unify_base(
        &mut self,
        inferred: &InferredType,
        base: BaseType,
    ) -> Result<InferredType, Error> {
        self.unify(inferred, &InferredType::family(base))
    }

    /// Left fold of `unify` with seed `Any`. The first error wins.
    pub fn unify_all<'a>(
        &mut self,
        types: impl IntoIterator<Item = &'a InferredType>,
    ) -> Result<InferredType, Error> {
        let mut unified = InferredType::any();
        for inferred in types {
            unified = self.unify(&unified, inferred)?;
        }
        Ok(unified)
    }

    /// Resolves an inferred type to a concrete column type. Unbound
    /// variables default to nullable `Any`; constraint sets default to
    /// their first member.
    pub fn concrete(&self, inferred: &InferredType) -> ColumnType {
        match inferred {
            InferredType::Concrete(column_type) => *column_type,
            InferredType::Variable(v) => {
                let root = self.find(*v);
                match &self.bindings[root.0] {
                    None => ColumnType::nullable(BaseType::Any),
                    Some(bound) => self.concrete(bound),
                }
            }
            InferredType::OneOf(members) => members[0],
            InferredType::Dependent { parent, base } => {
                ColumnType::new(*base, self.concrete(parent).nullable)
            }
        }
    }

    fn narrowed(
        &self,
        filtered: Vec<ColumnType>,
        left: &InferredType,
        right: &InferredType,
    ) -> Result<InferredType, Error> {
        match filtered.as_slice() {
            [] => Err(self.conflict(left, right)),
            [only] => Ok(InferredType::Concrete(*only)),
            _ => Ok(InferredType::OneOf(filtered)),
        }
    }

    fn conflict(&self, left: &InferredType, right: &InferredType) -> Error {
        Error::TypeConflict {
            left: self.describe(left),
            right: self.describe(right),
        }
    }

    /// A human-readable rendering for conflict messages.
    pub fn describe(&self, inferred: &InferredType) -> String {
        match inferred {
            InferredType::Concrete(column_type) => column_type.to_string(),
            InferredType::Variable(v) => {
                let root = self.find(*v);
                match &self.bindings[root.0] {
                    None => BaseType::Any.to_string(),
                    Some(bound) => self.describe(bound),
                }
            }
            InferredType::Dependent { base, .. } => base.to_string(),
            InferredType::OneOf(members) => {
                let mut bases: Vec<String> = Vec::new();
                for member in members {
                    let rendered = member.base.to_string();
                    if !bases.contains(&rendered) {
                        bases.push(rendered);
                    }
                }
                bases.join(" | ")
            }
        }
    }
}
