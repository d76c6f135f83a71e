//! Expression type inference

use super::inference::InferredType;
use super::query::QueryChecker;
use super::scope::SelectScope;
use crate::error::{Error, Result};
use crate::parsing::ast::{
    BinaryOp, Expression, ExpressionKind, FunctionArguments, InSet, Literal, SourceInfo, UnaryOp,
};
use crate::types::data_type::{BaseType, ColumnType};
use crate::types::functions::ArgumentType;
use crate::types::name::Name;
use std::collections::HashMap;

impl<'m> QueryChecker<'m> {
    /// Infers the type of an expression under the given scope.
    pub(super) fn infer_expression(
        &mut self,
        scope: &SelectScope<'_>,
        expr: &Expression,
    ) -> Result<InferredType> {
        let span = expr.span;
        match &expr.kind {
            ExpressionKind::Literal(literal) => Ok(Self::literal_type(literal)),

            ExpressionKind::BindParameter(name) => Ok(self.cx.variable(name)),

            ExpressionKind::Column { table, name } => scope
                .resolve_column(table.as_ref(), name)
                .map(|column| column.inferred_type.clone())
                .map_err(|e| e.at(span)),

            ExpressionKind::Cast { expr: operand, target } => {
                let operand_type = self.infer_expression(scope, operand)?;
                Ok(InferredType::dependent(operand_type, *target))
            }

            ExpressionKind::Collate { expr: operand, .. } => {
                let operand_type = self.infer_expression(scope, operand)?;
                self.cx
                    .unify_base(&operand_type, BaseType::String)
                    .map_err(|e| e.at(span))
            }

            ExpressionKind::Function { name, arguments } => {
                self.infer_function(scope, name, arguments, span)
            }

            ExpressionKind::Similarity {
                input,
                pattern,
                escape,
                ..
            } => {
                let input_type = self.infer_expression(scope, input)?;
                let input_type = self
                    .cx
                    .unify_base(&input_type, BaseType::String)
                    .map_err(|e| e.at(input.span))?;
                let pattern_type = self.infer_expression(scope, pattern)?;
                let pattern_type = self
                    .cx
                    .unify_base(&pattern_type, BaseType::String)
                    .map_err(|e| e.at(pattern.span))?;
                if let Some(escape) = escape {
                    let escape_type = self.infer_expression(scope, escape)?;
                    self.cx
                        .unify_base(&escape_type, BaseType::String)
                        .map_err(|e| e.at(escape.span))?;
                }
                let joined = self
                    .cx
                    .unify(&input_type, &pattern_type)
                    .map_err(|e| e.at(span))?;
                Ok(InferredType::dependent(joined, BaseType::Boolean))
            }

            ExpressionKind::Binary { op, left, right } => {
                self.infer_binary(scope, *op, left, right, span)
            }

            ExpressionKind::Unary { op, operand } => match op {
                UnaryOp::Negate | UnaryOp::BitNot => {
                    self.infer_unary(scope, operand, BaseType::Number)
                }
                UnaryOp::Not => self.infer_unary(scope, operand, BaseType::Boolean),
                UnaryOp::IsNull | UnaryOp::NotNull => {
                    // Never null itself, whatever the operand is.
                    self.infer_expression(scope, operand)?;
                    Ok(InferredType::Concrete(ColumnType::not_null(
                        BaseType::Boolean,
                    )))
                }
            },

            ExpressionKind::Between {
                input, low, high, ..
            } => {
                let input_type = self.infer_expression(scope, input)?;
                let low_type = self.infer_expression(scope, low)?;
                let high_type = self.infer_expression(scope, high)?;
                let unified = self
                    .cx
                    .unify_all([&input_type, &low_type, &high_type])
                    .map_err(|e| e.at(span))?;
                Ok(InferredType::dependent(unified, BaseType::Boolean))
            }

            ExpressionKind::In { input, set, .. } => self.infer_in(scope, input, set, span),

            ExpressionKind::Exists(select) => {
                // Only existence matters; the inner columns are discarded.
                self.infer_query(scope, select)?;
                Ok(InferredType::Concrete(ColumnType::not_null(
                    BaseType::Boolean,
                )))
            }

            ExpressionKind::Case {
                input,
                whens,
                r#else,
            } => self.infer_case(scope, input.as_deref(), whens, r#else.as_deref(), span),

            ExpressionKind::ScalarSubquery(select) => {
                let query = self.infer_query(scope, select)?;
                if query.columns.len() != 1 {
                    return Err(Error::SubqueryWidth(query.columns.len()).at(span));
                }
                Ok(query.columns[0].inferred_type.clone())
            }

            ExpressionKind::Raise(_) => Ok(InferredType::any()),
        }
    }

    /// Infers an expression and constrains its base type, discarding the
    /// result.
    pub(super) fn require_expression(
        &mut self,
        scope: &SelectScope<'_>,
        expr: &Expression,
        base: BaseType,
    ) -> Result<()> {
        let inferred = self.infer_expression(scope, expr)?;
        self.cx
            .unify_base(&inferred, base)
            .map_err(|e| e.at(expr.span))?;
        Ok(())
    }

    fn literal_type(literal: &Literal) -> InferredType {
        let column_type = match literal {
            Literal::Null => ColumnType::nullable(BaseType::Any),
            Literal::Integer(_) => ColumnType::not_null(BaseType::Integer),
            Literal::Float(_) => ColumnType::not_null(BaseType::Float),
            Literal::String(_) => ColumnType::not_null(BaseType::String),
            Literal::Blob(_) => ColumnType::not_null(BaseType::Blob),
            Literal::CurrentTime | Literal::CurrentDate | Literal::CurrentTimestamp => {
                ColumnType::not_null(BaseType::DateTime)
            }
        };
        InferredType::Concrete(column_type)
    }

    fn infer_unary(
        &mut self,
        scope: &SelectScope<'_>,
        operand: &Expression,
        base: BaseType,
    ) -> Result<InferredType> {
        let operand_type = self.infer_expression(scope, operand)?;
        self.cx
            .unify_base(&operand_type, base)
            .map_err(|e| e.at(operand.span))
    }

    fn infer_binary(
        &mut self,
        scope: &SelectScope<'_>,
        op: BinaryOp,
        left: &Expression,
        right: &Expression,
        span: SourceInfo,
    ) -> Result<InferredType> {
        use BinaryOp::*;

        match op {
            Concatenate => self.infer_binary_constrained(scope, left, right, BaseType::String, span),

            Multiply | Divide | Add | Subtract => {
                self.infer_binary_constrained(scope, left, right, BaseType::Number, span)
            }

            Modulo | ShiftLeft | ShiftRight | BitAnd | BitOr => {
                self.infer_binary_constrained(scope, left, right, BaseType::Integer, span)
            }

            LessThan | LessThanOrEqual | GreaterThan | GreaterThanOrEqual | Equal | NotEqual
            | Is | IsNot => {
                let left_type = self.infer_expression(scope, left)?;
                let right_type = self.infer_expression(scope, right)?;
                let joined = self
                    .cx
                    .unify(&left_type, &right_type)
                    .map_err(|e| e.at(span))?;
                Ok(InferredType::dependent(joined, BaseType::Boolean))
            }

            And | Or => self.infer_binary_constrained(scope, left, right, BaseType::Boolean, span),
        }
    }

    /// Both operands constrained to `base`, result is their unification.
    fn infer_binary_constrained(
        &mut self,
        scope: &SelectScope<'_>,
        left: &Expression,
        right: &Expression,
        base: BaseType,
        span: SourceInfo,
    ) -> Result<InferredType> {
        let left_type = self.infer_expression(scope, left)?;
        let left_type = self
            .cx
            .unify_base(&left_type, base)
            .map_err(|e| e.at(left.span))?;
        let right_type = self.infer_expression(scope, right)?;
        let right_type = self
            .cx
            .unify_base(&right_type, base)
            .map_err(|e| e.at(right.span))?;
        self.cx
            .unify(&left_type, &right_type)
            .map_err(|e| e.at(span))
    }

    fn infer_function(
        &mut self,
        scope: &SelectScope<'_>,
        name: &Name,
        arguments: &FunctionArguments,
        span: SourceInfo,
    ) -> Result<InferredType> {
        let signature = scope
            .model
            .find_function(name)
            .ok_or_else(|| Error::FunctionNotFound(name.to_string()).at(span))?
            .clone();

        // Signature type variables are instantiated per call, so every
        // mention of the same variable shares one fresh inference variable.
        let mut substitutions: HashMap<Name, InferredType> = HashMap::new();

        match arguments {
            FunctionArguments::Wildcard => {
                if !signature.allow_wildcard {
                    return Err(Error::WildcardNotAllowed(name.to_string()).at(span));
                }
                Ok(self.instantiate(&mut substitutions, &signature.output))
            }
            FunctionArguments::Expressions {
                distinct,
                arguments,
            } => {
                if *distinct && !signature.allow_distinct {
                    return Err(Error::DistinctNotAllowed(name.to_string()).at(span));
                }
                if arguments.len() < signature.fixed_arguments.len() {
                    return Err(Error::FunctionArity {
                        name: name.to_string(),
                        expected: signature.fixed_arguments.len(),
                        found: arguments.len(),
                    }
                    .at(span));
                }
                for (actual, expected) in arguments.iter().zip(&signature.fixed_arguments) {
                    let actual_type = self.infer_expression(scope, actual)?;
                    let expected_type = self.instantiate(&mut substitutions, expected);
                    self.cx
                        .unify(&actual_type, &expected_type)
                        .map_err(|e| e.at(actual.span))?;
                }
                for extra in &arguments[signature.fixed_arguments.len()..] {
                    let Some(variadic) = &signature.variable_argument else {
                        return Err(Error::FunctionArity {
                            name: name.to_string(),
                            expected: signature.fixed_arguments.len(),
                            found: arguments.len(),
                        }
                        .at(span));
                    };
                    let actual_type = self.infer_expression(scope, extra)?;
                    let expected_type = self.instantiate(&mut substitutions, variadic);
                    self.cx
                        .unify(&actual_type, &expected_type)
                        .map_err(|e| e.at(extra.span))?;
                }
                Ok(self.instantiate(&mut substitutions, &signature.output))
            }
        }
    }

    fn instantiate(
        &mut self,
        substitutions: &mut HashMap<Name, InferredType>,
        argument: &ArgumentType,
    ) -> InferredType {
        match argument {
            ArgumentType::Concrete(column_type) => InferredType::Concrete(*column_type),
            ArgumentType::Variable(name) => substitutions
                .entry(name.clone())
                .or_insert_with(|| self.cx.anonymous_variable())
                .clone(),
        }
    }

    fn infer_in(
        &mut self,
        scope: &SelectScope<'_>,
        input: &Expression,
        set: &InSet,
        span: SourceInfo,
    ) -> Result<InferredType> {
        let input_type = self.infer_expression(scope, input)?;
        match set {
            InSet::List(items) => {
                let mut element = InferredType::any();
                for item in items {
                    let item_type = self.infer_expression(scope, item)?;
                    element = self
                        .cx
                        .unify(&element, &item_type)
                        .map_err(|e| e.at(item.span))?;
                }
                self.cx
                    .unify(&input_type, &element)
                    .map_err(|e| e.at(span))?;
            }
            InSet::Query(select) => {
                let query = self.infer_query(scope, select)?;
                if query.columns.len() != 1 {
                    return Err(Error::SubqueryWidth(query.columns.len()).at(span));
                }
                self.cx
                    .unify(&input_type, &query.columns[0].inferred_type)
                    .map_err(|e| e.at(span))?;
            }
            InSet::Table(name) => {
                let reads = &mut self.reads;
                let query = scope
                    .resolve_table_reference(name, &mut |table| reads.record(table))
                    .map_err(|e| e.at(name.span))?;
                if query.columns.len() != 1 {
                    return Err(Error::SubqueryWidth(query.columns.len()).at(span));
                }
                self.cx
                    .unify(&input_type, &query.columns[0].inferred_type)
                    .map_err(|e| e.at(span))?;
            }
        }
        Ok(InferredType::dependent(input_type, BaseType::Boolean))
    }

    fn infer_case(
        &mut self,
        scope: &SelectScope<'_>,
        input: Option<&Expression>,
        whens: &[(Expression, Expression)],
        r#else: Option<&Expression>,
        span: SourceInfo,
    ) -> Result<InferredType> {
        let mut output = InferredType::any();
        match input {
            None => {
                for (condition, branch) in whens {
                    self.require_expression(scope, condition, BaseType::Boolean)?;
                    let branch_type = self.infer_expression(scope, branch)?;
                    output = self
                        .cx
                        .unify(&output, &branch_type)
                        .map_err(|e| e.at(branch.span))?;
                }
            }
            Some(input) => {
                let mut input_type = self.infer_expression(scope, input)?;
                for (key, branch) in whens {
                    let key_type = self.infer_expression(scope, key)?;
                    input_type = self
                        .cx
                        .unify(&input_type, &key_type)
                        .map_err(|e| e.at(key.span))?;
                    let branch_type = self.infer_expression(scope, branch)?;
                    output = self
                        .cx
                        .unify(&output, &branch_type)
                        .map_err(|e| e.at(branch.span))?;
                }
            }
        }
        match r#else {
            Some(r#else) => {
                let else_type = self.infer_expression(scope, r#else)?;
                output = self
                    .cx
                    .unify(&output, &else_type)
                    .map_err(|e| e.at(r#else.span))?;
            }
            None => {
                // No ELSE means the whole expression can fall through to
                // NULL.
                output = self
                    .cx
                    .unify(
                        &output,
                        &InferredType::Concrete(ColumnType::nullable(BaseType::Any)),
                    )
                    .map_err(|e| e.at(span))?;
            }
        }
        Ok(output)
    }
}
