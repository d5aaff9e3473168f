//! Expression compilation into evaluators.

use super::binding::Binding;
use super::ops;
use crate::ast::{Expr, Operator, Path};
use crate::error::{QueryError, QueryResult};
use alloc::vec::Vec;
use sift_core::Value;

/// An expression with every path and parameter resolved to a binding slot.
#[derive(Clone, Debug, PartialEq)]
enum Compiled {
    Constant(Value),
    Field { slot: usize, index: usize },
    Param { slot: usize },
    Operation { op: Operator, args: Vec<Compiled> },
}

impl Compiled {
    fn eval(&self, bindings: &[Binding]) -> QueryResult<Value> {
        match self {
            Compiled::Constant(value) => Ok(value.clone()),
            Compiled::Field { slot, index } => {
                let row = Binding::element_at(bindings, *slot)?;
                Ok(row.field(*index)?.clone())
            }
            Compiled::Param { slot } => Binding::value_at(bindings, *slot).cloned(),
            Compiled::Operation { op, args } => eval_operation(*op, args, bindings),
        }
    }
}

fn eval_operation(op: Operator, args: &[Compiled], bindings: &[Binding]) -> QueryResult<Value> {
    match op {
        Operator::And => {
            for arg in args {
                if !arg.eval(bindings)?.truthy()? {
                    return Ok(Value::Boolean(false));
                }
            }
            Ok(Value::Boolean(true))
        }
        Operator::Or => {
            for arg in args {
                if arg.eval(bindings)?.truthy()? {
                    return Ok(Value::Boolean(true));
                }
            }
            Ok(Value::Boolean(false))
        }
        Operator::Not => Ok(Value::Boolean(!args[0].eval(bindings)?.truthy()?)),
        Operator::IsNull => Ok(Value::Boolean(args[0].eval(bindings)?.is_null())),
        Operator::IsNotNull => Ok(Value::Boolean(!args[0].eval(bindings)?.is_null())),
        Operator::In => {
            let needle = args[0].eval(bindings)?;
            for candidate in &args[1..] {
                if candidate.eval(bindings)? == needle {
                    return Ok(Value::Boolean(true));
                }
            }
            Ok(Value::Boolean(false))
        }
        Operator::Eq | Operator::Ne | Operator::Lt | Operator::Le | Operator::Gt | Operator::Ge => {
            let left = args[0].eval(bindings)?;
            let right = args[1].eval(bindings)?;
            Ok(Value::Boolean(ops::compare(op, &left, &right)))
        }
        Operator::Add | Operator::Sub | Operator::Mul | Operator::Div | Operator::Mod => {
            let left = args[0].eval(bindings)?;
            let right = args[1].eval(bindings)?;
            ops::arithmetic(op, left, right)
        }
    }
}

/// Evaluator of an expression that reads no binding slot.
///
/// Its value is the same on every call, so it is evaluated without bindings.
#[derive(Clone, Debug, PartialEq)]
pub struct StaticEvaluator {
    expr: Compiled,
}

impl StaticEvaluator {
    /// Evaluates the expression.
    pub fn evaluate(&self) -> QueryResult<Value> {
        self.expr.eval(&[])
    }
}

/// Evaluator of an expression that reads at least one binding slot.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundEvaluator {
    expr: Compiled,
    /// Sorted, distinct slots read by the expression.
    dependencies: Vec<usize>,
}

impl BoundEvaluator {
    /// Evaluates the expression against a binding vector.
    pub fn evaluate(&self, bindings: &[Binding]) -> QueryResult<Value> {
        self.expr.eval(bindings)
    }

    /// Returns the slots the expression reads.
    pub fn dependencies(&self) -> &[usize] {
        &self.dependencies
    }
}

/// A compiled expression, tagged by whether it needs bindings.
#[derive(Clone, Debug, PartialEq)]
pub enum Evaluator {
    /// Constant-evaluable: no bindings needed.
    Static(StaticEvaluator),
    /// Binding-dependent: must be evaluated with bindings.
    Bound(BoundEvaluator),
}

impl Evaluator {
    /// Evaluates the expression; static evaluators ignore `bindings`.
    pub fn evaluate_with(&self, bindings: &[Binding]) -> QueryResult<Value> {
        match self {
            Evaluator::Static(ev) => ev.evaluate(),
            Evaluator::Bound(ev) => ev.evaluate(bindings),
        }
    }

    /// Returns the binding slots the expression reads; empty for static evaluators.
    pub fn dependencies(&self) -> &[usize] {
        match self {
            Evaluator::Static(_) => &[],
            Evaluator::Bound(ev) => ev.dependencies(),
        }
    }

    /// Returns true if the evaluator needs no bindings.
    pub fn is_static(&self) -> bool {
        matches!(self, Evaluator::Static(_))
    }

    /// Returns the static evaluator, if this is one.
    pub fn as_static(&self) -> Option<&StaticEvaluator> {
        match self {
            Evaluator::Static(ev) => Some(ev),
            Evaluator::Bound(_) => None,
        }
    }
}

/// Compiles `target` against the ordered source expressions `sources`.
///
/// Each source is either a root path (bound to an element) or a parameter
/// (bound to a value); its position is the binding slot it reads. Paths rooted
/// outside `sources`, undeclared parameters and operators with the wrong number of
/// arguments are rejected here rather than at evaluation time.
pub fn compile(sources: &[Expr], target: &Expr) -> QueryResult<Evaluator> {
    let mut dependencies = Vec::new();
    let expr = compile_expr(sources, target, &mut dependencies)?;
    if dependencies.is_empty() {
        return Ok(Evaluator::Static(StaticEvaluator { expr }));
    }
    dependencies.sort_unstable();
    dependencies.dedup();
    Ok(Evaluator::Bound(BoundEvaluator { expr, dependencies }))
}

fn compile_expr(sources: &[Expr], expr: &Expr, deps: &mut Vec<usize>) -> QueryResult<Compiled> {
    match expr {
        Expr::Constant(value) => Ok(Compiled::Constant(value.clone())),
        Expr::Path(Path::Root(name)) => Err(QueryError::NotAValue(name.clone())),
        Expr::Path(Path::Field { root, index, .. }) => {
            let slot = root_slot(sources, root)
                .ok_or_else(|| QueryError::UnknownSource(root.clone()))?;
            deps.push(slot);
            Ok(Compiled::Field {
                slot,
                index: *index,
            })
        }
        Expr::Param(name) => {
            let slot = sources
                .iter()
                .position(|s| matches!(s, Expr::Param(p) if p == name))
                .ok_or_else(|| QueryError::UnknownParam(name.clone()))?;
            deps.push(slot);
            Ok(Compiled::Param { slot })
        }
        Expr::Operation { op, args } => {
            if !op.accepts(args.len()) {
                return Err(QueryError::Arity {
                    op: *op,
                    got: args.len(),
                });
            }
            let args = args
                .iter()
                .map(|arg| compile_expr(sources, arg, deps))
                .collect::<QueryResult<Vec<_>>>()?;
            Ok(Compiled::Operation { op: *op, args })
        }
    }
}

/// Returns the slot of the root source named `name`.
pub(crate) fn root_slot(sources: &[Expr], name: &str) -> Option<usize> {
    sources
        .iter()
        .position(|s| matches!(s, Expr::Path(Path::Root(r)) if r == name))
}
