//! Nested-loop query runner over indexed contexts.

use super::QueryPlan;
use crate::ast::{Expr, OperationRegistry, Path};
use crate::config::IndexConfig;
use crate::context::{IndexSupport, IndexedContext};
use crate::error::{QueryError, QueryResult};
use crate::eval::{compile, Binding, Evaluator};
use crate::source::ElementSource;
use alloc::format;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::iter;
use log::debug;
use sift_core::{Row, Value};

/// Runs query plans over a fixed list of roots and parameters.
///
/// The runner owns the root context of its context tree, so index builds made
/// for one plan are reused by every later plan pinning the same path.
#[derive(Debug)]
pub struct QueryRunner {
    context: Rc<IndexedContext>,
    roots: usize,
    params: usize,
}

/// One execution: the specialized context and the compiled condition.
struct Execution<'a> {
    context: &'a IndexedContext,
    condition: Option<Evaluator>,
    roots: usize,
}

impl QueryRunner {
    /// Creates a runner with the default operation registry and configuration.
    pub fn new(source: Rc<dyn ElementSource>, roots: Vec<Path>, params: Vec<&str>) -> Self {
        Self::with_config(
            source,
            roots,
            params,
            OperationRegistry::default(),
            IndexConfig::default(),
        )
    }

    /// Creates a runner with an explicit operation registry and configuration.
    pub fn with_config(
        source: Rc<dyn ElementSource>,
        roots: Vec<Path>,
        params: Vec<&str>,
        ops: OperationRegistry,
        config: IndexConfig,
    ) -> Self {
        let (root_count, param_count) = (roots.len(), params.len());
        let sources = roots
            .iter()
            .map(|root| Expr::Path(root.to_root()))
            .chain(params.into_iter().map(Expr::param))
            .collect();
        Self {
            context: Rc::new(IndexedContext::new(source, ops, sources).with_config(config)),
            roots: root_count,
            params: param_count,
        }
    }

    /// Returns the root context.
    pub fn context(&self) -> &Rc<IndexedContext> {
        &self.context
    }

    /// Runs `plan` and returns the projected rows in iteration order.
    pub fn list(&self, plan: &QueryPlan, params: &[Value]) -> QueryResult<Vec<Vec<Value>>> {
        let projection = plan
            .projection()
            .iter()
            .map(|expr| compile(self.context.sources(), expr))
            .collect::<QueryResult<Vec<_>>>()?;

        let mut rows = Vec::new();
        self.execute(plan.condition(), params, &mut |bindings| {
            rows.push(project(&projection, bindings)?);
            Ok(())
        })?;
        Ok(rows)
    }

    /// Runs `plan` and returns the number of matching binding tuples.
    pub fn count(&self, plan: &QueryPlan, params: &[Value]) -> QueryResult<usize> {
        let mut count = 0;
        self.execute(plan.condition(), params, &mut |_| {
            count += 1;
            Ok(())
        })?;
        Ok(count)
    }

    /// Returns the elements of a single-root runner matching `condition`.
    pub fn elements(&self, condition: Option<&Expr>, params: &[Value]) -> QueryResult<Vec<Rc<Row>>> {
        if self.roots != 1 {
            return Err(QueryError::InvalidQuery(format!(
                "elements needs exactly one root, runner has {}",
                self.roots
            )));
        }
        let mut elements = Vec::new();
        self.execute(condition, params, &mut |bindings| {
            if let Some(Binding::Element(row)) = bindings.first() {
                elements.push(Rc::clone(row));
            }
            Ok(())
        })?;
        Ok(elements)
    }

    fn execute(
        &self,
        condition: Option<&Expr>,
        params: &[Value],
        emit: &mut dyn FnMut(&[Binding]) -> QueryResult<()>,
    ) -> QueryResult<()> {
        if params.len() != self.params {
            return Err(QueryError::InvalidQuery(format!(
                "expected {} parameter(s), got {}",
                self.params,
                params.len()
            )));
        }

        let context = self.context.specialize(condition)?;
        let execution = Execution {
            context: &context,
            condition: condition
                .map(|cond| compile(context.sources(), cond))
                .transpose()?,
            roots: self.roots,
        };

        let mut bindings: Vec<Binding> = iter::repeat(Binding::Unbound)
            .take(self.roots)
            .chain(params.iter().cloned().map(Binding::Value))
            .collect();
        execution.descend(0, &mut bindings, emit)?;
        debug!(
            "executed query: {} of {} root(s) indexed",
            (0..self.roots)
                .filter(|&i| context.is_indexed(&context.sources()[i]))
                .count(),
            self.roots
        );
        Ok(())
    }
}

impl Execution<'_> {
    fn descend(
        &self,
        depth: usize,
        bindings: &mut [Binding],
        emit: &mut dyn FnMut(&[Binding]) -> QueryResult<()>,
    ) -> QueryResult<()> {
        if depth == self.roots {
            // Index lookups narrow the candidates; the full condition still decides.
            if let Some(condition) = &self.condition {
                if !condition.evaluate_with(bindings)?.truthy()? {
                    return Ok(());
                }
            }
            return emit(bindings);
        }

        let source = &self.context.sources()[depth];
        for element in self.context.resolve_with(source, bindings)? {
            bindings[depth] = Binding::Element(element?);
            self.descend(depth + 1, bindings, emit)?;
        }
        bindings[depth] = Binding::Unbound;
        Ok(())
    }
}

fn project(projection: &[Evaluator], bindings: &[Binding]) -> QueryResult<Vec<Value>> {
    if projection.is_empty() {
        let mut values = Vec::new();
        for binding in bindings {
            if let Binding::Element(row) = binding {
                values.extend(row.values().iter().cloned());
            }
        }
        return Ok(values);
    }
    projection
        .iter()
        .map(|expr| expr.evaluate_with(bindings))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::InMemorySource;
    use alloc::vec;

    fn source() -> Rc<InMemorySource> {
        Rc::new(
            InMemorySource::new()
                .with_collection(
                    "cat",
                    vec![
                        Row::new(1, vec![Value::from("tom"), Value::Int64(1)]),
                        Row::new(2, vec![Value::from("kit"), Value::Int64(2)]),
                        Row::new(3, vec![Value::from("max"), Value::Int64(1)]),
                    ],
                )
                .with_collection(
                    "owner",
                    vec![
                        Row::new(1, vec![Value::Int64(1), Value::from("ann")]),
                        Row::new(2, vec![Value::Int64(2), Value::from("bob")]),
                    ],
                ),
        )
    }

    fn cat_runner() -> QueryRunner {
        QueryRunner::new(source(), vec![Path::root("cat")], vec!["x"])
    }

    fn cat_owner() -> Expr {
        Expr::field("cat", "owner", 1)
    }

    #[test]
    fn test_list_with_literal_equality() {
        let runner = QueryRunner::new(source(), vec![Path::root("cat")], vec![]);
        let plan = QueryPlan::new()
            .filter(Expr::eq(cat_owner(), Expr::constant(1i64)))
            .select(vec![Expr::field("cat", "name", 0)]);

        let rows = runner.list(&plan, &[]).unwrap();
        assert_eq!(rows, vec![vec![Value::from("tom")], vec![Value::from("max")]]);
        assert_eq!(runner.context().cache().builds(), 1);
    }

    #[test]
    fn test_param_equality_reuses_index() {
        let runner = cat_runner();
        let plan = QueryPlan::new().filter(Expr::eq(cat_owner(), Expr::param("x")));

        assert_eq!(runner.count(&plan, &[Value::Int64(1)]).unwrap(), 2);
        assert_eq!(runner.count(&plan, &[Value::Int64(2)]).unwrap(), 1);
        assert_eq!(runner.count(&plan, &[Value::Int64(9)]).unwrap(), 0);
        assert_eq!(runner.context().cache().builds(), 1);
    }

    #[test]
    fn test_condition_is_reapplied() {
        let runner = cat_runner();
        let plan = QueryPlan::new().filter(Expr::and(
            Expr::eq(cat_owner(), Expr::param("x")),
            Expr::ne(Expr::field("cat", "name", 0), Expr::constant("tom")),
        ));
        let found = runner.elements(plan.condition(), &[Value::Int64(1)]).unwrap();
        assert_eq!(found.iter().map(|r| r.id()).collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn test_join_indexes_inner_root() {
        let runner = QueryRunner::new(
            source(),
            vec![Path::root("owner"), Path::root("cat")],
            vec![],
        );
        let plan = QueryPlan::new()
            .filter(Expr::eq(cat_owner(), Expr::field("owner", "id", 0)))
            .select(vec![Expr::field("owner", "name", 1), Expr::field("cat", "name", 0)]);

        let rows = runner.list(&plan, &[]).unwrap();
        assert_eq!(
            rows,
            vec![
                vec![Value::from("ann"), Value::from("tom")],
                vec![Value::from("ann"), Value::from("max")],
                vec![Value::from("bob"), Value::from("kit")],
            ]
        );
        assert_eq!(
            runner.context().cache().paths(),
            vec![Path::field("cat", "owner", 1)]
        );
    }

    #[test]
    fn test_empty_projection_returns_all_fields() {
        let runner = QueryRunner::new(source(), vec![Path::root("owner")], vec![]);
        let rows = runner.list(&QueryPlan::new(), &[]).unwrap();
        assert_eq!(rows[0], vec![Value::Int64(1), Value::from("ann")]);
        assert_eq!(rows.len(), 2);
        assert!(runner.context().cache().is_empty());
    }

    #[test]
    fn test_disabled_indexing_gives_same_results() {
        let runner = QueryRunner::with_config(
            source(),
            vec![Path::root("cat")],
            vec!["x"],
            OperationRegistry::default(),
            IndexConfig::new().with_enabled(false),
        );
        let plan = QueryPlan::new().filter(Expr::eq(cat_owner(), Expr::param("x")));
        assert_eq!(runner.count(&plan, &[Value::Int64(1)]).unwrap(), 2);
        assert!(runner.context().cache().is_empty());
    }

    #[test]
    fn test_param_count_mismatch() {
        let runner = cat_runner();
        assert!(matches!(
            runner.count(&QueryPlan::new(), &[]),
            Err(QueryError::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_elements_requires_single_root() {
        let runner = QueryRunner::new(
            source(),
            vec![Path::root("owner"), Path::root("cat")],
            vec![],
        );
        assert!(matches!(
            runner.elements(None, &[]),
            Err(QueryError::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_non_boolean_condition_fails() {
        let runner = cat_runner();
        let plan = QueryPlan::new().filter(Expr::field("cat", "name", 0));
        assert!(matches!(
            runner.count(&plan, &[Value::Int64(1)]),
            Err(QueryError::Core(_))
        ));
    }

    #[test]
    fn test_ordering_against_float_ignores_type() {
        let runner = QueryRunner::new(source(), vec![Path::root("cat")], vec![]);
        let below = QueryPlan::new().filter(Expr::lt(cat_owner(), Expr::constant(1.0)));
        let at_most = QueryPlan::new().filter(Expr::le(cat_owner(), Expr::constant(1.0)));

        assert_eq!(runner.count(&below, &[]).unwrap(), 0);
        assert_eq!(runner.count(&at_most, &[]).unwrap(), 2);
    }

    #[test]
    fn test_guarded_key_matches_unindexed_result() {
        let plan = QueryPlan::new().filter(Expr::and(
            Expr::ne(Expr::param("x"), Expr::constant(0i64)),
            Expr::eq(cat_owner(), Expr::div(Expr::constant(2i64), Expr::param("x"))),
        ));
        for enabled in [true, false] {
            let runner = QueryRunner::with_config(
                source(),
                vec![Path::root("cat")],
                vec!["x"],
                OperationRegistry::default(),
                IndexConfig::new().with_enabled(enabled),
            );
            assert_eq!(runner.count(&plan, &[Value::Int64(0)]), Ok(0));
            assert_eq!(runner.count(&plan, &[Value::Int64(2)]), Ok(2));
            assert_eq!(runner.count(&plan, &[Value::Int64(1)]), Ok(1));
        }
    }
}
