//! Index discovery over filter conditions.

use super::indexed::IndexedContext;
use crate::ast::{Expr, Path};
use crate::error::{QueryError, QueryResult};
use crate::eval::{compile, root_slot};
use log::trace;

/// Walks a condition and registers every source pinned to a single key by an
/// equality.
///
/// Only conjunctions are descended: an equality under a disjunction or negation
/// does not restrict the source on its own. For `path == key` (either
/// orientation) the source of `path` is indexed when `key` depends only on
/// parameters and sources bound before it, so the key is known whenever the
/// source is iterated.
pub struct IndexCreationTask<'a> {
    context: &'a mut IndexedContext,
    registered: usize,
}

impl<'a> IndexCreationTask<'a> {
    /// Creates a task registering into `context`.
    pub fn new(context: &'a mut IndexedContext) -> Self {
        Self {
            context,
            registered: 0,
        }
    }

    /// Runs discovery on `condition` and returns the number of new registrations.
    ///
    /// Index builds happen here. A source failure during a build aborts the run;
    /// registrations made before the failure stay in place. A path whose key
    /// cannot be computed for some element is skipped like any other
    /// non-indexable candidate.
    pub fn run(mut self, condition: &Expr) -> QueryResult<usize> {
        self.visit(condition)?;
        Ok(self.registered)
    }

    fn visit(&mut self, expr: &Expr) -> QueryResult<()> {
        let Expr::Operation { op, args } = expr else {
            return Ok(());
        };

        let ops = self.context.ops();
        if ops.is_conjunction(*op) {
            for arg in args {
                self.visit(arg)?;
            }
        } else if ops.is_equality(*op) && args.len() == 2 {
            if !self.try_index(&args[0], &args[1])? {
                self.try_index(&args[1], &args[0])?;
            }
        }
        Ok(())
    }

    /// Registers the root of `target` keyed by `key` if that is sound. Returns
    /// true on a new registration.
    fn try_index(&mut self, target: &Expr, key: &Expr) -> QueryResult<bool> {
        let Some(path @ Path::Field { .. }) = target.as_path() else {
            return Ok(false);
        };
        let sources = self.context.sources();
        let Some(slot) = root_slot(sources, path.root_name()) else {
            return Ok(false);
        };
        let queried = sources[slot].clone();
        if self.context.is_indexed(&queried) {
            return Ok(false);
        }

        // The key may only read sources bound before the indexed one.
        let bound_later = key
            .referenced_roots()
            .into_iter()
            .any(|root| root_slot(sources, root).map_or(true, |s| s >= slot));
        if bound_later {
            trace!("{}: key {} is not bound before {}", path, key, queried);
            return Ok(false);
        }

        let evaluator = match compile(sources, key) {
            Ok(evaluator) => evaluator,
            Err(err) => {
                trace!("{}: key {} not indexable: {}", path, key, err);
                return Ok(false);
            }
        };

        let path = path.clone();
        match self.context.build_index(&path) {
            Ok(_) => {}
            // Some element has no key; a scan filtered by the whole condition still works.
            Err(err @ QueryError::IndexKey { .. }) => {
                trace!("{}: not indexable: {}", path, err);
                return Ok(false);
            }
            Err(err) => return Err(err),
        }
        if self.context.register(queried, path, evaluator) {
            self.registered += 1;
            return Ok(true);
        }
        Ok(false)
    }
}
