//! Index-aware evaluation context.

use super::discovery::IndexCreationTask;
use super::simple::SimpleIndexSupport;
use super::{Elements, IndexSupport};
use crate::ast::{Expr, OperationRegistry, Path};
use crate::config::IndexConfig;
use crate::error::{QueryError, QueryResult};
use crate::eval::{compile, Binding, Evaluator};
use crate::source::ElementSource;
use alloc::rc::Rc;
use alloc::string::ToString;
use alloc::vec::Vec;
use hashbrown::HashMap;
use log::{debug, trace};
use sift_core::{Row, Value};
use sift_index::{HashIndex, IndexCache};

/// Hash index over the elements of one source, keyed by the value of one field path.
pub type PathIndex = HashIndex<Value, Rc<Row>>;

/// Cache of path indexes shared by a tree of contexts.
pub type PathCache = IndexCache<Path, Value, Rc<Row>>;

/// Registration of an index-backed source expression: which cached index answers
/// it and how the lookup key is computed.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexedPath {
    path: Path,
    evaluator: Evaluator,
}

impl IndexedPath {
    /// Creates a registration entry.
    pub fn new(path: Path, evaluator: Evaluator) -> Self {
        Self { path, evaluator }
    }

    /// Returns the field path whose index answers lookups.
    pub fn indexed_path(&self) -> &Path {
        &self.path
    }

    /// Returns the evaluator computing the lookup key.
    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }
}

/// Context that answers registered source expressions from shared hash indexes.
///
/// Contexts form a tree: `specialize` derives a child per filter condition. The
/// index cache is shared by the whole tree; the registration table belongs to
/// one context, starts empty and only grows.
#[derive(Debug)]
pub struct IndexedContext {
    base: SimpleIndexSupport,
    cache: Rc<PathCache>,
    registrations: HashMap<Expr, IndexedPath>,
}

impl IndexedContext {
    /// Creates a root context with an empty cache.
    pub fn new(source: Rc<dyn ElementSource>, ops: OperationRegistry, sources: Vec<Expr>) -> Self {
        Self::from_base(SimpleIndexSupport::new(source, ops, sources))
    }

    /// Creates a root context with an empty cache over an existing fallback context.
    pub fn from_base(base: SimpleIndexSupport) -> Self {
        Self {
            base,
            cache: Rc::new(PathCache::new()),
            registrations: HashMap::new(),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: IndexConfig) -> Self {
        self.base = self.base.with_config(config);
        self
    }

    /// Returns a context answering queries under `condition`.
    ///
    /// Without a condition this is the context itself. Otherwise a child sharing
    /// the cache is created; if the condition is an operation, index discovery runs
    /// on it, which may build indexes. A failure while building an index aborts the
    /// specialization.
    pub fn specialize(self: &Rc<Self>, condition: Option<&Expr>) -> QueryResult<Rc<Self>> {
        let Some(condition) = condition else {
            return Ok(Rc::clone(self));
        };

        let mut child = Self {
            base: self.base.clone(),
            cache: Rc::clone(&self.cache),
            registrations: HashMap::new(),
        };
        if child.config().enabled && matches!(condition, Expr::Operation { .. }) {
            let registered = IndexCreationTask::new(&mut child).run(condition)?;
            debug!(
                "specialized context for {}: {} indexed source(s)",
                condition, registered
            );
        }
        Ok(Rc::new(child))
    }

    /// Builds the hash index for `path` unless the shared cache already holds it.
    ///
    /// The root of `path` is consumed completely and its elements grouped by the
    /// value of `path`. A failure leaves the cache untouched. Source failures are
    /// returned as they are; failures computing an element's key are wrapped in
    /// `QueryError::IndexKey`, which callers treat as "not indexable".
    pub fn build_index(&self, path: &Path) -> QueryResult<Rc<PathIndex>> {
        if let Some(existing) = self.cache.get(path) {
            debug!("reusing cached index on {}", path);
            return Ok(existing);
        }

        let root = path.to_root();
        let key = compile(&[Expr::Path(root.clone())], &Expr::Path(path.clone()))?;
        let capacity = self.config().initial_capacity;
        let index = self.cache.get_or_try_build(path, || {
            let elements = self.base.source().elements(&root)?;
            let mut slot = [Binding::Unbound];
            HashIndex::try_build(elements, capacity, |row: &Rc<Row>| {
                slot[0] = Binding::Element(Rc::clone(row));
                key.evaluate_with(&slot)
                    .map_err(|err| QueryError::index_key(path, err))
            })
        })?;
        debug!(
            "built index on {}: {} element(s), {} key(s)",
            path,
            index.len(),
            index.key_count()
        );
        Ok(index)
    }

    /// Registers `queried` as answered by the index on `path`, keyed by `evaluator`.
    ///
    /// Registrations are never replaced: returns false and keeps the existing entry
    /// if `queried` is already registered. The shared cache is not touched.
    pub fn register(&mut self, queried: Expr, path: Path, evaluator: Evaluator) -> bool {
        if self.registrations.contains_key(&queried) {
            return false;
        }
        debug!("{} answered by index on {}", queried, path);
        self.registrations
            .insert(queried, IndexedPath::new(path, evaluator));
        true
    }

    /// Returns true if `expr` is answered from an index in this context.
    pub fn is_indexed(&self, expr: &Expr) -> bool {
        self.registrations.contains_key(expr)
    }

    /// Returns the registration of `expr`.
    pub fn registration(&self, expr: &Expr) -> Option<&IndexedPath> {
        self.registrations.get(expr)
    }

    /// Returns the number of registrations.
    pub fn registration_count(&self) -> usize {
        self.registrations.len()
    }

    /// Returns the shared index cache.
    pub fn cache(&self) -> &PathCache {
        &self.cache
    }

    /// Returns true if both contexts belong to the same context tree.
    pub fn shares_cache_with(&self, other: &IndexedContext) -> bool {
        Rc::ptr_eq(&self.cache, &other.cache)
    }

    /// Returns the ordered source expressions in scope.
    pub fn sources(&self) -> &[Expr] {
        self.base.sources()
    }

    /// Returns the operation registry.
    pub fn ops(&self) -> &OperationRegistry {
        self.base.ops()
    }

    /// Returns the configuration.
    pub fn config(&self) -> &IndexConfig {
        self.base.config()
    }

    /// Answers a registered expression from its index.
    ///
    /// Whenever the index cannot answer (the lookup key or an element key fails
    /// to evaluate), the full scan is returned instead and the caller's filter
    /// decides, as it would without the index.
    fn lookup(
        &self,
        expr: &Expr,
        entry: &IndexedPath,
        key: QueryResult<Value>,
        bindings: &[Binding],
    ) -> QueryResult<Elements<'_>> {
        let key = match key {
            Ok(key) => key,
            Err(err) => {
                trace!("{}: key for {} failed ({}), scanning", expr, entry.path, err);
                return self.base.resolve_with(expr, bindings);
            }
        };
        // Registrations made outside discovery may point at an index not built yet.
        let index = match self.cache.get(&entry.path) {
            Some(index) => index,
            None => match self.build_index(&entry.path) {
                Ok(index) => index,
                Err(err @ QueryError::IndexKey { .. }) => {
                    trace!("{}: {}, scanning", expr, err);
                    return self.base.resolve_with(expr, bindings);
                }
                Err(err) => return Err(err),
            },
        };
        match index.get(&key) {
            Some(group) => {
                trace!("{}: {} hit for key {}", expr, entry.path, key);
                Ok(Elements::Indexed(group))
            }
            None => {
                trace!("{}: {} miss for key {}", expr, entry.path, key);
                Ok(Elements::Empty)
            }
        }
    }
}

impl IndexSupport for IndexedContext {
    /// Resolves `expr` without bindings.
    ///
    /// Registered expressions whose key depends on bindings cannot be answered
    /// here and fail with `QueryError::MissingBindings`.
    fn resolve(&self, expr: &Expr) -> QueryResult<Elements<'_>> {
        match self.registrations.get(expr) {
            Some(entry) => {
                let key = match &entry.evaluator {
                    Evaluator::Static(ev) => ev.evaluate(),
                    Evaluator::Bound(_) => {
                        return Err(QueryError::MissingBindings(expr.to_string()))
                    }
                };
                self.lookup(expr, entry, key, &[])
            }
            None => self.base.resolve(expr),
        }
    }

    fn resolve_with(&self, expr: &Expr, bindings: &[Binding]) -> QueryResult<Elements<'_>> {
        match self.registrations.get(expr) {
            Some(entry) => {
                let key = entry.evaluator.evaluate_with(bindings);
                self.lookup(expr, entry, key, bindings)
            }
            None => self.base.resolve_with(expr, bindings),
        }
    }
}
