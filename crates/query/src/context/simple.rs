//! The no-index fallback context.

use super::{Elements, IndexSupport};
use crate::ast::{Expr, OperationRegistry};
use crate::config::IndexConfig;
use crate::error::{QueryError, QueryResult};
use crate::eval::Binding;
use crate::source::ElementSource;
use alloc::rc::Rc;
use alloc::string::ToString;
use alloc::vec::Vec;
use core::fmt;
use log::trace;

/// Context that resolves every source expression by a full scan.
///
/// It also carries what every context of one query shares besides the index
/// cache: the element source, the ordered source expressions (which fix the
/// binding vector layout), the operation registry and the configuration. Cloning
/// only copies handles.
#[derive(Clone)]
pub struct SimpleIndexSupport {
    source: Rc<dyn ElementSource>,
    ops: Rc<OperationRegistry>,
    sources: Rc<[Expr]>,
    config: IndexConfig,
}

impl SimpleIndexSupport {
    /// Creates a context over `source` for the ordered source expressions `sources`.
    pub fn new(source: Rc<dyn ElementSource>, ops: OperationRegistry, sources: Vec<Expr>) -> Self {
        Self {
            source,
            ops: Rc::new(ops),
            sources: Rc::from(sources),
            config: IndexConfig::default(),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: IndexConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the element source.
    pub fn source(&self) -> &dyn ElementSource {
        &*self.source
    }

    /// Returns the operation registry.
    pub fn ops(&self) -> &OperationRegistry {
        &self.ops
    }

    /// Returns the ordered source expressions in scope.
    pub fn sources(&self) -> &[Expr] {
        &self.sources
    }

    /// Returns the configuration.
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Scans the root of `expr`.
    pub(crate) fn scan(&self, expr: &Expr) -> QueryResult<Elements<'_>> {
        match expr {
            Expr::Path(path) => {
                trace!("full scan of {}", path.root_name());
                Ok(Elements::Scan(self.source.elements(&path.to_root())?))
            }
            other => Err(QueryError::NotASource(other.to_string())),
        }
    }
}

impl IndexSupport for SimpleIndexSupport {
    fn resolve(&self, expr: &Expr) -> QueryResult<Elements<'_>> {
        self.scan(expr)
    }

    fn resolve_with(&self, expr: &Expr, _bindings: &[Binding]) -> QueryResult<Elements<'_>> {
        self.scan(expr)
    }
}

impl fmt::Debug for SimpleIndexSupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleIndexSupport")
            .field("sources", &self.sources)
            .field("ops", &self.ops)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
