//! Query plans.

use crate::ast::Expr;
use alloc::vec::Vec;

/// What to filter and what to return.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryPlan {
    condition: Option<Expr>,
    projection: Vec<Expr>,
}

impl QueryPlan {
    /// Creates a plan returning every bound element unfiltered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the filter condition.
    pub fn filter(mut self, condition: Expr) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Sets the projection. Empty means every field of every bound element.
    pub fn select(mut self, projection: Vec<Expr>) -> Self {
        self.projection = projection;
        self
    }

    /// Returns the filter condition.
    pub fn condition(&self) -> Option<&Expr> {
        self.condition.as_ref()
    }

    /// Returns the projection.
    pub fn projection(&self) -> &[Expr] {
        &self.projection
    }
}
