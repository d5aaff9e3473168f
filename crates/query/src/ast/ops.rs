//! Operation registry consulted by index discovery.
//!
//! The registry tells the discovery pass which operators behave as exact equality
//! (and may therefore be answered from a hash index) and which combine conditions
//! conjunctively (and may therefore be searched for further candidates).

use crate::ast::Operator;
use hashbrown::HashSet;

/// Caller-supplied classification of operators for index discovery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperationRegistry {
    equality: HashSet<Operator>,
    conjunction: HashSet<Operator>,
}

impl OperationRegistry {
    /// Creates a registry that classifies no operator at all.
    pub fn empty() -> Self {
        Self {
            equality: HashSet::new(),
            conjunction: HashSet::new(),
        }
    }

    /// Marks `op` as an exact-equality operator.
    pub fn with_equality(mut self, op: Operator) -> Self {
        self.equality.insert(op);
        self
    }

    /// Marks `op` as a conjunction.
    pub fn with_conjunction(mut self, op: Operator) -> Self {
        self.conjunction.insert(op);
        self
    }

    /// Returns true if `op` compares for exact equality.
    pub fn is_equality(&self, op: Operator) -> bool {
        self.equality.contains(&op)
    }

    /// Returns true if `op` is a logical AND.
    pub fn is_conjunction(&self, op: Operator) -> bool {
        self.conjunction.contains(&op)
    }
}

impl Default for OperationRegistry {
    /// `Eq` is the only equality and `And` the only conjunction.
    fn default() -> Self {
        Self::empty()
            .with_equality(Operator::Eq)
            .with_conjunction(Operator::And)
    }
}
