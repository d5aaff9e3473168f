//! Index configuration.

/// Tuning knobs for index-aware evaluation contexts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexConfig {
    /// Whether specialization looks for indexable conditions at all.
    /// Disabled contexts always answer by full scan.
    pub enabled: bool,
    /// Initial key capacity of each hash index built.
    pub initial_capacity: usize,
}

impl IndexConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether indexes are discovered and built.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Sets the initial key capacity of built indexes.
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            initial_capacity: 16,
        }
    }
}
