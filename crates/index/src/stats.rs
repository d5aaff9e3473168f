//! Index statistics for sift.
//!
//! Indexes are immutable once built, so their statistics are computed once at
//! freeze time and never updated.

/// Statistics for a built hash index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Total number of elements across all groups.
    total_rows: usize,
    /// Number of distinct keys.
    distinct_keys: usize,
    /// Size of the largest group.
    max_group_len: usize,
}

impl IndexStats {
    /// Creates a new empty stats instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates stats with initial values.
    pub fn with_values(total_rows: usize, distinct_keys: usize, max_group_len: usize) -> Self {
        Self {
            total_rows,
            distinct_keys,
            max_group_len,
        }
    }

    /// Returns the total number of elements.
    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    /// Returns the number of distinct keys.
    pub fn distinct_keys(&self) -> usize {
        self.distinct_keys
    }

    /// Returns the size of the largest group.
    pub fn max_group_len(&self) -> usize {
        self.max_group_len
    }

    /// Records one group of the given size.
    pub(crate) fn add_group(&mut self, len: usize) {
        self.total_rows += len;
        self.distinct_keys += 1;
        self.max_group_len = self.max_group_len.max(len);
    }

    /// Average number of elements per key, the expected cost of one lookup.
    pub fn avg_group_len(&self) -> f64 {
        if self.distinct_keys == 0 {
            0.0
        } else {
            self.total_rows as f64 / self.distinct_keys as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_basic() {
        let mut stats = IndexStats::new();
        assert_eq!(stats.total_rows(), 0);
        assert_eq!(stats.avg_group_len(), 0.0);

        stats.add_group(3);
        stats.add_group(1);
        assert_eq!(stats.total_rows(), 4);
        assert_eq!(stats.distinct_keys(), 2);
        assert_eq!(stats.max_group_len(), 3);
        assert_eq!(stats.avg_group_len(), 2.0);
    }

    #[test]
    fn test_stats_with_values() {
        let stats = IndexStats::with_values(100, 10, 25);
        assert_eq!(stats.total_rows(), 100);
        assert_eq!(stats.distinct_keys(), 10);
        assert_eq!(stats.max_group_len(), 25);
    }
}
