//! Layout statistics for probe tables
//!
//! Clusters and displacement reveal how well the hash spreads keys at the
//! current capacity.

use std::fmt;

/// Statistics for a single linear-probe table
#[derive(Clone, Debug, PartialEq)]
pub struct TableStats {
    pub capacity: usize,
    pub len: usize,
    pub load_factor: f64,

    /// Maximal runs of occupied slots, wrapping at the end of the array
    pub clusters: usize,
    pub longest_cluster: usize,

    /// Largest probe distance of any entry from its home slot
    pub max_displacement: usize,
}

impl TableStats {
    /// Build from per-slot displacements (`None` = empty slot)
    pub(crate) fn from_displacements(displacements: &[Option<usize>]) -> Self {
        let capacity = displacements.len();
        let len = displacements.iter().filter(|d| d.is_some()).count();
        let max_displacement = displacements.iter().flatten().copied().max().unwrap_or(0);

        let (clusters, longest_cluster) = match displacements.iter().position(Option::is_none) {
            None if capacity == 0 => (0, 0),
            None => (1, capacity),
            Some(start) => {
                // Walk once around starting just after an empty slot,
                // ending on it so the last run is flushed
                let mut clusters = 0;
                let mut longest = 0;
                let mut run = 0;
                for step in 1..=capacity {
                    if displacements[(start + step) % capacity].is_some() {
                        run += 1;
                    } else {
                        if run > 0 {
                            clusters += 1;
                            longest = longest.max(run);
                        }
                        run = 0;
                    }
                }
                (clusters, longest)
            }
        };

        TableStats {
            capacity,
            len,
            load_factor: if capacity > 0 {
                len as f64 / capacity as f64
            } else {
                0.0
            },
            clusters,
            longest_cluster,
            max_displacement,
        }
    }
}

impl fmt::Display for TableStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} slots (load {:.2}), {} clusters, longest {}, max displacement {}",
            self.len,
            self.capacity,
            self.load_factor,
            self.clusters,
            self.longest_cluster,
            self.max_displacement
        )
    }
}

/// Statistics for a whole `DoubleKeyTable`
#[derive(Clone, Debug)]
pub struct DoubleKeyStats {
    /// Total (key1, key2) entries
    pub entries: usize,
    pub outer: TableStats,
    /// One per inner table, in outer slot order
    pub inner: Vec<TableStats>,
}

impl DoubleKeyStats {
    /// Mean load factor over the inner tables
    pub fn mean_inner_load(&self) -> f64 {
        if self.inner.is_empty() {
            return 0.0;
        }
        self.inner.iter().map(|s| s.load_factor).sum::<f64>() / self.inner.len() as f64
    }
}
