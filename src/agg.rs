use rustc_hash::FxHashMap;

/// Running statistics for one key, in tenths.
///
/// A record only ever exists with `count >= 1`; it is created atomically
/// with its first observation, so min/max/sum are always meaningful. The
/// layout is fixed and inline in the table, no per-update allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateRecord {
    pub min: i64,
    pub max: i64,
    pub sum: i64,
    pub count: u64,
}

impl AggregateRecord {
    #[inline]
    #[must_use]
    pub fn first(value: i64) -> Self {
        Self {
            min: value,
            max: value,
            sum: value,
            count: 1,
        }
    }

    #[inline]
    pub fn observe(&mut self, value: i64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.sum += value;
        self.count += 1;
    }

    /// Folds another record in. Commutative and associative, so partial
    /// tables can be combined in any order or grouping.
    #[inline]
    pub fn combine(&mut self, other: &Self) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self.sum += other.sum;
        self.count += other.count;
    }

    /// Mean in tenths, rounded half away from zero. Caller guarantees
    /// `count > 0`.
    #[inline]
    #[must_use]
    pub fn mean_tenths(&self) -> i64 {
        let count = self.count as i64;
        let half = count / 2;
        if self.sum >= 0 {
            (self.sum + half) / count
        } else {
            -((-self.sum + half) / count)
        }
    }
}

/// Key → running statistics, keyed by raw bytes.
///
/// Each worker owns exactly one table during its scan; merging happens on a
/// single thread afterwards, so the structure needs no interior locking.
#[derive(Debug, Default)]
pub struct AggregationTable {
    map: FxHashMap<Vec<u8>, AggregateRecord>,
}

impl AggregationTable {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Records one observation. The key is only copied when first seen.
    #[inline]
    pub fn observe(&mut self, key: &[u8], value: i64) {
        if let Some(record) = self.map.get_mut(key) {
            record.observe(value);
        } else {
            self.map.insert(key.to_vec(), AggregateRecord::first(value));
        }
    }

    /// Folds a whole partial table in, union over keyspaces.
    pub fn absorb(&mut self, other: AggregationTable) {
        for (key, record) in other.map {
            match self.map.entry(key) {
                std::collections::hash_map::Entry::Occupied(mut entry) => {
                    entry.get_mut().combine(&record);
                }
                std::collections::hash_map::Entry::Vacant(entry) => {
                    entry.insert(record);
                }
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[must_use]
    pub fn get(&self, key: &[u8]) -> Option<&AggregateRecord> {
        self.map.get(key)
    }

    /// Entries in ascending byte-lexicographic key order.
    #[must_use]
    pub fn sorted_entries(&self) -> Vec<(&[u8], &AggregateRecord)> {
        let mut entries: Vec<_> = self
            .map
            .iter()
            .map(|(key, record)| (key.as_slice(), record))
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

/// Reduces all partial tables into one, seeding from the largest partial to
/// keep rehashing down. Correct under any order because the per-record
/// combine is commutative and associative.
#[must_use]
pub fn merge(partials: Vec<AggregationTable>) -> AggregationTable {
    let mut partials = partials;
    let seed_index = partials
        .iter()
        .enumerate()
        .max_by_key(|(_, table)| table.len())
        .map(|(index, _)| index);
    let mut merged = match seed_index {
        Some(index) => partials.swap_remove(index),
        None => AggregationTable::default(),
    };
    for partial in partials {
        merged.absorb(partial);
    }
    merged
}
