//! Index from transaction type to the ids sharing it.

use std::{collections::BTreeSet, sync::Arc};

use dashmap::{DashMap, DashSet};

use crate::TransactionId;

#[derive(Debug, Default)]
pub(crate) struct TypeIndex {
    sets: DashMap<String, Arc<DashSet<TransactionId>>>,
}

impl TypeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `id` to the set of `kind`. Registering the same pair twice is a
    /// no-op.
    pub fn register(&self, kind: &str, id: TransactionId) {
        let set = match self.sets.get(kind) {
            Some(set) => Arc::clone(set.value()),
            None => Arc::clone(
                self.sets
                    .entry(kind.to_string())
                    .or_insert_with(|| Arc::new(DashSet::new()))
                    .value(),
            ),
        };
        // The map guard is released above, inserts only contend on the set.
        set.insert(id);
    }

    /// Snapshot of the ids registered under `kind`, empty for unknown types.
    pub fn ids_for_type(&self, kind: &str) -> BTreeSet<TransactionId> {
        let Some(set) = self.sets.get(kind).map(|set| Arc::clone(set.value())) else {
            return BTreeSet::new();
        };
        set.iter().map(|id| *id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[i64]) -> BTreeSet<TransactionId> {
        raw.iter().copied().map(TransactionId::new).collect()
    }

    #[test]
    fn unknown_type_is_empty() {
        let index = TypeIndex::new();
        assert!(index.ids_for_type("cars").is_empty());
    }

    #[test]
    fn register_is_idempotent() {
        let index = TypeIndex::new();
        index.register("cars", TransactionId::new(1));
        index.register("cars", TransactionId::new(1));
        index.register("cars", TransactionId::new(5));

        assert_eq!(index.ids_for_type("cars"), ids(&[1, 5]));
    }

    #[test]
    fn types_are_kept_apart() {
        let index = TypeIndex::new();
        index.register("cars", TransactionId::new(1));
        index.register("shopping", TransactionId::new(2));

        assert_eq!(index.ids_for_type("cars"), ids(&[1]));
        assert_eq!(index.ids_for_type("shopping"), ids(&[2]));
    }

    #[test]
    fn concurrent_first_use_keeps_every_id() {
        let index = TypeIndex::new();

        std::thread::scope(|scope| {
            for i in 0..32 {
                let index = &index;
                scope.spawn(move || index.register("fresh", TransactionId::new(i)));
            }
        });

        assert_eq!(index.ids_for_type("fresh").len(), 32);
    }
}
