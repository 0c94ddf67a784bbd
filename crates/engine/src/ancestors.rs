//! Bounded walk up a parent chain.

use std::{collections::HashSet, sync::Arc};

use crate::{
    EngineError, TransactionId,
    table::{EntityTable, Record},
};

/// Iterator over the ancestors of a transaction, closest first.
///
/// Every id is visited at most once, so the walk ends after at most as many
/// steps as there are records. A revisited id yields
/// [`EngineError::CyclicData`], a parent missing from the table yields
/// [`EngineError::BrokenChain`]; iteration stops after either error.
pub(crate) struct Ancestors<'a> {
    table: &'a EntityTable,
    origin: TransactionId,
    next: Option<TransactionId>,
    visited: HashSet<TransactionId>,
}

impl<'a> Ancestors<'a> {
    pub fn new(
        table: &'a EntityTable,
        origin: TransactionId,
        parent: Option<TransactionId>,
    ) -> Self {
        Self {
            table,
            origin,
            next: parent,
            visited: HashSet::from([origin]),
        }
    }

    pub fn of(table: &'a EntityTable, record: &Record) -> Self {
        Self::new(table, record.id(), record.parent_id())
    }
}

impl Iterator for Ancestors<'_> {
    type Item = Result<Arc<Record>, EngineError>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next.take()?;

        if !self.visited.insert(id) {
            return Some(Err(EngineError::CyclicData(id)));
        }

        let Some(record) = self.table.get(id) else {
            return Some(Err(EngineError::BrokenChain {
                from: self.origin,
                missing: id,
            }));
        };

        self.next = record.parent_id();
        Some(Ok(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Transaction;

    fn tx(id: i64, parent: Option<i64>) -> Transaction {
        Transaction {
            id: TransactionId::new(id),
            kind: "t".to_string(),
            amount: 1.0,
            parent_id: parent.map(TransactionId::new),
        }
    }

    fn walk(table: &EntityTable, id: i64) -> Vec<Result<i64, EngineError>> {
        let record = table.get(TransactionId::new(id)).unwrap();
        Ancestors::of(table, &record)
            .map(|step| step.map(|record| record.id().get()))
            .collect()
    }

    #[test]
    fn root_has_no_ancestors() {
        let table = EntityTable::new();
        table.try_insert(tx(1, None));
        assert!(walk(&table, 1).is_empty());
    }

    #[test]
    fn walks_closest_first() {
        let table = EntityTable::new();
        table.try_insert(tx(1, None));
        table.try_insert(tx(2, Some(1)));
        table.try_insert(tx(3, Some(2)));

        assert_eq!(walk(&table, 3), vec![Ok(2), Ok(1)]);
    }

    #[test]
    fn two_node_cycle_is_reported() {
        let table = EntityTable::new();
        table.overwrite(tx(1, Some(2)));
        table.overwrite(tx(2, Some(1)));

        assert_eq!(
            walk(&table, 1),
            vec![Ok(2), Err(EngineError::CyclicData(TransactionId::new(1)))]
        );
    }

    #[test]
    fn cycle_above_origin_is_reported() {
        let table = EntityTable::new();
        table.overwrite(tx(1, Some(3)));
        table.overwrite(tx(2, Some(1)));
        table.overwrite(tx(3, Some(2)));
        table.overwrite(tx(4, Some(1)));

        assert_eq!(
            walk(&table, 4),
            vec![
                Ok(1),
                Ok(3),
                Ok(2),
                Err(EngineError::CyclicData(TransactionId::new(1)))
            ]
        );
    }

    #[test]
    fn self_loop_is_reported() {
        let table = EntityTable::new();
        table.overwrite(tx(5, Some(5)));

        assert_eq!(
            walk(&table, 5),
            vec![Err(EngineError::CyclicData(TransactionId::new(5)))]
        );
    }

    #[test]
    fn missing_parent_breaks_the_chain() {
        let table = EntityTable::new();
        table.overwrite(tx(2, Some(1)));

        assert_eq!(
            walk(&table, 2),
            vec![Err(EngineError::BrokenChain {
                from: TransactionId::new(2),
                missing: TransactionId::new(1),
            })]
        );
    }

    #[test]
    fn long_cycle_terminates_within_table_size() {
        let table = EntityTable::new();
        let n = 500;
        for id in 0..n {
            table.overwrite(tx(id, Some((id + 1) % n)));
        }

        let steps = walk(&table, 0);
        assert_eq!(steps.len(), n as usize);
        assert_eq!(
            steps.last(),
            Some(&Err(EngineError::CyclicData(TransactionId::new(0))))
        );
    }
}
