//! Insert-only table of stored transactions.

use std::sync::Arc;

use dashmap::{DashMap, mapref::entry::Entry};

use crate::{Transaction, TransactionId, total::AtomicTotal};

/// A stored transaction together with its subtree total.
#[derive(Debug)]
pub(crate) struct Record {
    transaction: Transaction,
    total: AtomicTotal,
}

impl Record {
    fn new(transaction: Transaction) -> Self {
        let total = AtomicTotal::new(transaction.amount);
        Self { transaction, total }
    }

    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    pub fn id(&self) -> TransactionId {
        self.transaction.id
    }

    pub fn parent_id(&self) -> Option<TransactionId> {
        self.transaction.parent_id
    }

    pub fn amount(&self) -> f64 {
        self.transaction.amount
    }

    /// Own amount plus every descendant amount propagated so far.
    pub fn total(&self) -> f64 {
        self.total.get()
    }

    pub(crate) fn add_to_total(&self, delta: f64) {
        self.total.add(delta);
    }
}

/// Outcome of [`EntityTable::try_insert`].
#[derive(Debug)]
pub(crate) enum Insertion {
    Inserted(Arc<Record>),
    /// The id was taken; carries the record that owns it.
    AlreadyExists(Arc<Record>),
}

#[derive(Debug, Default)]
pub(crate) struct EntityTable {
    records: DashMap<TransactionId, Arc<Record>>,
}

impl EntityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `transaction` unless its id is already present.
    ///
    /// The shard lock held by the entry API makes this the single point that
    /// decides which of several concurrent callers owns an id.
    pub fn try_insert(&self, transaction: Transaction) -> Insertion {
        match self.records.entry(transaction.id) {
            Entry::Occupied(occupied) => Insertion::AlreadyExists(Arc::clone(occupied.get())),
            Entry::Vacant(vacant) => {
                let record = Arc::new(Record::new(transaction));
                vacant.insert(Arc::clone(&record));
                Insertion::Inserted(record)
            }
        }
    }

    pub fn get(&self, id: TransactionId) -> Option<Arc<Record>> {
        self.records.get(&id).map(|record| Arc::clone(record.value()))
    }

    pub fn contains(&self, id: TransactionId) -> bool {
        self.records.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Replaces a record behind the back of the normal creation path.
    #[cfg(test)]
    pub(crate) fn overwrite(&self, transaction: Transaction) {
        self.records
            .insert(transaction.id, Arc::new(Record::new(transaction)));
    }
}
