//! In-memory store of immutable transactions arranged in a forest.
//!
//! Each transaction may name a parent that already exists. The [`Engine`]
//! admits every id exactly once, indexes transactions by type and keeps the
//! total of each transaction plus all its descendants available for cheap
//! reads. All operations take `&self` and can be called from many threads at
//! once; no operation holds a lock across its steps.
//!
//! ```rust
//! use engine::{Engine, NewTransaction};
//!
//! let engine = Engine::builder().build();
//! engine.create(1, NewTransaction::new("cars", 10.0)).unwrap();
//! engine.create(2, NewTransaction::new("shopping", 5.0).with_parent(1)).unwrap();
//!
//! assert_eq!(engine.sum(1).unwrap(), Some(15.0));
//! ```
use std::collections::BTreeSet;

pub use aggregation::SumStrategy;
pub use error::EngineError;
pub use transactions::{NewTransaction, Transaction, TransactionId};

use aggregation::Aggregation;
use ancestors::Ancestors;
use table::{EntityTable, Insertion};
use type_index::TypeIndex;

mod aggregation;
mod ancestors;
mod error;
mod table;
mod total;
mod transactions;
mod type_index;

type ResultEngine<T> = Result<T, EngineError>;

#[derive(Debug)]
pub struct Engine {
    table: EntityTable,
    types: TypeIndex,
    aggregation: Aggregation,
}

impl Default for Engine {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn strategy(&self) -> SumStrategy {
        self.aggregation.strategy()
    }

    /// Stores a new transaction under `id`.
    ///
    /// Caller errors ([`EngineError::SelfParent`],
    /// [`EngineError::ParentNotFound`], [`EngineError::Conflict`]) leave the
    /// store unchanged. A corruption error is returned after the transaction
    /// itself has been stored, when its parent chain turns out to be cyclic or
    /// broken; ancestors before the bad link already include its amount.
    pub fn create(&self, id: impl Into<TransactionId>, new: NewTransaction) -> ResultEngine<()> {
        let id = id.into();
        tracing::trace!("create {id} {new:?}");

        if let Some(parent_id) = new.parent_id {
            if parent_id == id {
                tracing::debug!("rejecting {id}: it names itself as parent");
                return Err(EngineError::SelfParent(id));
            }
            if !self.table.contains(parent_id) {
                tracing::debug!("rejecting {id}: parent {parent_id} not found");
                return Err(EngineError::ParentNotFound(parent_id));
            }
        }

        let record = match self.table.try_insert(new.into_transaction(id)) {
            Insertion::Inserted(record) => record,
            Insertion::AlreadyExists(existing) => {
                tracing::debug!(
                    "rejecting {id}: already stored as {:?}",
                    existing.transaction()
                );
                return Err(EngineError::Conflict(id));
            }
        };
        tracing::debug!("stored {:?}", record.transaction());

        self.types.register(&record.transaction().kind, id);

        if let Err(err) = self.aggregation.record(&self.table, &record) {
            tracing::error!("store corrupted while accounting for {id}: {err}");
            return Err(err);
        }

        Ok(())
    }

    pub fn transaction(&self, id: impl Into<TransactionId>) -> Option<Transaction> {
        let id = id.into();
        tracing::trace!("transaction {id}");
        self.table.get(id).map(|record| record.transaction().clone())
    }

    /// Total of `id` and all of its descendants, `None` for unknown ids.
    pub fn sum(&self, id: impl Into<TransactionId>) -> ResultEngine<Option<f64>> {
        let id = id.into();
        tracing::trace!("sum {id}");

        let Some(record) = self.table.get(id) else {
            return Ok(None);
        };
        match self.aggregation.total(&self.table, &record) {
            Ok(total) => {
                tracing::debug!("found sum {total} for {id}");
                Ok(Some(total))
            }
            Err(err) => {
                tracing::error!("store corrupted while summing {id}: {err}");
                Err(err)
            }
        }
    }

    pub fn ids_by_type(&self, kind: &str) -> BTreeSet<TransactionId> {
        tracing::trace!("ids_by_type {kind}");
        self.types.ids_for_type(kind)
    }

    /// Parent chain of `id`, closest first, `None` for unknown ids.
    pub fn ancestors(
        &self,
        id: impl Into<TransactionId>,
    ) -> ResultEngine<Option<Vec<TransactionId>>> {
        let id = id.into();
        tracing::trace!("ancestors {id}");
        let Some(record) = self.table.get(id) else {
            return Ok(None);
        };
        Ancestors::of(&self.table, &record)
            .map(|ancestor| ancestor.map(|ancestor| ancestor.id()))
            .collect::<ResultEngine<Vec<_>>>()
            .map(Some)
            .inspect_err(|err| tracing::error!("store corrupted while walking {id}: {err}"))
    }

    /// Recorded descendants of `id`.
    ///
    /// Only engines built with [`SumStrategy::DescendantEdges`] keep them;
    /// other engines return `None`.
    pub fn descendants(&self, id: impl Into<TransactionId>) -> Option<BTreeSet<TransactionId>> {
        let id = id.into();
        tracing::trace!("descendants {id}");
        self.aggregation.descendants(id)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct EngineBuilder {
    strategy: SumStrategy,
}

impl EngineBuilder {
    /// Pick how subtree totals are maintained
    pub fn strategy(mut self, strategy: SumStrategy) -> EngineBuilder {
        self.strategy = strategy;
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> Engine {
        tracing::debug!("building engine with {} sums", self.strategy.as_str());
        Engine {
            table: EntityTable::new(),
            types: TypeIndex::new(),
            aggregation: Aggregation::new(self.strategy),
        }
    }
}
