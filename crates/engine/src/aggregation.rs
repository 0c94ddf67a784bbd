//! Subtree totals.
//!
//! Two strategies keep "own amount plus every descendant" available:
//!
//! - [`SumStrategy::RunningTotal`] adds each new amount to every ancestor when
//!   the transaction is created, so reading a total is a single load.
//! - [`SumStrategy::DescendantEdges`] records one (ancestor, descendant) edge
//!   per ancestor at creation and adds the amounts up when a total is read.
//!
//! An engine picks one strategy when it is built and keeps it.

use std::{collections::BTreeSet, sync::Arc};

use dashmap::{DashMap, DashSet};
use serde::{Deserialize, Serialize};

use crate::{
    EngineError, ResultEngine, TransactionId,
    ancestors::Ancestors,
    table::{EntityTable, Record},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SumStrategy {
    #[default]
    RunningTotal,
    DescendantEdges,
}

impl SumStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RunningTotal => "running_total",
            Self::DescendantEdges => "descendant_edges",
        }
    }
}

impl TryFrom<&str> for SumStrategy {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "running_total" => Ok(Self::RunningTotal),
            "descendant_edges" => Ok(Self::DescendantEdges),
            other => Err(format!("unknown sum strategy: {other}")),
        }
    }
}

#[derive(Debug)]
pub(crate) enum Aggregation {
    RunningTotal,
    DescendantEdges(DescendantEdges),
}

impl Aggregation {
    pub(crate) fn new(strategy: SumStrategy) -> Self {
        match strategy {
            SumStrategy::RunningTotal => Self::RunningTotal,
            SumStrategy::DescendantEdges => Self::DescendantEdges(DescendantEdges::default()),
        }
    }

    pub(crate) fn strategy(&self) -> SumStrategy {
        match self {
            Self::RunningTotal => SumStrategy::RunningTotal,
            Self::DescendantEdges(_) => SumStrategy::DescendantEdges,
        }
    }

    /// Accounts for a record that has just been inserted into `table`.
    ///
    /// Stops at the first corrupted link. Ancestors already visited keep the
    /// update, the rest of the chain does not see it.
    pub(crate) fn record(&self, table: &EntityTable, record: &Record) -> ResultEngine<()> {
        for ancestor in Ancestors::of(table, record) {
            let ancestor = ancestor?;
            match self {
                Self::RunningTotal => {
                    tracing::debug!(
                        "adding {} from {} to the total of {}",
                        record.amount(),
                        record.id(),
                        ancestor.id()
                    );
                    ancestor.add_to_total(record.amount());
                }
                Self::DescendantEdges(edges) => {
                    tracing::debug!("recording {} as descendant of {}", record.id(), ancestor.id());
                    edges.insert(ancestor.id(), record.id());
                }
            }
        }
        Ok(())
    }

    pub(crate) fn total(&self, table: &EntityTable, record: &Record) -> ResultEngine<f64> {
        match self {
            Self::RunningTotal => Ok(record.total()),
            Self::DescendantEdges(edges) => edges.total(table, record),
        }
    }

    pub(crate) fn descendants(&self, id: TransactionId) -> Option<BTreeSet<TransactionId>> {
        match self {
            Self::RunningTotal => None,
            Self::DescendantEdges(edges) => Some(edges.descendants(id)),
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct DescendantEdges {
    edges: DashMap<TransactionId, Arc<DashSet<TransactionId>>>,
}

impl DescendantEdges {
    fn insert(&self, ancestor: TransactionId, descendant: TransactionId) {
        let set = Arc::clone(
            self.edges
                .entry(ancestor)
                .or_insert_with(|| Arc::new(DashSet::new()))
                .value(),
        );
        set.insert(descendant);
    }

    fn descendants(&self, ancestor: TransactionId) -> BTreeSet<TransactionId> {
        match self.edges.get(&ancestor).map(|set| Arc::clone(set.value())) {
            Some(set) => set.iter().map(|id| *id).collect(),
            None => BTreeSet::new(),
        }
    }

    fn total(&self, table: &EntityTable, record: &Record) -> ResultEngine<f64> {
        let mut total = record.amount();
        for descendant in self.descendants(record.id()) {
            if descendant == record.id() {
                return Err(EngineError::CyclicData(descendant));
            }
            let Some(found) = table.get(descendant) else {
                return Err(EngineError::BrokenChain {
                    from: record.id(),
                    missing: descendant,
                });
            };
            total += found.amount();
        }
        Ok(total)
    }
}
