//! Transaction primitives.
//!
//! A `Transaction` is immutable once stored: its id, type, amount and parent
//! are fixed at creation. Only the subtree total attached to it in the
//! entity table changes afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Caller-supplied identifier of a transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct TransactionId(i64);

impl TransactionId {
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for TransactionId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<TransactionId> for i64 {
    fn from(value: TransactionId) -> Self {
        value.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored transaction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    /// Free-form type, e.g. `"cars"` or `"shopping"`.
    pub kind: String,
    pub amount: f64,
    pub parent_id: Option<TransactionId>,
}

/// Payload for [`Engine::create`](crate::Engine::create).
///
/// The transport is expected to have validated `kind` and `amount` already.
#[derive(Clone, Debug, PartialEq)]
pub struct NewTransaction {
    pub kind: String,
    pub amount: f64,
    pub parent_id: Option<TransactionId>,
}

impl NewTransaction {
    pub fn new(kind: impl Into<String>, amount: f64) -> Self {
        Self {
            kind: kind.into(),
            amount,
            parent_id: None,
        }
    }

    /// Sets the parent of the new transaction.
    pub fn with_parent(mut self, parent_id: impl Into<TransactionId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub(crate) fn into_transaction(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            kind: self.kind,
            amount: self.amount,
            parent_id: self.parent_id,
        }
    }
}
