//! The module contains the errors the engine can return.
//!
//! Caller errors leave the store untouched:
//!
//! - [`Conflict`] returned when a transaction id is already taken.
//! - [`ParentNotFound`] returned when the declared parent does not exist.
//! - [`SelfParent`] returned when a transaction names itself as parent.
//!
//! Corruption errors mean a parent chain no longer looks like something
//! [`Engine::create`] could have produced:
//!
//! - [`CyclicData`] returned when a parent-chain walk revisits a transaction.
//! - [`BrokenChain`] returned when a parent-chain walk reaches a missing id.
//!
//!  [`Conflict`]: EngineError::Conflict
//!  [`ParentNotFound`]: EngineError::ParentNotFound
//!  [`SelfParent`]: EngineError::SelfParent
//!  [`CyclicData`]: EngineError::CyclicData
//!  [`BrokenChain`]: EngineError::BrokenChain
//!  [`Engine::create`]: crate::Engine::create
use thiserror::Error;

use crate::TransactionId;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("transaction {0} already exists")]
    Conflict(TransactionId),
    #[error("parent {0} not found")]
    ParentNotFound(TransactionId),
    #[error("transaction {0} cannot be its own parent")]
    SelfParent(TransactionId),
    #[error("cyclic parent chain detected at transaction {0}")]
    CyclicData(TransactionId),
    #[error("parent chain of transaction {from} is broken: {missing} not found")]
    BrokenChain {
        from: TransactionId,
        missing: TransactionId,
    },
}

impl EngineError {
    /// Returns `true` when the error signals a corrupted store rather than a
    /// bad request.
    pub fn is_corruption(&self) -> bool {
        matches!(self, Self::CyclicData(_) | Self::BrokenChain { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_errors_are_not_corruption() {
        let id = TransactionId::new(1);
        assert!(!EngineError::Conflict(id).is_corruption());
        assert!(!EngineError::ParentNotFound(id).is_corruption());
        assert!(!EngineError::SelfParent(id).is_corruption());
    }

    #[test]
    fn chain_errors_are_corruption() {
        let id = TransactionId::new(1);
        assert!(EngineError::CyclicData(id).is_corruption());
        assert!(
            EngineError::BrokenChain {
                from: id,
                missing: TransactionId::new(2)
            }
            .is_corruption()
        );
    }

    #[test]
    fn messages_name_the_transaction() {
        let err = EngineError::BrokenChain {
            from: TransactionId::new(7),
            missing: TransactionId::new(3),
        };
        assert_eq!(
            err.to_string(),
            "parent chain of transaction 7 is broken: 3 not found"
        );
        assert_eq!(
            EngineError::Conflict(TransactionId::new(9)).to_string(),
            "transaction 9 already exists"
        );
    }
}
