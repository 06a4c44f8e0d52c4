//! Payments domain module: provider transactions, refunds and disputes.

pub mod transaction;

pub use transaction::{
    Dispute, Refund, Transaction, TransactionAmount, TransactionId, TransactionStatus,
};
