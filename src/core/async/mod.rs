//! Asynchronous implementations of core components
//!
//! This module provides thread-safe, concurrent balance accrual using
//! DashMap for locking.
//!
//! # Architecture
//!
//! - **AsyncBalanceLedger**: Thread-safe per-participant balances using DashMap
//! - **BatchProcessor**: Deals expense batches across tokio tasks
//!
//! Settlement itself (classification, sort, matching) is cheap and stays
//! single-threaded in `SettlementEngine`; only accrual is parallelised.

pub mod batch_processor;
pub mod ledger;

pub use batch_processor::BatchProcessor;
pub use ledger::AsyncBalanceLedger;
