//! Caseflow storage abstractions.
//!
//! This crate defines the persistence contract for the workflow engine:
//! - process instances and their variable maps (system of record)
//! - workflow tasks with a single-pending-per-instance invariant
//! - append-only, hash-chained history logs
//! - composite commits that apply a whole workflow step atomically
//!
//! Design stance:
//! - Postgres is the transactional source of truth; the in-memory adapter
//!   mirrors its semantics for tests and demos.
//! - The engine prepares complete write-sets; backends apply them atomically
//!   or reject them without side effects.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]
#![warn(rust_2018_idioms)]

mod error;
pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;
mod model;
mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::{demo_roster, InMemoryStore, InMemoryUserDirectory};
pub use model::{StartReceipt, StartTransaction, TransitionReceipt, TransitionTransaction};
pub use traits::{
    HistoryStore, InstanceStore, QueryWindow, TaskStore, TransactionStore, UserDirectory,
    WorkflowStore,
};
