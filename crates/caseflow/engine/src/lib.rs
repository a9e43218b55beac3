//! Workflow Engine for Caseflow
//!
//! The engine drives role-routed approval processes end to end: a requester
//! starts an instance, the catalog's entry task opens, and each completion
//! merges form data, consults the catalog for the successor, and commits the
//! whole transition as one atomic unit against the storage layer.
//!
//! # Key Guarantees
//!
//! - **Route before write**: the successor is resolved on the merged
//!   variables before any record changes, so a routing failure leaves the
//!   instance untouched.
//! - **One winner per task**: concurrent completions of the same task are
//!   serialized by the store's status check-and-set; exactly one caller
//!   succeeds and the rest see [`EngineError::TaskAlreadyCompleted`].
//! - **Complete audit**: every lifecycle step lands in the instance's
//!   hash-chained history via the same transaction that changed state.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![warn(rust_2018_idioms)]

mod engine;
mod error;

pub use engine::WorkflowEngine;
pub use error::{EngineError, EngineResult};
