//! Domain Types for Caseflow
//!
//! Caseflow processes are fixed graphs of human approval tasks. Every task
//! belongs to an organizational role; completing one feeds form data into the
//! instance's variable map and hands control to the routing catalog.
//!
//! # Key Concepts
//!
//! - **ProcessKey / TaskKey / Role**: Closed vocabularies for the routing
//!   domain. Keys are sum types, not strings, so a typo is a compile error;
//!   each variant still knows its canonical wire string.
//! - **ProcessInstance**: One running (or finished) occurrence of a process,
//!   carrying the merged variable map and a monotonic status.
//! - **Task**: A unit of human work, `PENDING` until exactly one actor
//!   completes it.
//! - **HistoryEntry**: An immutable, hash-chained audit record. Chains are
//!   per instance; `verify_chain` recomputes them end to end.
//!
//! # Design Principles
//!
//! 1. Statuses only move forward. `ACTIVE` may end in `COMPLETED` or
//!    `REJECTED`; terminal statuses never change again.
//! 2. History is append-only. Nothing in this workspace can update or delete
//!    an entry once written.
//! 3. User names in history are point-in-time snapshots, so later roster
//!    changes never rewrite the past.

#![deny(unsafe_code)]

mod history;
mod ids;
mod instance;
mod keys;
mod role;
mod status;
mod task;
mod user;
mod variables;

pub use history::*;
pub use ids::*;
pub use instance::*;
pub use keys::*;
pub use role::*;
pub use status::*;
pub use task::*;
pub use user::*;
pub use variables::*;
