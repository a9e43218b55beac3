//! Process Catalog for Caseflow
//!
//! The catalog is the single routing authority: a fixed set of process
//! graphs, compiled in and validated at construction, shared by reference
//! for the life of the deployment. Nothing here touches storage; routing is
//! a pure function of (process, completed task, variables).
//!
//! # Key Concepts
//!
//! - **RoutingRule**: The authoring form of one task's outgoing edge. Plain
//!   data, no callbacks: an unconditional `Next`, a `Terminal` outcome, or a
//!   two-way gateway on a single typed variable.
//! - **ProcessDefinition**: A validated, compiled graph. Construction
//!   rejects dangling targets, unreachable tasks, missing rules, and
//!   duplicates, so routing can never fall off the edge of a well-formed
//!   definition at runtime.
//! - **ProcessCatalog**: The per-deployment set of definitions plus
//!   [`route`](ProcessCatalog::route), the one question the engine asks:
//!   given this completed task and these variables, what happens next?
//!
//! # Design Principles
//!
//! 1. Gateways are structurally exhaustive. Both forms carry both branches;
//!    an unhandled decision value is unrepresentable.
//! 2. Absent gateway fields read as the declared default (booleans) or take
//!    the non-accepting branch (decision strings). A present value of the
//!    wrong type is a configuration error, never a coercion.
//! 3. A routing miss is a hard error the caller must surface, not a silent
//!    no-op.

#![deny(unsafe_code)]

mod builtin;
mod catalog;
mod definition;
mod error;
mod rule;

pub use builtin::*;
pub use catalog::*;
pub use definition::*;
pub use error::*;
pub use rule::*;
