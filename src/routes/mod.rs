//! Route-specific data types.
//!
//! Each submodule defines the serializable data shapes for one area of the
//! API surface, kept separate from the handlers so the service layer and the
//! HTTP layer share them.

pub mod autoschedule;
pub mod conflicts;
