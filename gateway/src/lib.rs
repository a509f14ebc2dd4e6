//! Assistant Gateway - HTTP gateway over a remote assistants execution service
//!
//! This crate normalizes the heterogeneous run-step records produced by the
//! execution service into a compact client schema, deduplicates re-emitted
//! image artifacts on run completion, and persists an append-only
//! per-thread ledger of exchanges.

pub mod api;
pub mod app_state;
pub mod assistants;
pub mod ledger;
pub mod normalize;
pub mod reconcile;
