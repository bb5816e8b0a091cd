//! Planning core: the prioritization-and-scheduling engine.
//!
//! Given a hierarchical document of tasks and places, this module decides
//! what to do next, keeps that ordering correct under every tree mutation,
//! and stays a pure function of a snapshot plus an explicit clock so that
//! results are replayable and mergeable under replicated-document
//! semantics. The module follows hexagonal architecture:
//!
//! - Domain types and tree algebra in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Mutations, scoring, and projections in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
