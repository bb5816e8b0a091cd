//! Donext: the prioritization and scheduling core of a local-first task
//! manager.
//!
//! This crate decides what the user should do right now: it models a
//! hierarchical task document, transforms it through named mutation
//! intents, and projects a deterministically ordered "do next" list from
//! any snapshot. The document itself is owned by an external replicated
//! store; every function here is a pure, synchronous transform of
//! `(snapshot, …, now)` so results stay replayable and mergeable across
//! devices.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports
//!
//! # Modules
//!
//! - [`plan`]: Document model, mutation intents, priority pipeline,
//!   recurrence sweep, and projections
//! - [`logging`]: Opt-in file-logging bootstrap for embedding applications

pub mod logging;
pub mod plan;
