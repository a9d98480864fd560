//! # BradlBot Transport
//!
//! Concrete [`Transport`](bradl_core::Transport) implementations.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │  bradl-runtime      │  (intake loop, dispatch)
//! ├─────────────────────┤
//! │  bradl-core         │  (Transport trait, events)
//! ├─────────────────────┤
//! │  bradl-transport    │  <- This crate (implementations)
//! ├─────────────────────┤
//! │  stdin/stdout, mpsc │
//! └─────────────────────┘
//! ```
//!
//! | Transport | Description | Use Case |
//! |-----------|-------------|----------|
//! | [`MemoryTransport`] | Channel-fed events, recorded actions | Tests, embedding |
//! | `ConsoleTransport` | Lines from stdin, replies to stdout | Local operation |
//!
//! ## Features
//!
//! - `console` (default): the stdin/stdout transport

#[cfg(feature = "console")]
pub mod console;
pub mod memory;

#[cfg(feature = "console")]
pub use console::ConsoleTransport;
pub use memory::{Action, MemoryHandle, MemoryTransport};
