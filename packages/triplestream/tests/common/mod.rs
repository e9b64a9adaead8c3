//! Common test utilities for triplestream
//!
//! Fixtures build graphs (RDF lists, typed objects); probes wrap iterations
//! and sources to observe pulls, closes and injected failures.

#![allow(dead_code)]

mod fixtures;
mod probes;

pub use fixtures::*;
pub use probes::*;
