//! # storage-adapters
//!
//! Reference implementation of the entity-store ports. The production
//! boundary is a document store reached over the repo traits in `domains`;
//! this crate ships the in-process DashMap-backed implementation used by
//! the binary and the test suites.

pub mod memory;

pub use memory::MemoryStore;
