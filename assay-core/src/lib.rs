// assay-core/src/lib.rs

// 1. Mandatory documentation for production code
#![allow(missing_docs)]

// 2. Memory safety
#![deny(unsafe_code)]
// 3. Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// 4. Performance
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Ports (Interfaces / Traits)
// Contracts for reading raw batches and publishing snapshots.
pub mod ports;

// 2. Domain (business core)
// Schemas, dedup, standardization, rules, partition, pruning, derivation, metrics.
// Depends on nothing else in the crate.
pub mod domain;

// 3. Infrastructure (Adapters)
// Config files, JSON source/sink, atomic filesystem writes.
pub mod infrastructure;

// 4. Application (Use Cases)
// Orchestration (Pipeline, Clean, Report).
pub mod application;

// --- GLOBAL ERROR HANDLING ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
// use assay_core::AssayError;
pub use error::AssayError;
