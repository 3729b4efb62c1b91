//! Benchmark utilities for the Sable engine.
//!
//! This crate provides benchmarking infrastructure for the component-type
//! registry:
//!
//! - **Microbenchmarks**: registration and per-instance allocation cost
//! - **Memory tracking**: heap allocation profiling via dhat
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench -p sable_bench
//!
//! # Run specific benchmark group
//! cargo bench -p sable_bench -- allocate
//!
//! # Run with memory profiling (slower)
//! cargo bench -p sable_bench --features memory_profiling
//! ```
//!
//! # Benchmark Results
//!
//! Results are written to `target/criterion/` with HTML reports for
//! visualization. Memory profiling results are written to `dhat-heap.json`
//! for viewing with DHAT's viewer.

pub mod components;
pub mod memory;
