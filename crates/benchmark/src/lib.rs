//! Benchmark Suite for U-Stability
//!
//! This crate provides:
//! - Synthetic structure generation with known stable maxima
//! - Benchmark runner solving every case with every strategy in parallel
//! - Result recording, JSON output and per-strategy summaries

mod result;
mod runner;
mod synthetic;

pub use result::{BenchmarkMetadata, BenchmarkResult, RunResult, StrategySummary};
pub use runner::{BenchmarkConfig, BenchmarkRunner};
pub use synthetic::{StructureCase, SyntheticDatasets, SyntheticGenerator};
