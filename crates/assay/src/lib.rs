//! Assay - Completion Quality Scoring
//!
//! Deterministic text heuristics that turn a raw language-model completion
//! (plus the prompt that produced it) into a structured quality report, and
//! the sampling-parameter grid used to sweep temperature and top-p.
//!
//! Everything in this crate is pure: no I/O, no shared state, safe to call
//! from any number of threads or tasks at once.

pub mod decimal;
pub mod grid;
pub mod metrics;
pub mod text;

pub use grid::{generate_parameter_combinations, ParameterPoint, SweepRequest, ValidationError};
pub use metrics::{calculate_quality_metrics, Metric, MetricDetail, QualityMetrics};
