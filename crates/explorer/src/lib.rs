//! Explorer - LLM Sampling Parameter Sweeps
//!
//! Runs one prompt across a grid of temperature and top-p values, scores
//! every completion with [`assay`], and keeps the results for later
//! comparison and export. The same operations are exposed through the
//! `explorer` CLI and the `explorer_server` REST API.

pub mod cli;
pub mod completion;
pub mod config;
pub mod error;
pub mod experiment;
pub mod export;
pub mod model;
pub mod server;
pub mod storage;
pub mod summary;

pub use config::ExplorerConfig;
pub use error::{ExplorerError, Result};
pub use experiment::{ExperimentRunner, RunnerOptions};
pub use model::{Experiment, ExperimentWithResponses, GenerateResponse, NewResponse, ResponseRecord};
