//! REST API for the explorer
//!
//! Exposes sweeps, experiment history and exports over HTTP using axum.
//! Every JSON body is wrapped in the [`types::BaseResponse`] envelope.

pub mod handlers;
pub mod routing;
pub mod startup;
pub mod state;
pub mod types;
