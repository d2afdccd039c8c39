//! Cadastral construction detector - relays uploaded cadastral maps to a
//! vision model
//!
//! Accepts an image over HTTP, forwards it with a fixed cadastral-analysis
//! prompt to a hosted multimodal model, and returns the model's JSON list of
//! constructions that cross or lie outside the red lot boundaries.

pub mod ai;
pub mod detection;
pub mod error;
pub mod models;
pub mod prompts;
pub mod server;
pub mod upload;

pub use error::{Error, Result};
