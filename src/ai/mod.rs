//! Vision model integration
//!
//! Delegates cadastral map analysis to a hosted multimodal completion API.
//! The handler only sees [`VisionService`], so tests can swap in
//! [`MockVisionClient`].

pub mod mock;
pub mod openai;

pub use mock::MockVisionClient;
pub use openai::OpenAiVisionClient;

use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait VisionService: Send + Sync {
    /// Ask the model for out-of-bounds constructions in the image behind
    /// `data_url` and return its raw text answer.
    async fn detect_constructions(&self, data_url: &str) -> Result<String>;
}
