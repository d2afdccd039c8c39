use super::VisionService;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Failure(String),
}

/// Scripted stand-in for the vision model.
///
/// Replies are served in order and cycle once exhausted. Clones share the
/// same script and counters, so a clone can be kept as a probe after the
/// original is moved into the router.
#[derive(Clone)]
pub struct MockVisionClient {
    replies: Arc<Mutex<Vec<MockReply>>>,
    received: Arc<Mutex<Vec<String>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockVisionClient {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(Vec::new())),
            received: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push(MockReply::Text(response.into()));
        self
    }

    /// Make the next scripted call fail with an upstream error.
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push(MockReply::Failure(message.into()));
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Data URLs received so far, oldest first.
    pub fn received_data_urls(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }
}

impl Default for MockVisionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VisionService for MockVisionClient {
    async fn detect_constructions(&self, data_url: &str) -> Result<String> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;
        self.received.lock().unwrap().push(data_url.to_string());

        let replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            return Ok("[]".to_string());
        }

        match &replies[(*count - 1) % replies.len()] {
            MockReply::Text(text) => Ok(text.clone()),
            MockReply::Failure(message) => Err(Error::AiProvider(message.clone())),
        }
    }
}
