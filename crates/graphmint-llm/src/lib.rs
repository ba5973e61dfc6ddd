//! Graphmint LLM Layer
//!
//! Pluggable [`ExtractionClient`] implementations.
//!
//! # Architecture
//!
//! This crate provides implementations of the `ExtractionClient` trait
//! from `graphmint-domain`. The extraction core is generic over the
//! trait and never names a backend; swapping models is a construction
//! detail.
//!
//! # Clients
//!
//! - `MockClient`: deterministic mock for testing
//! - `OllamaClient`: local Ollama API integration
//!
//! # Examples
//!
//! ```
//! use graphmint_llm::MockClient;
//! use graphmint_domain::traits::ExtractionClient;
//!
//! let client = MockClient::new(r#"{"Nodes": [], "Edges": []}"#);
//! let result = client.extract("any prompt").unwrap();
//! assert!(result.contains("Nodes"));
//! ```

#![warn(missing_docs)]

pub mod ollama;

use graphmint_domain::traits::ExtractionClient;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use ollama::OllamaClient;

/// Errors that can occur during extraction calls
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from the model
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Mock extraction client for deterministic testing
///
/// Returns pre-configured responses without making any network calls.
///
/// # Examples
///
/// ```
/// use graphmint_llm::MockClient;
/// use graphmint_domain::traits::ExtractionClient;
///
/// // Fixed response for every prompt
/// let client = MockClient::new("fixed");
/// assert_eq!(client.extract("any prompt").unwrap(), "fixed");
///
/// // Response chosen by a prompt fragment
/// let mut client = MockClient::default();
/// client.add_response("chunk one", "response one");
/// assert_eq!(client.extract("... chunk one ...").unwrap(), "response one");
/// ```
#[derive(Debug, Clone)]
pub struct MockClient {
    default_response: String,
    responses: Arc<Mutex<Vec<(String, String)>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockClient {
    /// Create a MockClient with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Register a response returned whenever a prompt contains `fragment`
    ///
    /// Prompts are full assembled strings (instructions, schema, input
    /// text), so matching on a fragment of the input text is the
    /// practical way to script per-chunk answers. Fragments are checked
    /// in registration order.
    pub fn add_response(&mut self, fragment: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .push((fragment.into(), response.into()));
    }

    /// Register an error returned whenever a prompt contains `fragment`
    pub fn add_error(&mut self, fragment: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .push((fragment.into(), "ERROR".to_string()));
    }

    /// Number of times `extract` was called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        *self.call_count.lock().unwrap() = 0;
    }
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new(r#"{"Nodes": [], "Edges": []}"#)
    }
}

impl ExtractionClient for MockClient {
    type Error = LlmError;

    fn extract(&self, prompt: &str) -> Result<String, Self::Error> {
        *self.call_count.lock().unwrap() += 1;

        let responses = self.responses.lock().unwrap();
        for (fragment, response) in responses.iter() {
            if prompt.contains(fragment.as_str()) {
                if response == "ERROR" {
                    return Err(LlmError::Other("Mock error".to_string()));
                }
                return Ok(response.clone());
            }
        }

        Ok(self.default_response.clone())
    }
}
