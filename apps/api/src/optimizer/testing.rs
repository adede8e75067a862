//! Backend doubles shared by the optimizer tests.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::llm_client::{LlmError, TextGenerator};

type Responder = Box<dyn Fn(&str) -> Result<String, LlmError> + Send + Sync>;

/// A `TextGenerator` that answers from a closure and records every prompt
/// along with the (virtual) instant it arrived.
pub struct StubBackend {
    responder: Responder,
    delay: Option<Duration>,
    calls: Mutex<Vec<(String, Instant)>>,
}

impl StubBackend {
    pub fn replying<F>(responder: F) -> Self
    where
        F: Fn(&str) -> Result<String, LlmError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn always(text: &str) -> Self {
        let text = text.to_string();
        Self::replying(move |_| Ok(text.clone()))
    }

    pub fn failing(error: LlmError) -> Self {
        Self::replying(move |_| Err(error.clone()))
    }

    /// Plausible answers for every section kind, keyed off the prompt text.
    pub fn cooperative() -> Self {
        Self::replying(|prompt| {
            if prompt.contains("ORIGINAL SUMMARY") {
                Ok("Rewritten summary.".to_string())
            } else if prompt.contains("ORIGINAL BULLETS") {
                Ok("```json\n[\"Rewritten bullet one\", \"Rewritten bullet two\"]\n```".to_string())
            } else if prompt.contains("ORIGINAL DESCRIPTION") {
                Ok("Rewritten project description.".to_string())
            } else {
                Ok("Suggestions: [\"Docker\", \"Kubernetes\"]".to_string())
            }
        })
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(p, _)| p.clone())
            .collect()
    }

    pub fn call_instants(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(_, t)| *t).collect()
    }
}

#[async_trait]
impl TextGenerator for StubBackend {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), Instant::now()));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.responder)(prompt)
    }
}
