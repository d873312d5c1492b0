//! In-process generation service that replays scripted responses.
//!
//! Used by tests to drive the coordinator through exact sequences of service
//! replies (e.g. two pending polls, then a finished one), and by the CLI's
//! `--offline` mode.

use std::collections::VecDeque;

use parking_lot::Mutex;

use super::service::{FetchedResource, GenerationService, VideoOperation, VideoPoll};
use crate::error::{GenerationError, GenerationResult};

/// A call the scripted service received, with its argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCall {
    Text(String),
    Image(String),
    SubmitVideo(String),
    PollVideo(String),
    Fetch(String),
}

/// Replays queued responses in order; an exhausted queue yields a service error.
#[derive(Debug, Default)]
pub struct ScriptedService {
    texts: Mutex<VecDeque<GenerationResult<String>>>,
    images: Mutex<VecDeque<GenerationResult<String>>>,
    submissions: Mutex<VecDeque<GenerationResult<VideoOperation>>>,
    polls: Mutex<VecDeque<GenerationResult<VideoPoll>>>,
    fetches: Mutex<VecDeque<GenerationResult<FetchedResource>>>,
    calls: Mutex<Vec<ServiceCall>>,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: Queue a text response.
    pub fn with_text(self, response: GenerationResult<String>) -> Self {
        self.texts.lock().push_back(response);
        self
    }

    /// Builder: Queue an image response.
    pub fn with_image(self, response: GenerationResult<String>) -> Self {
        self.images.lock().push_back(response);
        self
    }

    /// Builder: Queue a video submission response.
    pub fn with_submission(self, response: GenerationResult<VideoOperation>) -> Self {
        self.submissions.lock().push_back(response);
        self
    }

    /// Builder: Queue a poll response.
    pub fn with_poll(self, response: GenerationResult<VideoPoll>) -> Self {
        self.polls.lock().push_back(response);
        self
    }

    /// Builder: Queue a fetch response.
    pub fn with_fetch(self, response: GenerationResult<FetchedResource>) -> Self {
        self.fetches.lock().push_back(response);
        self
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<ServiceCall> {
        self.calls.lock().clone()
    }

    /// Number of calls received so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Number of poll calls received so far.
    pub fn poll_count(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| matches!(c, ServiceCall::PollVideo(_)))
            .count()
    }

    fn next<T>(
        &self,
        queue: &Mutex<VecDeque<GenerationResult<T>>>,
        call: ServiceCall,
    ) -> GenerationResult<T> {
        let what = format!("{:?}", call);
        self.calls.lock().push(call);
        queue
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(GenerationError::service(format!("No scripted response for {}", what))))
    }
}

impl GenerationService for ScriptedService {
    async fn generate_text(&self, prompt: &str) -> GenerationResult<String> {
        self.next(&self.texts, ServiceCall::Text(prompt.to_string()))
    }

    async fn generate_image(&self, prompt: &str) -> GenerationResult<String> {
        self.next(&self.images, ServiceCall::Image(prompt.to_string()))
    }

    async fn submit_video(&self, prompt: &str) -> GenerationResult<VideoOperation> {
        self.next(&self.submissions, ServiceCall::SubmitVideo(prompt.to_string()))
    }

    async fn poll_video(&self, operation: &VideoOperation) -> GenerationResult<VideoPoll> {
        self.next(&self.polls, ServiceCall::PollVideo(operation.name.clone()))
    }

    async fn fetch_resource(&self, reference: &str) -> GenerationResult<FetchedResource> {
        self.next(&self.fetches, ServiceCall::Fetch(reference.to_string()))
    }
}
