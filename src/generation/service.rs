//! The external generation service seam.
//!
//! The coordinator only talks to this trait; the Gemini client and the
//! scripted in-process service both implement it.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::GenerationResult;

/// Handle to a submitted, long-running video job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VideoOperation {
    /// Service-assigned operation name.
    pub name: String,
}

impl VideoOperation {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Result of checking on a video job.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VideoPoll {
    /// True once the service has stopped working on the job.
    pub done: bool,

    /// Where the finished clip can be fetched from, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_reference: Option<String>,
}

impl VideoPoll {
    /// The job is still rendering.
    pub fn pending() -> Self {
        Self::default()
    }

    /// The job finished with a fetchable result.
    pub fn ready(reference: impl Into<String>) -> Self {
        Self {
            done: true,
            result_reference: Some(reference.into()),
        }
    }

    /// The job finished but produced nothing usable.
    pub fn empty() -> Self {
        Self {
            done: true,
            result_reference: None,
        }
    }
}

/// Raw bytes of a fetched resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedResource {
    /// MIME type reported by the server (e.g. `video/mp4`).
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl FetchedResource {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

/// An external text/image/video generation backend.
///
/// Text, image and video calls fail with `GenerationError::Service`;
/// `fetch_resource` fails with `GenerationError::Download`.
pub trait GenerationService {
    /// Generates free text for `prompt`.
    fn generate_text(&self, prompt: &str) -> impl Future<Output = GenerationResult<String>> + Send;

    /// Generates an image and returns a URL (possibly a `data:` URL) for it.
    fn generate_image(&self, prompt: &str) -> impl Future<Output = GenerationResult<String>> + Send;

    /// Submits a video job.
    fn submit_video(
        &self,
        prompt: &str,
    ) -> impl Future<Output = GenerationResult<VideoOperation>> + Send;

    /// Checks on a submitted video job.
    fn poll_video(
        &self,
        operation: &VideoOperation,
    ) -> impl Future<Output = GenerationResult<VideoPoll>> + Send;

    /// Downloads the resource behind a result reference.
    fn fetch_resource(
        &self,
        reference: &str,
    ) -> impl Future<Output = GenerationResult<FetchedResource>> + Send;
}
