//! Generation module.
//!
//! Coordinates AI-assisted generation of card messages, background images and
//! background videos against an external generation service.

pub mod status;
pub mod prompt;
pub mod service;
pub mod resource;
pub mod scripted;
pub mod coordinator;

#[cfg(feature = "gemini")]
pub mod gemini;

// Re-exports for convenience
pub use status::{GenerationKind, GenerationStatus, Mood, ProgressEvent, VideoPhase};
pub use service::{FetchedResource, GenerationService, VideoOperation, VideoPoll};
pub use resource::{DataUrlStore, DirectoryStore, ResourceStore};
pub use scripted::{ScriptedService, ServiceCall};
pub use coordinator::{GenerationConfig, GenerationCoordinator};

#[cfg(feature = "gemini")]
pub use gemini::{GeminiClient, GeminiConfig};
