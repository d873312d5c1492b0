//! Status and progress types for generation attempts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which card field a generation produces.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GenerationKind {
    Message,
    Image,
    Video,
}

impl GenerationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::Image => "image",
            Self::Video => "video",
        }
    }

    /// Shown when a failure carries no message of its own.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::Message => "Failed to generate message",
            Self::Image => "Failed to generate image",
            Self::Video => "Video generation failed. Ensure you have a paid API key selected.",
        }
    }
}

impl fmt::Display for GenerationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tone requested for a generated message.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    #[default]
    Romantic,
    Funny,
    Poetic,
    Minimal,
}

impl Mood {
    pub const ALL: [Mood; 4] = [Mood::Romantic, Mood::Funny, Mood::Poetic, Mood::Minimal];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Romantic => "romantic",
            Self::Funny => "funny",
            Self::Poetic => "poetic",
            Self::Minimal => "minimal",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Mood::ALL
            .into_iter()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| format!("unknown mood '{}'", s.trim()))
    }
}

// =============================================================================
// GENERATION STATUS
// =============================================================================

/// Transient status of the current (or most recent) generation attempt.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerationStatus {
    /// True while exactly one generation is in flight.
    pub is_generating: bool,

    /// Human-readable progress message.
    pub progress: String,

    /// Set when the most recent attempt failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerationStatus {
    /// Idle status with no error.
    pub fn idle() -> Self {
        Self::default()
    }

    /// In-flight status with the given progress message.
    pub fn started(progress: impl Into<String>) -> Self {
        Self {
            is_generating: true,
            progress: progress.into(),
            error: None,
        }
    }

    /// Idle status recording the outcome of the last attempt.
    pub fn finished(error: Option<String>) -> Self {
        Self {
            is_generating: false,
            progress: String::new(),
            error,
        }
    }
}

// =============================================================================
// VIDEO STATE MACHINE
// =============================================================================

/// States of a long-running video generation.
///
/// `Submitted -> Rendering -> Done`, or `-> Failed` from any state. There is
/// no cancellation transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoPhase {
    /// The service accepted the request.
    Submitted,
    /// Waiting for the render; `polls` counts status checks so far.
    Rendering { polls: u32 },
    /// The result was fetched and materialized into `handle`.
    Done { handle: String },
    /// The job failed; the message matches the returned error.
    Failed { reason: String },
}

impl VideoPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done { .. } | Self::Failed { .. })
    }
}

/// Ordered progress events emitted by the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// A generation began; `message` is the initial progress text.
    Started { kind: GenerationKind, message: String },
    /// The in-flight generation updated its progress text.
    Progress { kind: GenerationKind, message: String },
    /// The video state machine changed state.
    Video(VideoPhase),
    /// The generation completed successfully.
    Finished { kind: GenerationKind },
    /// The generation failed with a user-readable message.
    Failed { kind: GenerationKind, message: String },
}
