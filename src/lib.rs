//! HeartCard - shareable AI-assisted greeting cards.
//!
//! This crate provides the logic core of a serverless greeting card app:
//!
//! - **Share links**: the whole card round-trips through a URL fragment, so a
//!   card is shared by sending its link. No backend storage.
//! - **AI generation**: message text, background images and short background
//!   videos are produced by an external generation service, one at a time,
//!   with progress reported as an ordered event stream.
//! - **Failure-safe edits**: generation operations return an updated card on
//!   success and leave the caller's card untouched on failure.
//!
//! # Example
//!
//! ```rust
//! use heartcard::{card, Theme};
//!
//! // Start from whatever the link carries, or the default card
//! let mut state = card::decode_or_default("");
//!
//! // User edits locally
//! state = state.with_recipient("Robin").with_theme(Theme::Pink);
//!
//! // Rewrite the share link after every change
//! let link = card::share_url("https://cards.example/", &state);
//! assert_eq!(card::decode(card::fragment_of(&link)).unwrap(), state);
//! ```

pub mod error;

// Card module
pub mod card;

// Generation module
pub mod generation;

// Re-exports for convenience
pub use error::{DecodeError, DecodeResult, GenerationError, GenerationResult};
pub use card::{BackgroundKind, CardState, Theme};
pub use generation::{
    GenerationConfig, GenerationCoordinator, GenerationService, GenerationStatus, Mood,
    ProgressEvent, VideoPhase,
};

#[cfg(feature = "wasm")]
pub use card::JsCard;

#[cfg(feature = "gemini")]
pub use generation::{GeminiClient, GeminiConfig};
