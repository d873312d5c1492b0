//! Data models for a shareable card.
//!
//! Field and variant names on the wire match the browser front-end's JSON
//! (`bgUrl`, `bgType`, lowercase enums), so links it produced keep decoding.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default recipient shown on a fresh card.
pub const DEFAULT_RECIPIENT: &str = "My Love";

/// Default message shown on a fresh card.
pub const DEFAULT_MESSAGE: &str =
    "You make every day feel like Valentine's Day. Happy Valentine's Day, my dear! 💖";

/// Default background image.
pub const DEFAULT_BACKGROUND_URL: &str =
    "https://images.unsplash.com/photo-1518199266791-5375a83190b7?auto=format&fit=crop&q=80&w=1200";

// =============================================================================
// CARD STATE
// =============================================================================

/// The user-editable, shareable content of a single card.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardState {
    /// Name shown on the card.
    pub recipient: String,

    /// Body of the card.
    pub message: String,

    /// Image, video or uploaded blob URL.
    #[serde(rename = "bgUrl")]
    pub background_url: String,

    /// How `background_url` is rendered.
    #[serde(rename = "bgType")]
    pub background_kind: BackgroundKind,

    /// Cosmetic theme.
    pub theme: Theme,
}

impl CardState {
    /// Creates a card with the given recipient and message on the default background.
    pub fn new(recipient: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            message: message.into(),
            ..Self::default()
        }
    }

    /// Builder: Set recipient.
    pub fn with_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipient = recipient.into();
        self
    }

    /// Builder: Set message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Builder: Set background URL and kind together.
    pub fn with_background(mut self, url: impl Into<String>, kind: BackgroundKind) -> Self {
        self.background_url = url.into();
        self.background_kind = kind;
        self
    }

    /// Builder: Set theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Applies an uploaded file as the background.
    ///
    /// The kind is inferred from the MIME type: `video/*` renders as video,
    /// anything else as an image.
    pub fn set_uploaded_background(&mut self, url: impl Into<String>, mime_type: &str) {
        self.background_url = url.into();
        self.background_kind = BackgroundKind::from_mime(mime_type);
    }

    /// Replaces the card with the default card.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Default for CardState {
    fn default() -> Self {
        Self {
            recipient: DEFAULT_RECIPIENT.to_string(),
            message: DEFAULT_MESSAGE.to_string(),
            background_url: DEFAULT_BACKGROUND_URL.to_string(),
            background_kind: BackgroundKind::Image,
            theme: Theme::Dark,
        }
    }
}

// =============================================================================
// BACKGROUND KIND
// =============================================================================

/// How the card background is rendered.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundKind {
    #[default]
    Image,
    Video,
    Color,
}

impl BackgroundKind {
    /// Infers the kind from an uploaded file's MIME type.
    pub fn from_mime(mime_type: &str) -> Self {
        if mime_type.trim().to_ascii_lowercase().starts_with("video/") {
            Self::Video
        } else {
            Self::Image
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Color => "color",
        }
    }
}

impl fmt::Display for BackgroundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackgroundKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "image" => Ok(Self::Image),
            "video" => Ok(Self::Video),
            "color" => Ok(Self::Color),
            other => Err(format!("unknown background kind '{}'", other)),
        }
    }
}

// =============================================================================
// THEME
// =============================================================================

/// Cosmetic card theme.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
    Pink,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
            Self::Pink => "pink",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            "pink" => Ok(Self::Pink),
            other => Err(format!("unknown theme '{}'", other)),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
