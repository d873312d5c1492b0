//! Prompt templates sent to the generation service.

use super::status::Mood;

/// Recipient used in the message prompt when the card has none.
pub const FALLBACK_RECIPIENT: &str = "someone special";

/// Message used when the service returns an empty text.
pub const FALLBACK_MESSAGE: &str = "Happy Valentine's Day!";

/// Prompt for a short card message.
pub fn message_prompt(recipient: &str, mood: Mood) -> String {
    let recipient = match recipient.trim() {
        "" => FALLBACK_RECIPIENT,
        r => r,
    };
    format!(
        "Write a short, heartfelt Valentine's Day message for {}. The mood should be {}. \
         Keep it under 200 characters. Return only the message text.",
        recipient, mood
    )
}

/// Prompt for a still background image.
pub fn image_prompt(scene: &str) -> String {
    format!(
        "A high-quality romantic background for a Valentine card. {}. Artistic, soft lighting.",
        scene.trim()
    )
}

/// Prompt for a short background clip.
pub fn video_prompt(scene: &str) -> String {
    format!(
        "A cinematic, romantic Valentine's Day scene: {}. Slow motion, beautiful lighting.",
        scene.trim()
    )
}
