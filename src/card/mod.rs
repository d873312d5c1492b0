//! Card module.
//!
//! The shareable card state and the codec that carries it in a link fragment.

pub mod model;
pub mod codec;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-exports for convenience
pub use model::{BackgroundKind, CardState, Theme};
pub use codec::{decode, decode_or_default, encode, fragment_of, share_url, PRACTICAL_URL_LIMIT};

#[cfg(feature = "wasm")]
pub use wasm::JsCard;
