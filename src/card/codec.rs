//! Share-link codec: `CardState` <-> URL fragment.
//!
//! The fragment is the card's JSON encoded as URL-safe base64 without
//! padding. Decoding also accepts the standard alphabet and padded input, so
//! links written with `btoa` by the browser front-end still load. `btoa`
//! writes one byte per character, so those payloads may be Latin-1 rather
//! than UTF-8.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use tracing::{debug, warn};

use super::model::CardState;
use crate::error::{DecodeError, DecodeResult};

/// Share links longer than this are unreliable in browsers and chat clients.
pub const PRACTICAL_URL_LIMIT: usize = 8192;

const FRAGMENT_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

const LEGACY_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encodes a card into a fragment string (without the leading `#`).
///
/// The output only contains `[A-Za-z0-9_-]`.
pub fn encode(state: &CardState) -> String {
    // CardState is plain strings and unit enums; serialization cannot fail.
    let json = serde_json::to_vec(state).unwrap_or_default();
    FRAGMENT_ENGINE.encode(json)
}

/// Decodes a fragment produced by [`encode`].
///
/// A leading `#` and surrounding whitespace are ignored.
pub fn decode(fragment: &str) -> DecodeResult<CardState> {
    let fragment = fragment.trim();
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment).trim();
    if fragment.is_empty() {
        return Err(DecodeError::Empty);
    }

    let json = if is_legacy(fragment) {
        match String::from_utf8(LEGACY_ENGINE.decode(fragment)?) {
            Ok(json) => json,
            Err(e) => {
                debug!("Legacy link is not UTF-8, reading as Latin-1");
                latin1(e.as_bytes())
            }
        }
    } else {
        String::from_utf8(FRAGMENT_ENGINE.decode(fragment)?)?
    };
    Ok(serde_json::from_str(&json)?)
}

/// `encode` never emits `+`, `/` or padding.
fn is_legacy(fragment: &str) -> bool {
    fragment.contains(|c: char| c == '+' || c == '/' || c == '=')
}

fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Decodes a fragment, falling back to the default card on any failure.
pub fn decode_or_default(fragment: &str) -> CardState {
    match decode(fragment) {
        Ok(state) => state,
        Err(DecodeError::Empty) => {
            debug!("No shared card in link, using default");
            CardState::default()
        }
        Err(e) => {
            warn!(error = %e, "Could not hydrate card from link, using default");
            CardState::default()
        }
    }
}

/// Returns the part of `url` after the first `#`, or `""`.
pub fn fragment_of(url: &str) -> &str {
    url.split_once('#').map(|(_, frag)| frag).unwrap_or("")
}

/// Builds a share link: `base` with its fragment replaced by the encoded card.
pub fn share_url(base: &str, state: &CardState) -> String {
    let base = base.split_once('#').map(|(b, _)| b).unwrap_or(base);
    let url = format!("{}#{}", base, encode(state));
    if url.len() > PRACTICAL_URL_LIMIT {
        warn!(
            len = url.len(),
            limit = PRACTICAL_URL_LIMIT,
            "Share link exceeds practical URL length"
        );
    }
    url
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::model::{BackgroundKind, Theme};

    fn sample() -> CardState {
        CardState::new("Jordan ❤", "Roses are red,\nbase64 is \"fun\" & <safe>?")
            .with_background("https://example.com/a.png?x=1&y=2#frag", BackgroundKind::Image)
            .with_theme(Theme::Light)
    }

    #[test]
    fn test_roundtrip() {
        let card = sample();
        let encoded = encode(&card);
        assert_eq!(decode(&encoded).unwrap(), card);
    }

    #[test]
    fn test_encode_is_fragment_safe() {
        let encoded = encode(&sample());
        assert!(encoded
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_decode_empty() {
        assert!(matches!(decode(""), Err(DecodeError::Empty)));
        assert!(matches!(decode("#"), Err(DecodeError::Empty)));
        assert!(matches!(decode("   "), Err(DecodeError::Empty)));
    }

    #[test]
    fn test_decode_garbage() {
        assert!(matches!(decode("!!not base64!!"), Err(DecodeError::Base64(_))));
        // Valid base64, not JSON.
        let not_json = FRAGMENT_ENGINE.encode("hello world");
        assert!(matches!(decode(&not_json), Err(DecodeError::Json(_))));
        // Valid JSON, wrong shape.
        let wrong_shape = FRAGMENT_ENGINE.encode(r#"{"recipient":"x"}"#);
        assert!(matches!(decode(&wrong_shape), Err(DecodeError::Json(_))));
        // Not UTF-8.
        let binary = FRAGMENT_ENGINE.encode([0xff, 0xfe, 0xfd]);
        assert!(matches!(decode(&binary), Err(DecodeError::Utf8(_))));
    }

    #[test]
    fn test_decode_legacy_btoa_link() {
        // What the browser front-end writes: standard alphabet, padded.
        let json = r#"{"recipient":"My Love","message":"Hi?>","bgUrl":"https://x.test/a.jpg","bgType":"video","theme":"pink"}"#;
        let legacy = base64::engine::general_purpose::STANDARD.encode(json);
        let card = decode(&format!("#{}", legacy)).unwrap();
        assert_eq!(card.recipient, "My Love");
        assert_eq!(card.background_kind, BackgroundKind::Video);
        assert_eq!(card.theme, Theme::Pink);
    }

    #[test]
    fn test_decode_legacy_latin1_link() {
        let json = r#"{"recipient":"Zoë","message":"À bientôt, chérie","bgUrl":"https://x.test/a.jpg","bgType":"image","theme":"dark"}"#;
        let mut bytes: Vec<u8> = json.chars().map(|c| c as u8).collect();
        // btoa pads to a multiple of three; keep the padding in the link.
        if bytes.len() % 3 == 0 {
            bytes.push(b' ');
        }
        let legacy = base64::engine::general_purpose::STANDARD.encode(&bytes);
        assert!(legacy.ends_with('='));

        let card = decode(&legacy).unwrap();
        assert_eq!(card.recipient, "Zoë");
        assert_eq!(card.message, "À bientôt, chérie");
        assert_eq!(decode_or_default(&format!("#{}", legacy)).recipient, "Zoë");
    }

    #[test]
    fn test_decode_or_default() {
        assert_eq!(decode_or_default(""), CardState::default());
        assert_eq!(decode_or_default("%%%"), CardState::default());
        let card = sample();
        assert_eq!(decode_or_default(&encode(&card)), card);
    }

    #[test]
    fn test_share_url_replaces_fragment() {
        let card = sample();
        let url = share_url("https://cards.example/#old-state", &card);
        assert!(url.starts_with("https://cards.example/#"));
        assert_eq!(decode(fragment_of(&url)).unwrap(), card);
    }

    #[test]
    fn test_fragment_of() {
        assert_eq!(fragment_of("https://a.test/"), "");
        assert_eq!(fragment_of("https://a.test/#abc"), "abc");
        assert_eq!(fragment_of("#xyz"), "xyz");
    }

    #[test]
    fn test_typical_link_length() {
        let card = CardState::default();
        assert!(share_url("https://cards.example/", &card).len() < PRACTICAL_URL_LIMIT);
    }
}
