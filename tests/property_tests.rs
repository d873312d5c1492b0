//! Property-based tests for the share-link codec
//!
//! Uses proptest to verify the round-trip law and that decoding never panics.

use heartcard::card::{self, BackgroundKind, CardState, Theme};
use proptest::prelude::*;

// ============================================================================
// Strategy Generators
// ============================================================================

fn kind_strategy() -> impl Strategy<Value = BackgroundKind> {
    prop_oneof![
        Just(BackgroundKind::Image),
        Just(BackgroundKind::Video),
        Just(BackgroundKind::Color),
    ]
}

fn theme_strategy() -> impl Strategy<Value = Theme> {
    prop_oneof![Just(Theme::Dark), Just(Theme::Light), Just(Theme::Pink)]
}

/// Arbitrary cards, including unicode, quotes, newlines and empty fields
fn card_strategy() -> impl Strategy<Value = CardState> {
    (
        any::<String>(),
        prop::string::string_regex("(?s).{0,300}").expect("valid regex"),
        prop::string::string_regex("[a-z]{0,10}:[ -~]{0,120}").expect("valid regex"),
        kind_strategy(),
        theme_strategy(),
    )
        .prop_map(|(recipient, message, url, kind, theme)| {
            CardState::new(recipient, message)
                .with_background(url, kind)
                .with_theme(theme)
        })
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// decode(encode(s)) == s, field for field
    #[test]
    fn encode_decode_roundtrip(state in card_strategy()) {
        let fragment = card::encode(&state);
        prop_assert_eq!(card::decode(&fragment).unwrap(), state);
    }

    /// Encoded fragments never need escaping in a URL
    #[test]
    fn encoded_fragment_is_url_safe(state in card_strategy()) {
        let fragment = card::encode(&state);
        prop_assert!(fragment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    /// Re-encoding a decoded fragment reproduces it exactly
    #[test]
    fn encoding_is_idempotent(state in card_strategy()) {
        let once = card::encode(&state);
        let twice = card::encode(&card::decode(&once).unwrap());
        prop_assert_eq!(once, twice);
    }

    /// Arbitrary input either decodes or errors; decode_or_default always yields a card
    #[test]
    fn decode_never_panics(input in any::<String>()) {
        let _ = card::decode(&input);
        let _ = card::decode_or_default(&input);
    }

    /// Share links carry the card through the fragment whatever the base URL was
    #[test]
    fn share_url_roundtrip(state in card_strategy(), path in "[a-z/]{0,20}") {
        let base = format!("https://cards.example/{}#stale", path);
        let url = card::share_url(&base, &state);
        prop_assert_eq!(card::decode(card::fragment_of(&url)).unwrap(), state);
    }
}
