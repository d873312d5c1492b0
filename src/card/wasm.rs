//! WASM bindings for the card module.
//!
//! This module exposes the share-link codec to the browser front-end, which
//! keeps the editable card in its own UI state and calls in here whenever the
//! link has to be read or rewritten.

use serde::Serialize;
use serde_wasm_bindgen::{from_value, Serializer};
use wasm_bindgen::prelude::*;

use crate::error::DecodeError;
use super::codec;
use super::model::CardState;

/// Serialize a value to JsValue as a plain JS object.
fn to_js_value<T: Serialize>(value: &T) -> Result<JsValue, serde_wasm_bindgen::Error> {
    value.serialize(&Serializer::new().serialize_maps_as_objects(true))
}

// =============================================================================
// ERROR CONVERSION
// =============================================================================

impl From<DecodeError> for JsValue {
    fn from(err: DecodeError) -> JsValue {
        JsValue::from_str(&err.to_string())
    }
}

// =============================================================================
// MAIN WRAPPER TYPE
// =============================================================================

/// JavaScript-friendly wrapper around a `CardState`.
#[wasm_bindgen]
pub struct JsCard {
    inner: CardState,
}

#[wasm_bindgen]
impl JsCard {
    /// Creates the default card.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// const card = new JsCard();
    /// ```
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsCard {
        JsCard {
            inner: CardState::default(),
        }
    }

    /// Loads a card from `window.location.hash`, falling back to the default.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// const card = JsCard.fromFragment(window.location.hash);
    /// ```
    #[wasm_bindgen(js_name = fromFragment)]
    pub fn from_fragment(fragment: &str) -> JsCard {
        JsCard {
            inner: codec::decode_or_default(fragment),
        }
    }

    /// Builds a card from a plain JS object (`{recipient, message, bgUrl, bgType, theme}`).
    #[wasm_bindgen(js_name = fromObject)]
    pub fn from_object(state: JsValue) -> Result<JsCard, JsValue> {
        let inner: CardState = from_value(state)?;
        Ok(JsCard { inner })
    }

    /// Returns the card as a plain JS object.
    #[wasm_bindgen(js_name = toObject)]
    pub fn to_object(&self) -> Result<JsValue, JsValue> {
        Ok(to_js_value(&self.inner)?)
    }

    /// Encodes the card for `history.replaceState(null, '', '#' + fragment)`.
    #[wasm_bindgen(js_name = toFragment)]
    pub fn to_fragment(&self) -> String {
        codec::encode(&self.inner)
    }

    /// Full share link for the given page URL.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// navigator.clipboard.writeText(card.shareUrl(window.location.href));
    /// ```
    #[wasm_bindgen(js_name = shareUrl)]
    pub fn share_url(&self, base: &str) -> String {
        codec::share_url(base, &self.inner)
    }

    #[wasm_bindgen(js_name = setRecipient)]
    pub fn set_recipient(&mut self, recipient: String) {
        self.inner.recipient = recipient;
    }

    #[wasm_bindgen(js_name = setMessage)]
    pub fn set_message(&mut self, message: String) {
        self.inner.message = message;
    }

    /// Applies an uploaded file (object URL + MIME type) as the background.
    #[wasm_bindgen(js_name = setUploadedBackground)]
    pub fn set_uploaded_background(&mut self, url: String, mime_type: &str) {
        self.inner.set_uploaded_background(url, mime_type);
    }

    /// Restores the default card.
    pub fn reset(&mut self) {
        self.inner.reset();
    }
}

impl Default for JsCard {
    fn default() -> Self {
        Self::new()
    }
}

/// Strict decode: throws on an empty or malformed fragment.
///
/// # Example (JavaScript)
/// ```js
/// try {
///   const state = decodeCard(window.location.hash);
/// } catch (e) {
///   console.warn("Could not hydrate state from hash", e);
/// }
/// ```
#[wasm_bindgen(js_name = decodeCard)]
pub fn decode_card(fragment: &str) -> Result<JsValue, JsValue> {
    let state = codec::decode(fragment)?;
    Ok(to_js_value(&state)?)
}

/// Encodes a plain JS card object into a fragment string.
#[wasm_bindgen(js_name = encodeCard)]
pub fn encode_card(state: JsValue) -> Result<String, JsValue> {
    let state: CardState = from_value(state)?;
    Ok(codec::encode(&state))
}
