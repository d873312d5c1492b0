//! HTTP client for the Gemini generative AI REST API.

use reqwest::{header, Client, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::service::{FetchedResource, GenerationService, VideoOperation, VideoPoll};
use crate::error::{GenerationError, GenerationResult};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_VIDEO_MODEL: &str = "veo-3.1-fast-generate-preview";

const ASPECT_RATIO: &str = "16:9";
const VIDEO_RESOLUTION: &str = "720p";
const VIDEO_SAMPLES: u32 = 1;

/// Connection and model settings for the Gemini API.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub text_model: String,
    pub image_model: String,
    pub video_model: String,
}

impl GeminiConfig {
    /// Config with default endpoint and models.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            video_model: DEFAULT_VIDEO_MODEL.to_string(),
        }
    }

    /// Reads the key from `GEMINI_API_KEY`, falling back to `API_KEY`.
    pub fn from_env() -> Option<Self> {
        ["GEMINI_API_KEY", "API_KEY"]
            .into_iter()
            .filter_map(|var| std::env::var(var).ok())
            .map(|key| key.trim().to_string())
            .find(|key| !key.is_empty())
            .map(Self::new)
    }

    /// Builder: Set API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Builder: Set text model.
    pub fn with_text_model(mut self, model: impl Into<String>) -> Self {
        self.text_model = model.into();
        self
    }

    /// Builder: Set image model.
    pub fn with_image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = model.into();
        self
    }

    /// Builder: Set video model.
    pub fn with_video_model(mut self, model: impl Into<String>) -> Self {
        self.video_model = model.into();
        self
    }
}

// =============================================================================
// RESPONSE SHAPES
// =============================================================================

/// generateContent response
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default)]
    mime_type: Option<String>,
    data: String,
}

impl GenerateContentResponse {
    fn parts(&self) -> impl Iterator<Item = &Part> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .into_iter()
            .flat_map(|c| c.parts.iter())
    }
}

/// predictLongRunning body for a single clip.
fn video_request(prompt: &str) -> Value {
    json!({
        "instances": [{ "prompt": prompt }],
        "parameters": {
            "aspectRatio": ASPECT_RATIO,
            "resolution": VIDEO_RESOLUTION,
            "sampleCount": VIDEO_SAMPLES
        }
    })
}

/// Long-running operation, as returned by predictLongRunning and operation GETs
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationResponse {
    name: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<OperationError>,
    #[serde(default)]
    response: Option<VideoResponse>,
}

#[derive(Debug, Deserialize)]
struct OperationError {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoResponse {
    #[serde(default)]
    generate_video_response: Option<GeneratedVideos>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedVideos {
    #[serde(default)]
    generated_samples: Vec<GeneratedSample>,
}

#[derive(Debug, Deserialize)]
struct GeneratedSample {
    #[serde(default)]
    video: Option<VideoFile>,
}

#[derive(Debug, Deserialize)]
struct VideoFile {
    #[serde(default)]
    uri: Option<String>,
}

impl OperationResponse {
    fn video_uri(&self) -> Option<String> {
        self.response
            .as_ref()?
            .generate_video_response
            .as_ref()?
            .generated_samples
            .first()?
            .video
            .as_ref()?
            .uri
            .clone()
    }
}

// =============================================================================
// CLIENT
// =============================================================================

/// API client implementing `GenerationService` over Gemini REST.
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Create a new client; the key is sent as `x-goog-api-key` on every request.
    pub fn new(config: GeminiConfig) -> GenerationResult<Self> {
        let mut headers = header::HeaderMap::new();
        let mut key = header::HeaderValue::from_str(&config.api_key)
            .map_err(|e| GenerationError::service(format!("Invalid API key: {}", e)))?;
        key.set_sensitive(true);
        headers.insert("x-goog-api-key", key);

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| GenerationError::service(format!("HTTP client error: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// POST /models/{model}:generateContent
    async fn generate_content(
        &self,
        model: &str,
        body: Value,
    ) -> GenerationResult<GenerateContentResponse> {
        let url = self.url(&format!("models/{}:generateContent", model));
        debug!(%model, "generateContent");
        let resp = self.client.post(&url).json(&body).send().await.map_err(request_error)?;
        let resp = ensure_success(resp, GenerationError::Service).await?;
        resp.json().await.map_err(request_error)
    }

    async fn operation(&self, resp: Response) -> GenerationResult<OperationResponse> {
        let resp = ensure_success(resp, GenerationError::Service).await?;
        let op: OperationResponse = resp.json().await.map_err(request_error)?;
        if let Some(err) = &op.error {
            return Err(GenerationError::service(format!("Video generation failed: {}", err.message)));
        }
        Ok(op)
    }
}

impl GenerationService for GeminiClient {
    async fn generate_text(&self, prompt: &str) -> GenerationResult<String> {
        let body = json!({ "contents": [{ "parts": [{ "text": prompt }] }] });
        let resp = self.generate_content(&self.config.text_model, body).await?;
        Ok(resp.parts().filter_map(|p| p.text.as_deref()).collect())
    }

    async fn generate_image(&self, prompt: &str) -> GenerationResult<String> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "imageConfig": { "aspectRatio": ASPECT_RATIO } }
        });
        let resp = self.generate_content(&self.config.image_model, body).await?;
        resp.parts()
            .find_map(|p| p.inline_data.as_ref())
            .map(|inline| {
                let mime = inline.mime_type.as_deref().unwrap_or("image/png");
                format!("data:{};base64,{}", mime, inline.data)
            })
            .ok_or_else(|| GenerationError::service("No image generated."))
    }

    async fn submit_video(&self, prompt: &str) -> GenerationResult<VideoOperation> {
        let url = self.url(&format!("models/{}:predictLongRunning", self.config.video_model));
        let body = video_request(prompt);
        let resp = self.client.post(&url).json(&body).send().await.map_err(request_error)?;
        let op = self.operation(resp).await?;
        Ok(VideoOperation::new(op.name))
    }

    async fn poll_video(&self, operation: &VideoOperation) -> GenerationResult<VideoPoll> {
        let url = self.url(&operation.name);
        let resp = self.client.get(&url).send().await.map_err(request_error)?;
        let op = self.operation(resp).await?;
        Ok(VideoPoll {
            done: op.done,
            result_reference: op.video_uri(),
        })
    }

    async fn fetch_resource(&self, reference: &str) -> GenerationResult<FetchedResource> {
        if let Some(payload) = reference.strip_prefix("data:") {
            return decode_data_url(payload);
        }

        let resp = self
            .client
            .get(reference)
            .send()
            .await
            .map_err(|e| GenerationError::download(format!("Failed to download video: {}", e)))?;
        let resp = ensure_success(resp, GenerationError::Download).await?;

        let mime_type = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("video/mp4")
            .to_string();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| GenerationError::download(format!("Failed to download video: {}", e)))?;

        Ok(FetchedResource::new(mime_type, bytes.to_vec()))
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn request_error(e: reqwest::Error) -> GenerationError {
    GenerationError::service(format!("Request failed: {}", e))
}

/// Turns a non-2xx response into an error carrying status and body.
async fn ensure_success(
    resp: Response,
    kind: fn(String) -> GenerationError,
) -> GenerationResult<Response> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status().as_u16();
    let message = resp.text().await.unwrap_or_default();
    Err(kind(format!("API error: {} - {}", status, message.trim())))
}

/// Decodes the part of a `data:` URL after the scheme.
fn decode_data_url(payload: &str) -> GenerationResult<FetchedResource> {
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

    let (meta, data) = payload
        .split_once(',')
        .ok_or_else(|| GenerationError::download("Malformed data URL"))?;
    let mime_type = meta.strip_suffix(";base64").unwrap_or(meta);
    let bytes = BASE64
        .decode(data)
        .map_err(|e| GenerationError::download(format!("Malformed data URL: {}", e)))?;
    Ok(FetchedResource::new(mime_type, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::resource::data_url;

    #[test]
    fn test_parse_image_response() {
        let raw = r#"{"candidates":[{"content":{"parts":[
            {"text":"Here you go"},
            {"inlineData":{"mimeType":"image/png","data":"iVBORw0"}}
        ]}}]}"#;
        let resp: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let inline = resp.parts().find_map(|p| p.inline_data.as_ref()).unwrap();
        assert_eq!(inline.data, "iVBORw0");
        assert_eq!(inline.mime_type.as_deref(), Some("image/png"));
    }

    #[test]
    fn test_parse_empty_candidates() {
        let resp: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(resp.parts().count(), 0);
    }

    #[test]
    fn test_parse_pending_operation() {
        let raw = r#"{"name":"models/veo/operations/abc"}"#;
        let op: OperationResponse = serde_json::from_str(raw).unwrap();
        assert!(!op.done);
        assert_eq!(op.video_uri(), None);
    }

    #[test]
    fn test_parse_finished_operation() {
        let raw = r#"{"name":"models/veo/operations/abc","done":true,"response":{
            "generateVideoResponse":{"generatedSamples":[{"video":{"uri":"https://files.test/v?alt=media"}}]}}}"#;
        let op: OperationResponse = serde_json::from_str(raw).unwrap();
        assert!(op.done);
        assert_eq!(op.video_uri().as_deref(), Some("https://files.test/v?alt=media"));
    }

    #[test]
    fn test_video_request_asks_for_one_clip() {
        let body = video_request("a lighthouse at dusk");
        assert_eq!(body["instances"][0]["prompt"], "a lighthouse at dusk");
        assert_eq!(body["parameters"]["sampleCount"], 1);
        assert_eq!(body["parameters"]["aspectRatio"], "16:9");
        assert_eq!(body["parameters"]["resolution"], "720p");
    }

    #[test]
    fn test_decode_data_url() {
        let url = data_url("video/mp4", b"clip");
        let resource = decode_data_url(url.strip_prefix("data:").unwrap()).unwrap();
        assert_eq!(resource.mime_type, "video/mp4");
        assert_eq!(resource.bytes, b"clip");
        assert!(decode_data_url("no-comma").is_err());
    }

    #[test]
    fn test_from_env_prefers_gemini_key() {
        // Single test touching these vars to avoid races between tests.
        std::env::set_var("GEMINI_API_KEY", "gem-key");
        std::env::set_var("API_KEY", "fallback-key");
        assert_eq!(GeminiConfig::from_env().unwrap().api_key, "gem-key");

        std::env::set_var("GEMINI_API_KEY", "  ");
        assert_eq!(GeminiConfig::from_env().unwrap().api_key, "fallback-key");

        std::env::remove_var("GEMINI_API_KEY");
        std::env::remove_var("API_KEY");
        assert!(GeminiConfig::from_env().is_none());
    }
}
