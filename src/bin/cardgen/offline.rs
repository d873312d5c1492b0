//! Canned responses for `--offline` runs

use heartcard::generation::{FetchedResource, ScriptedService, VideoOperation, VideoPoll};

/// 1x1 transparent PNG
const PIXEL_PNG: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

/// One response per operation, with a video that renders for two polls.
pub fn service() -> ScriptedService {
    ScriptedService::new()
        .with_text(Ok("Every ordinary day turns golden when you're in it.".to_string()))
        .with_image(Ok(format!("data:image/png;base64,{}", PIXEL_PNG)))
        .with_submission(Ok(VideoOperation::new("operations/offline-1")))
        .with_poll(Ok(VideoPoll::pending()))
        .with_poll(Ok(VideoPoll::pending()))
        .with_poll(Ok(VideoPoll::ready("offline://clip.mp4")))
        .with_fetch(Ok(FetchedResource::new("video/mp4", b"offline clip".to_vec())))
}
