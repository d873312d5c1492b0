//! Drives AI-assisted generation of card content.
//!
//! The coordinator owns the generation status and enforces that at most one
//! generation is in flight. Each operation takes the current card and returns
//! an updated copy on success; on failure the caller keeps its card as-is.
//!
//! Video generation is long-running and follows a polling state machine:
//! `Submitted -> Rendering -> Done` or `-> Failed`. Polls happen at a fixed
//! interval with no backoff and no attempt limit, and an in-flight video job
//! cannot be cancelled.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use super::prompt::{image_prompt, message_prompt, video_prompt, FALLBACK_MESSAGE};
use super::resource::{DataUrlStore, ResourceStore};
use super::service::GenerationService;
use super::status::{GenerationKind, GenerationStatus, Mood, ProgressEvent, VideoPhase};
use crate::card::{BackgroundKind, CardState};
use crate::error::{GenerationError, GenerationResult};

pub const MESSAGE_PROGRESS: &str = "Searching for the perfect words...";
pub const IMAGE_PROGRESS: &str = "AI is painting your romantic atmosphere...";
pub const VIDEO_PROGRESS: &str = "Initializing cinematic generation...";
pub const VIDEO_SUBMIT_PROGRESS: &str = "Warming up the AI cinematic engine...";
pub const VIDEO_RENDER_PROGRESS: &str =
    "The AI is rendering your romantic masterpiece... (typically 1-2 mins)";
pub const VIDEO_FETCH_PROGRESS: &str = "Perfecting the final cut...";

pub const EMPTY_SCENE_ERROR: &str = "Please describe a scene first.";
pub const NO_VIDEO_ERROR: &str = "Video generation failed.";

/// Delay between video status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(8);

// =============================================================================
// CONFIG
// =============================================================================

/// Timing settings for the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationConfig {
    /// Fixed delay before each video poll.
    pub poll_interval: Duration,

    /// Upper bound for each individual service call. `None` waits forever.
    pub request_timeout: Option<Duration>,
}

impl GenerationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: Set poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Builder: Set per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: None,
        }
    }
}

// =============================================================================
// SINGLE-FLIGHT GUARD
// =============================================================================

/// Held for the duration of one generation; releases the in-flight flag on
/// drop and leaves the status idle even if the future was dropped midway.
struct Flight<'a> {
    in_flight: &'a AtomicBool,
    status: &'a Mutex<GenerationStatus>,
}

impl Drop for Flight<'_> {
    fn drop(&mut self) {
        {
            let mut status = self.status.lock();
            if status.is_generating {
                *status = GenerationStatus::finished(status.error.clone());
            }
        }
        self.in_flight.store(false, Ordering::Release);
    }
}

// =============================================================================
// COORDINATOR
// =============================================================================

/// Runs message, image and video generations against a `GenerationService`.
pub struct GenerationCoordinator<S, R = DataUrlStore> {
    service: S,
    store: R,
    config: GenerationConfig,
    status: Mutex<GenerationStatus>,
    in_flight: AtomicBool,
    events: Option<UnboundedSender<ProgressEvent>>,
}

impl<S: GenerationService> GenerationCoordinator<S> {
    /// Creates a coordinator that embeds fetched videos as `data:` URLs.
    pub fn new(service: S) -> Self {
        Self {
            service,
            store: DataUrlStore,
            config: GenerationConfig::default(),
            status: Mutex::new(GenerationStatus::idle()),
            in_flight: AtomicBool::new(false),
            events: None,
        }
    }
}

impl<S: GenerationService, R: ResourceStore> GenerationCoordinator<S, R> {
    /// Builder: Replace the resource store.
    pub fn with_store<R2: ResourceStore>(self, store: R2) -> GenerationCoordinator<S, R2> {
        GenerationCoordinator {
            service: self.service,
            store,
            config: self.config,
            status: self.status,
            in_flight: self.in_flight,
            events: self.events,
        }
    }

    /// Builder: Set timing config.
    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.config = config;
        self
    }

    /// Opens a progress channel. Replaces any previous subscription.
    pub fn subscribe(&mut self) -> UnboundedReceiver<ProgressEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.events = Some(tx);
        rx
    }

    /// Snapshot of the current status.
    pub fn status(&self) -> GenerationStatus {
        self.status.lock().clone()
    }

    pub fn is_generating(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    // =========================================================================
    // OPERATIONS
    // =========================================================================

    /// Generates a new message for the card's recipient in the given mood.
    pub async fn generate_message(
        &self,
        card: &CardState,
        mood: Mood,
    ) -> GenerationResult<CardState> {
        let _flight = self.begin()?;
        let prompt = message_prompt(&card.recipient, mood);

        let text = self
            .run(GenerationKind::Message, MESSAGE_PROGRESS, async {
                let text = self
                    .call(self.service.generate_text(&prompt), GenerationError::Service)
                    .await?;
                Ok(match text.trim() {
                    "" => FALLBACK_MESSAGE.to_string(),
                    t => t.to_string(),
                })
            })
            .await?;

        Ok(card.clone().with_message(text))
    }

    /// Generates a background image from a scene description.
    pub async fn generate_image(&self, card: &CardState, scene: &str) -> GenerationResult<CardState> {
        let _flight = self.begin()?;
        self.validate_scene(GenerationKind::Image, scene)?;
        let prompt = image_prompt(scene);

        let url = self
            .run(GenerationKind::Image, IMAGE_PROGRESS, async {
                self.call(self.service.generate_image(&prompt), GenerationError::Service)
                    .await
            })
            .await?;

        Ok(card.clone().with_background(url, BackgroundKind::Image))
    }

    /// Generates a background video clip from a scene description.
    pub async fn generate_video(&self, card: &CardState, scene: &str) -> GenerationResult<CardState> {
        let _flight = self.begin()?;
        self.validate_scene(GenerationKind::Video, scene)?;
        let prompt = video_prompt(scene);

        let handle = self
            .run(GenerationKind::Video, VIDEO_PROGRESS, async {
                match self.render_video(&prompt).await {
                    Ok(handle) => {
                        self.emit(ProgressEvent::Video(VideoPhase::Done {
                            handle: handle.clone(),
                        }));
                        Ok(handle)
                    }
                    Err(e) => {
                        self.emit(ProgressEvent::Video(VideoPhase::Failed {
                            reason: failure_message(GenerationKind::Video, &e),
                        }));
                        Err(e)
                    }
                }
            })
            .await?;

        Ok(card.clone().with_background(handle, BackgroundKind::Video))
    }

    // =========================================================================
    // VIDEO STATE MACHINE
    // =========================================================================

    async fn render_video(&self, prompt: &str) -> GenerationResult<String> {
        let kind = GenerationKind::Video;
        self.report(kind, VIDEO_SUBMIT_PROGRESS);

        let operation = self
            .call(self.service.submit_video(prompt), GenerationError::Service)
            .await?;
        info!(operation = %operation.name, "Video job submitted");
        self.emit(ProgressEvent::Video(VideoPhase::Submitted));

        let mut polls = 0u32;
        self.emit(ProgressEvent::Video(VideoPhase::Rendering { polls }));

        let reference = loop {
            self.report(kind, VIDEO_RENDER_PROGRESS);
            tokio::time::sleep(self.config.poll_interval).await;

            let poll = self
                .call(self.service.poll_video(&operation), GenerationError::Service)
                .await?;
            polls += 1;

            if poll.done {
                break poll.result_reference;
            }
            debug!(operation = %operation.name, polls, "Video still rendering");
            self.emit(ProgressEvent::Video(VideoPhase::Rendering { polls }));
        };

        let reference = match reference {
            Some(r) if !r.trim().is_empty() => r,
            _ => return Err(GenerationError::service(NO_VIDEO_ERROR)),
        };
        info!(operation = %operation.name, polls, "Video render complete");

        self.report(kind, VIDEO_FETCH_PROGRESS);
        let resource = self
            .call(self.service.fetch_resource(&reference), GenerationError::Download)
            .await?;
        debug!(mime = %resource.mime_type, bytes = resource.bytes.len(), "Fetched video");

        self.store.store(resource)
    }

    // =========================================================================
    // INTERNAL HELPERS
    // =========================================================================

    /// Claims the single in-flight slot.
    fn begin(&self) -> GenerationResult<Flight<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| {
                warn!("Rejected generation request: another generation is in flight");
                GenerationError::Busy
            })?;
        Ok(Flight {
            in_flight: &self.in_flight,
            status: &self.status,
        })
    }

    /// Rejects blank scene descriptions before any service call.
    fn validate_scene(&self, kind: GenerationKind, scene: &str) -> GenerationResult<()> {
        if !scene.trim().is_empty() {
            return Ok(());
        }
        let err = GenerationError::validation(EMPTY_SCENE_ERROR);
        *self.status.lock() = GenerationStatus::finished(Some(err.to_string()));
        self.emit(ProgressEvent::Failed {
            kind,
            message: err.to_string(),
        });
        Err(err)
    }

    /// Wraps one generation attempt with the status lifecycle.
    async fn run<T>(
        &self,
        kind: GenerationKind,
        initial: &str,
        op: impl Future<Output = GenerationResult<T>>,
    ) -> GenerationResult<T> {
        *self.status.lock() = GenerationStatus::started(initial);
        self.emit(ProgressEvent::Started {
            kind,
            message: initial.to_string(),
        });
        info!(%kind, "Generation started");

        match op.await {
            Ok(value) => {
                *self.status.lock() = GenerationStatus::finished(None);
                self.emit(ProgressEvent::Finished { kind });
                info!(%kind, "Generation finished");
                Ok(value)
            }
            Err(e) => {
                let message = failure_message(kind, &e);
                *self.status.lock() = GenerationStatus::finished(Some(message.clone()));
                self.emit(ProgressEvent::Failed { kind, message });
                warn!(%kind, error = %e, "Generation failed");
                Err(e)
            }
        }
    }

    /// Awaits a service call, applying the configured timeout.
    async fn call<T>(
        &self,
        fut: impl Future<Output = GenerationResult<T>>,
        on_timeout: fn(String) -> GenerationError,
    ) -> GenerationResult<T> {
        match self.config.request_timeout {
            Some(limit) => tokio::time::timeout(limit, fut)
                .await
                .map_err(|_| on_timeout(format!("Request timed out after {}s", limit.as_secs_f32())))?,
            None => fut.await,
        }
    }

    /// Updates the in-flight progress message.
    fn report(&self, kind: GenerationKind, message: &str) {
        self.status.lock().progress = message.to_string();
        self.emit(ProgressEvent::Progress {
            kind,
            message: message.to_string(),
        });
    }

    fn emit(&self, event: ProgressEvent) {
        if let Some(tx) = &self.events {
            // A dropped receiver just means nobody is listening.
            let _ = tx.send(event);
        }
    }
}

/// The error's own text, or the per-kind fallback when it is blank.
fn failure_message(kind: GenerationKind, err: &GenerationError) -> String {
    match err.to_string() {
        m if m.trim().is_empty() => kind.failure_message().to_string(),
        m => m,
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::scripted::{ScriptedService, ServiceCall};
    use crate::generation::service::{FetchedResource, VideoOperation, VideoPoll};

    fn drain(rx: &mut UnboundedReceiver<ProgressEvent>) -> Vec<ProgressEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn video_service(polls: Vec<VideoPoll>) -> ScriptedService {
        let mut service = ScriptedService::new()
            .with_submission(Ok(VideoOperation::new("operations/clip-1")));
        for poll in polls {
            service = service.with_poll(Ok(poll));
        }
        service
    }

    #[tokio::test]
    async fn test_message_success() {
        let service = ScriptedService::new().with_text(Ok("  You light up my life.  ".into()));
        let mut coordinator = GenerationCoordinator::new(service);
        let mut rx = coordinator.subscribe();
        let card = CardState::new("Robin", "old");

        assert!(!coordinator.status().is_generating);
        let updated = coordinator.generate_message(&card, Mood::Funny).await.unwrap();

        assert_eq!(updated.message, "You light up my life.");
        assert_eq!(updated.recipient, "Robin");
        assert_eq!(coordinator.status(), GenerationStatus::finished(None));
        assert!(!coordinator.is_generating());

        let events = drain(&mut rx);
        assert_eq!(
            events,
            vec![
                ProgressEvent::Started {
                    kind: GenerationKind::Message,
                    message: MESSAGE_PROGRESS.into()
                },
                ProgressEvent::Finished {
                    kind: GenerationKind::Message
                },
            ]
        );

        match &coordinator.service().calls()[0] {
            ServiceCall::Text(prompt) => {
                assert!(prompt.contains("Robin"));
                assert!(prompt.contains("funny"));
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_message_empty_response_uses_fallback() {
        let service = ScriptedService::new().with_text(Ok("   ".into()));
        let coordinator = GenerationCoordinator::new(service);

        let updated = coordinator
            .generate_message(&CardState::default(), Mood::Romantic)
            .await
            .unwrap();
        assert_eq!(updated.message, FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn test_image_failure_leaves_card_untouched() {
        let service =
            ScriptedService::new().with_image(Err(GenerationError::service("No image generated.")));
        let coordinator = GenerationCoordinator::new(service);
        let card = CardState::default();

        let err = coordinator.generate_image(&card, "bokeh hearts").await.unwrap_err();

        assert_eq!(err, GenerationError::service("No image generated."));
        let status = coordinator.status();
        assert!(!status.is_generating);
        assert_eq!(status.error.as_deref(), Some("No image generated."));
        assert_eq!(card, CardState::default());
    }

    #[tokio::test]
    async fn test_image_success_sets_background() {
        let service = ScriptedService::new().with_image(Ok("data:image/png;base64,AAAA".into()));
        let coordinator = GenerationCoordinator::new(service);
        let card = CardState::default().with_background("https://x.test/v.mp4", BackgroundKind::Video);

        let updated = coordinator.generate_image(&card, "candles").await.unwrap();
        assert_eq!(updated.background_url, "data:image/png;base64,AAAA");
        assert_eq!(updated.background_kind, BackgroundKind::Image);
    }

    #[tokio::test]
    async fn test_blank_scene_is_rejected_without_service_call() {
        let coordinator = GenerationCoordinator::new(ScriptedService::new());
        let card = CardState::default();

        let err = coordinator.generate_image(&card, "   ").await.unwrap_err();
        assert_eq!(err, GenerationError::validation(EMPTY_SCENE_ERROR));

        let err = coordinator.generate_video(&card, "").await.unwrap_err();
        assert!(matches!(err, GenerationError::Validation(_)));

        assert_eq!(coordinator.service().call_count(), 0);
        assert!(!coordinator.is_generating());
        assert_eq!(coordinator.status().error.as_deref(), Some(EMPTY_SCENE_ERROR));
    }

    #[tokio::test(start_paused = true)]
    async fn test_video_polls_until_done() {
        let service = video_service(vec![
            VideoPoll::pending(),
            VideoPoll::pending(),
            VideoPoll::ready("https://files.test/clip.mp4"),
        ])
        .with_fetch(Ok(FetchedResource::new("video/mp4", b"mp4".to_vec())));
        let mut coordinator = GenerationCoordinator::new(service);
        let mut rx = coordinator.subscribe();

        let updated = coordinator
            .generate_video(&CardState::default(), "rain on a window")
            .await
            .unwrap();

        assert_eq!(updated.background_kind, BackgroundKind::Video);
        assert_eq!(updated.background_url, "data:video/mp4;base64,bXA0");
        assert_eq!(coordinator.service().poll_count(), 3);
        assert_eq!(
            coordinator.service().calls().last(),
            Some(&ServiceCall::Fetch("https://files.test/clip.mp4".into()))
        );

        let phases: Vec<VideoPhase> = drain(&mut rx)
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::Video(phase) => Some(phase),
                _ => None,
            })
            .collect();
        assert_eq!(
            phases,
            vec![
                VideoPhase::Submitted,
                VideoPhase::Rendering { polls: 0 },
                VideoPhase::Rendering { polls: 1 },
                VideoPhase::Rendering { polls: 2 },
                VideoPhase::Done {
                    handle: "data:video/mp4;base64,bXA0".into()
                },
            ]
        );
        assert_eq!(coordinator.status(), GenerationStatus::finished(None));
    }

    #[tokio::test(start_paused = true)]
    async fn test_video_done_without_reference_fails() {
        let service = video_service(vec![VideoPoll::pending(), VideoPoll::empty()]);
        let coordinator = GenerationCoordinator::new(service);

        let err = coordinator
            .generate_video(&CardState::default(), "fireworks")
            .await
            .unwrap_err();

        assert_eq!(err, GenerationError::service(NO_VIDEO_ERROR));
        assert_eq!(coordinator.status().error.as_deref(), Some(NO_VIDEO_ERROR));
        // No fetch was attempted.
        assert!(!coordinator
            .service()
            .calls()
            .iter()
            .any(|c| matches!(c, ServiceCall::Fetch(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_video_download_failure() {
        let service = video_service(vec![VideoPoll::ready("https://files.test/gone.mp4")])
            .with_fetch(Err(GenerationError::download("Failed to download video.")));
        let mut coordinator = GenerationCoordinator::new(service);
        let mut rx = coordinator.subscribe();

        let err = coordinator
            .generate_video(&CardState::default(), "stars")
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::Download(_)));
        let events = drain(&mut rx);
        assert!(events.contains(&ProgressEvent::Video(VideoPhase::Failed {
            reason: "Failed to download video.".into()
        })));
        assert_eq!(
            events.last(),
            Some(&ProgressEvent::Failed {
                kind: GenerationKind::Video,
                message: "Failed to download video.".into()
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_video_progress_messages_in_order() {
        let service = video_service(vec![VideoPoll::ready("ref")])
            .with_fetch(Ok(FetchedResource::new("video/mp4", vec![0])));
        let mut coordinator = GenerationCoordinator::new(service);
        let mut rx = coordinator.subscribe();

        coordinator
            .generate_video(&CardState::default(), "sunset")
            .await
            .unwrap();

        let messages: Vec<String> = drain(&mut rx)
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::Started { message, .. } | ProgressEvent::Progress { message, .. } => {
                    Some(message)
                }
                _ => None,
            })
            .collect();
        assert_eq!(
            messages,
            vec![
                VIDEO_PROGRESS,
                VIDEO_SUBMIT_PROGRESS,
                VIDEO_RENDER_PROGRESS,
                VIDEO_FETCH_PROGRESS
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_request_is_rejected_while_video_renders() {
        let service = video_service(vec![VideoPoll::pending(), VideoPoll::ready("ref")])
            .with_fetch(Ok(FetchedResource::new("video/mp4", vec![1])))
            .with_text(Ok("never used".into()));
        let coordinator = GenerationCoordinator::new(service);
        let card = CardState::default();

        let (video, contender) = tokio::join!(coordinator.generate_video(&card, "snow"), async {
            // Let the video job reach its first poll delay.
            tokio::task::yield_now().await;
            let status = coordinator.status();
            let second = coordinator.generate_message(&card, Mood::Poetic).await;
            (status, second)
        });

        let (mid_status, second) = contender;
        assert!(mid_status.is_generating);
        assert_eq!(mid_status.progress, VIDEO_RENDER_PROGRESS);
        assert_eq!(second, Err(GenerationError::Busy));
        assert!(video.is_ok());
        assert!(!coordinator
            .service()
            .calls()
            .iter()
            .any(|c| matches!(c, ServiceCall::Text(_))));
    }

    /// Never answers; only a request timeout ends a call.
    struct Hanging;

    impl GenerationService for Hanging {
        async fn generate_text(&self, _prompt: &str) -> GenerationResult<String> {
            std::future::pending().await
        }
        async fn generate_image(&self, _prompt: &str) -> GenerationResult<String> {
            std::future::pending().await
        }
        async fn submit_video(&self, _prompt: &str) -> GenerationResult<VideoOperation> {
            std::future::pending().await
        }
        async fn poll_video(&self, _op: &VideoOperation) -> GenerationResult<VideoPoll> {
            std::future::pending().await
        }
        async fn fetch_resource(&self, _reference: &str) -> GenerationResult<FetchedResource> {
            std::future::pending().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_timeout_is_service_error() {
        let coordinator = GenerationCoordinator::new(Hanging)
            .with_config(GenerationConfig::new().with_request_timeout(Duration::from_secs(30)));

        let err = coordinator
            .generate_message(&CardState::default(), Mood::Minimal)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Service(_)));
        assert!(!coordinator.is_generating());
    }

    #[tokio::test(start_paused = true)]
    async fn test_message_status_while_in_flight() {
        let mut coordinator = GenerationCoordinator::new(Hanging)
            .with_config(GenerationConfig::new().with_request_timeout(Duration::from_secs(10)));
        let mut rx = coordinator.subscribe();
        let card = CardState::default();

        assert_eq!(coordinator.status(), GenerationStatus::idle());
        let (result, mid) = tokio::join!(coordinator.generate_message(&card, Mood::Romantic), async {
            tokio::task::yield_now().await;
            (coordinator.status(), coordinator.is_generating())
        });

        let (mid_status, mid_flag) = mid;
        assert!(mid_flag);
        assert_eq!(mid_status, GenerationStatus::started(MESSAGE_PROGRESS));
        assert!(result.is_err());
        assert!(!coordinator.is_generating());
        assert!(!coordinator.status().is_generating);

        let events = drain(&mut rx);
        assert!(matches!(events.first(), Some(ProgressEvent::Started { .. })));
        assert!(matches!(events.last(), Some(ProgressEvent::Failed { .. })));
    }

    #[tokio::test]
    async fn test_blank_service_error_uses_kind_fallback() {
        let service = ScriptedService::new()
            .with_image(Err(GenerationError::service("")))
            .with_text(Err(GenerationError::service("  ")));
        let mut coordinator = GenerationCoordinator::new(service);
        let mut rx = coordinator.subscribe();
        let card = CardState::default();

        assert!(coordinator.generate_image(&card, "roses").await.is_err());
        assert_eq!(
            coordinator.status().error.as_deref(),
            Some(GenerationKind::Image.failure_message())
        );
        assert!(coordinator.generate_message(&card, Mood::Funny).await.is_err());
        assert_eq!(
            coordinator.status().error.as_deref(),
            Some(GenerationKind::Message.failure_message())
        );

        let failures: Vec<String> = drain(&mut rx)
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::Failed { message, .. } => Some(message),
                _ => None,
            })
            .collect();
        assert_eq!(
            failures,
            vec!["Failed to generate image".to_string(), "Failed to generate message".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_video_error_uses_kind_fallback() {
        let service = ScriptedService::new().with_submission(Err(GenerationError::service("")));
        let mut coordinator = GenerationCoordinator::new(service);
        let mut rx = coordinator.subscribe();

        assert!(coordinator.generate_video(&CardState::default(), "waves").await.is_err());

        let expected = GenerationKind::Video.failure_message();
        assert_eq!(coordinator.status().error.as_deref(), Some(expected));
        assert!(drain(&mut rx).contains(&ProgressEvent::Video(VideoPhase::Failed {
            reason: expected.to_string()
        })));
    }

    #[tokio::test]
    async fn test_coordinator_usable_after_failure() {
        let service = ScriptedService::new()
            .with_text(Err(GenerationError::service("quota exceeded")))
            .with_text(Ok("Second try".into()));
        let coordinator = GenerationCoordinator::new(service);
        let card = CardState::default();

        assert!(coordinator.generate_message(&card, Mood::Romantic).await.is_err());
        let updated = coordinator.generate_message(&card, Mood::Romantic).await.unwrap();

        assert_eq!(updated.message, "Second try");
        assert_eq!(coordinator.status().error, None);
    }
}
