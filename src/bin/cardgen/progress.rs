//! Terminal spinner driven by coordinator progress events

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

use heartcard::generation::{ProgressEvent, VideoPhase};

/// Render events until the coordinator drops its sender.
pub fn spawn(mut events: UnboundedReceiver<ProgressEvent>) -> JoinHandle<()> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.red} [{elapsed_precise}] {prefix} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(120));

    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                ProgressEvent::Started { message, .. } | ProgressEvent::Progress { message, .. } => {
                    pb.set_message(message);
                }
                ProgressEvent::Video(VideoPhase::Rendering { polls }) if polls > 0 => {
                    pb.set_prefix(format!("poll {}", polls));
                }
                ProgressEvent::Video(_) => {}
                ProgressEvent::Finished { kind } => {
                    pb.finish_with_message(format!("{} ready", kind));
                }
                ProgressEvent::Failed { kind, message } => {
                    pb.abandon_with_message(format!("{} failed: {}", kind, message));
                }
            }
        }
        if !pb.is_finished() {
            pb.finish_and_clear();
        }
    })
}
