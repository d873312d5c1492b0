//! Card generation CLI tool
//!
//! Builds share links and runs AI generation for a card from the terminal.
//!
//! Usage:
//!   cardgen encode --recipient "Robin" --theme pink
//!   cardgen --link "https://cards.example/#eyJy..." message --mood poetic
//!   cardgen video "fireflies over a lake" --output-dir ./out

mod offline;
mod progress;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use heartcard::card::{self, BackgroundKind, CardState, Theme};
use heartcard::generation::gemini::DEFAULT_BASE_URL;
use heartcard::generation::{
    DataUrlStore, DirectoryStore, GeminiClient, GeminiConfig, GenerationConfig,
    GenerationCoordinator, GenerationService, Mood, ResourceStore,
};

#[derive(Parser)]
#[command(
    name = "cardgen",
    about = "Create shareable greeting card links with AI-generated content",
    version
)]
struct Args {
    /// Existing share link (or bare fragment) to start from
    #[arg(short = 'l', long, env = "HEARTCARD_LINK", global = true)]
    link: Option<String>,

    /// Page URL the share link points at
    #[arg(long, default_value = "http://localhost:3000/", global = true)]
    page_url: String,

    /// Gemini API key (or set GEMINI_API_KEY env var)
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Gemini API base URL
    #[arg(long, default_value = DEFAULT_BASE_URL, global = true)]
    api_base: String,

    /// Seconds between video status checks
    #[arg(long, default_value_t = 8, global = true)]
    poll_secs: u64,

    /// Per-request timeout in seconds (no timeout when omitted)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Use canned responses instead of calling the API
    #[arg(long, global = true)]
    offline: bool,

    /// Enable verbose output
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Edit card fields and print the share link
    Encode {
        #[arg(short, long)]
        recipient: Option<String>,
        #[arg(short, long)]
        message: Option<String>,
        /// Background image or video URL
        #[arg(short, long)]
        background: Option<String>,
        /// Background kind: image, video or color
        #[arg(short, long)]
        kind: Option<BackgroundKind>,
        /// Theme: dark, light or pink
        #[arg(short, long)]
        theme: Option<Theme>,
    },
    /// Print the card carried by a share link as JSON
    Decode {
        /// Share link or fragment
        input: String,
        /// Fail instead of falling back to the default card
        #[arg(long)]
        strict: bool,
    },
    /// Generate a new message for the card's recipient
    Message {
        /// romantic, funny, poetic or minimal
        #[arg(short, long, default_value = "romantic")]
        mood: Mood,
    },
    /// Generate a background image from a scene description
    Image { scene: String },
    /// Generate a background video from a scene description
    Video {
        scene: String,
        /// Save the clip here instead of embedding it in the link
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let state = match &args.link {
        Some(link) => card::decode_or_default(fragment(link)),
        None => CardState::default(),
    };

    let state = match &args.command {
        Command::Encode {
            recipient,
            message,
            background,
            kind,
            theme,
        } => {
            let mut state = state;
            if let Some(r) = recipient {
                state.recipient = r.clone();
            }
            if let Some(m) = message {
                state.message = m.clone();
            }
            if let Some(b) = background {
                state.background_url = b.clone();
            }
            if let Some(k) = kind {
                state.background_kind = *k;
            }
            if let Some(t) = theme {
                state.theme = *t;
            }
            state
        }
        Command::Decode { input, strict } => {
            let state = if *strict {
                card::decode(fragment(input)).context("Failed to decode share link")?
            } else {
                card::decode_or_default(fragment(input))
            };
            println!("{}", serde_json::to_string_pretty(&state)?);
            return Ok(());
        }
        Command::Message { .. } | Command::Image { .. } | Command::Video { .. } => {
            run_generation(&args, state).await?
        }
    };

    println!("{}", card::share_url(&args.page_url, &state));
    Ok(())
}

/// Accepts a full share link or a bare fragment.
fn fragment(input: &str) -> &str {
    if input.contains('#') {
        card::fragment_of(input)
    } else {
        input
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "heartcard=debug,cardgen=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn generation_config(args: &Args) -> GenerationConfig {
    let mut config = GenerationConfig::new().with_poll_interval(Duration::from_secs(args.poll_secs));
    if let Some(secs) = args.timeout_secs {
        config = config.with_request_timeout(Duration::from_secs(secs));
    }
    config
}

/// Picks the service, then the resource store, then runs the command.
async fn run_generation(args: &Args, state: CardState) -> Result<CardState> {
    if args.offline {
        let config = generation_config(args).with_poll_interval(Duration::from_millis(200));
        return with_store(args, offline::service(), config, state).await;
    }

    let api_key = args
        .api_key
        .clone()
        .filter(|k| !k.trim().is_empty())
        .or_else(|| GeminiConfig::from_env().map(|c| c.api_key));
    let Some(api_key) = api_key else {
        anyhow::bail!("API key is required. Use --api-key, set GEMINI_API_KEY, or pass --offline.");
    };

    let client = GeminiClient::new(GeminiConfig::new(api_key).with_base_url(&args.api_base))?;
    with_store(args, client, generation_config(args), state).await
}

async fn with_store<S: GenerationService>(
    args: &Args,
    service: S,
    config: GenerationConfig,
    state: CardState,
) -> Result<CardState> {
    let coordinator = GenerationCoordinator::new(service).with_config(config);
    match &args.command {
        Command::Video {
            output_dir: Some(dir),
            ..
        } => generate(args, coordinator.with_store(DirectoryStore::new(dir)), state).await,
        _ => generate(args, coordinator.with_store(DataUrlStore), state).await,
    }
}

async fn generate<S: GenerationService, R: ResourceStore>(
    args: &Args,
    mut coordinator: GenerationCoordinator<S, R>,
    state: CardState,
) -> Result<CardState> {
    let events = coordinator.subscribe();
    let spinner = progress::spawn(events);

    let result = match &args.command {
        Command::Message { mood } => coordinator.generate_message(&state, *mood).await,
        Command::Image { scene } => coordinator.generate_image(&state, scene).await,
        Command::Video { scene, .. } => coordinator.generate_video(&state, scene).await,
        Command::Encode { .. } | Command::Decode { .. } => Ok(state),
    };

    drop(coordinator);
    spinner.await.ok();

    let updated = result.context("Generation failed")?;
    if updated.background_kind == BackgroundKind::Video {
        eprintln!("Background: {}", short(&updated.background_url));
    }
    Ok(updated)
}

fn short(url: &str) -> String {
    match url.char_indices().nth(60) {
        Some((cut, _)) if url.len() > 80 => format!("{}... ({} bytes)", &url[..cut], url.len()),
        _ => url.to_string(),
    }
}
