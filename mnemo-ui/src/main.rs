//! mnemo-ui - headless client for mnemo-server
//!
//! Exercises the client core without a browser: lists the library and the
//! timeline, opens a memory (switching the simulated output to its
//! playlist) and runs the intro sequence against a display list.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mnemo_ui::audio::{AudioController, SimulatedOutput};
use mnemo_ui::backend::HttpBackend;
use mnemo_ui::intro::{ChimeSynth, DisplayList, IntroSequencer, RecordingView, ViewEffect};
use mnemo_ui::journal::{AudioBlock, Journal, Side};
use mnemo_ui::AudioConfig;
use tracing::{debug, info};

const FRAME_MS: f64 = 1000.0 / 60.0;

#[derive(Parser, Debug)]
#[command(name = "mnemo-ui")]
#[command(about = "Headless memory journal client")]
#[command(version)]
struct Args {
    /// Base URL of mnemo-server
    #[arg(long, env = "MNEMO_SERVER", default_value = "http://localhost:3000")]
    server: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the music library and the global playlist
    Library,
    /// Show the memory timeline
    Memories,
    /// Open one memory and show its music
    View { id: String },
    /// Run the intro sequence headless and log its transitions
    Intro {
        /// Length of the run in milliseconds
        #[arg(long, default_value_t = 12_000.0)]
        millis: f64,
        #[arg(long, default_value_t = 1280.0)]
        width: f64,
        #[arg(long, default_value_t = 720.0)]
        height: f64,
        /// Seed for the procedural scene
        #[arg(long)]
        seed: Option<u64>,
        /// Click the interaction point at this many milliseconds
        #[arg(long)]
        click_at: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    info!(
        "Starting mnemo-ui v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let backend = Arc::new(HttpBackend::new(args.server.clone()));
    let audio = Arc::new(AudioController::new(
        backend,
        Box::new(SimulatedOutput::new()),
        AudioConfig::default(),
    ));
    let journal = Journal::new(Arc::clone(&audio));

    match args.command {
        Command::Library => {
            audio
                .ensure_loaded()
                .await
                .with_context(|| format!("Failed to load music from {}", args.server))?;
            let session = audio.session().await;
            println!("Library ({} tracks):", session.library.len());
            for track in &session.library {
                println!("  {}  {}", track.name, track.url);
            }
            println!("Global playlist:");
            for (i, name) in session.global_playlist.iter().enumerate() {
                println!("  {}. {}", i + 1, name);
            }
            println!("Volume: {:.2}", session.target_volume);
        }
        Command::Memories => {
            let cards = journal
                .timeline()
                .await
                .context("Failed to load memories")?;
            if cards.is_empty() {
                println!("No memories yet");
            }
            for card in cards {
                let side = match card.side {
                    Side::Left => "L",
                    Side::Right => "R",
                };
                println!("[{}{:+}] {}  {}  ({})", side, card.offset_x, card.date, card.title, card.id);
                println!("      {}", card.preview);
            }
        }
        Command::View { id } => {
            let Some(view) = journal
                .view_memory(&id)
                .await
                .with_context(|| format!("Failed to open memory {}", id))?
            else {
                return Ok(());
            };
            println!("{}", view.memory.title);
            println!("{} | {}", view.memory.display_date(), view.emotion_label);
            println!();
            println!("{}", view.memory.content);
            println!();
            match view.audio {
                AudioBlock::NoDedicatedMusic => println!("This memory has no dedicated music."),
                AudioBlock::Tracks(_) => {
                    println!("Memory music:");
                    for line in audio.now_playing().await {
                        println!("{}", line);
                    }
                }
            }
            journal.close_view().await;
        }
        Command::Intro {
            millis,
            width,
            height,
            seed,
            click_at,
        } => run_intro(millis, width, height, seed, click_at),
    }

    Ok(())
}

fn run_intro(millis: f64, width: f64, height: f64, seed: Option<u64>, click_at: Option<f64>) {
    let view = RecordingView::new();
    let mut intro = match seed {
        Some(seed) => IntroSequencer::with_seed(view, width, height, seed),
        None => IntroSequencer::new(view, width, height),
    };
    let synth = ChimeSynth::default();
    let mut list = DisplayList::new();
    let mut clicked = false;
    let mut frames = 0usize;

    intro.init(0.0);
    let mut now = 0.0;
    while now <= millis {
        if let Some(at) = click_at {
            if !clicked && now >= at {
                clicked = intro.click(now);
            }
        }
        list.clear();
        intro.frame(now, &mut list);
        frames += 1;

        for effect in intro.view_mut().take() {
            match effect {
                ViewEffect::Chime => {
                    let samples = synth.render();
                    info!("{:>6.0} ms  chime ({} samples)", now, samples.len());
                }
                ViewEffect::Reset => {}
                other => info!("{:>6.0} ms  {:?}", now, other),
            }
        }
        debug!("frame {} drew {} commands", frames, list.len());
        now += FRAME_MS;
    }

    let state = intro.state();
    info!(
        "Intro finished: {} frames, interactive={}, completed={}",
        frames, state.interactive, state.completed
    );
}
