use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use valet::command::ResponseGenerator;
use valet::console::{ConsoleSpeaker, ConsoleTranscriber};
use valet::db::{self, NoteRepo};
use valet::launcher::DesktopLauncher;
use valet::journal::{FirestoreJournal, Journal, NullJournal};
use valet::session::{Session, Speaker, Transcriber};
use valet::voice::{AudioPlayback, MicCapture, VoiceSpeaker, VoiceTranscriber, rms};
use valet::{Config, voice};

/// Valet - voice-driven personal command assistant
#[derive(Parser)]
#[command(name = "valet", version, about)]
struct Cli {
    /// Use stdin/stdout instead of microphone and speakers
    #[arg(long, env = "VALET_TEXT_MODE")]
    text: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Test microphone input
    TestMic {
        /// Duration in seconds
        #[arg(short, long, default_value = "5")]
        duration: u64,
    },
    /// Test speaker output
    TestSpeaker,
    /// Test TTS output
    TestTts {
        /// Text to speak
        #[arg(default_value = "Hello! This is a test of the text to speech system.")]
        text: String,
    },
    /// List recently saved notes
    Notes {
        /// Number of notes to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Interactive first-run setup
    Setup,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,valet=info",
        1 => "info,valet=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

#[allow(clippy::future_not_send)]
async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Some(cmd) = cli.command {
        return match cmd {
            Command::TestMic { duration } => test_mic(duration).await,
            Command::TestSpeaker => test_speaker().await,
            Command::TestTts { text } => test_tts(&text).await,
            Command::Notes { limit } => cmd_notes(limit),
            Command::Setup => valet::setup::run_setup(),
        };
    }

    tracing::info!(text_mode = cli.text, "starting valet");

    let config = Config::load(cli.text)?;
    tracing::debug!(?config, "loaded configuration");

    run_session(config).await
}

/// Assemble the collaborators and run the session loop until it ends
#[allow(clippy::future_not_send)]
async fn run_session(config: Config) -> anyhow::Result<()> {
    let pool = db::init(config.db_path())?;
    let notes = NoteRepo::new(pool);
    let generator = ResponseGenerator::new(Box::new(notes), Box::new(DesktopLauncher::new()));

    let journal: Box<dyn Journal> = match &config.journal.service_account_path {
        Some(path) => match FirestoreJournal::new(path.clone(), config.journal.collection.clone())
        {
            Ok(journal) => Box::new(journal),
            Err(e) => {
                tracing::warn!(error = %e, "firestore journal unavailable, logging disabled");
                Box::new(NullJournal)
            }
        },
        None => {
            tracing::info!("no service account key configured, logging disabled");
            Box::new(NullJournal)
        }
    };

    let (transcriber, speaker): (Box<dyn Transcriber>, Box<dyn Speaker>) = if config.voice.enabled
    {
        let transcriber = VoiceTranscriber::new(&config.voice, &config.api_keys).await?;
        let speaker = VoiceSpeaker::new(&config.voice, &config.api_keys)?;
        (Box::new(transcriber), Box::new(speaker))
    } else {
        tracing::info!("voice disabled, using text mode");
        (Box::new(ConsoleTranscriber::new()), Box::new(ConsoleSpeaker))
    };

    // Ctrl-c feeds the session's shutdown channel
    let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(()).await;
        }
    });

    tracing::info!("valet ready");

    Session::new(generator, transcriber, speaker, journal, shutdown_rx)
        .run()
        .await?;

    Ok(())
}

/// Test microphone input
#[allow(clippy::future_not_send)]
async fn test_mic(duration: u64) -> anyhow::Result<()> {
    println!("Testing microphone for {duration} seconds...");
    println!("Speak into your microphone!\n");

    let mut capture = MicCapture::new()?;
    capture.start()?;

    println!("Sample rate: {} Hz", voice::SAMPLE_RATE);
    println!("---");

    for i in 0..duration {
        tokio::time::sleep(Duration::from_secs(1)).await;

        let samples = capture.take_buffer();
        let energy = rms(&samples);
        let peak = samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max);

        // Visual meter
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let meter_len = (energy * 100.0).min(50.0) as usize;
        let meter: String = "#".repeat(meter_len) + &" ".repeat(50 - meter_len);

        println!(
            "[{:2}s] RMS: {:.4} | Peak: {:.4} | [{}]",
            i + 1,
            energy,
            peak,
            meter
        );
    }

    capture.stop();

    println!("\n---");
    println!("If you saw movement in the meter, your mic is working!");
    println!("If RMS stayed near 0, check:");
    println!("  1. Is your mic plugged in?");
    println!("  2. Run: pactl info | grep 'Default Source'");
    println!("  3. Run: arecord -l (to list devices)");

    Ok(())
}

/// Test speaker output with a sine wave
async fn test_speaker() -> anyhow::Result<()> {
    println!("Testing speaker output...");
    println!("You should hear a 440Hz tone for 2 seconds\n");

    let mut playback = AudioPlayback::new()?;

    // 2 seconds of 440Hz sine at the 24kHz playback rate
    let sample_rate = 24000_u32;
    let frequency = 440.0_f32;
    #[allow(clippy::cast_precision_loss)]
    let samples: Vec<f32> = (0..sample_rate * 2)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            (2.0 * std::f32::consts::PI * frequency * t).sin() * 0.3
        })
        .collect();

    println!("Playing {} samples at {} Hz...", samples.len(), sample_rate);
    playback.play(samples).await?;

    println!("\n---");
    println!("If you heard the tone, your speakers are working!");

    Ok(())
}

/// Test TTS output
#[allow(clippy::future_not_send)]
async fn test_tts(text: &str) -> anyhow::Result<()> {
    println!("Testing TTS with text: \"{text}\"\n");

    let config = Config::load(false)?;
    let mut speaker = VoiceSpeaker::new(&config.voice, &config.api_keys)?;

    println!("Synthesizing and playing...");
    speaker.speak(text).await?;

    println!("\n---");
    println!("If you heard the speech, TTS is working!");

    Ok(())
}

/// List recently saved notes
fn cmd_notes(limit: usize) -> anyhow::Result<()> {
    let config = Config::load(true)?;
    let pool = db::init(config.db_path())?;
    let repo = NoteRepo::new(pool);

    let notes = repo.recent(limit)?;
    if notes.is_empty() {
        println!("No notes saved yet.");
        return Ok(());
    }

    for note in notes {
        println!("[{}] {}", note.created_at.format("%Y-%m-%d %H:%M:%S"), note.text);
    }

    Ok(())
}
