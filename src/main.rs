use std::io::Write as _;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use meeting_scribe::{
    extract_transcript, ApiClient, Config, Language, MeetingSession, Phase, Summary,
};

#[derive(Parser)]
#[command(
    name = "meeting-scribe",
    version,
    about = "Record a short meeting and get a transcript and an automatic summary"
)]
struct Cli {
    /// Config file (TOML); built-in defaults are used when omitted.
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Record from the microphone, then upload for transcription.
    Record {
        /// Summarization language: en, zh, zh-TW, zh-CN.
        #[arg(long)]
        language: Option<String>,
        /// Keep a local WAV copy in the configured recordings directory.
        #[arg(long)]
        keep: bool,
    },
    /// Fetch and print the transcript of an existing task.
    Transcript {
        #[arg(long)]
        task: String,
    },
    /// Request a summary of an existing task.
    Summarize {
        #[arg(long)]
        task: String,
        /// Summarization language: en, zh, zh-TW, zh-CN.
        #[arg(long)]
        language: Option<String>,
    },
    /// Show processing progress of an existing task.
    Progress {
        #[arg(long)]
        task: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load_or_default(cli.config.as_deref())?;

    info!("meeting-scribe v{}", env!("CARGO_PKG_VERSION"));
    info!("Service endpoint: {}", cfg.service.base_url);

    match cli.command {
        Command::Record { language, keep } => run_record(cfg, language, keep).await,
        Command::Transcript { task } => run_transcript(cfg, task).await,
        Command::Summarize { task, language } => run_summarize(cfg, task, language).await,
        Command::Progress { task } => run_progress(cfg, task).await,
    }
}

fn pick_language(cfg: &Config, flag: Option<&str>) -> Language {
    flag.map(Language::parse)
        .unwrap_or_else(|| Language::parse(&cfg.service.language))
}

async fn run_record(cfg: Config, language: Option<String>, keep: bool) -> Result<()> {
    let language = language.as_deref().map(Language::parse);
    let mut session = MeetingSession::new(&cfg);

    session.start()?;
    println!("Recording. Commands: p = pause, r = resume, s or Enter = stop.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(Duration::from_secs(1));

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if session.phase() == Phase::Recording {
                    print!(
                        "\rRecorded: {}  |{}|  ",
                        session.elapsed_display(),
                        session.waveform_bar()
                    );
                    std::io::stdout().flush().ok();
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match line.trim() {
                    "p" => {
                        session.pause();
                        println!("Paused at {}", session.elapsed_display());
                    }
                    "r" => {
                        session.resume();
                        println!("Resumed");
                    }
                    "s" | "" => break,
                    other => println!("Unknown command: {}", other),
                }
            }
        }
    }

    println!("\nStopping and uploading...");
    let outcome = session.stop().await?;
    println!(
        "Recorded {} ({:.1}s, {} bytes)",
        outcome.recording.file_name(),
        outcome.recording.duration_seconds(),
        outcome.recording.byte_len()
    );
    println!("Task: {}", outcome.task_id);

    if keep {
        let path = PathBuf::from(&cfg.audio.recordings_path).join(outcome.recording.file_name());
        outcome.recording.save_to(&path)?;
        println!("Kept local copy: {}", path.display());
    }

    match session.transcript() {
        Some(text) => println!("\nTranscript:\n{}", text),
        None => println!("\nNo transcription available yet."),
    }

    println!("\nCommands: t = transcript, m = summarize, g = progress, q = quit.");
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "t" => match session.refresh_transcript().await {
                Ok(Some(text)) => println!("Transcript:\n{}", text),
                Ok(None) => println!("No ASR result available yet."),
                Err(e) => println!("Failed to fetch ASR result: {:#}", e),
            },
            "m" => match session.summarize(language).await {
                Ok(Some(summary)) => println!("Summarization Result:\n{}", summary),
                Ok(None) => println!("No summary available yet."),
                Err(e) => println!("Summarize call failed: {:#}", e),
            },
            "g" => match session.progress().await {
                Ok(Some(progress)) => println!("{}", progress.describe()),
                Ok(None) => println!("Status unknown"),
                Err(e) => println!("Failed to fetch progress: {:#}", e),
            },
            "q" => break,
            "" => {}
            other => println!("Unknown command: {}", other),
        }
    }

    Ok(())
}

async fn run_transcript(cfg: Config, task: String) -> Result<()> {
    let api = ApiClient::new(&cfg.service.base_url);
    let payload = api.get_result(&task).await?;
    match payload.as_ref().and_then(extract_transcript) {
        Some(text) => println!("{}", text),
        None => println!("No transcription available yet."),
    }
    Ok(())
}

async fn run_summarize(cfg: Config, task: String, language: Option<String>) -> Result<()> {
    let language = pick_language(&cfg, language.as_deref());
    let api = ApiClient::new(&cfg.service.base_url);
    match api.summarize_from_task(&task, language).await? {
        Some(payload) => println!("{}", Summary::from_payload(&payload)),
        None => println!("No summary available yet."),
    }
    Ok(())
}

async fn run_progress(cfg: Config, task: String) -> Result<()> {
    let api = ApiClient::new(&cfg.service.base_url);
    match api.get_progress(&task).await? {
        Some(progress) => println!("{}", progress.describe()),
        None => println!("Status unknown"),
    }
    Ok(())
}
