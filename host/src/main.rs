//! Native runner: simulate scripted matches, replay transcripts, list the roster.
//!
//! Usage:
//!   neokult simulate --script aggressive --seed 7 --out match.json
//!   neokult replay match.json
//!   neokult roster

mod script;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;

use neokult_core::{
    replay, CharacterId, Content, Headless, MatchSummary, Phase, Side, Transcript,
};

use crate::script::Script;

#[derive(Parser, Debug)]
#[command(name = "neokult")]
#[command(about = "Headless NeoKult matches: simulate, replay, inspect content")]
struct Args {
    /// Content document (JSON); the built-in roster when omitted
    #[arg(long, global = true)]
    content: Option<PathBuf>,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Run a scripted player against the opponent policy
    Simulate {
        #[arg(long, default_value_t = 42)]
        seed: u32,

        #[arg(long, value_enum, default_value = "neo-razor")]
        player: Character,

        #[arg(long, value_enum, default_value = "vox-slasher")]
        opponent: Character,

        #[arg(long, value_enum, default_value = "aggressive")]
        script: Script,

        /// Frame limit at the fixed 16 ms step
        #[arg(long, default_value_t = 7200)]
        frames: u64,

        /// Write the recorded transcript here
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Replay a transcript file, or stdin when no file is given
    Replay { file: Option<PathBuf> },
    /// Print the character roster
    Roster,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Character {
    NeoRazor,
    VoxSlasher,
    EchoHex,
}

impl From<Character> for CharacterId {
    fn from(c: Character) -> Self {
        match c {
            Character::NeoRazor => CharacterId::NeoRazor,
            Character::VoxSlasher => CharacterId::VoxSlasher,
            Character::EchoHex => CharacterId::EchoHex,
        }
    }
}

/// Summary as printed, with hashes in hex.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report {
    seed: u32,
    player: CharacterId,
    opponent: CharacterId,
    frames_run: u64,
    phase: Phase,
    winner: Option<Side>,
    health: [i32; 2],
    hits_landed: [u32; 2],
    best_combo: u32,
    transcript_hash: String,
    seed_hash: String,
}

impl Report {
    fn new(transcript: &Transcript, summary: &MatchSummary) -> Self {
        Report {
            seed: transcript.seed,
            player: transcript.player,
            opponent: transcript.opponent,
            frames_run: summary.frames_run,
            phase: summary.phase,
            winner: summary.winner,
            health: summary.health,
            hits_landed: summary.hits_landed,
            best_combo: summary.best_combo,
            transcript_hash: hex::encode(summary.transcript_hash),
            seed_hash: hex::encode(summary.seed_hash),
        }
    }
}

fn load_content(path: Option<&Path>) -> Result<Content> {
    let Some(path) = path else {
        return Ok(Content::builtin());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading content file {}", path.display()))?;
    Content::from_json(&json).with_context(|| format!("loading content from {}", path.display()))
}

fn load_transcript(file: Option<&Path>) -> Result<Transcript> {
    let json = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading transcript {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading transcript from stdin")?;
            buf
        }
    };
    serde_json::from_str(&json).context("parsing transcript JSON")
}

fn simulate(
    content: Content,
    transcript: Transcript,
    script: Script,
    frames: u64,
) -> (Transcript, MatchSummary) {
    let mut transcript = transcript;
    let mut headless = Headless::new(transcript.config(), content);
    for frame in 0..frames {
        let buttons = script.buttons(frame, &headless);
        transcript.frames.push(buttons);
        headless.step(buttons);
        if headless.session().phase() == Phase::Victory {
            break;
        }
    }
    let summary = MatchSummary::of(&headless, &transcript);
    (transcript, summary)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("neokult=info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let content = load_content(args.content.as_deref())?;

    match args.command {
        Cmd::Simulate {
            seed,
            player,
            opponent,
            script,
            frames,
            out,
        } => {
            let start = Transcript {
                seed,
                player: player.into(),
                opponent: opponent.into(),
                frames: Vec::new(),
            };
            info!(seed, ?script, frames, "simulating");
            let (transcript, summary) = simulate(content, start, script, frames);
            if let Some(path) = out {
                let json = serde_json::to_string(&transcript)?;
                std::fs::write(&path, json)
                    .with_context(|| format!("writing transcript {}", path.display()))?;
                info!(path = %path.display(), frames = transcript.frames.len(), "transcript written");
            }
            print_json(&Report::new(&transcript, &summary))?;
        }
        Cmd::Replay { file } => {
            let transcript = load_transcript(file.as_deref())?;
            info!(
                seed = transcript.seed,
                frames = transcript.frames.len(),
                "replaying"
            );
            let summary = replay(&transcript, content);
            print_json(&Report::new(&transcript, &summary))?;
        }
        Cmd::Roster => {
            print_json(&content.templates())?;
        }
    }
    Ok(())
}
