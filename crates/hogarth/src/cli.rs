//! CLI argument definitions and command handlers.

use clap::{Parser, Subcommand};
use hogarth::{Phase, ScriptGenre, Settings, SourcePost, StoryMood, WorkflowService};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Turn posts into stories and stories into webtoon scripts.
#[derive(Debug, Parser)]
#[command(name = "hogarth", version, about)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available workflows.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a story from a post JSON file ({"id", "title", "body"})
    Story {
        /// Path to the post file
        #[arg(long)]
        post: PathBuf,
        /// Narrative mood
        #[arg(long, default_value = "modern_romance")]
        mood: StoryMood,
    },
    /// Generate a webtoon script from a story text file
    Script {
        /// Path to the story file
        #[arg(long)]
        story: PathBuf,
        /// Visual genre
        #[arg(long, default_value = "modern_romance_drama_manhwa")]
        genre: ScriptGenre,
    },
}

/// Submit a story run and poll it to a terminal phase.
pub async fn run_story(
    post_path: &Path,
    mood: StoryMood,
) -> Result<(), Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(post_path)?;
    let post: SourcePost = serde_json::from_str(&raw)?;

    let service = build_service()?;
    let run_id = service.submit_story(post, mood).await;
    tracing::info!(%run_id, "Story run submitted");

    poll_to_terminal(&service, run_id).await
}

/// Submit a script run and poll it to a terminal phase.
pub async fn run_script(
    story_path: &Path,
    genre: ScriptGenre,
) -> Result<(), Box<dyn std::error::Error>> {
    let story = std::fs::read_to_string(story_path)?;

    let service = build_service()?;
    let run_id = service.submit_script(story, genre).await;
    tracing::info!(%run_id, "Script run submitted");

    poll_to_terminal(&service, run_id).await
}

fn build_service() -> Result<WorkflowService, Box<dyn std::error::Error>> {
    let settings = Settings::load()?;
    let driver = Arc::new(settings.gemini_client()?);
    Ok(WorkflowService::new(driver, settings.workflow().clone()))
}

async fn poll_to_terminal(
    service: &WorkflowService,
    run_id: hogarth::RunId,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        let snapshot = service.status(&run_id).await?;
        if snapshot.phase.is_terminal() {
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
            if snapshot.phase == Phase::Failed {
                std::process::exit(1);
            }
            return Ok(());
        }
        tracing::info!(phase = %snapshot.phase, attempts = snapshot.attempts, "Run in progress");
        tokio::time::sleep(Duration::from_secs(2)).await;
    }
}
