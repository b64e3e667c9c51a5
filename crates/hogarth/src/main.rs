//! Hogarth CLI binary.
//!
//! Command-line access to the generation workflows:
//! - Submit a story run from a post file and poll it to completion
//! - Submit a webtoon script run from a story file and poll it to completion

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, run_script, run_story};

    // Load .env before settings so GEMINI_API_KEY and HOGARTH_* land.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_target(false)
            .init();
    } else {
        hogarth::init_telemetry()?;
    }

    match cli.command {
        Commands::Story { post, mood } => {
            run_story(&post, mood).await?;
        }
        Commands::Script { story, genre } => {
            run_script(&story, genre).await?;
        }
    }

    Ok(())
}
