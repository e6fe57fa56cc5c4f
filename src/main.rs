use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::time::{Duration, Instant};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tubenarrator::cli::{Cli, Commands};
use tubenarrator::config::Config;
use tubenarrator::pipeline::ContentPipeline;
use tubenarrator::{output, resolve_video_id, utils};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose {
        "tubenarrator=debug"
    } else {
        "tubenarrator=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Resolve { url } => {
            let video_id = resolve_video_id(&url)?;
            println!("{}", video_id);
        }
        Commands::Config { show } => {
            let config = Config::load().await?;
            if show {
                config.display();
            } else {
                println!("Edit the config file to change settings:");
                println!("  {}", Config::config_path()?.display());
            }
        }
        Commands::Process {
            url,
            output: output_dir,
            voice,
            metadata,
            thumbnail,
        } => {
            let config = Config::load().await?;

            // Check for required external dependencies (non-fatal)
            let missing_deps = utils::check_dependencies(&config.app.yt_dlp_path).await;
            if !missing_deps.is_empty() {
                eprintln!("⚠️  Dependency check warnings:");
                for dep in missing_deps {
                    eprintln!("   • {}", dep);
                }
                eprintln!("   (Continuing anyway - tools may be available)");
            }

            let mut pipeline = ContentPipeline::new(&config)?;
            if let Some(voice) = voice {
                pipeline = pipeline.with_voice(voice);
            }

            tracing::info!("Starting narration for URL: {}", url);
            let started = Instant::now();

            let result = with_spinner(
                cli.quiet,
                "Fetching transcript, writing script and narrating...",
                pipeline.process(&url),
            )
            .await;
            let pipeline_output = result
                .into_result()
                .map_err(|error| anyhow::anyhow!(error))?;

            let root = output_dir.unwrap_or_else(|| config.app.output_dir.clone());
            let saved = output::save_pipeline_output(&pipeline_output, &root)?;

            println!(
                "{} {} in {}",
                style("✔").green(),
                pipeline_output.transcript.video_id,
                utils::format_duration(started.elapsed().as_secs_f64())
            );
            println!("Transcript saved to: {}", saved.transcript.display());
            println!("Script saved to: {}", saved.script.display());
            println!(
                "Audio saved to: {} ({})",
                saved.audio.display(),
                utils::format_file_size(pipeline_output.audio.len() as u64)
            );

            if metadata || thumbnail {
                let generated = with_spinner(
                    cli.quiet,
                    "Generating metadata...",
                    pipeline.generate_metadata(&pipeline_output.script),
                )
                .await;
                let path = output::save_metadata(
                    &generated,
                    Some(pipeline_output.transcript.video_id.as_str()),
                    &saved.dir,
                )?;
                println!("Metadata saved to: {}", path.display());

                if thumbnail {
                    let url = with_spinner(
                        cli.quiet,
                        "Generating thumbnail...",
                        pipeline.generate_thumbnail(
                            &pipeline_output.script,
                            &generated.thumbnail_text,
                        ),
                    )
                    .await?;
                    let path = output::save_thumbnail_url(&url, &saved.dir)?;
                    println!("Thumbnail URL saved to: {}", path.display());
                    println!("  {}", url);
                }
            }
        }
        Commands::Metadata { script, format } => {
            let config = Config::load().await?;
            let pipeline = ContentPipeline::new(&config)?;
            let text = read_text(&script)?;

            let generated = with_spinner(
                cli.quiet,
                "Generating metadata...",
                pipeline.generate_metadata(&text),
            )
            .await;
            output::print_metadata(&generated, &format)?;
        }
        Commands::Thumbnail { script, text } => {
            let config = Config::load().await?;
            let pipeline = ContentPipeline::new(&config)?;
            let script_text = read_text(&script)?;

            let url = with_spinner(
                cli.quiet,
                "Generating thumbnail...",
                pipeline.generate_thumbnail(&script_text, &text),
            )
            .await?;
            println!("{}", url);
        }
        Commands::Narrate {
            input,
            output,
            voice,
        } => {
            let config = Config::load().await?;
            let mut pipeline = ContentPipeline::new(&config)?;
            if let Some(voice) = voice {
                pipeline = pipeline.with_voice(voice);
            }
            let text = read_text(&input)?;

            let audio = with_spinner(
                cli.quiet,
                "Synthesizing narration...",
                pipeline.narrate(&text),
            )
            .await?;
            fs_err::write(&output, &audio)?;
            println!(
                "Audio saved to: {} ({})",
                output.display(),
                utils::format_file_size(audio.len() as u64)
            );
        }
    }

    Ok(())
}

fn read_text(path: &std::path::Path) -> Result<String> {
    fs_err::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Await `task` behind a spinner unless `quiet`
async fn with_spinner<F: Future>(quiet: bool, message: &'static str, task: F) -> F::Output {
    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    if let Ok(spinner_style) =
        ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")
    {
        progress.set_style(spinner_style);
    }
    progress.set_message(message);
    progress.enable_steady_tick(Duration::from_millis(120));

    let output = task.await;
    progress.finish_and_clear();
    output
}
