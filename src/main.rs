use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use video_insight::cli::{Cli, Commands, ResponseKind};
use video_insight::config::Config;
use video_insight::extractors::ExtractorRegistry;
use video_insight::output;
use video_insight::parser::{parse_chart_analysis, SectionParser};
use video_insight::pipeline::{AnalysisPipeline, AnalysisReport};
use video_insight::utils;

#[tokio::main]
async fn main() -> Result<()> {
    // Missing .env is fine, the key may come from the shell or the config file
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json_logs);

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Analyze {
            url,
            output,
            format,
            compact,
        } => match analyze(config_path, &url, !cli.quiet).await {
            Ok(report) => {
                let content = output::render_report(&report, format, compact)?;
                write_output(&content, output.as_deref())?;
            }
            Err(err) => {
                tracing::error!("Analysis failed: {:#}", err);
                // The error body always goes to stdout so callers can parse it
                output::emit(&output::render_error(&err, format, compact)?, None)?;
                std::process::exit(1);
            }
        },
        Commands::Parse {
            input,
            kind,
            output,
            format,
            compact,
        } => {
            let config = Config::load(config_path)?;
            let text = read_input(&input)?;

            let content = match kind {
                ResponseKind::Analysis => {
                    let sections = SectionParser::new(config.bullet_glyphs()).parse(&text);
                    output::render_sections(&sections, format, compact)?
                }
                ResponseKind::Chart => {
                    output::render_charts(&parse_chart_analysis(&text), format, compact)?
                }
            };

            write_output(&content, output.as_deref())?;
        }
        Commands::Config { show } => {
            if show {
                Config::load(config_path)?.display();
            } else {
                init_config(config_path)?;
            }
        }
        Commands::Platforms => {
            let config = Config::load(config_path)?;
            println!("Extractors, tried in order:");
            for (i, platform) in ExtractorRegistry::new(&config.extractor)
                .list_platforms()
                .into_iter()
                .enumerate()
            {
                println!("  {}. {}", i + 1, platform);
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool, json_logs: bool) {
    let default_filter = if verbose {
        "video_insight=debug,insight=debug"
    } else {
        "video_insight=info,insight=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    // stdout carries the report, so logs go to stderr
    let (plain, json) = if json_logs {
        (
            None,
            Some(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)),
        )
    } else {
        (
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
            None,
        )
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(plain)
        .with(json)
        .init();
}

async fn analyze(config_path: Option<&Path>, url: &str, show_progress: bool) -> Result<AnalysisReport> {
    let config = Config::load(config_path)?;

    // Non-fatal: direct media links never need yt-dlp
    let missing_deps = utils::check_dependencies(&config.extractor.yt_dlp_path).await;
    if !missing_deps.is_empty() {
        eprintln!("{}", style("⚠️  Dependency check warnings:").yellow().for_stderr());
        for dep in missing_deps {
            eprintln!("   • {}", dep);
        }
        eprintln!("   (Continuing anyway - direct media URLs still work)");
    }

    let pipeline = AnalysisPipeline::new(&config, show_progress)?;
    pipeline.run(url).await
}

fn read_input(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read response from stdin")?;
        return Ok(text);
    }

    fs_err::read_to_string(input).context("Failed to read response file")
}

fn write_output(content: &str, path: Option<&Path>) -> Result<()> {
    output::emit(content, path)?;

    if let Some(path) = path {
        println!("{} {}", style("Saved to:").green(), path.display());
    }

    Ok(())
}

fn init_config(explicit_path: Option<&Path>) -> Result<()> {
    let path: PathBuf = match explicit_path {
        Some(path) => path.to_path_buf(),
        None => Config::default_path()?,
    };

    if path.exists() {
        println!("Configuration already exists at {}", path.display());
        println!("Run with --show to see the effective settings.");
        return Ok(());
    }

    Config::default().save(&path)?;
    println!("{} {}", style("Wrote default configuration to").green(), path.display());
    println!("Set {} or add assemblyai.api_key to start analyzing.", Config::API_KEY_ENV);

    Ok(())
}
