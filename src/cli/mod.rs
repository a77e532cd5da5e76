use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "insight",
    about = "Video Insight - Turn a video into sentiment, summary and narrative analysis for charting",
    version,
    long_about = "Transcribes the audio of a video with AssemblyAI, runs LeMUR prompts over the transcript and reshapes the free-form answers into structured JSON that a charting frontend can render directly."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Configuration file to use instead of the default lookup
    #[arg(long, global = true, value_name = "FILE", env = "INSIGHT_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Transcribe and analyze the video behind a URL
    Analyze {
        /// Video page or direct media URL
        #[arg(value_name = "URL")]
        url: String,

        /// Output file path (prints to console if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Print JSON on a single line
        #[arg(long)]
        compact: bool,
    },

    /// Parse a saved LeMUR response without calling any service
    Parse {
        /// File holding the raw response, or `-` for stdin
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Which prompt the response answers
        #[arg(short, long, value_enum, default_value = "analysis")]
        kind: ResponseKind,

        /// Output file path (prints to console if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Print JSON on a single line
        #[arg(long)]
        compact: bool,
    },

    /// Show or initialize the configuration file
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,
    },

    /// List audio extractors in the order they are tried
    Platforms,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Chart-ready JSON
    Json,
    /// Readable outline
    Text,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Text => write!(f, "text"),
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseKind {
    /// Numbered four-part analysis
    Analysis,
    /// Line and pie chart narrative
    Chart,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["insight", "parse", "response.txt"]).unwrap();
        match cli.command {
            Commands::Parse {
                input,
                kind,
                format,
                compact,
                output,
            } => {
                assert_eq!(input, PathBuf::from("response.txt"));
                assert_eq!(kind, ResponseKind::Analysis);
                assert_eq!(format, OutputFormat::Json);
                assert!(!compact);
                assert!(output.is_none());
            }
            _ => panic!("expected parse command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "insight",
            "analyze",
            "https://youtu.be/x",
            "-f",
            "text",
            "--quiet",
            "--config",
            "custom.yaml",
        ])
        .unwrap();

        assert!(cli.quiet);
        assert_eq!(cli.config, Some(PathBuf::from("custom.yaml")));
        assert!(matches!(
            cli.command,
            Commands::Analyze { format: OutputFormat::Text, .. }
        ));
    }
}
