//! CLI argument parsing.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand, ValueEnum};

/// Generates TypeScript declarations for CSS modules.
#[derive(Debug, Parser)]
#[command(name = "css-module-dts")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Project root; declarations are written below it
    #[arg(long, default_value = ".", global = true)]
    pub root: Utf8PathBuf,

    /// Declaration output directory, relative to the root (overrides the config file)
    #[arg(long = "dts-output-dir", global = true)]
    pub dts_output_dir: Option<String>,

    /// Skip source maps: no line links and no doc comments
    #[arg(long = "no-source-map", global = true)]
    pub no_source_map: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "human", global = true)]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// What to run.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Process a file of transform requests, one JSON object per line
    Generate {
        /// Request file, or `-` to read stdin
        requests: Utf8PathBuf,
    },
    /// Answer transform requests on stdin with JSON lines on stdout
    Serve,
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output
    Json,
}

impl Args {
    /// Returns whether source maps should be resolved.
    pub fn source_maps(&self) -> bool {
        !self.no_source_map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = Args::parse_from(["css-module-dts", "serve"]);
        assert_eq!(args.root.as_str(), ".");
        assert_eq!(args.dts_output_dir, None);
        assert_eq!(args.output, OutputFormat::Human);
        assert!(args.source_maps());
        assert!(matches!(args.command, Command::Serve));
    }

    #[test]
    fn test_generate_requests() {
        let args = Args::parse_from(["css-module-dts", "generate", "requests.jsonl"]);
        match args.command {
            Command::Generate { requests } => assert_eq!(requests.as_str(), "requests.jsonl"),
            Command::Serve => panic!("expected generate"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::parse_from([
            "css-module-dts",
            "generate",
            "-",
            "--root",
            "/path/to/project",
            "--dts-output-dir",
            "types",
            "--no-source-map",
            "--output",
            "json",
        ]);
        assert_eq!(args.root.as_str(), "/path/to/project");
        assert_eq!(args.dts_output_dir.as_deref(), Some("types"));
        assert!(!args.source_maps());
        assert_eq!(args.output, OutputFormat::Json);
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Args::try_parse_from(["css-module-dts"]).is_err());
    }
}
