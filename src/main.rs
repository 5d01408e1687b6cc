//! PDF scrubbing CLI.
//!
//! Runs the scrubbing pipeline on a single file and reports the run
//! statistics, or dumps the text of a PDF for inspection.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use pdfscrub::domain::{PatternMatcher, PriceMatcher};
use pdfscrub::{extract_text_from_pdf, ProcessConfig, ProcessPipeline};

/// PDF Scrubbing Tool
///
/// Removes headers, translation phrases, prices and reference codes from
/// PDF documents. Use the 'extract' subcommand to inspect text.
#[derive(Parser)]
#[command(name = "pdfscrub")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Input PDF file path
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output PDF file path
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Stage toggles as a JSON object, e.g. '{"remove_header": false}'
    #[arg(short, long, value_name = "JSON")]
    config: Option<String>,

    /// Keep translation source phrases
    #[arg(long)]
    no_translate: bool,

    /// Keep prices
    #[arg(long)]
    no_prices: bool,

    /// Keep the page header band
    #[arg(long)]
    no_header: bool,

    /// Keep reference codes
    #[arg(long)]
    no_ref: bool,

    /// Print run statistics as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract text from a PDF (for debugging and verification)
    Extract {
        /// Input PDF file path
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Output text file (optional, defaults to stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// List the price tokens found instead of the full text
        #[arg(long)]
        prices: bool,
    },
}

/// Builds the stage toggles from the JSON config and the `--no-*` flags.
///
/// Flags only ever switch stages off.
fn build_config(
    raw: Option<&str>,
    no_translate: bool,
    no_prices: bool,
    no_header: bool,
    no_ref: bool,
) -> Result<ProcessConfig> {
    let mut config = match raw {
        Some(raw) => ProcessConfig::from_json(raw).context("Invalid --config")?,
        None => ProcessConfig::default(),
    };

    config.translate &= !no_translate;
    config.remove_prices &= !no_prices;
    config.remove_header &= !no_header;
    config.remove_reference &= !no_ref;
    Ok(config)
}

/// Command handler.
struct ScrubHandler {
    pipeline: ProcessPipeline,
    verbose: bool,
}

impl ScrubHandler {
    fn new(verbose: bool) -> Self {
        Self {
            pipeline: ProcessPipeline::with_standard_rules(),
            verbose,
        }
    }

    fn process(
        &self,
        input: &Path,
        output: &Path,
        config: ProcessConfig,
        json: bool,
    ) -> Result<()> {
        if !input.exists() {
            anyhow::bail!("Input file does not exist: {}", input.display());
        }

        if self.verbose {
            println!("Input:  {}", input.display());
            println!("Output: {}", output.display());
            println!("Config: {}", serde_json::to_string(&config)?);
        }

        let stats = self
            .pipeline
            .process(input, output, &config)
            .with_context(|| "Processing failed")?;

        if json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
            return Ok(());
        }

        if self.verbose {
            println!("\nRun Summary:");
            println!("  Pages processed:   {}", stats.pages);
            println!("  Translations:      {}", stats.translations);
            println!("  Prices removed:    {}", stats.prices_removed);
            println!("  Processing time:   {:.3}s", stats.processing_time);
            println!("  Output size:       {} bytes", stats.output_size);
        }

        println!(
            "✓ Processed {} page(s), {} translation(s), {} price(s) removed → {}",
            stats.pages,
            stats.translations,
            stats.prices_removed,
            output.display()
        );

        Ok(())
    }

    fn extract(&self, input: &Path, output: Option<&Path>, prices: bool) -> Result<()> {
        if !input.exists() {
            anyhow::bail!("Input file does not exist: {}", input.display());
        }

        let text = extract_text_from_pdf(input).with_context(|| "Text extraction failed")?;
        let text = if prices {
            PriceMatcher::new().extract_all(&text).join("\n")
        } else {
            text
        };

        if let Some(output_path) = output {
            std::fs::write(output_path, &text)
                .with_context(|| format!("Failed to write to {}", output_path.display()))?;
            println!(
                "✓ Extracted {} characters → {}",
                text.len(),
                output_path.display()
            );
        } else {
            println!("{}", text);
        }

        Ok(())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let handler = ScrubHandler::new(cli.verbose);

    match &cli.command {
        Some(Commands::Extract {
            input,
            output,
            prices,
        }) => {
            handler.extract(input, output.as_deref(), *prices)?;
        }
        None => {
            let input = cli
                .input
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("--input is required"))?;
            let output = cli
                .output
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("--output is required"))?;

            let config = build_config(
                cli.config.as_deref(),
                cli.no_translate,
                cli.no_prices,
                cli.no_header,
                cli.no_ref,
            )?;
            handler.process(input, output, config, cli.json)?;
        }
    }

    Ok(())
}
