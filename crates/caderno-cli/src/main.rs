use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use caderno_core::FallbackStats;
use caderno_core::config_file::{self, ConfigFile};
use caderno_parsing::{AbstractClassifier, ParsingConfigBuilder};
use caderno_reporting::{ExportFormat, VolumeMeta};

mod output;

use output::ColorMode;

const DEFAULT_INPUT_DIR: &str = "dados/resumos";
const DEFAULT_OUTPUT_DIR: &str = "saida";
const DEFAULT_OUTPUT_STEM: &str = "caderno_final";

/// Caderno - Compile a folder of academic abstracts into a single volume
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify every abstract in a folder and write the compiled volume
    Compile {
        /// Folder containing the abstracts (.pdf or .txt)
        input_dir: Option<PathBuf>,

        /// Path of the compiled volume
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: md, txt, html or json
        #[arg(long)]
        format: Option<ExportFormat>,

        /// Path to a config file (overrides .caderno.toml and the platform config)
        #[arg(long, env = "CADERNO_CONFIG")]
        config: Option<PathBuf>,

        /// Number of documents processed concurrently
        #[arg(long)]
        workers: Option<usize>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Dry run: classify one document and show where each field came from
    Parse {
        /// Path to the .pdf or .txt abstract
        file_path: PathBuf,

        /// Path to a config file (overrides .caderno.toml and the platform config)
        #[arg(long, env = "CADERNO_CONFIG")]
        config: Option<PathBuf>,

        /// Print the classified record as JSON
        #[arg(long)]
        json: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Compile {
            input_dir,
            output,
            format,
            config,
            workers,
            no_color,
        } => compile(input_dir, output, format, config, workers, no_color).await,
        Command::Parse {
            file_path,
            config,
            json,
            no_color,
        } => parse(&file_path, config, json, no_color),
    }
}

/// `RUST_LOG` wins over `-v`; without either only warnings are shown.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Resolve configuration: explicit file > `.caderno.toml` > platform config.
fn load_config(explicit: Option<&Path>) -> anyhow::Result<ConfigFile> {
    let cascaded = config_file::load_config();
    match explicit {
        Some(path) => {
            let file = config_file::read_from_path(path)?;
            tracing::debug!(path = %path.display(), "loaded explicit config");
            Ok(config_file::merge(cascaded, file))
        }
        None => Ok(cascaded),
    }
}

fn build_classifier(config: &ConfigFile) -> anyhow::Result<AbstractClassifier> {
    let builder = match &config.parser {
        Some(parser) => ParsingConfigBuilder::from_file_config(parser),
        None => ParsingConfigBuilder::new(),
    };
    let parsing = builder
        .build()
        .context("invalid token list in [parser] config")?;
    Ok(AbstractClassifier::with_config(parsing))
}

fn default_output(format: ExportFormat) -> PathBuf {
    Path::new(DEFAULT_OUTPUT_DIR).join(format!("{}.{}", DEFAULT_OUTPUT_STEM, format.extension()))
}

/// Resolve the output format: flag > config > output extension > Markdown.
fn resolve_format(
    flag: Option<ExportFormat>,
    configured: Option<&str>,
    output: Option<&Path>,
) -> anyhow::Result<ExportFormat> {
    if let Some(format) = flag {
        return Ok(format);
    }
    if let Some(name) = configured {
        return Ok(name.parse()?);
    }
    Ok(output
        .and_then(|p| p.extension())
        .and_then(|e| e.to_str())
        .and_then(|e| e.parse().ok())
        .unwrap_or_default())
}

async fn compile(
    input_dir: Option<PathBuf>,
    output: Option<PathBuf>,
    format: Option<ExportFormat>,
    config_path: Option<PathBuf>,
    workers: Option<usize>,
    no_color: bool,
) -> anyhow::Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};

    let config = load_config(config_path.as_deref())?;
    let ingest = config.ingest.clone().unwrap_or_default();

    // CLI flags > config file > defaults
    let input_dir = input_dir
        .or_else(|| ingest.input_dir.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_DIR));
    let output = output.or_else(|| ingest.output_path.as_ref().map(PathBuf::from));
    let format = resolve_format(format, ingest.format.as_deref(), output.as_deref())?;
    let output = output.unwrap_or_else(|| default_output(format));
    let workers = workers
        .or(ingest.workers)
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
        })
        .max(1);

    let color = ColorMode(!no_color);
    let mut writer: Box<dyn Write> = Box::new(std::io::stdout());

    if !input_dir.is_dir() {
        anyhow::bail!(
            "Input folder not found: {}. Create it and place the abstracts (.pdf or .txt) there.",
            input_dir.display()
        );
    }

    let classifier = Arc::new(build_classifier(&config)?);
    let sources = caderno_ingest::collect_sources(&input_dir)?;
    if sources.is_empty() {
        writeln!(
            writer,
            "No documents (.pdf or .txt) found in {}.",
            input_dir.display()
        )?;
        return Ok(());
    }

    output::print_compile_header(&mut writer, &input_dir, sources.len(), workers, color)?;

    let bar = ProgressBar::new(sources.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:40.green/dim}] {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );
    bar.enable_steady_tick(Duration::from_millis(120));

    let ingestion = caderno_ingest::ingest_paths(sources, classifier, workers, |p| {
        let name = p
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        bar.set_message(name);
        bar.inc(1);
    });

    // Dropping the ingestion future aborts the in-flight documents.
    let report = tokio::select! {
        report = ingestion => report,
        _ = tokio::signal::ctrl_c() => {
            bar.abandon_with_message("interrupted");
            anyhow::bail!("Interrupted before the volume was written");
        }
    };
    bar.finish_and_clear();

    output::print_failures(&mut writer, &report.failures, color)?;

    let stats = FallbackStats::from_records(&report.records);
    output::print_summary(&mut writer, &stats, report.failures.len(), color)?;

    if report.records.is_empty() {
        anyhow::bail!("No document could be processed; nothing to compile");
    }

    let meta = VolumeMeta::from_config(config.event.as_ref(), config.layout.as_ref());
    caderno_reporting::export_volume(&report.records, &meta, format, &output)
        .with_context(|| format!("failed to write {}", output.display()))?;

    output::print_written(&mut writer, &output, format, color)?;
    Ok(())
}

fn parse(
    file_path: &Path,
    config_path: Option<PathBuf>,
    json: bool,
    no_color: bool,
) -> anyhow::Result<()> {
    if !file_path.exists() {
        anyhow::bail!("File not found: {}", file_path.display());
    }

    let config = load_config(config_path.as_deref())?;
    let classifier = build_classifier(&config)?;
    let record = caderno_ingest::ingest_file(file_path, &classifier)?;

    let mut writer: Box<dyn Write> = Box::new(std::io::stdout());
    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&record)?)?;
    } else {
        output::print_record(&mut writer, &record, ColorMode(!no_color))?;
    }
    Ok(())
}
