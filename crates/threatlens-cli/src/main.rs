use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use threatlens_proto::inference::InferenceResponse;
use threatlens_summary::{aggregate_stats, frame_series, summarize, DetectionSummary, DEFAULT_SERIES_CAP};

#[derive(Debug, Parser)]
#[command(name = "threatlens", version, about = "ThreatLens - weapon-detection response analytics")]
struct Cli {
    #[arg(long)]
    config: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Full chart-ready summary of a response file, as JSON on stdout.
    Summarize {
        #[arg(long)]
        input: String,
        /// Overrides the configured frame-series sampling cap.
        #[arg(long)]
        cap: Option<usize>,
    },
    /// Per-frame confidence series only (video responses).
    Series {
        #[arg(long)]
        input: String,
        #[arg(long)]
        cap: Option<usize>,
    },
    /// Human-readable detection report.
    Stats {
        #[arg(long)]
        input: String,
    },
    /// Validate configuration values.
    Doctor,
}

#[derive(Debug, Default, serde::Deserialize)]
struct Config {
    #[serde(default)]
    summary: SummaryCfg,
    #[serde(default)]
    report: ReportCfg,
}

#[derive(Debug, serde::Deserialize)]
struct SummaryCfg {
    #[serde(default = "default_series_cap")]
    series_cap: usize,
}

#[derive(Debug, serde::Deserialize)]
struct ReportCfg {
    #[serde(default = "default_pretty")]
    pretty: bool,
}

fn default_series_cap() -> usize {
    DEFAULT_SERIES_CAP
}

fn default_pretty() -> bool {
    true
}

impl Default for SummaryCfg {
    fn default() -> Self {
        Self {
            series_cap: default_series_cap(),
        }
    }
}

impl Default for ReportCfg {
    fn default() -> Self {
        Self {
            pretty: default_pretty(),
        }
    }
}

fn load_config(path: Option<&str>) -> Result<Config> {
    match path {
        Some(p) => {
            let s = std::fs::read_to_string(p).context("read config")?;
            Ok(toml::from_str(&s).context("parse config toml")?)
        }
        None => Ok(Config::default()),
    }
}

fn load_response(path: &str) -> Result<InferenceResponse> {
    let s = std::fs::read_to_string(path).with_context(|| format!("read response file {}", path))?;
    let resp: InferenceResponse = serde_json::from_str(&s).context("parse response json")?;
    Ok(resp)
}

#[derive(Debug, serde::Serialize)]
struct ReportEnvelope<'a> {
    ts_unix_ms: i64,
    input: &'a str,
    #[serde(flatten)]
    summary: &'a DetectionSummary,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let cfg = load_config(cli.config.as_deref())?;

    match cli.cmd {
        Command::Summarize { input, cap } => cmd_summarize(&cfg, &input, cap),
        Command::Series { input, cap } => cmd_series(&cfg, &input, cap),
        Command::Stats { input } => cmd_stats(&input),
        Command::Doctor => doctor(&cfg),
    }
}

fn doctor(cfg: &Config) -> Result<()> {
    anyhow::ensure!(cfg.summary.series_cap >= 1, "summary.series_cap must be >= 1");
    info!("doctor: OK");
    Ok(())
}

fn cmd_summarize(cfg: &Config, input: &str, cap: Option<usize>) -> Result<()> {
    let cap = cap.unwrap_or(cfg.summary.series_cap);
    let resp = load_response(input)?;
    let processing_time = resp.processing_time;
    let dets = resp.into_detections()?;
    info!("summarize: {} detections from {}", dets.len(), input);

    let mut summary = summarize(&dets, cap);
    summary.processing_time = processing_time;

    let envelope = ReportEnvelope {
        ts_unix_ms: time::OffsetDateTime::now_utc().unix_timestamp_nanos() as i64 / 1_000_000,
        input,
        summary: &summary,
    };
    print_json(cfg, &envelope)
}

fn cmd_series(cfg: &Config, input: &str, cap: Option<usize>) -> Result<()> {
    let cap = cap.unwrap_or(cfg.summary.series_cap);
    let dets = load_response(input)?.into_detections()?;
    let series = frame_series(&dets, cap);
    info!("series: {} points from {} detections", series.len(), dets.len());
    print_json(cfg, &series)
}

fn cmd_stats(input: &str) -> Result<()> {
    let resp = load_response(input)?;
    let processing_time = resp.processing_time;
    let processed_image_url = resp.processed_image_url.clone();
    let dets = resp.into_detections()?;
    let stats = aggregate_stats(&dets);

    if let Some(t) = processing_time {
        println!("Processing Time: {:.2} seconds", t);
    }
    if let Some(url) = processed_image_url {
        println!("Processed Image: {}", url);
    }
    if stats.total == 0 {
        println!("No detections.");
        return Ok(());
    }
    println!("Total Detections: {}", stats.total);
    if let Some(avg) = stats.average_confidence {
        println!("Average Confidence: {:.2}%", avg * 100.0);
    }
    println!("Weapon Types Detected:");
    for (class, n) in stats.per_class.iter() {
        println!("  {}: {} occurrences", class, n);
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(cfg: &Config, value: &T) -> Result<()> {
    let out = if cfg.report.pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", out);
    Ok(())
}
