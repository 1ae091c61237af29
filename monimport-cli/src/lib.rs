//! Argument handling and output rendering for the `monimport` binary.

use anyhow::{Context, Result};
use clap::Parser;
use monimport_pipeline::{ImportConfig, ImportReport, OutputMode};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "monimport")]
#[command(about = "Import monitoring configuration from a tag-partitioned configuration service")]
pub struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// XML-RPC endpoint URL
    #[arg(long)]
    pub uri: Option<String>,

    /// Login name
    #[arg(long)]
    pub login: Option<String>,

    /// Login password
    #[arg(long)]
    pub password: Option<String>,

    /// Comma-separated root tags
    #[arg(short, long)]
    pub tags: Option<String>,

    /// Legacy single tag, used when no tags are given
    #[arg(long)]
    pub tag: Option<String>,

    /// Output mode: bundle or files
    #[arg(short, long)]
    pub mode: Option<OutputMode>,

    /// Directory receiving files in files mode
    #[arg(long)]
    pub target_dir: Option<PathBuf>,

    /// Write the bundle JSON here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write the run report (per-tag counts, file outcomes) as JSON here
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Loads the configuration file (if any) and applies flag overrides.
    pub fn build_config(&self) -> Result<ImportConfig> {
        let mut config = match &self.config {
            Some(path) => ImportConfig::load(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
            None => ImportConfig::default(),
        };

        if let Some(uri) = &self.uri {
            config.uri = uri.clone();
        }
        if let Some(login) = &self.login {
            config.login_name = login.clone();
        }
        if let Some(password) = &self.password {
            config.login_password = password.clone();
        }
        if let Some(tags) = &self.tags {
            config.tags = tags.clone();
        }
        if let Some(tag) = &self.tag {
            config.tag = tag.clone();
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(dir) = &self.target_dir {
            config.target_directory = dir.clone();
        }

        Ok(config)
    }
}

/// Default log filter for the verbosity flag.
#[must_use]
pub fn default_log_filter(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

struct KindTotals {
    kind: String,
    fetched: usize,
    emitted: usize,
}

/// One-line-per-kind summary of a bundle run.
#[must_use]
pub fn render_counts(report: &ImportReport) -> String {
    let mut kinds: Vec<KindTotals> = Vec::new();
    for count in &report.counts {
        match kinds.iter_mut().find(|k| k.kind == count.kind.key()) {
            Some(totals) => {
                totals.fetched += count.fetched;
                totals.emitted += count.emitted;
            }
            None => kinds.push(KindTotals {
                kind: count.kind.key().to_string(),
                fetched: count.fetched,
                emitted: count.emitted,
            }),
        }
    }

    kinds
        .iter()
        .map(|k| format!("{:<20} fetched {:>5}  emitted {:>5}", k.kind, k.fetched, k.emitted))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Summary of a files run.
#[must_use]
pub fn render_files(report: &ImportReport) -> String {
    let mut lines = vec![format!(
        "{} written, {} skipped, {} failed",
        report.files.written.len(),
        report.files.skipped.len(),
        report.files.failed.len()
    )];
    for (path, reason) in &report.files.failed {
        lines.push(format!("  failed {}: {}", path.display(), reason));
    }
    lines.join("\n")
}

/// Serialises the run report as JSON.
pub fn report_json(report: &ImportReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize report")
}
