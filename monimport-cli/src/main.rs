//! Monitoring configuration importer
//!
//! Pulls commands, hosts, services, contacts, time periods and dependencies
//! from a tag-partitioned configuration service and emits a merged bundle,
//! or writes the service's configuration files to a directory.
//!
//! Usage:
//!   monimport --config import.toml
//!   monimport --uri https://cmdb/xmlrpc.php --tags siteA,siteB --output bundle.json
//!   monimport --config import.toml --mode files --target-dir /etc/monitoring/import

use anyhow::{Context, Result};
use clap::Parser;
use monimport_cli::{Args, default_log_filter, render_counts, render_files, report_json};
use monimport_pipeline::{ImportOutcome, Importer, XmlRpcSource};
use std::fs;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_filter(args.verbose)));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = args.build_config()?;
    info!("Importing from {} in {} mode", config.uri, config.mode);

    let source = XmlRpcSource::new(config.endpoint()).context("Failed to create XML-RPC client")?;
    let mut importer = Importer::new(source, config);
    if !importer.init().await {
        warn!("Continuing without a session; nothing will be imported");
    }

    let outcome = importer.run().await.context("Import failed")?;

    match outcome {
        ImportOutcome::Bundle(bundle) => {
            let json = bundle.to_json_pretty().context("Failed to serialize bundle")?;
            match &args.output {
                Some(path) => {
                    fs::write(path, json.as_bytes())
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!("Bundle written to {:?}", path);
                }
                None => println!("{json}"),
            }
            eprintln!("{}", render_counts(importer.report()));
        }
        ImportOutcome::Files(_) => {
            eprintln!("{}", render_files(importer.report()));
        }
    }

    if let Some(path) = &args.report {
        fs::write(path, report_json(importer.report())?)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
    }

    Ok(())
}
