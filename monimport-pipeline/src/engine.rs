//! Importer: one run of the tag-scoped pipeline.
//!
//! `init` authenticates once. After that a run either builds the merged
//! bundle (resolve, fetch, accumulate, merge) or writes the remote files
//! (resolve, list, write). Without a session nothing is fetched.

use crate::aggregator::Aggregator;
use crate::config::{ImportConfig, OutputMode};
use crate::error::ImportResult;
use crate::fetcher::fetch_all;
use crate::merger::merge;
use crate::resolver::resolve_tags;
use crate::sink::{FileSink, FileWriteSummary};
use crate::source::{RemoteSource, SessionToken};
use monimport_types::{Bundle, EntityKind, Tag};
use serde::Serialize;
use tracing::{error, info, warn};

/// Records fetched and newly emitted for one (tag, kind) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindCount {
    pub tag: Tag,
    pub kind: EntityKind,
    pub fetched: usize,
    pub emitted: usize,
}

/// Telemetry of the last run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Tags actually queried.
    pub resolved_tags: Vec<Tag>,
    /// Bundle mode counts, in fetch order.
    pub counts: Vec<KindCount>,
    /// File mode outcome.
    pub files: FileWriteSummary,
}

impl ImportReport {
    /// Total records fetched for a kind over all tags.
    #[must_use]
    pub fn fetched(&self, kind: EntityKind) -> usize {
        self.counts.iter().filter(|c| c.kind == kind).map(|c| c.fetched).sum()
    }

    /// Total records emitted for a kind over all tags.
    #[must_use]
    pub fn emitted(&self, kind: EntityKind) -> usize {
        self.counts.iter().filter(|c| c.kind == kind).map(|c| c.emitted).sum()
    }
}

/// Result of a run, by output mode.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportOutcome {
    Bundle(Bundle),
    Files(FileWriteSummary),
}

/// Drives imports against a remote source.
pub struct Importer<S: RemoteSource> {
    source: S,
    config: ImportConfig,
    session: Option<SessionToken>,
    report: ImportReport,
}

impl<S: RemoteSource> Importer<S> {
    /// Creates an importer; call [`Importer::init`] before running.
    pub fn new(source: S, config: ImportConfig) -> Self {
        Self {
            source,
            config,
            session: None,
            report: ImportReport::default(),
        }
    }

    /// Returns the remote source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Returns the session, if authenticated.
    pub fn session(&self) -> Option<&SessionToken> {
        self.session.as_ref()
    }

    /// Returns the telemetry of the last run.
    pub fn report(&self) -> &ImportReport {
        &self.report
    }

    /// Authenticates against the source.
    ///
    /// A failure is logged and leaves the importer unauthenticated; later
    /// runs then produce nothing. Returns whether a session was obtained.
    pub async fn init(&mut self) -> bool {
        info!(
            "Authenticating as '{}' against {} source",
            self.config.login_name,
            self.source.source_name()
        );
        match self
            .source
            .login(&self.config.login_name, &self.config.login_password)
            .await
        {
            Ok(session) => {
                info!("Authenticated, session: {:?}", session);
                self.session = Some(session);
                true
            }
            Err(e) => {
                error!("Authentication failed: {}", e);
                self.session = None;
                false
            }
        }
    }

    /// Runs the configured output mode.
    pub async fn run(&mut self) -> ImportResult<ImportOutcome> {
        match self.config.mode {
            OutputMode::Bundle => self.get_objects().await.map(ImportOutcome::Bundle),
            OutputMode::Files => self.write_files().await.map(ImportOutcome::Files),
        }
    }

    /// Builds the merged configuration bundle.
    ///
    /// Any fetch error aborts the run.
    pub async fn get_objects(&mut self) -> ImportResult<Bundle> {
        self.report = ImportReport::default();
        let Some(session) = self.session.clone() else {
            warn!("No session, returning an empty bundle");
            return Ok(Bundle::empty());
        };

        let roots = self.config.root_tags();
        info!("Root tags: {:?}", roots);
        let tags = resolve_tags(&self.source, &session, &roots).await?;
        self.report.resolved_tags = tags.clone();

        let mut aggregator = Aggregator::new(self.config.strip.clone());
        for tag in &tags {
            info!("Getting configuration for entities tagged with '{}'", tag);
            for (kind, records) in fetch_all(&self.source, &session, tag).await? {
                let fetched = records.len();
                let emitted = aggregator.accumulate(kind, records);
                self.report.counts.push(KindCount {
                    tag: tag.clone(),
                    kind,
                    fetched,
                    emitted,
                });
            }
        }

        let bundle = merge(aggregator.into_collections());
        info!("Returning bundle with {} records", bundle.total_records());
        Ok(bundle)
    }

    /// Writes every remote configuration file of every resolved tag.
    ///
    /// Listing errors abort the run; write errors are collected in the summary.
    pub async fn write_files(&mut self) -> ImportResult<FileWriteSummary> {
        self.report = ImportReport::default();
        let Some(session) = self.session.clone() else {
            warn!("No session, no files written");
            return Ok(FileWriteSummary::default());
        };

        let mut sink = FileSink::new(self.config.target_directory.clone(), self.config.encoding);
        sink.prepare().await;

        let roots = self.config.root_tags();
        let tags = resolve_tags(&self.source, &session, &roots).await?;
        self.report.resolved_tags = tags.clone();

        for tag in &tags {
            let files = self.source.config_files(&session, tag).await?;
            info!("Got {} files for tag '{}'", files.len(), tag);
            let summary = sink.write_files(tag, &files).await;
            self.report.files.absorb(summary);
        }

        info!(
            "Files written: {}, skipped: {}, failed: {}",
            self.report.files.written.len(),
            self.report.files.skipped.len(),
            self.report.files.failed.len()
        );
        Ok(self.report.files.clone())
    }
}
