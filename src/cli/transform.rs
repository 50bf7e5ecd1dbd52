//! pm-migrate transform command implementation
//!
//! Runs a batch of export files through one deduplication tracker, in the
//! order given on the command line.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::dedup::DedupStats;
use crate::error::{Error, Result};
use crate::model::{Document, ProjectPayload};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::transform::{Batch, TransformStats};

/// Options for `pm-migrate transform`
pub struct TransformOptions {
    pub files: Vec<PathBuf>,
    pub out: Option<PathBuf>,
    pub config: Config,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct ProjectReport {
    file: PathBuf,
    project: String,
    is_client: bool,
    stats: TransformStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<PathBuf>,
}

#[derive(serde::Serialize)]
struct FailedProject {
    file: PathBuf,
    error: String,
}

#[derive(serde::Serialize)]
struct TransformReport {
    projects: Vec<ProjectReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    failed: Vec<FailedProject>,
    deduplication: DedupStats,
}

pub fn run(options: TransformOptions) -> Result<()> {
    if options.files.is_empty() {
        return Err(Error::InvalidArgument(
            "at least one export file is required".to_string(),
        ));
    }
    if let Some(missing) = options.files.iter().find(|file| !file.exists()) {
        return Err(Error::ExportNotFound(missing.clone()));
    }
    if let Some(out) = &options.out {
        std::fs::create_dir_all(out)?;
    }

    let mut batch = Batch::new(&options.config);
    batch.reset();

    let mut projects = Vec::new();
    let mut failed = Vec::new();
    for file in &options.files {
        let payload = match read_payload(file) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!("{}: {err}", file.display());
                failed.push(FailedProject {
                    file: file.clone(),
                    error: err.to_string(),
                });
                continue;
            }
        };
        match batch.transform(&payload) {
            Ok((document, stats)) => {
                let output = match &options.out {
                    Some(dir) => Some(write_document(dir, file, &document)?),
                    None => None,
                };
                projects.push(ProjectReport {
                    file: file.clone(),
                    project: document.project.name.clone(),
                    is_client: document.project.is_client,
                    stats,
                    output,
                });
            }
            Err(err @ Error::MissingProjectName) => {
                tracing::warn!("{}: {err}", file.display());
                failed.push(FailedProject {
                    file: file.clone(),
                    error: err.to_string(),
                });
            }
            Err(err) => return Err(err),
        }
    }

    let report = TransformReport {
        projects,
        failed,
        deduplication: batch.deduplication_stats(),
    };

    let human = render_human(&report);
    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "transform",
        &report,
        Some(&human),
    )
}

fn read_payload(path: &Path) -> Result<ProjectPayload> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn write_document(dir: &Path, source: &Path, document: &Document) -> Result<PathBuf> {
    let stem = source
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "export".to_string());
    let path = dir.join(format!("{stem}.transformed.json"));
    std::fs::write(&path, serde_json::to_string_pretty(document)?)?;
    Ok(path)
}

fn render_human(report: &TransformReport) -> HumanOutput {
    let mut human = HumanOutput::new(format!(
        "pm-migrate transform: {} project(s)",
        report.projects.len()
    ));
    let dedup = &report.deduplication;
    human.push_summary("unique tasks", dedup.total.to_string());
    human.push_summary("from client projects", dedup.client_count.to_string());
    human.push_summary("from team member projects", dedup.team_count.to_string());
    human.push_summary("duplicates skipped", dedup.skipped.to_string());
    human.push_summary("replaced by client copies", dedup.replaced.to_string());

    for project in &report.projects {
        let kind = if project.is_client { "client" } else { "team" };
        let stats = &project.stats;
        human.push_detail(format!(
            "{} ({kind}): {} written, {} excluded by cutoff, {} skipped, {} replaced",
            project.project,
            stats.written,
            stats.excluded_by_cutoff,
            stats.skipped_duplicates,
            stats.replaced
        ));
        if let Some(output) = &project.output {
            human.push_detail(format!("wrote {}", output.display()));
        }
    }
    for failure in &report.failed {
        human.push_warning(format!("{}: {}", failure.file.display(), failure.error));
    }
    human
}
