//! Command implementations

use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::app::{AppContainer, ContainerOptions, DefaultAppContainer, GenerationReport, SequencePreview};
use crate::cli::args::{GenerateArgs, PreviewArgs, ProbeArgs, ReportFormat};
use crate::cli::project::load_session;
use crate::config::AppConfig;
use crate::domain::model::*;
use crate::utils::time::{format_clip_range, format_position};
use crate::utils::Utils;

/// Exit code when some, but not all, outputs were produced
const PARTIAL_FAILURE: u8 = 2;

/// Execute the preview command
pub async fn preview(args: PreviewArgs, config: &AppConfig) -> Result<ExitCode> {
    let target = resolve_target(args.target, config)?;

    // Preview never encodes; the dry-run encoder avoids creating scratch space
    let container = DefaultAppContainer::new(
        config,
        ContainerOptions {
            dry_run: true,
            ..ContainerOptions::default()
        },
    )?;

    let session = load_session(&args.project, container.probe().as_ref())
        .await
        .with_context(|| format!("Failed to load project {}", args.project.display()))?;

    let preview = container
        .preview_interactor()
        .preview(session.pool.clips(), target);

    if args.json {
        let json = serde_json::to_string_pretty(&preview)
            .context("Failed to serialize preview to JSON")?;
        println!("{}", json);
    } else {
        display_preview(&session.pool.summary(), &preview, target);
    }

    Ok(ExitCode::SUCCESS)
}

/// Execute the generate command
pub async fn generate(args: GenerateArgs, config: &AppConfig) -> Result<ExitCode> {
    let target = resolve_target(args.target, config)?;
    let format = match &args.format {
        Some(f) => OutputFormat::parse(f)?,
        None => config.generation.format,
    };
    let count = args.count.unwrap_or(config.generation.count);
    let settings = GenerationSettings::new(target, count, format)?;

    let container = DefaultAppContainer::new(
        config,
        ContainerOptions {
            output_dir: args.out_dir.clone(),
            dry_run: args.dry_run,
            echo_progress: args.report.is_none(),
        },
    )?;

    let session = load_session(&args.project, container.probe().as_ref())
        .await
        .with_context(|| format!("Failed to load project {}", args.project.display()))?;

    let coordinator = container.generation_coordinator();
    let cancel = coordinator.cancel_handle();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current encoder call");
            cancel.cancel();
        }
    });

    let result = coordinator
        .generate(session.pool.clips(), session.library.sources(), &settings)
        .await;
    watcher.abort();

    let report = result?;

    match args.report {
        Some(ReportFormat::Json) => {
            let json = serde_json::to_string_pretty(&report)
                .context("Failed to serialize report to JSON")?;
            println!("{}", json);
        }
        Some(ReportFormat::Yaml) => {
            let yaml = serde_yaml::to_string(&report).context("Failed to serialize report to YAML")?;
            print!("{}", yaml);
        }
        None => display_report(&report),
    }

    if report.is_complete_success() {
        info!("Generate operation completed successfully");
        Ok(ExitCode::SUCCESS)
    } else if report.succeeded() > 0 {
        warn!("{}", report.summary());
        Ok(ExitCode::from(PARTIAL_FAILURE))
    } else {
        warn!("{}", report.summary());
        Ok(ExitCode::FAILURE)
    }
}

/// Execute the probe command
pub async fn probe(args: ProbeArgs, config: &AppConfig) -> Result<ExitCode> {
    let container = DefaultAppContainer::new(
        config,
        ContainerOptions {
            dry_run: true,
            ..ContainerOptions::default()
        },
    )?;

    let duration = container
        .probe()
        .probe_duration(&args.input)
        .await
        .with_context(|| format!("Failed to probe {}", args.input.display()))?;

    println!(
        "{}: {:.3}s ({})",
        args.input.display(),
        duration,
        format_position(duration)
    );
    Ok(ExitCode::SUCCESS)
}

fn resolve_target(target: Option<u32>, config: &AppConfig) -> Result<TargetDuration> {
    match target {
        Some(seconds) => Ok(TargetDuration::try_from(seconds)?),
        None => Ok(config.generation.target_duration),
    }
}

fn display_preview(summary: &PoolSummary, preview: &SequencePreview, target: TargetDuration) {
    println!(
        "Clip pool: {} clips, {:.1}s total",
        summary.total_clips, summary.total_seconds
    );
    for (source, count) in &summary.per_source {
        println!("  {} ({}): {} clips", source.to_uppercase(), source_color(source), count);
    }

    println!();
    println!(
        "Target {}: {} clips needed, {} distinct sources",
        target, preview.clips_needed, preview.distinct_sources
    );
    if preview.shortfall > 0 {
        println!("  Add {} more clips to fill one output", preview.shortfall);
    }

    println!();
    println!("Sequence:");
    for (i, clip) in preview.sequence.iter().enumerate() {
        let marker = if i < preview.selected.len() { "*" } else { " " };
        println!(
            " {} {:>3}. {:<4} {}  {}",
            marker,
            i + 1,
            clip.label(),
            format_clip_range(clip.start_time, clip.end_time),
            clip.color
        );
    }

    println!();
    if preview.is_valid {
        println!("No source repeats back to back");
    } else {
        println!("Warning: some clips from the same source are adjacent");
    }
}

fn display_report(report: &GenerationReport) {
    for output in &report.outputs {
        match &output.outcome {
            OutputOutcome::Success { media } => {
                let size = media
                    .size_bytes
                    .map(Utils::format_file_size)
                    .unwrap_or_else(|| "not written".to_string());
                println!(
                    "ok      {}  {:.1}s  {} clips  {}  [{}]",
                    output.filename,
                    output.actual_duration,
                    output.clips.len(),
                    size,
                    media.path.display()
                );
            }
            OutputOutcome::Failed { error } => {
                println!("FAILED  {}  {}", output.filename, error);
            }
        }
    }
    println!("{}", report.summary());
}
