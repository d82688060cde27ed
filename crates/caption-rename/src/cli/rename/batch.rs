//! Batch run: interrupt handling, progress, per-file lines, summary and report.

use std::path::Path;
use std::time::Instant;

use caption_rename_core::{BatchOrchestrator, FileDiscovery, Outcome, OutputWriter, RunReport};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::setup::RenameContext;
use super::types::ReportFormat;
use super::RenameArgs;

/// Caption and rename every image in the input directory.
pub async fn run_batch(ctx: RenameContext, args: &RenameArgs) -> anyhow::Result<()> {
    let discovery = FileDiscovery::new(ctx.config.processing.clone());
    let tasks = discovery.discover(&ctx.plan.input_dir);
    if tasks.is_empty() {
        tracing::warn!("No supported image files found in {:?}", ctx.plan.input_dir);
        return Ok(());
    }
    tracing::info!("Found {} image(s) to caption", tasks.len());

    let cancel = CancellationToken::new();
    let listener = spawn_interrupt_listener(cancel.clone());

    let progress = create_progress_bar(tasks.len() as u64);
    let start_time = Instant::now();
    let mut processed: u64 = 0;

    let orchestrator = BatchOrchestrator::new(&ctx.config, &ctx.plan, ctx.provider.as_ref());
    let report = orchestrator
        .run_with(tasks, &cancel, |outcome| {
            match &outcome.outcome {
                Outcome::Failed { .. } => {
                    progress.suspend(|| tracing::error!("{}", outcome.summary_line()))
                }
                _ => progress.println(outcome.summary_line()),
            }
            processed += 1;
            progress.inc(1);
            let elapsed = start_time.elapsed().as_secs_f64();
            if elapsed > 0.0 {
                progress.set_message(format!("{:.2} img/sec", processed as f64 / elapsed));
            }
        })
        .await;

    listener.abort();
    progress.finish_and_clear();

    if report.interrupted {
        tracing::warn!("Run interrupted; remaining files were left untouched");
    }

    print_summary(&report, &ctx);

    if let Some(path) = &args.report {
        let records = write_report(&report, path, args.report_format)?;
        tracing::info!("Report written to {:?} ({} record(s))", path, records);
    }

    Ok(())
}

/// Cancel `cancel` on the first Ctrl-C and exit on the second.
fn spawn_interrupt_listener(cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        tracing::warn!("Interrupt received, finishing the current file. Press Ctrl-C again to abort.");
        cancel.cancel();

        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("Aborted.");
            std::process::exit(130);
        }
    })
}

/// Serialize the run report to `path`, returning the number of JSON records written.
fn write_report(report: &RunReport, path: &Path, format: ReportFormat) -> anyhow::Result<usize> {
    let mut writer = OutputWriter::create(path, format.into())?;
    writer.write_report(report)?;
    Ok(writer.items_written())
}

/// Create a progress bar for batch processing.
fn create_progress_bar(total: u64) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");
    pb.set_style(style);
    pb.set_message("captioning...");
    pb
}

/// Print a formatted summary table after the run.
fn print_summary(report: &RunReport, ctx: &RenameContext) {
    let stats = report.stats();
    let rate = if stats.total_seconds > 0.0 {
        (stats.succeeded + stats.failed) as f64 / stats.total_seconds
    } else {
        0.0
    };

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Succeeded:    {:>8}", stats.succeeded);
    if stats.failed > 0 {
        eprintln!("    Failed:       {:>8}", stats.failed);
    }
    if stats.skipped > 0 {
        eprintln!("    Skipped:      {:>8}", stats.skipped);
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Total:        {:>8}", stats.total());
    eprintln!("    Mode:         {:>8}", ctx.plan.mode.operation().as_str());
    eprintln!("    Device:       {:>8}", ctx.device);
    eprintln!("    Duration:     {:>7.1}s", stats.total_seconds);
    eprintln!("    Rate:         {:>7.2} img/sec", rate);
    if report.interrupted {
        eprintln!("    Interrupted:  {:>8}", "yes");
    }
    eprintln!("  ====================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use caption_rename_core::{FileOutcome, SkipReason};
    use std::path::PathBuf;
    use std::time::Duration;

    fn sample_report() -> RunReport {
        RunReport {
            outcomes: vec![
                FileOutcome {
                    source_path: PathBuf::from("/photos/a.jpg"),
                    caption: Some("a red car".to_string()),
                    outcome: Outcome::Success {
                        destination: PathBuf::from("/photos/a_red_car.jpg"),
                    },
                },
                FileOutcome {
                    source_path: PathBuf::from("/photos/b.jpg"),
                    caption: None,
                    outcome: Outcome::Failed {
                        error: "ollama error: connection refused".to_string(),
                    },
                },
                FileOutcome {
                    source_path: PathBuf::from("/photos/c.jpg"),
                    caption: None,
                    outcome: Outcome::Skipped {
                        reason: SkipReason::Interrupted,
                    },
                },
            ],
            interrupted: true,
            elapsed: Duration::from_secs(3),
        }
    }

    #[test]
    fn test_write_report_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        let records = write_report(&sample_report(), &path, ReportFormat::Json).unwrap();
        assert_eq!(records, 1);

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["outcomes"].as_array().unwrap().len(), 3);
        assert_eq!(value["outcomes"][1]["status"], "failed");
        assert_eq!(value["interrupted"], true);
    }

    #[test]
    fn test_write_report_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.jsonl");

        let records = write_report(&sample_report(), &path, ReportFormat::Jsonl).unwrap();
        assert_eq!(records, 3);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 3);
        assert!(content.lines().next().unwrap().contains("a_red_car.jpg"));
    }

    #[test]
    fn test_write_report_to_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("report.json");
        assert!(write_report(&sample_report(), &path, ReportFormat::Json).is_err());
    }

    #[test]
    fn test_progress_bar_length() {
        let pb = create_progress_bar(7);
        assert_eq!(pb.length(), Some(7));
    }
}
