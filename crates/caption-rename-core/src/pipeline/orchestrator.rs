//! Batch orchestration: caption → name → place, one file at a time.
//!
//! Each task moves through `Discovered → Captioned → Resolved → Completed`,
//! or ends `Failed` at whichever step went wrong. Failures stay with their task;
//! the batch always runs to the end unless cancelled.

use std::time::Instant;

use tokio_util::sync::CancellationToken;

use crate::caption::CaptionProvider;
use crate::config::Config;
use crate::error::{CaptionError, TaskError};
use crate::naming::CollisionPolicy;
use crate::plan::{RunMode, RunPlan};
use crate::types::{CandidateName, FileOutcome, ImageTask, Outcome, RunReport, SkipReason};

use super::decode::ImageDecoder;
use super::executor::{self, ExecuteStatus};
use super::validate::Validator;

/// Drives a batch of [`ImageTask`]s through captioning and renaming.
///
/// Tasks run strictly sequentially. Cancellation is checked between tasks
/// only, so the task in flight always reaches a terminal outcome.
pub struct BatchOrchestrator<'a> {
    provider: &'a dyn CaptionProvider,
    validator: Validator,
    decoder: ImageDecoder,
    mode: RunMode,
    placeholder: String,
    max_base_len: usize,
}

impl<'a> BatchOrchestrator<'a> {
    /// Create an orchestrator for one run.
    pub fn new(config: &Config, plan: &RunPlan, provider: &'a dyn CaptionProvider) -> Self {
        Self {
            provider,
            validator: Validator::new(config.limits.clone()),
            decoder: ImageDecoder::new(config.limits.clone()),
            mode: plan.mode.clone(),
            placeholder: config.naming.placeholder.clone(),
            max_base_len: config.naming.max_base_len,
        }
    }

    /// Process every task and return the report.
    pub async fn run(&self, tasks: Vec<ImageTask>, cancel: &CancellationToken) -> RunReport {
        self.run_with(tasks, cancel, |_| {}).await
    }

    /// Process every task, calling `on_outcome` as each one terminates.
    ///
    /// Every task produces exactly one outcome. Once `cancel` fires, the
    /// remaining tasks are recorded as skipped without being started.
    pub async fn run_with<F>(
        &self,
        tasks: Vec<ImageTask>,
        cancel: &CancellationToken,
        mut on_outcome: F,
    ) -> RunReport
    where
        F: FnMut(&FileOutcome),
    {
        let start = Instant::now();
        let mut policy = CollisionPolicy::new(self.placeholder.clone());
        let mut outcomes = Vec::with_capacity(tasks.len());
        let mut interrupted = false;

        let mut pending = tasks.into_iter();
        while let Some(task) = pending.next() {
            if cancel.is_cancelled() {
                tracing::warn!(
                    "Stopping: {} file(s) left unprocessed",
                    pending.len() + 1
                );
                interrupted = true;
                for task in std::iter::once(task).chain(pending.by_ref()) {
                    let outcome = FileOutcome {
                        source_path: task.source_path,
                        caption: None,
                        outcome: Outcome::Skipped {
                            reason: SkipReason::Interrupted,
                        },
                    };
                    on_outcome(&outcome);
                    outcomes.push(outcome);
                }
                break;
            }

            let outcome = self.process_task(&task, &mut policy).await;
            on_outcome(&outcome);
            outcomes.push(outcome);
        }

        RunReport {
            outcomes,
            interrupted,
            elapsed: start.elapsed(),
        }
    }

    async fn process_task(&self, task: &ImageTask, policy: &mut CollisionPolicy) -> FileOutcome {
        tracing::debug!("Processing: {:?}", task.source_path);

        // Discovered → Captioned
        let caption = match self.caption_task(task).await {
            Ok(caption) => caption,
            Err(e) => return failed(task, None, e.into()),
        };
        tracing::debug!("  Caption: {:?}", caption);

        // Captioned → Resolved
        let candidate = CandidateName::from_caption(&caption, &task.extension, self.max_base_len);
        let own_source = match self.mode {
            RunMode::InPlace { .. } => Some(task.source_path.as_path()),
            RunMode::CopyTo { .. } => None,
        };
        let dest = policy.resolve(self.mode.dest_dir(), &candidate, own_source);
        tracing::trace!("  Resolved: {:?}", dest.path);

        // Resolved → Completed
        let op = self.mode.operation();
        let outcome = match executor::execute(op, &task.source_path, &dest.path) {
            Ok(ExecuteStatus::Applied) => Outcome::Success {
                destination: dest.path,
            },
            Ok(ExecuteStatus::Unchanged) => Outcome::Skipped {
                reason: SkipReason::NameUnchanged,
            },
            Err(source) => {
                return failed(
                    task,
                    Some(caption),
                    TaskError::Io {
                        op: op.as_str(),
                        path: task.source_path.clone(),
                        source,
                    },
                )
            }
        };

        FileOutcome {
            source_path: task.source_path.clone(),
            caption: Some(caption),
            outcome,
        }
    }

    /// Validate, decode and caption. Calls the provider at most once.
    async fn caption_task(&self, task: &ImageTask) -> Result<String, CaptionError> {
        self.validator.validate(&task.source_path)?;
        let decoded = self.decoder.decode(&task.source_path).await?;
        self.provider.caption(&decoded).await
    }
}

fn failed(task: &ImageTask, caption: Option<String>, error: TaskError) -> FileOutcome {
    tracing::debug!("  Failed: {}", error);
    FileOutcome {
        source_path: task.source_path.clone(),
        caption,
        outcome: Outcome::Failed {
            error: error.to_string(),
        },
    }
}
