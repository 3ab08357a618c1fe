use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::{with_retry, with_retry_when, RetryConfig, TranscodeError, VideoEncoder};
use crate::configuration::TranscodingSettings;
use crate::error::StoreError;
use crate::models::Film;
use crate::store::ObjectStore;

const RESOLUTION_PATTERN: &str = r"^(\d+)p$";
const VARIANT_CONTENT_TYPE: &str = "video/mp4";

/// A target height label such as `720p`. The number is handed to the
/// encoder's scale filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    label: String,
    width: u32,
}

impl Resolution {
    pub fn parse(value: &str) -> Result<Resolution, TranscodeError> {
        let invalid = || TranscodeError::InvalidResolution(value.to_string());
        let pattern = Regex::new(RESOLUTION_PATTERN).map_err(|_| invalid())?;
        let captures = pattern.captures(value).ok_or_else(invalid)?;
        let width = captures[1].parse::<u32>().map_err(|_| invalid())?;
        if width == 0 {
            return Err(invalid());
        }
        Ok(Resolution {
            label: value.to_string(),
            width,
        })
    }

    pub fn parse_all(values: &[String]) -> Result<Vec<Resolution>, TranscodeError> {
        if values.is_empty() {
            return Err(TranscodeError::NoResolutions);
        }
        values.iter().map(|value| Resolution::parse(value)).collect()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn width(&self) -> u32 {
        self.width
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionStatus {
    Running,
    Succeeded,
    Failed,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExecutionRecord {
    pub execution_id: Uuid,
    pub film_id: String,
    pub resolutions: Vec<String>,
    pub status: ExecutionStatus,
    pub outputs: Vec<String>,
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct TranscodeJob {
    pub execution_id: Uuid,
    pub film_id: String,
    pub resolutions: Vec<Resolution>,
}

/// Accepts transcode requests, queues them for the worker and keeps the
/// status of every execution started since boot.
#[derive(Clone)]
pub struct TranscodeOrchestrator {
    queue: mpsc::Sender<TranscodeJob>,
    executions: Arc<RwLock<HashMap<Uuid, ExecutionRecord>>>,
    default_resolutions: Vec<String>,
    auto_transcode: bool,
}

impl TranscodeOrchestrator {
    pub fn new(settings: &TranscodingSettings) -> (TranscodeOrchestrator, mpsc::Receiver<TranscodeJob>) {
        let (queue, jobs) = mpsc::channel(settings.queue_capacity.max(1));
        let orchestrator = TranscodeOrchestrator {
            queue,
            executions: Arc::new(RwLock::new(HashMap::new())),
            default_resolutions: settings.default_resolutions.clone(),
            auto_transcode: settings.auto_transcode,
        };
        (orchestrator, jobs)
    }

    pub fn auto_transcode(&self) -> bool {
        self.auto_transcode
    }

    /// Validates the resolutions (defaults when `None`) and queues the job.
    pub async fn start_execution(
        &self,
        film_id: &str,
        resolutions: Option<Vec<String>>,
    ) -> Result<ExecutionRecord, TranscodeError> {
        let labels = resolutions.unwrap_or_else(|| self.default_resolutions.clone());
        let parsed = Resolution::parse_all(&labels)?;

        let record = ExecutionRecord {
            execution_id: Uuid::new_v4(),
            film_id: film_id.to_string(),
            resolutions: labels,
            status: ExecutionStatus::Running,
            outputs: Vec::new(),
            error: None,
            started_at: Utc::now(),
            finished_at: None,
        };
        let job = TranscodeJob {
            execution_id: record.execution_id,
            film_id: film_id.to_string(),
            resolutions: parsed,
        };

        self.executions
            .write()
            .await
            .insert(record.execution_id, record.clone());
        if let Err(err) = self.queue.try_send(job) {
            self.executions.write().await.remove(&record.execution_id);
            return Err(match err {
                mpsc::error::TrySendError::Full(_) => TranscodeError::QueueFull,
                mpsc::error::TrySendError::Closed(_) => TranscodeError::QueueClosed,
            });
        }
        tracing::info!(execution_id = %record.execution_id, %film_id, "Transcode execution started");
        Ok(record)
    }

    pub async fn describe_execution(&self, execution_id: Uuid) -> Option<ExecutionRecord> {
        self.executions.read().await.get(&execution_id).cloned()
    }

    async fn finish(&self, execution_id: Uuid, result: Result<Vec<String>, TranscodeError>) {
        let mut executions = self.executions.write().await;
        if let Some(record) = executions.get_mut(&execution_id) {
            record.finished_at = Some(Utc::now());
            match result {
                Ok(outputs) => {
                    record.status = ExecutionStatus::Succeeded;
                    record.outputs = outputs;
                }
                Err(err) => {
                    record.status = ExecutionStatus::Failed;
                    record.error = Some(err.to_string());
                }
            }
        }
    }
}

/// Runs one job end to end: fetch the source, encode and upload each
/// resolution, and on failure delete the variants already uploaded.
pub struct TranscodeWorker {
    objects: Arc<dyn ObjectStore>,
    encoder: Arc<dyn VideoEncoder>,
    work_dir: PathBuf,
    retry: RetryConfig,
}

impl TranscodeWorker {
    pub fn new(
        objects: Arc<dyn ObjectStore>,
        encoder: Arc<dyn VideoEncoder>,
        work_dir: impl Into<PathBuf>,
        retry: RetryConfig,
    ) -> Self {
        TranscodeWorker {
            objects,
            encoder,
            work_dir: work_dir.into(),
            retry,
        }
    }

    pub async fn run_job(&self, job: &TranscodeJob) -> Result<Vec<String>, TranscodeError> {
        let scratch = self.work_dir.join(job.execution_id.to_string());
        tokio::fs::create_dir_all(&scratch).await?;

        let mut uploaded = Vec::new();
        let result = self.transcode_into(job, &scratch, &mut uploaded).await;

        if let Err(err) = tokio::fs::remove_dir_all(&scratch).await {
            tracing::warn!("Failed to clean up {}: {}", scratch.display(), err);
        }

        match result {
            Ok(()) => Ok(uploaded),
            Err(err) => {
                tracing::error!(execution_id = %job.execution_id, "Transcode failed: {}", err);
                for key in &uploaded {
                    if let Err(cleanup_err) = self.objects.delete_object(key).await {
                        tracing::error!(%key, "Failed to delete partial variant: {}", cleanup_err);
                    }
                }
                Err(err)
            }
        }
    }

    async fn transcode_into(
        &self,
        job: &TranscodeJob,
        scratch: &Path,
        uploaded: &mut Vec<String>,
    ) -> Result<(), TranscodeError> {
        let objects = &self.objects;
        let encoder = &self.encoder;

        let source_key = Film::content_key(&job.film_id);
        let source = with_retry_when(
            &self.retry,
            || objects.get_object(&source_key),
            |err| !matches!(err, StoreError::NotFound),
        )
        .await?;
        let input = scratch.join("source");
        tokio::fs::write(&input, source).await?;

        for resolution in &job.resolutions {
            let key = Film::variant_key(&job.film_id, resolution.label());
            // Film ids may contain `/` or `..`; local names only use the label.
            let output = scratch.join(format!("{}.mp4", resolution.label()));
            let input_path = input.as_path();
            let output_path = output.as_path();
            with_retry(&self.retry, || {
                encoder.encode(input_path, output_path, resolution.width())
            })
            .await?;

            let body = tokio::fs::read(&output).await?;
            with_retry(&self.retry, || {
                objects.put_object(&key, body.clone(), VARIANT_CONTENT_TYPE)
            })
            .await?;
            tracing::info!(%key, "Uploaded {} version", resolution.label());
            uploaded.push(key);
        }
        Ok(())
    }
}

pub fn spawn_transcode_worker(
    orchestrator: TranscodeOrchestrator,
    worker: TranscodeWorker,
    mut jobs: mpsc::Receiver<TranscodeJob>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(job) = jobs.recv().await {
            let result = worker.run_job(&job).await;
            orchestrator.finish(job.execution_id, result).await;
        }
        tracing::info!("Transcode queue closed, worker stopping");
    })
}
