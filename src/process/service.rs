//! Process service: ties uploads, the pipeline and the record store together.

use super::record::{ProcessRecord, ProcessStatus};
use super::store::ProcessStore;
use crate::config::{ProcessConfig, ServiceConfig};
use crate::error::{RedactorError, RedactorResult};
use crate::redaction::{DocumentBackend, MupdfBackend, ProcessPipeline, RunStats};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

/// A processed document ready for download.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub path: PathBuf,
    pub download_name: String,
}

/// Service layer around [`ProcessPipeline`].
///
/// The store is injected; the pipeline itself stays stateless. The caller
/// must not run the same process twice concurrently; the state machine
/// rejects a second `run` once the first has started.
pub struct ProcessService<S: ProcessStore, B: DocumentBackend = MupdfBackend> {
    store: S,
    pipeline: ProcessPipeline<B>,
    config: ServiceConfig,
}

impl<S: ProcessStore, B: DocumentBackend> ProcessService<S, B> {
    pub fn new(store: S, pipeline: ProcessPipeline<B>, config: ServiceConfig) -> Self {
        Self {
            store,
            pipeline,
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Stores an upload and creates a pending record for it.
    pub fn submit(
        &self,
        upload: &Path,
        original_filename: &str,
        config: ProcessConfig,
    ) -> RedactorResult<Uuid> {
        let id = Uuid::new_v4();
        ensure_dir(&self.config.upload_dir)?;
        ensure_dir(&self.config.processed_dir)?;

        let input_file = self.config.upload_dir.join(format!("{}_input.pdf", id));
        fs::copy(upload, &input_file).map_err(|e| RedactorError::Io {
            path: upload.to_path_buf(),
            source: e,
        })?;

        let record = ProcessRecord::new(id, original_filename, input_file, config, Utc::now());
        self.store.create(record)?;
        info!(%id, file = original_filename, "process submitted");
        Ok(id)
    }

    /// Runs the pipeline for a pending process and records the outcome.
    ///
    /// On failure the record moves to `failed` with the error's message and
    /// the error is returned.
    pub fn run(&self, id: Uuid) -> RedactorResult<RunStats> {
        let mut record = self.store.get(id)?;
        record.start(Utc::now())?;
        self.store.update(record.clone())?;

        let output_file = self.config.processed_dir.join(format!("{}_output.pdf", id));
        match self
            .pipeline
            .process(&record.input_file, &output_file, &record.config)
        {
            Ok(stats) => {
                record.complete(stats.clone(), output_file, Utc::now())?;
                self.store.update(record)?;
                info!(%id, pages = stats.pages, "process completed");
                Ok(stats)
            }
            Err(e) => {
                warn!(%id, error = %e, "process failed");
                // A failed save may leave a partial artifact behind.
                remove_if_present(&output_file);
                record.fail(e.to_string(), Utc::now())?;
                self.store.update(record)?;
                Err(e)
            }
        }
    }

    /// Convenience for `submit` followed by `run`.
    pub fn submit_and_run(
        &self,
        upload: &Path,
        original_filename: &str,
        config: ProcessConfig,
    ) -> RedactorResult<(Uuid, RedactorResult<RunStats>)> {
        let id = self.submit(upload, original_filename, config)?;
        Ok((id, self.run(id)))
    }

    pub fn status(&self, id: Uuid) -> RedactorResult<ProcessRecord> {
        self.store.get(id)
    }

    pub fn list(&self) -> Vec<Uuid> {
        self.store.list()
    }

    /// The processed file, only once the process has completed.
    pub fn artifact(&self, id: Uuid) -> RedactorResult<Artifact> {
        let record = self.store.get(id)?;
        if record.status != ProcessStatus::Completed {
            return Err(RedactorError::InvalidInput {
                parameter: "id".to_string(),
                reason: format!("process '{}' is {}", id, record.status),
            });
        }

        match &record.output_file {
            Some(path) if path.exists() => Ok(Artifact {
                path: path.clone(),
                download_name: record.download_name(),
            }),
            Some(path) => Err(RedactorError::Io {
                path: path.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "Processed file no longer exists",
                ),
            }),
            None => Err(RedactorError::ProcessNotFound { id }),
        }
    }

    /// Deletes a record and its files.
    pub fn cleanup(&self, id: Uuid) -> RedactorResult<()> {
        let record = self.store.delete(id)?;
        remove_files(&record);
        info!(%id, "process removed");
        Ok(())
    }

    /// Deletes every record older than the retention window, with its files.
    /// Returns the number of records removed.
    pub fn sweep(&self, now: DateTime<Utc>) -> usize {
        let removed = self.store.sweep(now, self.config.retention);
        for record in &removed {
            remove_files(record);
        }
        if !removed.is_empty() {
            info!(count = removed.len(), "expired processes swept");
        }
        removed.len()
    }
}

fn ensure_dir(dir: &Path) -> RedactorResult<()> {
    fs::create_dir_all(dir).map_err(|e| RedactorError::Io {
        path: dir.to_path_buf(),
        source: e,
    })
}

fn remove_files(record: &ProcessRecord) {
    remove_if_present(&record.input_file);
    if let Some(output) = &record.output_file {
        remove_if_present(output);
    }
}

fn remove_if_present(path: &Path) {
    if path.exists() {
        if let Err(e) = fs::remove_file(path) {
            warn!(path = %path.display(), error = %e, "failed to remove file");
        }
    }
}
