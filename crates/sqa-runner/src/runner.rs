use std::path::PathBuf;

use reqwest::Client;
use sqa_artifacts::{FsOutputStore, OutputStore};
use sqa_core::{new_run_id, ArtifactKind, ErrorCategory, PipelineOutput, PipelineState, StageError};
use tracing::{info, info_span, warn, Instrument};

use crate::{Config, Pipeline};

/// What a successful run produced and where it was written.
#[derive(Debug)]
pub struct RunReport {
    pub run_id: String,
    pub state: PipelineState,
    pub output: PipelineOutput,
    pub report_path: PathBuf,
    pub artifact_paths: Vec<PathBuf>,
}

impl RunReport {
    /// 0 when every story produced a test case, the model exit code otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.output.generation_failures.is_empty() {
            0
        } else {
            ErrorCategory::Model.exit_code()
        }
    }
}

/// Process exit status for a run outcome.
pub fn exit_code(result: &Result<RunReport, StageError>) -> u8 {
    match result {
        Ok(report) => report.exit_code(),
        Err(e) => e.exit_code(),
    }
}

pub fn build_http_client(cfg: &Config) -> Result<Client, StageError> {
    Client::builder()
        .timeout(cfg.timeout())
        .build()
        .map_err(|e| StageError::Config(format!("build http client: {e}")))
}

/// Drives one pipeline run and persists its outputs once every stage has succeeded.
pub struct Runner {
    pub pipeline: Pipeline,
    pub store: Box<dyn OutputStore>,
    pub report_path: PathBuf,
}

impl Runner {
    pub fn new(pipeline: Pipeline, store: Box<dyn OutputStore>, report_path: PathBuf) -> Self {
        Self {
            pipeline,
            store,
            report_path,
        }
    }

    /// Live runner against the configured tracker and model. Fails fast on missing settings.
    pub fn open(cfg: &Config) -> Result<Self, StageError> {
        cfg.require_settings()?;
        let http = build_http_client(cfg)?;
        Ok(Self::new(Pipeline::from_config(cfg, http), store_for(cfg), cfg.report_path()))
    }

    /// Offline runner; needs no credentials.
    pub fn demo(cfg: &Config) -> Self {
        Self::new(Pipeline::demo(cfg.output.emit_artifacts), store_for(cfg), cfg.report_path())
    }

    pub async fn run_once(&self) -> Result<RunReport, StageError> {
        let run_id = new_run_id();
        let span = info_span!("pipeline", run_id = %run_id);
        async {
            info!("starting run");
            let mut state = PipelineState::Fetching;
            let output = self.pipeline.run_stages(&mut state).await?;

            let artifact_paths = match self.persist(&run_id, &output) {
                Ok(paths) => paths,
                Err(e) => {
                    state = state.fail();
                    warn!(?state, "writing outputs failed");
                    return Err(e);
                }
            };

            state = state.advance(self.pipeline.emits());
            info!(?state, "pipeline complete");
            Ok::<_, StageError>(RunReport {
                run_id: run_id.clone(),
                state,
                output,
                report_path: self.report_path.clone(),
                artifact_paths,
            })
        }
        .instrument(span)
        .await
    }

    /// Report first, then any emitted artifacts.
    fn persist(&self, run_id: &str, output: &PipelineOutput) -> Result<Vec<PathBuf>, StageError> {
        self.store.write_report(&self.report_path, &output.test_cases)?;

        let mut artifact_paths = Vec::new();
        for kind in [ArtifactKind::PlaywrightScript, ArtifactKind::CiWorkflow] {
            if let Some(artifacts) = output.artifacts(kind) {
                artifact_paths.extend(self.store.write_artifacts(run_id, kind, artifacts)?);
            }
        }
        Ok(artifact_paths)
    }
}

fn store_for(cfg: &Config) -> Box<dyn OutputStore> {
    match cfg.artifacts_dir() {
        Some(dir) => Box::new(FsOutputStore::new(dir)),
        None => Box::new(FsOutputStore::report_only()),
    }
}
