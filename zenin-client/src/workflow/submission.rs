use tracing::{info, warn};

use super::results::ResultView;
use crate::api::Backend;
use crate::data_source::DataSourcePayload;
use crate::error::{ApiError, ValidationError};
use crate::model::{RunConfig, RunResult};

pub const RUN_FAILED: &str = "Failed to run pipeline";

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionState {
    Idle,
    Validating,
    Submitting,
    Succeeded(RunResult),
    Failed(String),
}

/// A validated submission, ready to send.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitRequest {
    /// Upload the selected files.
    Upload {
        config: RunConfig,
        payload: DataSourcePayload,
    },
    /// Process every recording under `config.data_root` on the server.
    ServerBatch { config: RunConfig },
    /// Process one recording already on the server.
    ServerSingle { config: RunConfig, csv_path: String },
}

impl SubmitRequest {
    /// Send to the endpoint matching the request's shape. A folder selection
    /// always goes to the batch upload, even when it holds a single file.
    pub async fn dispatch<B: Backend>(&self, backend: &B) -> Result<RunResult, ApiError> {
        match self {
            SubmitRequest::Upload { config, payload } => match payload {
                DataSourcePayload::Single(file) => backend.run_upload(config, file).await,
                DataSourcePayload::Multiple(files) => backend.run_upload_batch(config, files).await,
            },
            SubmitRequest::ServerBatch { config } => backend.run_batch(config).await,
            SubmitRequest::ServerSingle { config, csv_path } => backend.run_single(config, csv_path).await,
        }
    }
}

/// Run submission: validates, clears the previous result, sends, and
/// records the outcome. At most one submission is in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSubmission {
    state: SubmissionState,
    validation_error: Option<ValidationError>,
    view: ResultView,
}

impl Default for RunSubmission {
    fn default() -> Self {
        Self {
            state: SubmissionState::Idle,
            validation_error: None,
            view: ResultView::new(),
        }
    }
}

impl RunSubmission {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn is_submitting(&self) -> bool {
        self.state == SubmissionState::Submitting
    }

    /// Whether the run control should be enabled.
    pub fn can_submit(&self, config: Option<&RunConfig>, payload: Option<&DataSourcePayload>) -> bool {
        !self.is_submitting() && config.is_some() && payload.is_some_and(|p| !p.is_empty())
    }

    /// Message of the last failed submission.
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            SubmissionState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Why the last attempt never reached the backend.
    pub fn validation_error(&self) -> Option<&ValidationError> {
        self.validation_error.as_ref()
    }

    pub fn result(&self) -> Option<&RunResult> {
        match &self.state {
            SubmissionState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn view(&self) -> &ResultView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ResultView {
        &mut self.view
    }

    fn start(
        &mut self,
        validate: impl FnOnce() -> Result<SubmitRequest, ValidationError>,
    ) -> Result<SubmitRequest, ValidationError> {
        if self.is_submitting() {
            return Err(ValidationError::SubmissionInFlight);
        }
        let previous = std::mem::replace(&mut self.state, SubmissionState::Validating);
        match validate() {
            Ok(request) => {
                self.validation_error = None;
                self.view.clear();
                self.state = SubmissionState::Submitting;
                Ok(request)
            }
            Err(e) => {
                warn!("Submission blocked: {}", e);
                self.validation_error = Some(e.clone());
                self.state = previous;
                Err(e)
            }
        }
    }

    /// Validate an upload submission. On success the previous result and
    /// its artifacts are already cleared. A blocked attempt leaves the
    /// previous outcome in place.
    pub fn begin(
        &mut self,
        config: Option<&RunConfig>,
        payload: Option<&DataSourcePayload>,
    ) -> Result<SubmitRequest, ValidationError> {
        self.start(|| {
            let config = config.ok_or(ValidationError::MissingConfig)?;
            let payload = payload
                .filter(|p| !p.is_empty())
                .ok_or(ValidationError::EmptyDataSource)?;
            info!("Submitting {}", payload.describe());
            Ok(SubmitRequest::Upload {
                config: config.clone(),
                payload: payload.clone(),
            })
        })
    }

    /// Validate a batch run over the server folder named by `data_root`.
    pub fn begin_server_batch(&mut self, config: Option<&RunConfig>) -> Result<SubmitRequest, ValidationError> {
        self.start(|| {
            let config = config.ok_or(ValidationError::MissingConfig)?;
            match config.data_root.as_deref() {
                Some(root) if !root.trim().is_empty() => {
                    info!("Submitting server folder {}", root);
                    Ok(SubmitRequest::ServerBatch { config: config.clone() })
                }
                _ => Err(ValidationError::EmptyDataSource),
            }
        })
    }

    pub fn begin_server_single(
        &mut self,
        config: Option<&RunConfig>,
        csv_path: &str,
    ) -> Result<SubmitRequest, ValidationError> {
        self.start(|| {
            let config = config.ok_or(ValidationError::MissingConfig)?;
            let csv_path = csv_path.trim();
            if csv_path.is_empty() {
                return Err(ValidationError::EmptyDataSource);
            }
            info!("Submitting server file {}", csv_path);
            Ok(SubmitRequest::ServerSingle {
                config: config.clone(),
                csv_path: csv_path.to_string(),
            })
        })
    }

    /// Record the backend's answer. A success is shown in the result view
    /// as-is.
    pub fn finish(&mut self, outcome: Result<RunResult, ApiError>) {
        match outcome {
            Ok(result) => {
                info!(
                    "Run {} finished: {} files, {} matched, {} unmatched",
                    result.run_id, result.processed_files, result.matched_count, result.unmatched_count
                );
                self.view.open(result.clone());
                self.state = SubmissionState::Succeeded(result);
            }
            Err(e) => {
                warn!("Run failed: {}", e);
                self.state = SubmissionState::Failed(e.user_message(RUN_FAILED));
            }
        }
    }

    /// Send a validated request and load the new run's artifacts.
    pub async fn run<B: Backend>(&mut self, backend: &B, request: SubmitRequest) {
        let outcome = request.dispatch(backend).await;
        let succeeded = outcome.is_ok();
        self.finish(outcome);
        if succeeded {
            self.view.refresh(backend).await;
        }
    }

    /// Validate, send and load artifacts in one go.
    pub async fn submit<B: Backend>(
        &mut self,
        backend: &B,
        config: Option<&RunConfig>,
        payload: Option<&DataSourcePayload>,
    ) -> Result<(), ValidationError> {
        let request = self.begin(config, payload)?;
        self.run(backend, request).await;
        Ok(())
    }
}
