use tracing::{info, warn};

use super::results::ResultView;
use crate::api::Backend;
use crate::error::ApiError;
use crate::model::{RunResult, RunSummaryRecord};

const RUNS_FAILED: &str = "Failed to load runs";
const RUN_FAILED: &str = "Failed to load run details";

/// Past runs and the one currently opened.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunsHistory {
    runs: Vec<RunSummaryRecord>,
    loading: bool,
    error: Option<String>,
    selected: Option<String>,
    view: ResultView,
}

impl RunsHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Newest first, as the backend lists them.
    pub fn runs(&self) -> &[RunSummaryRecord] {
        &self.runs
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn view(&self) -> &ResultView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ResultView {
        &mut self.view
    }

    pub fn begin_load(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn apply_runs(&mut self, outcome: Result<Vec<RunSummaryRecord>, ApiError>) {
        self.loading = false;
        match outcome {
            Ok(runs) => {
                info!("Loaded {} runs", runs.len());
                self.runs = runs;
            }
            Err(e) => {
                warn!("Listing runs failed: {}", e);
                self.error = Some(e.user_message(RUNS_FAILED));
            }
        }
    }

    pub async fn load<B: Backend>(&mut self, backend: &B) {
        self.begin_load();
        let outcome = backend.list_runs().await;
        self.apply_runs(outcome);
    }

    /// Mark `run_id` as selected and drop whatever was shown.
    pub fn begin_open(&mut self, run_id: &str) {
        self.selected = Some(run_id.to_string());
        self.error = None;
        self.view.clear();
    }

    /// Show the fetched run unless another one was selected meanwhile.
    pub fn apply_run(&mut self, run_id: &str, outcome: Result<RunResult, ApiError>) {
        if self.selected.as_deref() != Some(run_id) {
            return;
        }
        match outcome {
            Ok(result) => self.view.open(result),
            Err(e) => {
                warn!("Loading run {} failed: {}", run_id, e);
                self.error = Some(e.user_message(RUN_FAILED));
            }
        }
    }

    /// Fetch the run's details and its plot list.
    pub async fn open<B: Backend>(&mut self, backend: &B, run_id: &str) {
        self.begin_open(run_id);
        let outcome = backend.get_run(run_id).await;
        self.apply_run(run_id, outcome);
        self.view.load_plots(backend).await;
    }

    pub fn close(&mut self) {
        self.selected = None;
        self.view.clear();
    }
}
