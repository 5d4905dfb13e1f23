use tracing::{debug, info, warn};

use crate::api::Backend;
use crate::error::ApiError;
use crate::model::{RunResult, SheetRow, SummaryData, SummarySheet};

pub const PLOTS_FAILED: &str = "Failed to load plots";
pub const SUMMARY_FAILED: &str = "Failed to load summary";
pub const LOG_FAILED: &str = "Failed to load log";

/// A run and its secondary artifacts, fetched lazily by run id.
///
/// Each fetch is split into a request (`begin_*`, which returns the run id
/// to fetch for) and an `apply_*` that stores the outcome. Outcomes for a
/// run other than the one currently shown are dropped, so a slow response
/// from a previous run cannot overwrite the current one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultView {
    result: Option<RunResult>,
    plots: Vec<String>,
    plots_loading: bool,
    plots_error: Option<String>,
    gallery_expanded: bool,
    summary: Option<SummaryData>,
    summary_loading: bool,
    summary_error: Option<String>,
    active_sheet: Option<String>,
    log: Option<String>,
    log_error: Option<String>,
}

/// The first plots of a run plus how many were left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotGallery<'a> {
    pub shown: &'a [String],
    pub hidden: usize,
}

impl ResultView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the run and every artifact.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Show `result`, discarding artifacts of whatever was shown before.
    pub fn open(&mut self, result: RunResult) {
        info!("Showing run {}", result.run_id);
        self.clear();
        self.result = Some(result);
    }

    pub fn result(&self) -> Option<&RunResult> {
        self.result.as_ref()
    }

    pub fn run_id(&self) -> Option<&str> {
        self.result.as_ref().map(|r| r.run_id.as_str())
    }

    fn is_current(&self, run_id: &str) -> bool {
        if self.run_id() == Some(run_id) {
            true
        } else {
            debug!("Dropping artifact response for run {}", run_id);
            false
        }
    }

    pub fn plots(&self) -> &[String] {
        &self.plots
    }

    pub fn plots_loading(&self) -> bool {
        self.plots_loading
    }

    pub fn plots_error(&self) -> Option<&str> {
        self.plots_error.as_deref()
    }

    /// First `max_preview` plots, or all of them once the gallery was
    /// expanded for this run.
    pub fn gallery(&self, max_preview: usize) -> PlotGallery<'_> {
        let limit = if self.gallery_expanded { self.plots.len() } else { max_preview };
        let shown = &self.plots[..self.plots.len().min(limit)];
        PlotGallery {
            shown,
            hidden: self.plots.len() - shown.len(),
        }
    }

    pub fn gallery_expanded(&self) -> bool {
        self.gallery_expanded
    }

    /// Show every plot of the current run. Reset when another run is opened.
    pub fn expand_gallery(&mut self) {
        self.gallery_expanded = true;
    }

    pub fn begin_plots(&mut self) -> Option<String> {
        let run_id = self.run_id()?.to_string();
        self.plots_loading = true;
        self.plots_error = None;
        Some(run_id)
    }

    pub fn apply_plots(&mut self, run_id: &str, outcome: Result<Vec<String>, ApiError>) {
        if !self.is_current(run_id) {
            return;
        }
        self.plots_loading = false;
        match outcome {
            Ok(plots) => {
                info!("Run {} has {} plots", run_id, plots.len());
                self.plots = plots;
            }
            Err(e) => {
                warn!("Listing plots for run {} failed: {}", run_id, e);
                self.plots.clear();
                self.plots_error = Some(e.user_message(PLOTS_FAILED));
            }
        }
    }

    pub async fn load_plots<B: Backend>(&mut self, backend: &B) {
        if let Some(run_id) = self.begin_plots() {
            let outcome = backend.list_plots(&run_id).await;
            self.apply_plots(&run_id, outcome);
        }
    }

    pub fn summary(&self) -> Option<&SummaryData> {
        self.summary.as_ref()
    }

    pub fn summary_loading(&self) -> bool {
        self.summary_loading
    }

    /// Summary failures stay here and never fail the run as a whole.
    pub fn summary_error(&self) -> Option<&str> {
        self.summary_error.as_deref()
    }

    /// Run id to fetch the summary for; `None` when the run produced no
    /// spreadsheet.
    pub fn begin_summary(&mut self) -> Option<String> {
        let result = self.result.as_ref()?;
        if !result.has_summary() {
            return None;
        }
        let run_id = result.run_id.clone();
        self.summary_loading = true;
        self.summary_error = None;
        Some(run_id)
    }

    pub fn apply_summary(&mut self, run_id: &str, outcome: Result<SummaryData, ApiError>) {
        if !self.is_current(run_id) {
            return;
        }
        self.summary_loading = false;
        match outcome {
            Ok(data) => {
                self.active_sheet = data.first_sheet_name().map(str::to_string);
                self.summary = Some(data);
            }
            Err(e) => {
                warn!("Loading summary for run {} failed: {}", run_id, e);
                self.summary = None;
                self.active_sheet = None;
                self.summary_error = Some(e.detail_or(SUMMARY_FAILED));
            }
        }
    }

    pub async fn load_summary<B: Backend>(&mut self, backend: &B) {
        if let Some(run_id) = self.begin_summary() {
            let outcome = backend.summary_data(&run_id).await;
            self.apply_summary(&run_id, outcome);
        }
    }

    pub fn active_sheet_name(&self) -> Option<&str> {
        self.active_sheet.as_deref()
    }

    /// Switch sheets. Unknown names are ignored.
    pub fn select_sheet(&mut self, name: &str) -> bool {
        match self.summary.as_ref().and_then(|s| s.sheet(name)) {
            Some(_) => {
                self.active_sheet = Some(name.to_string());
                true
            }
            None => false,
        }
    }

    pub fn active_sheet(&self) -> Option<&SummarySheet> {
        let name = self.active_sheet.as_deref()?;
        self.summary.as_ref()?.sheet(name)
    }

    pub fn active_rows(&self) -> &[SheetRow] {
        self.active_sheet().map(|s| s.rows.as_slice()).unwrap_or_default()
    }

    pub fn columns(&self) -> Vec<String> {
        self.active_sheet().map(SummarySheet::columns).unwrap_or_default()
    }

    pub fn log(&self) -> Option<&str> {
        self.log.as_deref()
    }

    pub fn log_error(&self) -> Option<&str> {
        self.log_error.as_deref()
    }

    pub fn begin_log(&mut self) -> Option<String> {
        let run_id = self.run_id()?.to_string();
        self.log_error = None;
        Some(run_id)
    }

    pub fn apply_log(&mut self, run_id: &str, outcome: Result<String, ApiError>) {
        if !self.is_current(run_id) {
            return;
        }
        match outcome {
            Ok(text) => self.log = Some(text),
            Err(e) => {
                warn!("Loading log for run {} failed: {}", run_id, e);
                self.log_error = Some(e.user_message(LOG_FAILED));
            }
        }
    }

    pub async fn load_log<B: Backend>(&mut self, backend: &B) {
        if let Some(run_id) = self.begin_log() {
            let outcome = backend.run_log(&run_id).await;
            self.apply_log(&run_id, outcome);
        }
    }

    /// Plots, then the summary if there is one.
    pub async fn refresh<B: Backend>(&mut self, backend: &B) {
        self.load_plots(backend).await;
        self.load_summary(backend).await;
    }
}
