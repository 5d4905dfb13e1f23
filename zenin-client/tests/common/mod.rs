#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

use zenin_client::model::{ProfileSet, ProfileSetSummary, RunConfig, RunResult, RunSummaryRecord, SummaryData};
use zenin_client::{ApiBase, ApiError, Backend, SelectedFile};

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name)).expect("Failed to read fixture")
}

pub fn sample_run(run_id: &str) -> RunResult {
    let mut run: RunResult = serde_json::from_str(&fixture("run_result.json")).expect("Bad run fixture");
    run.run_id = run_id.to_string();
    run
}

pub fn sample_summary() -> SummaryData {
    serde_json::from_str(&fixture("summary.json")).expect("Bad summary fixture")
}

pub fn sample_profile_set() -> ProfileSet {
    serde_json::from_str(&fixture("profile_set.json")).expect("Bad profile set fixture")
}

/// Every backend call, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    DefaultConfig,
    ListProfileSets,
    GetProfileSet(String),
    CreateProfileSet(String),
    SaveProfileSet(String),
    DeleteProfileSet(String),
    RunBatch(Option<String>),
    RunSingle(String),
    RunUpload(String),
    RunUploadBatch(Vec<String>),
    ListRuns,
    GetRun(String),
    ListPlots(String),
    PlotImage(String, String),
    RunLog(String),
    SummaryData(String),
    DownloadSummary(String),
}

fn not_found(what: &str) -> ApiError {
    ApiError::from_response(404, &format!(r#"{{"detail": "{} not found"}}"#, what))
}

/// In-memory backend that records calls. Runs are handed out from a queue
/// so consecutive submissions return different run ids.
pub struct FakeBackend {
    base: ApiBase,
    pub calls: RefCell<Vec<Call>>,
    pub profile_sets: RefCell<Vec<ProfileSet>>,
    pub next_runs: RefCell<Vec<Result<RunResult, ApiError>>>,
    pub runs: RefCell<Vec<RunResult>>,
    pub plots: RefCell<HashMap<String, Vec<String>>>,
    pub summaries: RefCell<HashMap<String, Result<SummaryData, ApiError>>>,
    pub logs: RefCell<HashMap<String, String>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            base: ApiBase::parse("http://backend.test").expect("valid base"),
            calls: RefCell::new(Vec::new()),
            profile_sets: RefCell::new(vec![sample_profile_set()]),
            next_runs: RefCell::new(Vec::new()),
            runs: RefCell::new(Vec::new()),
            plots: RefCell::new(HashMap::new()),
            summaries: RefCell::new(HashMap::new()),
            logs: RefCell::new(HashMap::new()),
        }
    }

    /// Queue the outcome of the next submission.
    pub fn queue_run(&self, outcome: Result<RunResult, ApiError>) {
        self.next_runs.borrow_mut().push(outcome);
    }

    pub fn set_plots(&self, run_id: &str, plots: &[&str]) {
        self.plots
            .borrow_mut()
            .insert(run_id.to_string(), plots.iter().map(|p| p.to_string()).collect());
    }

    pub fn set_summary(&self, run_id: &str, outcome: Result<SummaryData, ApiError>) {
        self.summaries.borrow_mut().insert(run_id.to_string(), outcome);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn next_run(&self) -> Result<RunResult, ApiError> {
        let outcome = if self.next_runs.borrow().is_empty() {
            Err(ApiError::from_response(500, r#"{"detail": "No run queued"}"#))
        } else {
            self.next_runs.borrow_mut().remove(0)
        };
        if let Ok(run) = &outcome {
            self.runs.borrow_mut().insert(0, run.clone());
        }
        outcome
    }
}

impl Backend for FakeBackend {
    fn base(&self) -> &ApiBase {
        &self.base
    }

    async fn default_config(&self) -> Result<RunConfig, ApiError> {
        self.record(Call::DefaultConfig);
        Ok(RunConfig::default())
    }

    async fn list_profile_sets(&self) -> Result<Vec<ProfileSetSummary>, ApiError> {
        self.record(Call::ListProfileSets);
        Ok(self.profile_sets.borrow().iter().map(ProfileSet::summary).collect())
    }

    async fn get_profile_set(&self, id: &str) -> Result<ProfileSet, ApiError> {
        self.record(Call::GetProfileSet(id.to_string()));
        self.profile_sets
            .borrow()
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| not_found(&format!("Profile set {}", id)))
    }

    async fn create_profile_set(&self, set: &ProfileSet) -> Result<ProfileSet, ApiError> {
        self.record(Call::CreateProfileSet(set.id.clone()));
        let mut sets = self.profile_sets.borrow_mut();
        if sets.iter().any(|s| s.id == set.id) {
            return Err(ApiError::from_response(
                400,
                &format!(r#"{{"detail": "Profile set {} already exists"}}"#, set.id),
            ));
        }
        sets.push(set.clone());
        Ok(set.clone())
    }

    async fn save_profile_set(&self, set: &ProfileSet) -> Result<ProfileSet, ApiError> {
        self.record(Call::SaveProfileSet(set.id.clone()));
        let mut sets = self.profile_sets.borrow_mut();
        match sets.iter_mut().find(|s| s.id == set.id) {
            Some(existing) => {
                *existing = set.clone();
                Ok(set.clone())
            }
            None => Err(not_found(&format!("Profile set {}", set.id))),
        }
    }

    async fn delete_profile_set(&self, id: &str) -> Result<(), ApiError> {
        self.record(Call::DeleteProfileSet(id.to_string()));
        let mut sets = self.profile_sets.borrow_mut();
        let before = sets.len();
        sets.retain(|s| s.id != id);
        if sets.len() == before {
            return Err(not_found(&format!("Profile set {}", id)));
        }
        Ok(())
    }

    async fn run_batch(&self, config: &RunConfig) -> Result<RunResult, ApiError> {
        self.record(Call::RunBatch(config.data_root.clone()));
        self.next_run()
    }

    async fn run_single(&self, _config: &RunConfig, csv_path: &str) -> Result<RunResult, ApiError> {
        self.record(Call::RunSingle(csv_path.to_string()));
        self.next_run()
    }

    async fn run_upload(&self, _config: &RunConfig, file: &SelectedFile) -> Result<RunResult, ApiError> {
        self.record(Call::RunUpload(file.name.clone()));
        self.next_run()
    }

    async fn run_upload_batch(&self, _config: &RunConfig, files: &[SelectedFile]) -> Result<RunResult, ApiError> {
        self.record(Call::RunUploadBatch(files.iter().map(|f| f.name.clone()).collect()));
        self.next_run()
    }

    async fn list_runs(&self) -> Result<Vec<RunSummaryRecord>, ApiError> {
        self.record(Call::ListRuns);
        Ok(self
            .runs
            .borrow()
            .iter()
            .map(|r| RunSummaryRecord {
                run_id: r.run_id.clone(),
                timestamp: r.timestamp.clone(),
                profile_set_id: r.config.profile_set_id.clone(),
                processed_files: r.processed_files,
                matched_count: r.matched_count,
                unmatched_count: r.unmatched_count,
                dominance_delta: r.config.dominance_delta,
                balance_threshold: r.config.balance_threshold,
                window_secs: r.config.window_secs,
            })
            .collect())
    }

    async fn get_run(&self, run_id: &str) -> Result<RunResult, ApiError> {
        self.record(Call::GetRun(run_id.to_string()));
        self.runs
            .borrow()
            .iter()
            .find(|r| r.run_id == run_id)
            .cloned()
            .ok_or_else(|| not_found(&format!("Run {}", run_id)))
    }

    async fn list_plots(&self, run_id: &str) -> Result<Vec<String>, ApiError> {
        self.record(Call::ListPlots(run_id.to_string()));
        Ok(self.plots.borrow().get(run_id).cloned().unwrap_or_default())
    }

    async fn plot_image(&self, run_id: &str, plot_name: &str) -> Result<Vec<u8>, ApiError> {
        self.record(Call::PlotImage(run_id.to_string(), plot_name.to_string()));
        Ok(b"\x89PNG".to_vec())
    }

    async fn run_log(&self, run_id: &str) -> Result<String, ApiError> {
        self.record(Call::RunLog(run_id.to_string()));
        self.logs
            .borrow()
            .get(run_id)
            .cloned()
            .ok_or_else(|| not_found(&format!("Log for run {}", run_id)))
    }

    async fn summary_data(&self, run_id: &str) -> Result<SummaryData, ApiError> {
        self.record(Call::SummaryData(run_id.to_string()));
        self.summaries
            .borrow()
            .get(run_id)
            .cloned()
            .unwrap_or_else(|| Err(not_found(&format!("Summary file for run {}", run_id))))
    }

    async fn download_summary(&self, run_id: &str) -> Result<Vec<u8>, ApiError> {
        self.record(Call::DownloadSummary(run_id.to_string()));
        Ok(b"PK\x03\x04".to_vec())
    }
}
