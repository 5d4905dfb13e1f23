//! Backend access.
//!
//! [`Backend`] has one method per backend endpoint. Workflows are generic
//! over it, so the browser, the headless runner and tests share them;
//! [`HttpBackend`] is the real implementation.

pub mod base;
pub mod http;

pub use base::{ApiBase, DEV_API_URL};
pub use http::HttpBackend;

use crate::data_source::SelectedFile;
use crate::error::ApiError;
use crate::model::{ProfileSet, ProfileSetSummary, RunConfig, RunResult, RunSummaryRecord, SummaryData};

/// The analysis service, one method per endpoint.
///
/// Futures are not required to be `Send`: in the browser they run on the
/// single-threaded executor.
#[allow(async_fn_in_trait)]
pub trait Backend {
    /// Root address, for building artifact URLs.
    fn base(&self) -> &ApiBase;

    async fn default_config(&self) -> Result<RunConfig, ApiError>;

    async fn list_profile_sets(&self) -> Result<Vec<ProfileSetSummary>, ApiError>;
    async fn get_profile_set(&self, id: &str) -> Result<ProfileSet, ApiError>;
    async fn create_profile_set(&self, set: &ProfileSet) -> Result<ProfileSet, ApiError>;
    async fn save_profile_set(&self, set: &ProfileSet) -> Result<ProfileSet, ApiError>;
    async fn delete_profile_set(&self, id: &str) -> Result<(), ApiError>;

    /// Batch run over `config.data_root` on the server.
    async fn run_batch(&self, config: &RunConfig) -> Result<RunResult, ApiError>;
    /// Single run over a file already on the server.
    async fn run_single(&self, config: &RunConfig, csv_path: &str) -> Result<RunResult, ApiError>;
    async fn run_upload(&self, config: &RunConfig, file: &SelectedFile) -> Result<RunResult, ApiError>;
    async fn run_upload_batch(&self, config: &RunConfig, files: &[SelectedFile]) -> Result<RunResult, ApiError>;

    /// Newest first.
    async fn list_runs(&self) -> Result<Vec<RunSummaryRecord>, ApiError>;
    async fn get_run(&self, run_id: &str) -> Result<RunResult, ApiError>;
    async fn list_plots(&self, run_id: &str) -> Result<Vec<String>, ApiError>;
    async fn plot_image(&self, run_id: &str, plot_name: &str) -> Result<Vec<u8>, ApiError>;
    async fn run_log(&self, run_id: &str) -> Result<String, ApiError>;
    async fn summary_data(&self, run_id: &str) -> Result<SummaryData, ApiError>;
    async fn download_summary(&self, run_id: &str) -> Result<Vec<u8>, ApiError>;
}
