use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{ApiBase, Backend};
use crate::data_source::SelectedFile;
use crate::error::ApiError;
use crate::model::{ProfileSet, ProfileSetSummary, RunConfig, RunResult, RunSummaryRecord, SummaryData};

/// [`Backend`] over HTTP.
///
/// No timeouts or retries are configured; a request lasts as long as the
/// transport allows.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base: ApiBase,
}

#[derive(Deserialize)]
struct PlotList {
    #[serde(default)]
    plots: Vec<String>,
}

impl HttpBackend {
    pub fn new(base: ApiBase) -> Self {
        Self {
            client: reqwest::Client::new(),
            base,
        }
    }

    /// Send `request`, turning transport failures and non-success statuses
    /// into [`ApiError`].
    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(|e| {
            warn!("Request failed: {}", e);
            ApiError::transport(e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = ApiError::from_response(status.as_u16(), &body);
        warn!("Backend returned {}: {}", status.as_u16(), err.detail_or("no detail"));
        Err(err)
    }

    async fn json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        self.send(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ApiError::transport(format!("Failed to decode response: {}", e)))
    }

    async fn bytes(&self, request: RequestBuilder) -> Result<Vec<u8>, ApiError> {
        let bytes = self
            .send(request)
            .await?
            .bytes()
            .await
            .map_err(|e| ApiError::transport(format!("Failed to read response body: {}", e)))?;
        Ok(bytes.to_vec())
    }

    fn get<I>(&self, segments: I) -> RequestBuilder
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let url = self.base.endpoint(segments);
        debug!("GET {}", url);
        self.client.get(url)
    }
}

/// The full config as sent to the backend, every band filled in.
fn config_json(config: &RunConfig) -> Result<String, ApiError> {
    config
        .to_json()
        .map_err(|e| ApiError::transport(format!("Failed to encode config: {}", e)))
}

fn file_part(file: &SelectedFile) -> Part {
    Part::bytes(file.contents.clone()).file_name(file.name.clone())
}

impl Backend for HttpBackend {
    fn base(&self) -> &ApiBase {
        &self.base
    }

    async fn default_config(&self) -> Result<RunConfig, ApiError> {
        self.json(self.get(["config", "default"])).await
    }

    async fn list_profile_sets(&self) -> Result<Vec<ProfileSetSummary>, ApiError> {
        self.json(self.get(["profiles"])).await
    }

    async fn get_profile_set(&self, id: &str) -> Result<ProfileSet, ApiError> {
        self.json(self.get(["profiles", id])).await
    }

    async fn create_profile_set(&self, set: &ProfileSet) -> Result<ProfileSet, ApiError> {
        info!("Creating profile set '{}'", set.id);
        let url = self.base.endpoint(["profiles"]);
        self.json(self.client.post(url).json(set)).await
    }

    async fn save_profile_set(&self, set: &ProfileSet) -> Result<ProfileSet, ApiError> {
        info!("Saving profile set '{}' ({} profiles)", set.id, set.profiles.len());
        let url = self.base.endpoint(["profiles", set.id.as_str()]);
        self.json(self.client.put(url).json(set)).await
    }

    async fn delete_profile_set(&self, id: &str) -> Result<(), ApiError> {
        info!("Deleting profile set '{}'", id);
        let url = self.base.endpoint(["profiles", id]);
        self.send(self.client.delete(url)).await?;
        Ok(())
    }

    async fn run_batch(&self, config: &RunConfig) -> Result<RunResult, ApiError> {
        info!("Submitting server-side batch run over {:?}", config.data_root);
        let url = self.base.endpoint(["run", "batch"]);
        let request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(config_json(config)?);
        self.json(request).await
    }

    async fn run_single(&self, config: &RunConfig, csv_path: &str) -> Result<RunResult, ApiError> {
        info!("Submitting server-side single run for {}", csv_path);
        let url = self.base.endpoint(["run", "single"]);
        let body = serde_json::json!({
            "config": config.normalized(),
            "csv_path": csv_path,
        });
        self.json(self.client.post(url).json(&body)).await
    }

    async fn run_upload(&self, config: &RunConfig, file: &SelectedFile) -> Result<RunResult, ApiError> {
        info!("Uploading '{}' ({} bytes) for a single run", file.name, file.size());
        let form = Form::new()
            .part("file", file_part(file))
            .text("config", config_json(config)?);
        let url = self.base.endpoint(["run", "upload"]);
        self.json(self.client.post(url).multipart(form)).await
    }

    async fn run_upload_batch(&self, config: &RunConfig, files: &[SelectedFile]) -> Result<RunResult, ApiError> {
        info!("Uploading {} files for a batch run", files.len());
        let form = files
            .iter()
            .fold(Form::new(), |form, file| form.part("files", file_part(file)))
            .text("config", config_json(config)?);
        let url = self.base.endpoint(["run", "upload-batch"]);
        self.json(self.client.post(url).multipart(form)).await
    }

    async fn list_runs(&self) -> Result<Vec<RunSummaryRecord>, ApiError> {
        self.json(self.get(["runs"])).await
    }

    async fn get_run(&self, run_id: &str) -> Result<RunResult, ApiError> {
        self.json(self.get(["runs", run_id])).await
    }

    async fn list_plots(&self, run_id: &str) -> Result<Vec<String>, ApiError> {
        let list: PlotList = self.json(self.get(["runs", run_id, "plots"])).await?;
        Ok(list.plots)
    }

    async fn plot_image(&self, run_id: &str, plot_name: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.base.plot_url(run_id, plot_name);
        self.bytes(self.client.get(url)).await
    }

    async fn run_log(&self, run_id: &str) -> Result<String, ApiError> {
        let url = self.base.log_url(run_id);
        self.send(self.client.get(url))
            .await?
            .text()
            .await
            .map_err(|e| ApiError::transport(format!("Failed to read log: {}", e)))
    }

    async fn summary_data(&self, run_id: &str) -> Result<SummaryData, ApiError> {
        self.json(self.get(["runs", run_id, "summary"])).await
    }

    async fn download_summary(&self, run_id: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.base.summary_download_url(run_id);
        self.bytes(self.client.get(url)).await
    }
}
