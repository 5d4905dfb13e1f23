use url::Url;

use crate::error::ClientError;

/// Backend address used by development builds and as the runner's fallback.
pub const DEV_API_URL: &str = "http://localhost:8000";

/// Root address of the backend, plus the URLs derived from it.
///
/// Artifact URLs are deterministic: they only depend on the run id and the
/// artifact name, so pages can render links without another request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBase {
    root: Url,
}

impl ApiBase {
    pub fn parse(raw: &str) -> Result<Self, ClientError> {
        let root = Url::parse(raw.trim()).map_err(|source| ClientError::InvalidBaseUrl {
            url: raw.to_string(),
            source,
        })?;
        if root.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl {
                url: raw.to_string(),
                source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
            });
        }
        Ok(Self { root })
    }

    /// Development builds talk to the local backend; release builds are
    /// served by the backend itself and use the page origin.
    pub fn resolve(dev_mode: bool, origin: &str) -> Result<Self, ClientError> {
        if dev_mode {
            Self::parse(DEV_API_URL)
        } else {
            Self::parse(origin)
        }
    }

    pub fn as_str(&self) -> &str {
        self.root.as_str()
    }

    /// `root` with `segments` appended, each percent-encoded.
    pub fn endpoint<I>(&self, segments: I) -> Url
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut url = self.root.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Plot names may contain `/` for nested plot folders.
    pub fn plot_url(&self, run_id: &str, plot_name: &str) -> Url {
        self.endpoint(
            ["runs", run_id, "plots"]
                .into_iter()
                .chain(plot_name.split('/')),
        )
    }

    pub fn log_url(&self, run_id: &str) -> Url {
        self.endpoint(["runs", run_id, "log"])
    }

    pub fn summary_download_url(&self, run_id: &str) -> Url {
        self.endpoint(["runs", run_id, "summary", "download"])
    }
}
