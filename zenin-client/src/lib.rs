pub mod api;
pub mod data_source;
pub mod error;
pub mod model;
#[cfg(not(target_arch = "wasm32"))]
pub mod settings;
pub mod workflow;

pub use api::{ApiBase, Backend, HttpBackend};
pub use data_source::{DataSourcePayload, DataSourceSummary, SelectedFile};
pub use error::{ApiError, ClientError, ValidationError};
