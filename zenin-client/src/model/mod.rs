pub mod bands;
pub mod config;
pub mod profiles;
pub mod runs;

pub use bands::{parse_number, Band, BandThresholds, CutPoint, WaveLevel};
pub use config::{RunConfig, ScalarField};
pub use profiles::{is_protected, slugify, ProfileDefinition, ProfileSet, ProfileSetSummary, DEFAULT_PROFILE_SET_ID};
pub use runs::{display_timestamp, RunResult, RunSummaryRecord, Scalar, SheetRow, SummaryData, SummarySheet};
