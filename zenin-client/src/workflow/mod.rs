//! Page-level workflows. Each owns its own state and talks to the backend
//! only through [`Backend`](crate::api::Backend).

pub mod history;
pub mod profile_editor;
pub mod results;
pub mod submission;

pub use history::RunsHistory;
pub use profile_editor::{DeleteToken, ProfileSetEditor};
pub use results::{PlotGallery, ResultView};
pub use submission::{RunSubmission, SubmissionState, SubmitRequest};
