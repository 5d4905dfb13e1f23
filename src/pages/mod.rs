pub mod config;
pub mod profile_sets;
pub mod run_pipeline;
pub mod runs_history;
