pub mod data_source_selector;
pub mod plot_gallery;
pub mod profile_set_selector;
pub mod run_config_form;
pub mod run_summary;
pub mod sidebar;
pub mod summary_viewer;
