use leptos::prelude::*;

use zenin_client::model::{display_timestamp, RunResult};

use crate::api;

/// Headline numbers of a finished run plus links to its log and spreadsheet.
#[component]
pub fn RunSummary(result: RunResult) -> impl IntoView {
    let base = api::api_base().ok();
    let log_url = base.as_ref().map(|b| b.log_url(&result.run_id).to_string());
    let download_url = base
        .as_ref()
        .filter(|_| result.has_summary())
        .map(|b| b.summary_download_url(&result.run_id).to_string());

    view! {
        <section class="card run-summary">
            <div class="run-summary-header">
                <h3>"Run " {result.run_id.clone()}</h3>
                <span class="run-timestamp">{display_timestamp(&result.timestamp)}</span>
            </div>
            <div class="stat-grid">
                <div class="stat">
                    <span class="stat-value">{result.processed_files}</span>
                    <span class="stat-label">"Processed files"</span>
                </div>
                <div class="stat stat-pass">
                    <span class="stat-value">{result.matched_count}</span>
                    <span class="stat-label">"Matched"</span>
                </div>
                <div class="stat stat-fail">
                    <span class="stat-value">{result.unmatched_count}</span>
                    <span class="stat-label">"Unmatched"</span>
                </div>
            </div>
            <p class="run-config-line">
                "Profile set " <strong>{result.config.profile_set_id.clone()}</strong>
                {format!(
                    " · Δ={}, B={}, mean B={}, window {}s × {}",
                    result.config.dominance_delta,
                    result.config.balance_threshold,
                    result.config.mean_balance_threshold,
                    result.config.window_secs,
                    result.config.window_samples,
                )}
            </p>
            <div class="action-buttons">
                {log_url.map(|url| view! {
                    <a class="btn btn-secondary" href=url target="_blank">"Processing log"</a>
                })}
                {download_url.map(|url| view! {
                    <a class="btn btn-secondary" href=url>"Download summary (.xlsx)"</a>
                })}
            </div>
        </section>
    }
}
