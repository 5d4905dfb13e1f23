use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use zenin_client::data_source::DataSourcePayload;
use zenin_client::model::{ProfileSetSummary, RunConfig};
use zenin_client::workflow::RunSubmission;
use zenin_client::{ApiError, Backend};

use crate::api;
use crate::components::data_source_selector::DataSourceSelector;
use crate::components::plot_gallery::PlotGallery;
use crate::components::profile_set_selector::ProfileSetSelector;
use crate::components::run_config_form::RunConfigForm;
use crate::components::run_summary::RunSummary;
use crate::components::summary_viewer::SummaryViewer;

const PLOT_PREVIEW: usize = 9;

#[component]
pub fn RunPipelinePage() -> impl IntoView {
    let config = RwSignal::new(None::<RunConfig>);
    let (profile_sets, set_profile_sets) = signal::<Vec<ProfileSetSummary>>(vec![]);
    let (load_error, set_load_error) = signal::<Option<String>>(None);
    let payload = RwSignal::new(None::<DataSourcePayload>);
    let submission = RwSignal::new(RunSubmission::new());

    // Backend defaults and profile sets on mount
    Effect::new(move |_| {
        spawn_local(async move {
            let backend = match api::backend() {
                Ok(b) => b,
                Err(e) => {
                    set_load_error.set(Some(e));
                    return;
                }
            };
            match backend.default_config().await {
                Ok(defaults) => config.set(Some(defaults)),
                Err(e) => set_load_error.set(Some(e.user_message("Failed to load configuration"))),
            }
            match backend.list_profile_sets().await {
                Ok(sets) => set_profile_sets.set(sets),
                Err(e) => set_load_error.set(Some(e.user_message("Failed to load profile sets"))),
            }
        });
    });

    let is_running = Signal::derive(move || submission.with(RunSubmission::is_submitting));
    let can_run = move || {
        config.with(|cfg| payload.with(|selected| submission.with(|s| s.can_submit(cfg.as_ref(), selected.as_ref()))))
    };

    let on_run = move |_| {
        let cfg = config.get_untracked();
        let selected = payload.get_untracked();
        let request = submission
            .try_update(|s| s.begin(cfg.as_ref(), selected.as_ref()).ok())
            .flatten();
        let Some(request) = request else {
            return;
        };

        spawn_local(async move {
            let outcome = match api::backend() {
                Ok(backend) => request.dispatch(&backend).await,
                Err(e) => Err(ApiError::transport(e)),
            };
            let succeeded = outcome.is_ok();
            submission.update(|s| s.finish(outcome));
            if succeeded {
                api::load_artifacts(submission, RunSubmission::view_mut);
            }
        });
    };

    let run_result = Memo::new(move |_| submission.with(|s| s.result().cloned()));
    let run_error = Memo::new(move |_| submission.with(|s| s.error().map(str::to_string)));
    let results = Signal::derive(move || submission.with(|s| s.view().clone()));
    let on_expand_plots = Callback::new(move |_: ()| {
        submission.update(|s| s.view_mut().expand_gallery());
    });
    let on_select_sheet = Callback::new(move |name: String| {
        submission.update(|s| {
            s.view_mut().select_sheet(&name);
        });
    });

    view! {
        <div class="page run-pipeline-page">
            <h2>"Run Pipeline"</h2>
            <p class="page-description">"Configure thresholds, choose recordings and run the analysis."</p>

            <Show when=move || load_error.get().is_some()>
                <div class="error-banner">{move || load_error.get().unwrap_or_default()}</div>
            </Show>

            <Show
                when=move || config.with(Option::is_some)
                fallback=|| view! { <p class="loading-text">"Loading configuration..."</p> }
            >
                <RunConfigForm config=config disabled=is_running />
            </Show>

            <ProfileSetSelector profile_sets=profile_sets config=config disabled=is_running />
            <DataSourceSelector payload=payload disabled=is_running />

            <div class="run-actions">
                <button
                    class="btn btn-primary btn-large"
                    disabled=move || !can_run()
                    on:click=on_run
                >
                    {move || if is_running.get() { "Running..." } else { "Run Pipeline" }}
                </button>
                {move || {
                    payload.with(|p| p.as_ref().map(|p| {
                        view! { <span class="status-text">{p.describe()}</span> }
                    }))
                }}
                {move || {
                    submission.with(|s| s.validation_error().map(|e| {
                        view! { <span class="warning-text">{e.to_string()}</span> }
                    }))
                }}
            </div>

            <Show when=move || is_running.get()>
                <div class="card running-card">
                    <div class="spinner"></div>
                    <p>"Processing recordings. This can take a while for large folders."</p>
                </div>
            </Show>

            {move || run_error.get().map(|message| view! {
                <div class="error-state">
                    <h3>"Run Failed"</h3>
                    <p>{message}</p>
                </div>
            })}

            {move || run_result.get().map(|result| view! {
                <RunSummary result=result />
                <PlotGallery results=results max_preview=PLOT_PREVIEW on_expand=on_expand_plots />
                <SummaryViewer results=results on_select_sheet=on_select_sheet />
            })}
        </div>
    }
}
