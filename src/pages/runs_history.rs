use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use zenin_client::model::display_timestamp;
use zenin_client::workflow::RunsHistory;
use zenin_client::{ApiError, Backend};

use crate::api;
use crate::components::plot_gallery::PlotGallery;
use crate::components::run_summary::RunSummary;
use crate::components::summary_viewer::SummaryViewer;

const PLOT_PREVIEW: usize = 12;

#[component]
pub fn RunsHistoryPage() -> impl IntoView {
    let history = RwSignal::new(RunsHistory::new());

    let load_runs = move || {
        history.update(RunsHistory::begin_load);
        spawn_local(async move {
            let outcome = match api::backend() {
                Ok(backend) => backend.list_runs().await,
                Err(e) => Err(ApiError::transport(e)),
            };
            history.update(|h| h.apply_runs(outcome));
        });
    };

    Effect::new(move |_| {
        load_runs();
    });

    let open_run = move |run_id: String| {
        history.update(|h| h.begin_open(&run_id));
        spawn_local(async move {
            let outcome = match api::backend() {
                Ok(backend) => backend.get_run(&run_id).await,
                Err(e) => Err(ApiError::transport(e)),
            };
            history.update(|h| h.apply_run(&run_id, outcome));
            api::load_artifacts(history, RunsHistory::view_mut);
        });
    };

    let load_log = move |_| {
        let Some(run_id) = history.try_update(|h| h.view_mut().begin_log()).flatten() else {
            return;
        };
        spawn_local(async move {
            let outcome = match api::backend() {
                Ok(backend) => backend.run_log(&run_id).await,
                Err(e) => Err(ApiError::transport(e)),
            };
            history.update(|h| h.view_mut().apply_log(&run_id, outcome));
        });
    };

    let selected = Memo::new(move |_| history.with(|h| h.selected().map(str::to_string)));
    let opened = Memo::new(move |_| history.with(|h| h.view().result().cloned()));
    let results = Signal::derive(move || history.with(|h| h.view().clone()));
    let on_expand_plots = Callback::new(move |_: ()| {
        history.update(|h| h.view_mut().expand_gallery());
    });
    let on_select_sheet = Callback::new(move |name: String| {
        history.update(|h| {
            h.view_mut().select_sheet(&name);
        });
    });

    view! {
        <div class="page runs-history-page">
            <h2>"Runs History"</h2>
            <p class="page-description">"Previous pipeline runs, newest first."</p>

            <div class="runs-toolbar">
                <button
                    class="btn btn-secondary"
                    disabled=move || history.with(RunsHistory::loading)
                    on:click=move |_| load_runs()
                >
                    "Refresh"
                </button>
            </div>

            {move || {
                history.with(|h| h.error().map(|e| view! { <div class="error-banner">{e.to_string()}</div> }))
            }}

            <div class="runs-layout">
                <div class="runs-list-panel">
                    <Show when=move || history.with(RunsHistory::loading)>
                        <p class="loading-text">"Loading runs..."</p>
                    </Show>
                    {move || {
                        let current = selected.get();
                        history.with(|h| {
                            if h.runs().is_empty() && !h.loading() {
                                return view! { <p class="empty-text">"No runs yet"</p> }.into_any();
                            }
                            h.runs()
                                .iter()
                                .map(|run| {
                                    let run_id = run.run_id.clone();
                                    let is_selected = current.as_deref() == Some(run.run_id.as_str());
                                    view! {
                                        <button
                                            class="run-list-item"
                                            class:run-list-item-selected=is_selected
                                            on:click=move |_| open_run(run_id.clone())
                                        >
                                            <div class="run-item-time">{display_timestamp(&run.timestamp)}</div>
                                            <div class="run-item-meta">
                                                {format!(
                                                    "{} · {} files · {} matched",
                                                    run.profile_set_id, run.processed_files, run.matched_count,
                                                )}
                                            </div>
                                            <div class="run-item-config">{run.config_label()}</div>
                                        </button>
                                    }
                                })
                                .collect::<Vec<_>>()
                                .into_any()
                        })
                    }}
                </div>

                <div class="run-detail-panel">
                    {move || match (selected.get(), opened.get()) {
                        (None, _) => view! { <div class="run-detail-empty">"Select a run to see its results"</div> }.into_any(),
                        (Some(_), None) if history.with(|h| h.error().is_some()) => ().into_any(),
                        (Some(_), None) => view! { <p class="loading-text">"Loading run..."</p> }.into_any(),
                        (Some(_), Some(result)) => {
                            view! {
                                <div class="run-detail-header">
                                    <button class="btn btn-secondary" on:click=move |_| history.update(RunsHistory::close)>
                                        "Close"
                                    </button>
                                </div>
                                <RunSummary result=result />
                                <PlotGallery results=results max_preview=PLOT_PREVIEW on_expand=on_expand_plots />
                                <SummaryViewer results=results on_select_sheet=on_select_sheet />
                                <section class="card run-log">
                                    <h3>"Log"</h3>
                                    <button class="btn btn-secondary" on:click=load_log>"Load log"</button>
                                    {move || {
                                        results.with(|v| v.log_error().map(|e| view! { <p class="error-text">{e.to_string()}</p> }))
                                    }}
                                    {move || results.with(|v| v.log().map(|log| view! { <pre class="log-text">{log.to_string()}</pre> }))}
                                </section>
                            }
                                .into_any()
                        }
                    }}
                </div>
            </div>
        </div>
    }
}
