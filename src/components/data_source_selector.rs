use leptos::html::Input;
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use zenin_client::data_source::{
    format_size, resolve_folder, resolve_single, DataSourcePayload, DEFAULT_EXTENSION, DEFAULT_PREVIEW_LIMIT,
};

use crate::api;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceTab {
    Folder,
    Upload,
}

/// Folder or single-file selection. Writes the resolved payload, or `None`
/// when nothing usable was picked.
#[component]
pub fn DataSourceSelector(
    payload: RwSignal<Option<DataSourcePayload>>,
    #[prop(optional)] disabled: Option<Signal<bool>>,
) -> impl IntoView {
    let disabled = disabled.unwrap_or_else(|| Signal::derive(|| false));
    let (tab, set_tab) = signal(SourceTab::Folder);
    let (is_reading, set_is_reading) = signal(false);
    let (is_over, set_is_over) = signal(false);
    let (error, set_error) = signal::<Option<String>>(None);
    let folder_input = NodeRef::<Input>::new();

    // Directory pickers are not expressible as a typed attribute.
    Effect::new(move |_| {
        if let Some(input) = folder_input.get() {
            let _ = input.set_attribute("webkitdirectory", "");
        }
    });

    let select_tab = move |next: SourceTab| {
        set_tab.set(next);
        set_error.set(None);
        payload.set(None);
    };

    let on_folder_change = move |ev: web_sys::Event| {
        let input: web_sys::HtmlInputElement = event_target(&ev);
        let Some(files) = input.files() else {
            return;
        };
        set_is_reading.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::read_files(files, Some(DEFAULT_EXTENSION)).await {
                Ok(files) => {
                    let resolved = resolve_folder(files, DEFAULT_EXTENSION);
                    if resolved.is_none() {
                        set_error.set(Some("No CSV files found in the selected folder".to_string()));
                    }
                    payload.set(resolved);
                }
                Err(e) => {
                    set_error.set(Some(e));
                    payload.set(None);
                }
            }
            set_is_reading.set(false);
        });
    };

    let take_single = move |files: Option<web_sys::FileList>| {
        let Some(files) = files.filter(|f| f.length() > 0) else {
            payload.set(None);
            return;
        };
        set_is_reading.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::read_files(files, None).await {
                Ok(files) => payload.set(resolve_single(files.into_iter().next())),
                Err(e) => {
                    set_error.set(Some(e));
                    payload.set(None);
                }
            }
            set_is_reading.set(false);
        });
    };

    let on_file_change = move |ev: web_sys::Event| {
        let input: web_sys::HtmlInputElement = event_target(&ev);
        take_single(input.files());
    };

    let on_drop = move |ev: web_sys::DragEvent| {
        ev.prevent_default();
        set_is_over.set(false);
        if !disabled.get_untracked() {
            take_single(ev.data_transfer().and_then(|dt| dt.files()));
        }
    };

    let summary = move || payload.with(|p| p.as_ref().map(|p| (p.describe(), p.summary(DEFAULT_PREVIEW_LIMIT))));

    view! {
        <section class="card data-source-selector">
            <h3>"Data Source"</h3>
            <p class="section-description">"Choose where to load your EEG data from"</p>

            <div class="tab-row">
                <button
                    class="btn btn-tab"
                    class:btn-tab-active=move || tab.get() == SourceTab::Folder
                    disabled=move || disabled.get()
                    on:click=move |_| select_tab(SourceTab::Folder)
                >
                    "Process Folder"
                </button>
                <button
                    class="btn btn-tab"
                    class:btn-tab-active=move || tab.get() == SourceTab::Upload
                    disabled=move || disabled.get()
                    on:click=move |_| select_tab(SourceTab::Upload)
                >
                    "Upload CSV"
                </button>
            </div>

            <div class="source-picker" class:hidden=move || tab.get() != SourceTab::Folder>
                <label for="folder-upload" class="btn btn-secondary">"Select Folder"</label>
                <input
                    type="file"
                    id="folder-upload"
                    node_ref=folder_input
                    multiple=true
                    style="display: none"
                    disabled=move || disabled.get()
                    on:change=on_folder_change
                />
                <p class="input-hint">"Only .csv files in the folder are submitted"</p>
            </div>

            <div
                class="drop-zone source-picker"
                class:hidden=move || tab.get() != SourceTab::Upload
                class:drop-zone-active=move || is_over.get()
                on:dragover=move |ev: web_sys::DragEvent| {
                    ev.prevent_default();
                    set_is_over.set(true);
                }
                on:dragleave=move |_| set_is_over.set(false)
                on:drop=on_drop
            >
                <p class="drop-main">"Drop a CSV recording here"</p>
                <p class="drop-hint">"or"</p>
                <label for="single-upload" class="btn btn-secondary">"Browse Files"</label>
                <input
                    type="file"
                    id="single-upload"
                    accept=".csv"
                    style="display: none"
                    disabled=move || disabled.get()
                    on:change=on_file_change
                />
            </div>

            <Show when=move || is_reading.get()>
                <p class="status-text">"Reading files..."</p>
            </Show>
            <Show when=move || error.get().is_some()>
                <p class="error-text">{move || error.get().unwrap_or_default()}</p>
            </Show>

            {move || {
                summary()
                    .map(|(description, summary)| {
                        let more = summary.more_label();
                        view! {
                            <div class="selection-summary">
                                <p class="selection-title">
                                    {description} " · " {format_size(summary.total_bytes)}
                                </p>
                                <ul class="selection-preview">
                                    {summary
                                        .preview
                                        .into_iter()
                                        .map(|name| view! { <li>{name}</li> })
                                        .collect::<Vec<_>>()}
                                    {more.map(|label| view! { <li class="selection-more">{label}</li> })}
                                </ul>
                            </div>
                        }
                    })
            }}
        </section>
    }
}
