use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use zenin_client::model::RunConfig;
use zenin_client::Backend;

use crate::api;
use crate::components::run_config_form::RunConfigForm;

#[component]
pub fn ConfigPage() -> impl IntoView {
    let config = RwSignal::new(None::<RunConfig>);
    let (is_loading, set_is_loading) = signal(false);
    let (error, set_error) = signal::<Option<String>>(None);

    let load_defaults = move || {
        set_is_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::backend() {
                Ok(backend) => match backend.default_config().await {
                    Ok(defaults) => config.set(Some(defaults)),
                    Err(e) => set_error.set(Some(e.user_message("Failed to load configuration"))),
                },
                Err(e) => set_error.set(Some(e)),
            }
            set_is_loading.set(false);
        });
    };

    Effect::new(move |_| {
        load_defaults();
    });

    let preview = move || {
        config.with(|c| {
            c.as_ref()
                .map(|c| c.to_json().unwrap_or_else(|e| format!("Invalid configuration: {}", e)))
        })
    };

    view! {
        <div class="page config-page">
            <h2>"Configuration"</h2>
            <p class="page-description">
                "Backend defaults for a run. Changes here are for inspection only and are not saved."
            </p>

            <Show when=move || error.get().is_some()>
                <div class="error-banner">{move || error.get().unwrap_or_default()}</div>
            </Show>

            <Show
                when=move || config.with(Option::is_some)
                fallback=move || {
                    view! {
                        <p class="loading-text">
                            {move || if is_loading.get() { "Loading configuration..." } else { "No configuration loaded" }}
                        </p>
                    }
                }
            >
                <RunConfigForm config=config />
                <div class="config-actions">
                    <button
                        class="btn btn-secondary"
                        disabled=move || is_loading.get()
                        on:click=move |_| load_defaults()
                    >
                        "Reset to defaults"
                    </button>
                </div>
                <section class="card">
                    <h3>"Request Preview"</h3>
                    <pre class="json-preview">{preview}</pre>
                </section>
            </Show>
        </div>
    }
}
