use leptos::prelude::*;

use zenin_client::workflow::ResultView;

use crate::api;

/// Thumbnails of the generated plots. The first `max_preview` are shown
/// until `on_expand` marks the view as expanded.
#[component]
pub fn PlotGallery(results: Signal<ResultView>, max_preview: usize, on_expand: Callback<()>) -> impl IntoView {
    let base = api::api_base().ok();

    let content = move || {
        results.with(|v| {
            let Some(run_id) = v.run_id() else {
                return view! { <p class="gallery-empty">"No run selected"</p> }.into_any();
            };
            if v.plots_loading() {
                return view! { <p class="gallery-loading">"Loading plots..."</p> }.into_any();
            }
            if let Some(err) = v.plots_error() {
                return view! { <p class="error-text">{err.to_string()}</p> }.into_any();
            }
            if v.plots().is_empty() {
                return view! { <p class="gallery-empty">"No plots generated"</p> }.into_any();
            }

            let gallery = v.gallery(max_preview);
            let hidden = gallery.hidden;
            let items = gallery
                .shown
                .iter()
                .map(|name| {
                    let src = base
                        .as_ref()
                        .map(|b| b.plot_url(run_id, name).to_string())
                        .unwrap_or_default();
                    let title = name.clone();
                    view! {
                        <a class="plot-item" href=src.clone() target="_blank">
                            <img src=src.clone() alt=title.clone() loading="lazy" />
                            <span class="plot-name">{title}</span>
                        </a>
                    }
                })
                .collect::<Vec<_>>();

            view! {
                <div class="plot-grid">{items}</div>
                <Show when=move || { hidden > 0 }>
                    <button class="btn btn-small btn-secondary" on:click=move |_| on_expand.run(())>
                        {format!("Show all ({} more)", hidden)}
                    </button>
                </Show>
            }
            .into_any()
        })
    };

    view! {
        <section class="card plot-gallery">
            <h3>
                "Plots "
                {move || results.with(|v| (!v.plots().is_empty()).then(|| format!("({})", v.plots().len())))}
            </h3>
            {content}
        </section>
    }
}
