use leptos::prelude::*;

use zenin_client::model::{ProfileSetSummary, RunConfig};

/// Picks the profile set a run classifies against.
#[component]
pub fn ProfileSetSelector(
    profile_sets: ReadSignal<Vec<ProfileSetSummary>>,
    config: RwSignal<Option<RunConfig>>,
    #[prop(optional)] disabled: Option<Signal<bool>>,
) -> impl IntoView {
    let disabled = disabled.unwrap_or_else(|| Signal::derive(|| false));
    let selected = move || config.with(|c| c.as_ref().map(|c| c.profile_set_id.clone()).unwrap_or_default());

    view! {
        <section class="card profile-set-selector">
            <h3>"Profile Set"</h3>
            <select
                class="input"
                disabled=move || disabled.get()
                prop:value=selected
                on:change=move |ev| {
                    let id = event_target_value(&ev);
                    config.update(|c| {
                        if let Some(c) = c {
                            c.profile_set_id = id;
                        }
                    });
                }
            >
                {move || {
                    profile_sets
                        .get()
                        .into_iter()
                        .map(|set| {
                            let id = set.id.clone();
                            let is_selected = id == selected();
                            view! {
                                <option value=id selected=is_selected>
                                    {format!("{} ({} profiles)", set.name, set.profile_count)}
                                </option>
                            }
                        })
                        .collect::<Vec<_>>()
                }}
            </select>
            {move || {
                let id = selected();
                profile_sets
                    .get()
                    .into_iter()
                    .find(|s| s.id == id)
                    .filter(|s| !s.description.is_empty())
                    .map(|s| view! { <p class="section-description">{s.description}</p> })
            }}
        </section>
    }
}
