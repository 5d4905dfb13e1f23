use leptos::prelude::*;

use zenin_client::model::{Band, CutPoint, RunConfig, ScalarField};

/// Editor for the scalar run parameters and the per-band thresholds.
///
/// Values are applied on `change`; input that does not parse leaves the
/// config untouched and shows a message next to the field.
#[component]
pub fn RunConfigForm(
    config: RwSignal<Option<RunConfig>>,
    #[prop(optional)] disabled: Option<Signal<bool>>,
) -> impl IntoView {
    let disabled = disabled.unwrap_or_else(|| Signal::derive(|| false));

    view! {
        <section class="card run-config-form">
            <h3>"Run Configuration"</h3>
            <div class="form-grid">
                {ScalarField::ALL
                    .into_iter()
                    .map(|field| view! { <ScalarInput config=config field=field disabled=disabled /> })
                    .collect::<Vec<_>>()}
            </div>
            <BandThresholdsEditor config=config disabled=disabled />
        </section>
    }
}

#[component]
fn ScalarInput(config: RwSignal<Option<RunConfig>>, field: ScalarField, disabled: Signal<bool>) -> impl IntoView {
    let (error, set_error) = signal::<Option<String>>(None);
    let step = if field.is_integer() { "1" } else { "0.1" };

    view! {
        <div class="form-group">
            <label>{field.label()}</label>
            <input
                type="number"
                class="input"
                step=step
                disabled=move || disabled.get()
                prop:value=move || {
                    config.with(|c| c.as_ref().map(|c| c.get(field).to_string()).unwrap_or_default())
                }
                on:change=move |ev| {
                    let value = event_target_value(&ev);
                    let mut outcome = Ok(());
                    config.update(|c| {
                        if let Some(c) = c {
                            outcome = c.set_from_str(field, &value);
                        }
                    });
                    set_error.set(outcome.err().map(|e| e.to_string()));
                }
            />
            <Show when=move || error.get().is_some()>
                <span class="field-error">{move || error.get().unwrap_or_default()}</span>
            </Show>
        </div>
    }
}

/// Four cut-points per band. Bands whose cut-points are not descending are
/// flagged, but the values are still accepted.
#[component]
pub fn BandThresholdsEditor(config: RwSignal<Option<RunConfig>>, disabled: Signal<bool>) -> impl IntoView {
    let (error, set_error) = signal::<Option<String>>(None);
    let warnings = move || {
        config.with(|c| c.as_ref().map(RunConfig::threshold_warnings).unwrap_or_default())
    };

    view! {
        <div class="band-thresholds">
            <h4>"Band Thresholds"</h4>
            <table class="thresholds-table">
                <thead>
                    <tr>
                        <th>"Band"</th>
                        {CutPoint::ALL.into_iter().map(|cut| view! { <th>{cut.label()}</th> }).collect::<Vec<_>>()}
                    </tr>
                </thead>
                <tbody>
                    {Band::ALL
                        .into_iter()
                        .map(|band| {
                            view! {
                                <tr class:threshold-warning=move || warnings().contains(&band)>
                                    <td class="band-name">{band.name()}</td>
                                    {CutPoint::ALL
                                        .into_iter()
                                        .map(|cut| {
                                            view! {
                                                <td>
                                                    <input
                                                        type="number"
                                                        class="input input-small"
                                                        step="0.1"
                                                        disabled=move || disabled.get()
                                                        prop:value=move || {
                                                            config
                                                                .with(|c| {
                                                                    c.as_ref().map(|c| c.thresholds(band).get(cut).to_string())
                                                                })
                                                                .unwrap_or_default()
                                                        }
                                                        on:change=move |ev| {
                                                            let value = event_target_value(&ev);
                                                            let mut outcome = Ok(());
                                                            config.update(|c| {
                                                                if let Some(c) = c {
                                                                    outcome = c.set_threshold_from_str(band, cut, &value);
                                                                }
                                                            });
                                                            set_error.set(outcome.err().map(|e| format!("{} {}: {}", band, cut.label(), e)));
                                                        }
                                                    />
                                                </td>
                                            }
                                        })
                                        .collect::<Vec<_>>()}
                                </tr>
                            }
                        })
                        .collect::<Vec<_>>()}
                </tbody>
            </table>
            <Show when=move || error.get().is_some()>
                <p class="field-error">{move || error.get().unwrap_or_default()}</p>
            </Show>
            <Show when=move || !warnings().is_empty()>
                <p class="warning-text">
                    {move || {
                        let names: Vec<&str> = warnings().into_iter().map(Band::name).collect();
                        format!(
                            "Thresholds are usually descending (Yüksek ≥ Yüksek-Orta ≥ Orta ≥ Düşük-Orta). Check: {}",
                            names.join(", ")
                        )
                    }}
                </p>
            </Show>
        </div>
    }
}
