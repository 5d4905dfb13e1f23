use std::future::Future;

use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use zenin_client::model::{Band, ProfileDefinition, WaveLevel};
use zenin_client::workflow::{DeleteToken, ProfileSetEditor};
use zenin_client::HttpBackend;

use crate::api;

/// Run an async editor operation on a copy of the current state and write
/// the copy back when it finishes. Inputs are disabled while `busy` is set,
/// so nothing edits the signal in between.
fn run_on_snapshot<F, Fut>(
    editor: RwSignal<ProfileSetEditor>,
    busy: RwSignal<bool>,
    setup_error: WriteSignal<Option<String>>,
    op: F,
) where
    F: FnOnce(ProfileSetEditor, HttpBackend) -> Fut + 'static,
    Fut: Future<Output = ProfileSetEditor> + 'static,
{
    let backend = match api::backend() {
        Ok(b) => b,
        Err(e) => {
            setup_error.set(Some(e));
            return;
        }
    };
    busy.set(true);
    let snapshot = editor.get_untracked();
    spawn_local(async move {
        let updated = op(snapshot, backend).await;
        editor.set(updated);
        busy.set(false);
    });
}

#[component]
pub fn ProfileSetsPage() -> impl IntoView {
    let editor = RwSignal::new(ProfileSetEditor::new());
    let busy = RwSignal::new(false);
    let (setup_error, set_setup_error) = signal::<Option<String>>(None);
    let (new_name, set_new_name) = signal(String::new());
    let pending_delete = RwSignal::new(None::<DeleteToken>);

    Effect::new(move |_| {
        run_on_snapshot(editor, busy, set_setup_error, |mut ed, backend| async move {
            let _ = ed.load(&backend).await;
            ed
        });
    });

    let select = move |id: String| {
        pending_delete.set(None);
        run_on_snapshot(editor, busy, set_setup_error, move |mut ed, backend| async move {
            let _ = ed.select(&backend, &id).await;
            ed
        });
    };

    let on_save = move |_| {
        run_on_snapshot(editor, busy, set_setup_error, |mut ed, backend| async move {
            let _ = ed.save(&backend).await;
            ed
        });
    };

    let on_create = move |_| {
        let name = new_name.get_untracked();
        run_on_snapshot(editor, busy, set_setup_error, move |mut ed, backend| async move {
            if ed.create(&backend, &name).await.is_ok() {
                set_new_name.set(String::new());
            }
            ed
        });
    };

    let on_duplicate = move |_| {
        run_on_snapshot(editor, busy, set_setup_error, |mut ed, backend| async move {
            let _ = ed.duplicate(&backend).await;
            ed
        });
    };

    let on_request_delete = move |_| {
        let token = editor.try_update(|ed| ed.request_delete().ok()).flatten();
        pending_delete.set(token);
    };

    let on_confirm_delete = move |_| {
        let Some(token) = pending_delete.get_untracked() else {
            return;
        };
        pending_delete.set(None);
        run_on_snapshot(editor, busy, set_setup_error, move |mut ed, backend| async move {
            let _ = ed.confirm_delete(&backend, token).await;
            ed
        });
    };

    let page_error = move || setup_error.get().or_else(|| editor.with(|ed| ed.error().map(str::to_string)));
    let selected_id = move || editor.with(|ed| ed.selected_id().map(str::to_string));
    let has_current = move || editor.with(|ed| ed.current().is_some());
    let is_protected = move || editor.with(|ed| ed.current().is_some_and(|s| s.is_protected()));

    view! {
        <div class="page profile-sets-page">
            <h2>"Profile Sets"</h2>
            <p class="page-description">"Behavioural profiles matched against band levels during a run."</p>

            {move || page_error().map(|e| view! { <div class="error-banner">{e}</div> })}

            <div class="profile-toolbar">
                <input
                    type="text"
                    class="input"
                    placeholder="New profile set name"
                    prop:value=move || new_name.get()
                    on:input=move |ev| set_new_name.set(event_target_value(&ev))
                />
                <button
                    class="btn btn-primary"
                    disabled=move || busy.get() || new_name.with(|n| n.trim().is_empty())
                    on:click=on_create
                >
                    "Create"
                </button>
                <Show when=move || busy.get()>
                    <span class="status-text">"Working..."</span>
                </Show>
            </div>

            <div class="profile-layout">
                <div class="profile-list-panel">
                    {move || {
                        let current = selected_id();
                        editor.with(|ed| {
                            ed.summaries()
                                .iter()
                                .map(|s| {
                                    let id = s.id.clone();
                                    let is_selected = current.as_deref() == Some(s.id.as_str());
                                    view! {
                                        <button
                                            class="profile-list-item"
                                            class:profile-list-item-selected=is_selected
                                            disabled=move || busy.get()
                                            on:click=move |_| select(id.clone())
                                        >
                                            <div class="profile-item-name">{s.name.clone()}</div>
                                            <div class="profile-item-meta">
                                                {format!("{} · {} profiles", s.id, s.profile_count)}
                                            </div>
                                        </button>
                                    }
                                })
                                .collect::<Vec<_>>()
                        })
                    }}
                </div>

                <div class="profile-detail-panel">
                    <Show
                        when=has_current
                        fallback=|| view! { <div class="profile-detail-empty">"Select a profile set"</div> }
                    >
                        <div class="profile-set-header">
                            <div class="form-group">
                                <label>"Name"</label>
                                <input
                                    type="text"
                                    class="input"
                                    disabled=move || busy.get()
                                    prop:value=move || {
                                        editor.with(|ed| ed.current().map(|s| s.name.clone()).unwrap_or_default())
                                    }
                                    on:change=move |ev| {
                                        let value = event_target_value(&ev);
                                        editor.update(|ed| {
                                            if let Some(set) = ed.current_mut() {
                                                set.name = value;
                                            }
                                        });
                                    }
                                />
                            </div>
                            <div class="form-group">
                                <label>"Description"</label>
                                <textarea
                                    class="input"
                                    disabled=move || busy.get()
                                    prop:value=move || {
                                        editor.with(|ed| ed.current().map(|s| s.description.clone()).unwrap_or_default())
                                    }
                                    on:change=move |ev| {
                                        let value = event_target_value(&ev);
                                        editor.update(|ed| {
                                            if let Some(set) = ed.current_mut() {
                                                set.description = value;
                                            }
                                        });
                                    }
                                />
                            </div>
                            <Show when=is_protected>
                                <span class="badge">"Built-in"</span>
                            </Show>
                        </div>

                        <ProfileRowsTable editor=editor busy=busy />

                        <div class="profile-actions">
                            <button
                                class="btn btn-secondary"
                                disabled=move || busy.get()
                                on:click=move |_| {
                                    editor.update(|ed| {
                                        let _ = ed.add_profile();
                                    });
                                }
                            >
                                "Add Profile"
                            </button>
                            <button class="btn btn-primary" disabled=move || busy.get() on:click=on_save>
                                "Save"
                            </button>
                            <button class="btn btn-secondary" disabled=move || busy.get() on:click=on_duplicate>
                                "Duplicate"
                            </button>
                            <button
                                class="btn btn-danger"
                                disabled=move || busy.get() || is_protected()
                                on:click=on_request_delete
                            >
                                "Delete"
                            </button>
                        </div>

                        {move || {
                            pending_delete
                                .get()
                                .map(|token| {
                                    view! {
                                        <div class="confirm-dialog">
                                            <p>{format!("Delete profile set '{}'? This cannot be undone.", token.id())}</p>
                                            <button class="btn btn-danger" on:click=on_confirm_delete>
                                                "Delete"
                                            </button>
                                            <button class="btn btn-secondary" on:click=move |_| pending_delete.set(None)>
                                                "Cancel"
                                            </button>
                                        </div>
                                    }
                                })
                        }}
                    </Show>
                </div>
            </div>
        </div>
    }
}

/// One editable row per profile, with a level picker per band.
#[component]
fn ProfileRowsTable(editor: RwSignal<ProfileSetEditor>, busy: RwSignal<bool>) -> impl IntoView {
    let rows = move || editor.with(|ed| ed.current().map(|s| s.profiles.clone()).unwrap_or_default());

    let edit = move |index: usize, change: Box<dyn FnOnce(&mut ProfileDefinition)>| {
        editor.update(|ed| {
            let _ = ed.update_profile(index, change);
        });
    };

    view! {
        <table class="profiles-table">
            <thead>
                <tr>
                    <th>"ID"</th>
                    <th>"Display Name"</th>
                    {Band::ALL.into_iter().map(|band| view! { <th>{band.name()}</th> }).collect::<Vec<_>>()}
                    <th>"Notes"</th>
                    <th></th>
                </tr>
            </thead>
            <tbody>
                {move || {
                    rows()
                        .into_iter()
                        .enumerate()
                        .map(|(index, profile)| {
                            view! {
                                <tr>
                                    <td>
                                        <input
                                            type="text"
                                            class="input input-small"
                                            disabled=move || busy.get()
                                            prop:value=profile.id.clone()
                                            on:change=move |ev| {
                                                let value = event_target_value(&ev);
                                                edit(index, Box::new(move |p| p.id = value));
                                            }
                                        />
                                    </td>
                                    <td>
                                        <input
                                            type="text"
                                            class="input"
                                            disabled=move || busy.get()
                                            prop:value=profile.display_name.clone()
                                            on:change=move |ev| {
                                                let value = event_target_value(&ev);
                                                edit(index, Box::new(move |p| p.display_name = value));
                                            }
                                        />
                                    </td>
                                    {Band::ALL
                                        .into_iter()
                                        .map(|band| {
                                            let current = profile.level(band);
                                            view! {
                                                <td>
                                                    <select
                                                        class="select"
                                                        disabled=move || busy.get()
                                                        on:change=move |ev| {
                                                            if let Ok(level) = event_target_value(&ev).parse::<WaveLevel>() {
                                                                edit(index, Box::new(move |p| p.set_level(band, level)));
                                                            }
                                                        }
                                                    >
                                                        {WaveLevel::ALL
                                                            .into_iter()
                                                            .map(|level| {
                                                                view! {
                                                                    <option value=level.as_str() selected=level == current>
                                                                        {level.as_str()}
                                                                    </option>
                                                                }
                                                            })
                                                            .collect::<Vec<_>>()}
                                                    </select>
                                                </td>
                                            }
                                        })
                                        .collect::<Vec<_>>()}
                                    <td>
                                        <input
                                            type="text"
                                            class="input"
                                            disabled=move || busy.get()
                                            prop:value=profile.notes.clone().unwrap_or_default()
                                            on:change=move |ev| {
                                                let value = event_target_value(&ev);
                                                let notes = (!value.trim().is_empty()).then_some(value);
                                                edit(index, Box::new(move |p| p.notes = notes));
                                            }
                                        />
                                    </td>
                                    <td>
                                        <button
                                            class="btn btn-small btn-danger"
                                            disabled=move || busy.get()
                                            on:click=move |_| {
                                                editor.update(|ed| {
                                                    let _ = ed.remove_profile(index);
                                                });
                                            }
                                        >
                                            "Remove"
                                        </button>
                                    </td>
                                </tr>
                            }
                        })
                        .collect::<Vec<_>>()
                }}
            </tbody>
        </table>
    }
}
