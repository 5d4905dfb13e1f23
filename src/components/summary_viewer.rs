use leptos::prelude::*;

use zenin_client::workflow::ResultView;

/// Tabbed table view of the run's spreadsheet summary.
#[component]
pub fn SummaryViewer(results: Signal<ResultView>, on_select_sheet: Callback<String>) -> impl IntoView {
    let body = move || {
        results.with(|v| {
            if !v.result().is_some_and(|r| r.has_summary()) {
                return view! { <p class="summary-empty">"This run produced no summary"</p> }.into_any();
            }
            if v.summary_loading() {
                return view! { <p class="summary-loading">"Loading summary..."</p> }.into_any();
            }
            if let Some(err) = v.summary_error() {
                return view! { <p class="error-text">{err.to_string()}</p> }.into_any();
            }
            let Some(summary) = v.summary() else {
                return view! { <p class="summary-empty">"No summary data"</p> }.into_any();
            };

            let active = v.active_sheet_name().map(str::to_string);
            let tabs = summary
                .sheet_names()
                .map(|name| {
                    let name = name.to_string();
                    let is_active = active.as_deref() == Some(name.as_str());
                    let target = name.clone();
                    view! {
                        <button
                            class="btn btn-tab"
                            class:btn-tab-active=is_active
                            on:click=move |_| on_select_sheet.run(target.clone())
                        >
                            {name}
                        </button>
                    }
                })
                .collect::<Vec<_>>();

            let columns = v.columns();
            let table = if columns.is_empty() {
                view! { <p class="summary-empty">"This sheet is empty"</p> }.into_any()
            } else {
                let header = columns
                    .iter()
                    .map(|c| view! { <th>{c.clone()}</th> })
                    .collect::<Vec<_>>();
                let rows = v
                    .active_rows()
                    .iter()
                    .map(|row| {
                        let cells = columns
                            .iter()
                            .map(|c| view! { <td>{row.display(c)}</td> })
                            .collect::<Vec<_>>();
                        view! { <tr>{cells}</tr> }
                    })
                    .collect::<Vec<_>>();
                view! {
                    <div class="table-scroll">
                        <table class="summary-table">
                            <thead><tr>{header}</tr></thead>
                            <tbody>{rows}</tbody>
                        </table>
                    </div>
                }
                .into_any()
            };

            view! {
                <div class="tab-row">{tabs}</div>
                {table}
            }
            .into_any()
        })
    };

    view! {
        <section class="card summary-viewer">
            <h3>"Profile Summary"</h3>
            {body}
        </section>
    }
}
