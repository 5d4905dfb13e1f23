//! Glue between the pages and the client library: backend construction,
//! browser file reading, and artifact loading into page state.

use js_sys::{ArrayBuffer, Uint8Array};
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};

use zenin_client::data_source::has_extension;
use zenin_client::workflow::ResultView;
use zenin_client::{ApiBase, Backend, HttpBackend, SelectedFile};

/// Development builds talk to the local backend, release builds to the
/// origin that served the page.
pub fn api_base() -> Result<ApiBase, String> {
    let origin = web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default();
    ApiBase::resolve(cfg!(debug_assertions), &origin).map_err(String::from)
}

pub fn backend() -> Result<HttpBackend, String> {
    api_base().map(HttpBackend::new)
}

async fn read_file(file: web_sys::File) -> Result<SelectedFile, String> {
    let array_buffer: ArrayBuffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("Failed to read file: {:?}", e))?
        .dyn_into()
        .map_err(|_| "Failed to convert to ArrayBuffer".to_string())?;

    Ok(SelectedFile::new(file.name(), Uint8Array::new(&array_buffer).to_vec()))
}

/// Read the files of a picker, in selection order. With `extension`, other
/// files are skipped without reading their contents.
pub async fn read_files(files: web_sys::FileList, extension: Option<&str>) -> Result<Vec<SelectedFile>, String> {
    let mut selected = Vec::new();
    for index in 0..files.length() {
        let Some(file) = files.get(index) else {
            continue;
        };
        if extension.is_some_and(|ext| !has_extension(&file.name(), ext)) {
            continue;
        }
        selected.push(read_file(file).await?);
    }
    Ok(selected)
}

/// Fetch plots, then the summary, for whatever run `state` currently shows.
/// Responses for a run that is no longer shown are dropped by the view.
pub fn load_artifacts<S>(state: RwSignal<S>, view: fn(&mut S) -> &mut ResultView)
where
    S: Send + Sync + 'static,
{
    spawn_local(async move {
        let backend = match backend() {
            Ok(b) => b,
            Err(e) => {
                web_sys::console::error_1(&e.into());
                return;
            }
        };

        if let Some(run_id) = state.try_update(|s| view(s).begin_plots()).flatten() {
            let outcome = backend.list_plots(&run_id).await;
            state.update(|s| view(s).apply_plots(&run_id, outcome));
        }

        if let Some(run_id) = state.try_update(|s| view(s).begin_summary()).flatten() {
            let outcome = backend.summary_data(&run_id).await;
            state.update(|s| view(s).apply_summary(&run_id, outcome));
        }
    });
}
