use leptos::prelude::*;
use leptos_router::components::*;
use leptos_router::path;

use crate::components::sidebar::Sidebar;
use crate::pages::config::ConfigPage;
use crate::pages::profile_sets::ProfileSetsPage;
use crate::pages::run_pipeline::RunPipelinePage;
use crate::pages::runs_history::RunsHistoryPage;

#[component]
pub fn App() -> impl IntoView {
    view! {
        <Router>
            <div class="app-layout">
                <Sidebar />
                <main class="content">
                    <Routes fallback=|| view! { <p>"Page not found"</p> }>
                        <Route path=path!("/") view=RunPipelinePage />
                        <Route path=path!("/profiles") view=ProfileSetsPage />
                        <Route path=path!("/runs") view=RunsHistoryPage />
                        <Route path=path!("/config") view=ConfigPage />
                    </Routes>
                </main>
            </div>
        </Router>
    }
}
