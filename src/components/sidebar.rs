use leptos::prelude::*;

#[component]
pub fn Sidebar() -> impl IntoView {
    view! {
        <nav class="sidebar">
            <div class="sidebar-header">
                <h1 class="sidebar-title">"Zenin"</h1>
                <p class="sidebar-subtitle">"EEG Profile Analysis"</p>
            </div>
            <ul class="nav-list">
                <li class="nav-item">
                    <a href="/" class="nav-link">"Run Pipeline"</a>
                </li>
                <li class="nav-item">
                    <a href="/profiles" class="nav-link">"Profile Sets"</a>
                </li>
                <li class="nav-item">
                    <a href="/runs" class="nav-link">"History"</a>
                </li>
                <li class="nav-item">
                    <a href="/config" class="nav-link">"Configuration"</a>
                </li>
            </ul>
        </nav>
    }
}
