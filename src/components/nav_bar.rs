//! Navigation Bar Component
//!
//! Links between the search and sort views without a page reload.

use leptos::prelude::*;

use crate::context::use_app_context;
use crate::router::{QueryParams, Route};

const LINKS: &[(Route, &str)] = &[(Route::Search, "Search"), (Route::Sort, "Sort")];

#[component]
pub fn NavBar(route: Memo<Route>) -> impl IntoView {
    let ctx = use_app_context();

    view! {
        <nav class="nav-bar">
            {LINKS.iter().map(|(target, label)| {
                let target = *target;
                let ctx = ctx.clone();
                let is_active = move || route.get() == target;
                view! {
                    <a
                        href=target.path()
                        class=move || if is_active() { "nav-link active" } else { "nav-link" }
                        on:click=move |ev: web_sys::MouseEvent| {
                            ev.prevent_default();
                            ctx.navigate(target, QueryParams::new());
                        }
                    >
                        {*label}
                    </a>
                }
            }).collect_view()}
        </nav>
    }
}

/// Shown for any path outside the two customer views
#[component]
pub fn NotFound() -> impl IntoView {
    view! {
        <section class="not-found">
            <h2>"Nothing here"</h2>
            <p>"Pick a view above to browse customers."</p>
        </section>
    }
}
