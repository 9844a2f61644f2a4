//! Customer Filter Frontend App
//!
//! Root component: navigation bar plus whichever view the URL selects.

use futures::StreamExt;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::{NavBar, NotFound, SearchView, SortView};
use crate::config::ApiConfig;
use crate::context::AppContext;
use crate::router::{Route, Router};

#[component]
pub fn App(router: Router, config: ApiConfig) -> impl IntoView {
    let (location, set_location) = signal(router.location());
    // Only a route change swaps views; param changes flow through each view's pipeline
    let route = Memo::new(move |_| location.get().route);

    provide_context(AppContext::new(router.clone(), config));

    // Follow navigation for the lifetime of the app
    let mut changes = router.subscribe();
    spawn_local(async move {
        while let Some(next) = changes.next().await {
            set_location.set(next);
        }
    });

    view! {
        <div class="app-layout">
            <NavBar route=route />

            <main class="main-content">
                <h1>"Customers"</h1>
                {move || match route.get() {
                    Route::Search => view! { <SearchView /> }.into_any(),
                    Route::Sort => view! { <SortView /> }.into_any(),
                    Route::NotFound => view! { <NotFound /> }.into_any(),
                }}
            </main>
        </div>
    }
}
