//! Search View Component
//!
//! Text input bound to the `q` query parameter, with matching customers below.

use futures::StreamExt;
use leptos::prelude::*;

use super::{bind_pipeline, spawn_scoped, CustomerList, CustomerTable};
use crate::context::use_app_context;
use crate::pipeline::{Debounce, ParamsSource, QueryPipeline};
use crate::query::{search_params, SearchQuery};
use crate::router::Route;

/// Customer search by partial first or last name
#[component]
pub fn SearchView() -> impl IntoView {
    let ctx = use_app_context();
    let source = ctx.params_for(Route::Search);

    let (term, set_term) = signal(SearchQuery::from_params(&source.snapshot()).to_string());
    let (list, set_list) = signal(CustomerList::Loading);

    match ctx.client() {
        Some(client) => {
            let pipeline = QueryPipeline::new(
                &source,
                SearchQuery::from_params,
                move |query: &SearchQuery| client.search_by_name(query),
                Debounce::browser(ctx.config.debounce()),
            );
            set_term.set(pipeline.current_key().to_string());
            bind_pipeline("search", pipeline, set_list);
        }
        None => set_list.set(CustomerList::Failed("customer service is not configured".to_string())),
    }

    // Back/forward navigation changes `q` without touching the input
    let mut changes = source.changes();
    spawn_scoped("search input", async move {
        while let Some(params) = changes.next().await {
            let from_url = SearchQuery::from_params(&params).to_string();
            if term.get_untracked() != from_url {
                set_term.set(from_url);
            }
        }
    });

    let input_ctx = ctx.clone();
    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        ctx.navigate(Route::Search, search_params(&term.get_untracked()));
    };

    view! {
        <section class="search-view">
            <h2>"Search Customers"</h2>
            <form class="search-form" on:submit=on_submit>
                <input
                    type="search"
                    placeholder="Partial first or last name..."
                    autocomplete="off"
                    prop:value=move || term.get()
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        set_term.set(value.clone());
                        input_ctx.navigate(Route::Search, search_params(&value));
                    }
                />
                <button type="submit">"Search"</button>
            </form>
            <CustomerTable list=list />
        </section>
    }
}
