//! Sort View Component
//!
//! Option list bound to the `sortBy` / `sortDirection` query parameters.

use futures::StreamExt;
use leptos::prelude::*;

use super::{bind_pipeline, spawn_scoped, CustomerList, CustomerTable};
use crate::context::use_app_context;
use crate::pipeline::{Debounce, ParamsSource, QueryPipeline};
use crate::query::{parse_query_params, sort_params, SortOption, SORT_OPTIONS};
use crate::router::Route;

/// First page of customers in the selected order
#[component]
pub fn SortView() -> impl IntoView {
    let ctx = use_app_context();
    let source = ctx.params_for(Route::Sort);
    let options: Vec<SortOption> = SORT_OPTIONS.to_vec();

    let (selected, set_selected) = signal(parse_query_params(&source.snapshot()));
    let (list, set_list) = signal(CustomerList::Loading);

    match ctx.client() {
        Some(client) => {
            let page_size = client.config().default_limit;
            let pipeline = QueryPipeline::new(
                &source,
                parse_query_params,
                move |option: &SortOption| client.fetch_sorted(page_size, option.field, option.direction),
                Debounce::browser(ctx.config.debounce()),
            );
            set_selected.set(*pipeline.current_key());
            bind_pipeline("sort", pipeline, set_list);
        }
        None => set_list.set(CustomerList::Failed("customer service is not configured".to_string())),
    }

    let mut changes = source.changes();
    spawn_scoped("sort selection", async move {
        while let Some(params) = changes.next().await {
            let from_url = parse_query_params(&params);
            if selected.get_untracked() != from_url {
                set_selected.set(from_url);
            }
        }
    });

    let select_ctx = ctx.clone();
    let on_select = move |option: Option<SortOption>| {
        select_ctx.navigate(Route::Sort, sort_params(option));
    };
    let on_change_select = on_select.clone();

    view! {
        <section class="sort-view">
            <h2>"Sort Customers"</h2>
            <div class="sort-controls">
                <select on:change=move |ev| {
                    on_change_select(Some(SortOption::from_label(&event_target_value(&ev))))
                }>
                    {options.into_iter().map(|option| {
                        view! {
                            <option
                                value=option.label
                                prop:selected=move || selected.get() == option
                            >
                                {option.label}
                            </option>
                        }
                    }).collect_view()}
                </select>
                <button type="button" on:click=move |_| on_select(None)>"Reset"</button>
            </div>
            <CustomerTable list=list />
        </section>
    }
}
