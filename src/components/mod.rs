//! UI Components
//!
//! Leptos components for the customer views.

mod customer_list;
mod customer_table;
mod nav_bar;
mod search_view;
mod sort_view;

pub use customer_list::{bind_pipeline, spawn_scoped, CustomerList};
pub use customer_table::CustomerTable;
pub use nav_bar::{NavBar, NotFound};
pub use search_view::SearchView;
pub use sort_view::SortView;
