//! Customer Filter Frontend Entry Point

mod api;
mod app;
mod components;
mod config;
mod context;
mod models;
mod pipeline;
mod query;
mod router;

use app::App;
use config::ApiConfig;
use leptos::prelude::*;
use router::Router;

fn main() {
    console_error_panic_hook::set_once();
    if rolling_logger::init(log::LevelFilter::Debug, rolling_logger::DEFAULT_CAPACITY).is_err() {
        web_sys::console::warn_1(&"[MAIN] logger already installed".into());
    }

    let config = ApiConfig::from_build_env().unwrap_or_else(|e| {
        log::error!("[MAIN] invalid build configuration, using defaults: {e}");
        ApiConfig::default()
    });
    let router = Router::browser();
    log::info!("[MAIN] starting at {} against {}", router.location().href(), config.base_uri);

    mount_to_body(move || view! { <App router=router config=config /> });
}
