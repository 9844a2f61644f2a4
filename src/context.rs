//! Application Context
//!
//! Shared handles provided via Leptos Context API.

use leptos::prelude::*;

use crate::api::CustomerClient;
use crate::config::ApiConfig;
use crate::router::{QueryParams, Route, RouteParams, Router};

/// App-wide handles provided via context
#[derive(Clone)]
pub struct AppContext {
    /// Navigation and query parameter source
    router: Router,
    /// Customer service settings
    pub config: ApiConfig,
}

impl AppContext {
    pub fn new(router: Router, config: ApiConfig) -> Self {
        Self { router, config }
    }

    /// Write the URL; views never mutate their own state directly
    pub fn navigate(&self, route: Route, params: QueryParams) {
        self.router.navigate(route, params);
    }

    pub fn params_for(&self, route: Route) -> RouteParams {
        self.router.params_for(route)
    }

    /// A client built from the shared configuration
    pub fn client(&self) -> Option<CustomerClient> {
        CustomerClient::new(&self.config)
            .map_err(|e| log::error!("[CONTEXT] cannot build customer client: {e}"))
            .ok()
    }
}

pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}
