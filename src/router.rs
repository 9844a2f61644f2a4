//! Client-side Router
//!
//! Maps browser locations to views and publishes query parameter changes.
//! The URL is the single source of truth for view state: views write it
//! through `Router::navigate` and observe it through `ParamsSource`.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::stream::{LocalBoxStream, StreamExt};
use reqwest::Url;

use crate::pipeline::ParamsSource;

/// Query parameters of the current location, first value wins on repeated keys
pub type QueryParams = BTreeMap<String, String>;

const SEARCH_ROUTE: &str = "/customers/search";
const SORT_ROUTE: &str = "/customers/sort";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Search,
    Sort,
    NotFound,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Search => SEARCH_ROUTE,
            Route::Sort => SORT_ROUTE,
            Route::NotFound => "/",
        }
    }

    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim_matches('/');
        if trimmed == SEARCH_ROUTE.trim_start_matches('/') {
            Route::Search
        } else if trimmed == SORT_ROUTE.trim_start_matches('/') {
            Route::Sort
        } else {
            Route::NotFound
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub route: Route,
    pub params: QueryParams,
}

impl Location {
    pub fn new(route: Route, params: QueryParams) -> Self {
        Self { route, params }
    }

    /// Parse an absolute URL or a `path?query` string
    pub fn parse(href: &str) -> Self {
        let url = match Url::parse(href) {
            Ok(url) => url,
            Err(_) => match local_base().and_then(|base| base.join(href).ok()) {
                Some(url) => url,
                None => return Self::new(Route::NotFound, QueryParams::new()),
            },
        };

        let mut params = QueryParams::new();
        for (key, value) in url.query_pairs() {
            params.entry(key.into_owned()).or_insert_with(|| value.into_owned());
        }
        Self::new(Route::from_path(url.path()), params)
    }

    /// Render as `path?query`, omitting the `?` when there are no params
    pub fn href(&self) -> String {
        let path = self.route.path();
        if self.params.is_empty() {
            return path.to_string();
        }
        match local_base() {
            Some(mut url) => {
                url.set_path(path);
                url.query_pairs_mut().extend_pairs(self.params.iter());
                match url.query() {
                    Some(query) => format!("{}?{}", url.path(), query),
                    None => url.path().to_string(),
                }
            }
            None => path.to_string(),
        }
    }
}

fn local_base() -> Option<Url> {
    Url::parse("http://localhost/").ok()
}

/// Backing store for navigation entries
pub trait History: Send + Sync {
    /// Current `path?query`
    fn current(&self) -> String;
    fn push(&self, href: &str);
}

/// `window.history` of the hosting page
pub struct BrowserHistory;

impl History for BrowserHistory {
    fn current(&self) -> String {
        web_sys::window()
            .map(|win| win.location())
            .map(|loc| {
                let path = loc.pathname().unwrap_or_default();
                let search = loc.search().unwrap_or_default();
                format!("{path}{search}")
            })
            .unwrap_or_else(|| "/".to_string())
    }

    fn push(&self, href: &str) {
        let Some(history) = web_sys::window().and_then(|win| win.history().ok()) else {
            log::warn!("[ROUTER] no window.history, dropping navigation to {href}");
            return;
        };
        if let Err(err) = history.push_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(href)) {
            log::warn!("[ROUTER] pushState failed for {href}: {err:?}");
        }
    }
}

/// In-memory history for non-browser hosts
#[derive(Default)]
pub struct MemoryHistory {
    entries: Mutex<Vec<String>>,
}

impl MemoryHistory {
    pub fn starting_at(href: &str) -> Self {
        Self {
            entries: Mutex::new(vec![href.to_string()]),
        }
    }
}

impl History for MemoryHistory {
    fn current(&self) -> String {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
            .unwrap_or_else(|| "/".to_string())
    }

    fn push(&self, href: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(href.to_string());
    }
}

struct RouterState {
    location: Location,
    subscribers: Vec<UnboundedSender<Location>>,
}

/// Shared navigation handle; clones observe the same location
#[derive(Clone)]
pub struct Router {
    history: Arc<dyn History>,
    state: Arc<Mutex<RouterState>>,
}

impl Router {
    pub fn new(history: impl History + 'static) -> Self {
        let location = Location::parse(&history.current());
        Self {
            history: Arc::new(history),
            state: Arc::new(Mutex::new(RouterState {
                location,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Router over `window.history`, following back/forward navigation
    pub fn browser() -> Self {
        if web_sys::window().is_none() {
            log::warn!("[ROUTER] no window, keeping history in memory");
            return Self::new(MemoryHistory::starting_at(Route::Search.path()));
        }
        let router = Self::new(BrowserHistory);
        router.listen_popstate();
        router
    }

    pub fn location(&self) -> Location {
        self.lock().location.clone()
    }

    pub fn navigate(&self, route: Route, params: QueryParams) {
        let location = Location::new(route, params);
        let href = location.href();
        log::debug!("[ROUTER] navigate {href}");
        self.history.push(&href);
        self.publish(location);
    }

    /// Every location published after this call, including repeats
    pub fn subscribe(&self) -> UnboundedReceiver<Location> {
        let (tx, rx) = mpsc::unbounded();
        self.lock().subscribers.push(tx);
        rx
    }

    /// Parameter feed scoped to one route
    pub fn params_for(&self, route: Route) -> RouteParams {
        RouteParams {
            router: self.clone(),
            route,
        }
    }

    /// Re-read the history after the browser moved without us
    pub fn sync_from_history(&self) {
        self.publish(Location::parse(&self.history.current()));
    }

    fn publish(&self, location: Location) {
        let mut state = self.lock();
        state.location = location.clone();
        state
            .subscribers
            .retain(|tx| tx.unbounded_send(location.clone()).is_ok());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RouterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn listen_popstate(&self) {
        use wasm_bindgen::closure::Closure;
        use wasm_bindgen::JsCast;

        let router = self.clone();
        let on_popstate = Closure::<dyn FnMut(web_sys::PopStateEvent)>::new(move |_ev: web_sys::PopStateEvent| {
            router.sync_from_history();
        });

        if let Some(win) = web_sys::window() {
            let _ = win.add_event_listener_with_callback("popstate", on_popstate.as_ref().unchecked_ref());
        }
        on_popstate.forget();
    }
}

/// `ParamsSource` reading the router, limited to locations on `route`
#[derive(Clone)]
pub struct RouteParams {
    router: Router,
    route: Route,
}

impl ParamsSource for RouteParams {
    fn snapshot(&self) -> QueryParams {
        let location = self.router.location();
        if location.route == self.route {
            location.params
        } else {
            QueryParams::new()
        }
    }

    fn changes(&self) -> LocalBoxStream<'static, QueryParams> {
        let route = self.route;
        self.router
            .subscribe()
            .filter_map(move |location| {
                futures::future::ready((location.route == route).then_some(location.params))
            })
            .boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_route_from_path() {
        assert_eq!(Route::from_path("/customers/search"), Route::Search);
        assert_eq!(Route::from_path("customers/sort/"), Route::Sort);
        assert_eq!(Route::from_path("/"), Route::NotFound);
        assert_eq!(Route::from_path("/customers"), Route::NotFound);
    }

    #[test]
    fn test_parse_location() {
        let loc = Location::parse("/customers/sort?sortBy=lastName&sortDirection=desc");
        assert_eq!(loc.route, Route::Sort);
        assert_eq!(loc.params, params(&[("sortBy", "lastName"), ("sortDirection", "desc")]));

        let loc = Location::parse("http://example.com/customers/search?q=ick&q=other");
        assert_eq!(loc.route, Route::Search);
        assert_eq!(loc.params.get("q").map(String::as_str), Some("ick"));
    }

    #[test]
    fn test_href_encodes_params() {
        let loc = Location::new(Route::Search, params(&[("q", "o'neil & co")]));
        let href = loc.href();
        assert_eq!(href, "/customers/search?q=o%27neil+%26+co");
        assert_eq!(Location::parse(&href), loc);

        assert_eq!(Location::new(Route::Sort, QueryParams::new()).href(), "/customers/sort");
    }

    #[test]
    fn test_navigate_pushes_and_publishes() {
        let router = Router::new(MemoryHistory::starting_at("/customers/search"));
        let mut changes = router.subscribe();

        router.navigate(Route::Search, params(&[("q", "ick")]));
        router.navigate(Route::Search, params(&[("q", "ick")]));

        let first = block_on(changes.next()).unwrap();
        let second = block_on(changes.next()).unwrap();
        assert_eq!(first, second);
        assert_eq!(router.location().params.get("q").map(String::as_str), Some("ick"));
    }

    #[test]
    fn test_route_params_filter_other_routes() {
        let router = Router::new(MemoryHistory::starting_at("/customers/sort?sortBy=lastName"));
        let search = router.params_for(Route::Search);
        let sort = router.params_for(Route::Sort);

        assert!(search.snapshot().is_empty());
        assert_eq!(sort.snapshot(), params(&[("sortBy", "lastName")]));

        let mut feed = search.changes();
        router.navigate(Route::Sort, params(&[("sortBy", "firstName")]));
        router.navigate(Route::Search, params(&[("q", "rick")]));

        assert_eq!(block_on(feed.next()), Some(params(&[("q", "rick")])));
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let router = Router::new(MemoryHistory::default());
        drop(router.subscribe());
        router.navigate(Route::Sort, QueryParams::new());
        assert!(router.lock().subscribers.is_empty());
    }

    #[test]
    fn test_sync_from_history() {
        let history = Arc::new(MemoryHistory::starting_at("/customers/search?q=a"));
        let router = Router::new(SharedHistory(history.clone()));
        history.push("/customers/search?q=b");
        router.sync_from_history();
        assert_eq!(router.location().params.get("q").map(String::as_str), Some("b"));
    }

    struct SharedHistory(Arc<MemoryHistory>);

    impl History for SharedHistory {
        fn current(&self) -> String {
            self.0.current()
        }

        fn push(&self, href: &str) {
            self.0.push(href)
        }
    }
}
