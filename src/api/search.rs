//! Search Endpoint
//!
//! Customers whose first or last name contains a partial name.

use std::future::Future;

use reqwest::Url;

use super::{get_customers, ApiError, CustomerClient, SEARCH_PATH};
use crate::models::Customer;
use crate::query::SearchQuery;

impl CustomerClient {
    /// `GET {base}/customers/search[/{partial}]?limit={default_limit}`
    pub fn search_url(&self, query: &SearchQuery) -> Url {
        let mut url = self.endpoint(SEARCH_PATH, query.term());
        url.query_pairs_mut()
            .append_pair("limit", &self.config.default_limit.to_string());
        url
    }

    /// Search by partial name; no filter returns the first customers overall
    pub fn search_by_name(
        &self,
        query: &SearchQuery,
    ) -> impl Future<Output = Result<Vec<Customer>, ApiError>> + 'static {
        let url = self.search_url(query);
        let request = self.http.get(url.clone());
        get_customers(request, url)
    }
}
