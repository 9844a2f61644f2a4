//! Sort Endpoint
//!
//! The first N customers ordered by one field.

use std::future::Future;

use reqwest::Url;

use super::{get_customers, ApiError, CustomerClient, SORT_PATH};
use crate::models::Customer;
use crate::query::{SortDirection, SortField};

impl CustomerClient {
    /// `GET {base}/customers?limit={n}&sortBy={field}&sortDirection={dir}`, `n` clamped
    pub fn sort_url(&self, n: u32, field: SortField, direction: SortDirection) -> Url {
        let limit = self.config.clamp_page_size(n);
        let mut url = self.endpoint(SORT_PATH, None);
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("sortBy", field.as_str())
            .append_pair("sortDirection", direction.as_str());
        url
    }

    /// First `n` customers sorted by `field`
    pub fn fetch_sorted(
        &self,
        n: u32,
        field: SortField,
        direction: SortDirection,
    ) -> impl Future<Output = Result<Vec<Customer>, ApiError>> + 'static {
        let url = self.sort_url(n, field, direction);
        let request = self.http.get(url.clone());
        get_customers(request, url)
    }
}
