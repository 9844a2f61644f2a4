//! Customer List Binding
//!
//! View state for a fetched customer list and the glue that drives a query
//! pipeline into it for the lifetime of the owning view.

use std::fmt::{Debug, Display};
use std::future::Future;

use futures::future::{AbortHandle, Abortable};
use futures::StreamExt;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::models::Customer;
use crate::pipeline::QueryPipeline;

/// What the customer table shows
#[derive(Debug, Clone, PartialEq)]
pub enum CustomerList {
    /// Nothing has arrived yet
    Loading,
    Loaded(Vec<Customer>),
    /// The last fetch failed; the previous list is not shown
    Failed(String),
}

impl CustomerList {
    pub fn from_result<E: Display>(result: Result<Vec<Customer>, E>) -> Self {
        match result {
            Ok(customers) => CustomerList::Loaded(customers),
            Err(err) => CustomerList::Failed(err.to_string()),
        }
    }
}

/// Run `task` until the current reactive owner is cleaned up
pub fn spawn_scoped(label: &'static str, task: impl Future<Output = ()> + 'static) {
    let (abort, registration) = AbortHandle::new_pair();
    spawn_local(async move {
        if Abortable::new(task, registration).await.is_err() {
            log::debug!("[VIEW] {label} disposed");
        }
    });
    on_cleanup(move || abort.abort());
}

/// Feed every pipeline result into `set_list` until the view is torn down
pub fn bind_pipeline<K, E>(
    label: &'static str,
    mut pipeline: QueryPipeline<K, Vec<Customer>, E>,
    set_list: WriteSignal<CustomerList>,
) where
    K: Clone + PartialEq + Debug + 'static,
    E: Display + 'static,
{
    spawn_scoped(label, async move {
        while let Some(fetched) = pipeline.next().await {
            if let Err(err) = &fetched.result {
                log::warn!("[VIEW] {label} fetch for {:?} failed: {err}", fetched.key);
            }
            set_list.set(CustomerList::from_result(fetched.result));
            log::debug!("[VIEW] {label} now {:?}", pipeline.phase());
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_result() {
        let customer = Customer {
            id: "1".to_string(),
            first_name: "Rick".to_string(),
            last_name: "Sanchez".to_string(),
            company_name: "Citadel".to_string(),
        };
        assert_eq!(
            CustomerList::from_result::<String>(Ok(vec![customer.clone()])),
            CustomerList::Loaded(vec![customer])
        );
        assert_eq!(
            CustomerList::from_result::<&str>(Err("customer service answered 500")),
            CustomerList::Failed("customer service answered 500".to_string())
        );
    }
}
