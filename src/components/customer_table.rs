//! Customer Table Component
//!
//! Renders the current customer list, or a loading / empty / failed notice.

use leptos::prelude::*;

use super::CustomerList;

/// Log lines shown under a failed fetch
const RECENT_LOG_LINES: usize = 20;

#[component]
pub fn CustomerTable(list: ReadSignal<CustomerList>) -> impl IntoView {
    view! {
        <div class="customer-table">
            {move || match list.get() {
                CustomerList::Loading => view! {
                    <p class="customer-status">"Loading customers..."</p>
                }.into_any(),
                CustomerList::Failed(message) => {
                    let recent = rolling_logger::recent();
                    let tail = recent[recent.len().saturating_sub(RECENT_LOG_LINES)..].join("\n");
                    view! {
                        <div class="customer-status error">
                            <p>"Could not load customers: " {message}</p>
                            <details class="recent-log">
                                <summary>"Recent log"</summary>
                                <pre>{tail}</pre>
                            </details>
                        </div>
                    }.into_any()
                }
                CustomerList::Loaded(customers) if customers.is_empty() => view! {
                    <p class="customer-status">"No customers found."</p>
                }.into_any(),
                CustomerList::Loaded(customers) => view! {
                    <table>
                        <thead>
                            <tr>
                                <th>"ID"</th>
                                <th>"First Name"</th>
                                <th>"Last Name"</th>
                                <th>"Company"</th>
                            </tr>
                        </thead>
                        <tbody>
                            {customers.into_iter().map(|customer| {
                                let title = customer.full_name();
                                view! {
                                    <tr title=title>
                                        <td>{customer.id}</td>
                                        <td>{customer.first_name}</td>
                                        <td>{customer.last_name}</td>
                                        <td>{customer.company_name}</td>
                                    </tr>
                                }
                            }).collect_view()}
                        </tbody>
                    </table>
                }.into_any(),
            }}
        </div>
    }
}
