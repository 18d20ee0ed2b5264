//! Order and purchase detail with payment and return actions.

use leptos::prelude::*;
use leptos_router::hooks::use_params_map;
use serde_json::Value;
use storefront::listing::FetchScope;
use storefront::workflow::WorkflowError;
use storefront::workflow::order::{DraftKind, RETURNED_STATUS, fetch_entry, mark_paid, mark_returned};

use crate::components::loading::Loading;
use crate::state::session::SessionContext;
use crate::util::task::spawn;

fn text(entry: &Value, key: &str) -> String {
    entry[key].as_str().unwrap_or_default().to_owned()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
    Pay,
    Return,
}

#[component]
pub fn LedgerDetailPage(kind: DraftKind) -> impl IntoView {
    let ctx = expect_context::<SessionContext>();
    let id = use_params_map().with_untracked(|p| p.get("id").unwrap_or_default());
    let entry = RwSignal::new(None::<Value>);
    let error = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);
    let reload = RwSignal::new(0_u32);

    let (party_key, items_key, status_key, back) = match kind {
        DraftKind::Sale => ("customer", "order_items", "orderStatus", "/dashboard/orders"),
        DraftKind::Purchase => ("trader", "purchase_items", "purchaseStatus", "/dashboard/purchases"),
    };

    let scope = FetchScope::new();
    on_cleanup({
        let scope = scope.clone();
        move || scope.close()
    });

    let api = ctx.api();
    Effect::new({
        let id = id.clone();
        let scope = scope.clone();
        move || {
            reload.track();
            let ticket = scope.begin();
            let api = api.clone();
            let scope = scope.clone();
            let id = id.clone();
            spawn(async move {
                let outcome = fetch_entry(&api, kind, &id).await;
                scope.commit(ticket, outcome, |outcome| match outcome {
                    Ok(value) => entry.set(Some(value)),
                    Err(e) => {
                        tracing::warn!(error = %e, ?kind, %id, "ledger entry fetch failed");
                        error.set(Some(e.to_string()));
                    }
                });
            });
        }
    });

    let api = ctx.api();
    let run = move |action: Action| {
        if busy.get() {
            return;
        }
        busy.set(true);
        let api = api.clone();
        let id = id.clone();
        spawn(async move {
            let outcome: Result<(), WorkflowError> = match action {
                Action::Pay => mark_paid(&api, kind, &id).await,
                Action::Return => mark_returned(&api, kind, &id).await,
            };
            match outcome {
                Ok(()) => reload.update(|n| *n += 1),
                Err(e) => {
                    tracing::warn!(error = %e, code = e.error_code(), ?action, "ledger action failed");
                    error.set(Some(e.to_string()));
                }
            }
            busy.set(false);
        });
    };

    move || {
        let Some(value) = entry.get() else {
            return match error.get() {
                Some(message) => view! { <p class="page-error">{message}</p> }.into_any(),
                None => view! { <Loading/> }.into_any(),
            };
        };
        let party = text(&value[party_key], "name");
        let recipient = text(&value, "recipient");
        let status = text(&value, status_key);
        let paid = value["paid"].as_bool().unwrap_or(false);
        let returned = status == RETURNED_STATUS;
        let total = value["total"].as_f64().map(|t| format!("{t:.2} EGP")).unwrap_or_default();
        let lines = value[items_key].as_array().cloned().unwrap_or_default();
        let run = run.clone();
        let run_return = run.clone();

        view! {
            <article class="ledger-detail">
                <a class="btn" href=back>"Back"</a>
                <h1>{party}</h1>
                {(!recipient.is_empty()).then(|| view! { <p>"Recipient: " {recipient}</p> })}
                <p class="ledger-detail__status">{if status.is_empty() { "Pending".to_owned() } else { status.clone() }}</p>
                <p>{if paid { "Paid" } else { "Unpaid" }}</p>
                <table class="data-table">
                    <thead>
                        <tr>
                            <th>"Product"</th>
                            <th>"Quantity"</th>
                            <th>"Price"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {lines
                            .into_iter()
                            .map(|line| {
                                let title = text(&line["product"], "title");
                                let quantity = line["quantity"].as_i64().unwrap_or(0);
                                let price = line["price"].as_f64().unwrap_or(0.0);
                                view! {
                                    <tr>
                                        <td>{title}</td>
                                        <td>{quantity}</td>
                                        <td>{format!("{price:.2}")}</td>
                                    </tr>
                                }
                            })
                            .collect_view()}
                    </tbody>
                </table>
                <p class="ledger-detail__total">{total}</p>
                <Show when=move || error.get().is_some()>
                    <p class="page-error">{move || error.get().unwrap_or_default()}</p>
                </Show>
                <div class="ledger-detail__actions">
                    {(!paid && !returned).then(|| {
                        let run = run.clone();
                        view! {
                            <button class="btn btn--primary" disabled=move || busy.get() on:click=move |_| run(Action::Pay)>
                                "Mark as paid"
                            </button>
                        }
                    })}
                    {(!returned).then(|| {
                        view! {
                            <button class="btn btn--danger" disabled=move || busy.get() on:click=move |_| run_return(Action::Return)>
                                "Return"
                            </button>
                        }
                    })}
                </div>
            </article>
        }
        .into_any()
    }
}
