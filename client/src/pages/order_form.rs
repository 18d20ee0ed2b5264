//! Order and purchase entry screen. A purchase can also create a product
//! that is not in the catalog yet and add it as a line straight away.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use storefront::api::Resource;
use storefront::listing::FetchScope;
use storefront::workflow::WorkflowError;
use storefront::workflow::forms::{Choice, choices};
use storefront::workflow::order::{
    DraftKind, OrderDraft, ProductOption, QuickProduct, product_options, quick_create_product,
};

use crate::state::session::SessionContext;
use crate::util::task::spawn;

struct Options {
    parties: Vec<Choice>,
    warehouses: Vec<Choice>,
    products: Vec<ProductOption>,
}

#[component]
pub fn OrderFormPage(kind: DraftKind) -> impl IntoView {
    let ctx = expect_context::<SessionContext>();
    let navigate = use_navigate();
    let draft = RwSignal::new(match kind {
        DraftKind::Sale => OrderDraft::new(),
        DraftKind::Purchase => OrderDraft::purchase(),
    });
    let parties = RwSignal::new(Vec::<Choice>::new());
    let warehouses = RwSignal::new(Vec::<Choice>::new());
    let products = RwSignal::new(Vec::<ProductOption>::new());
    let error = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    let (party_resource, party_label, back) = match kind {
        DraftKind::Sale => (Resource::Customers, "Customer", "/dashboard/orders"),
        DraftKind::Purchase => (Resource::Traders, "Trader", "/dashboard/purchases"),
    };

    let scope = FetchScope::new();
    on_cleanup({
        let scope = scope.clone();
        move || scope.close()
    });
    {
        let api = ctx.api();
        let ticket = scope.begin();
        spawn(async move {
            let loaded: Result<Options, WorkflowError> = async {
                Ok(Options {
                    parties: choices(&api, party_resource).await?,
                    warehouses: choices(&api, Resource::Warehouses).await?,
                    products: product_options(&api).await?,
                })
            }
            .await;
            scope.commit(ticket, loaded, |loaded| match loaded {
                Ok(options) => {
                    parties.set(options.parties);
                    warehouses.set(options.warehouses);
                    products.set(options.products);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "order form options fetch failed");
                    error.set(Some(e.to_string()));
                }
            });
        });
    }

    let add_product = move |document_id: String| {
        let picked = products.with(|all| all.iter().find(|p| p.document_id == document_id).cloned());
        if let Some(product) = picked {
            draft.update(|d| {
                d.add_product(&product);
            });
        }
    };

    let api = ctx.api();
    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let snapshot = draft.get();
        if let Err(e) = snapshot.validate() {
            error.set(Some(e.to_string()));
            return;
        }
        busy.set(true);
        error.set(None);
        let api = api.clone();
        let navigate = navigate.clone();
        spawn(async move {
            match snapshot.submit(&api).await {
                Ok(_) => navigate(back, NavigateOptions::default()),
                Err(e) => {
                    tracing::warn!(error = %e, code = e.error_code(), "order submission failed");
                    error.set(Some(e.to_string()));
                }
            }
            busy.set(false);
        });
    };

    let line_rows = move || {
        draft.with(|d| d.lines().to_vec()).into_iter().enumerate().map(move |(index, line)| {
            let current_warehouse = line.warehouse.clone().unwrap_or_default();
            view! {
                <div class="order-line">
                    <h4>{line.title.clone()}</h4>
                    <input
                        type="number"
                        min="1"
                        prop:value=line.quantity.to_string()
                        on:input=move |ev| {
                            if let Ok(qty) = event_target_value(&ev).parse::<u32>() {
                                draft.update(|d| d.set_quantity(index, qty));
                            }
                        }
                    />
                    <input
                        type="number"
                        step="0.01"
                        prop:value=line.price.to_string()
                        on:input=move |ev| {
                            if let Ok(price) = event_target_value(&ev).parse::<f64>() {
                                draft.update(|d| d.set_price(index, price));
                            }
                        }
                    />
                    <select on:change=move |ev| draft.update(|d| d.set_warehouse(index, &event_target_value(&ev)))>
                        <option value="">"Warehouse"</option>
                        {warehouses
                            .get()
                            .into_iter()
                            .map(|w| {
                                let selected = w.document_id == current_warehouse;
                                view! { <option value=w.document_id selected=selected>{w.label}</option> }
                            })
                            .collect_view()}
                    </select>
                    <span class="order-line__total">{format!("{:.2}", line.total())}</span>
                    <button type="button" class="btn btn--danger" on:click=move |_| draft.update(|d| d.remove_line(index))>
                        "Remove"
                    </button>
                </div>
            }
        }).collect_view()
    };

    view! {
        <form class="order-form" on:submit=on_submit>
            <h1>{if kind == DraftKind::Sale { "New order" } else { "New purchase" }}</h1>
            <label class="entry-form__field">
                <span>{party_label}</span>
                <select on:change=move |ev| draft.update(|d| d.set_customer(&event_target_value(&ev)))>
                    <option value="">"Select..."</option>
                    {move || {
                        parties.get().into_iter().map(|c| view! { <option value=c.document_id>{c.label}</option> }).collect_view()
                    }}
                </select>
            </label>
            <Show when=move || kind == DraftKind::Sale>
                <label class="entry-form__field">
                    <span>"Recipient"</span>
                    <input
                        type="text"
                        prop:value=move || draft.with(|d| d.recipient().to_owned())
                        on:input=move |ev| draft.update(|d| d.set_recipient(&event_target_value(&ev)))
                    />
                </label>
                <label class="entry-form__check">
                    <input
                        type="checkbox"
                        prop:checked=move || draft.with(OrderDraft::add_taxes)
                        on:change=move |ev| draft.update(|d| d.set_add_taxes(event_target_checked(&ev)))
                    />
                    "Add taxes"
                </label>
            </Show>
            <label class="entry-form__check">
                <input
                    type="checkbox"
                    prop:checked=move || draft.with(OrderDraft::paid)
                    on:change=move |ev| draft.update(|d| d.set_paid(event_target_checked(&ev)))
                />
                "Paid"
            </label>
            <label class="entry-form__field">
                <span>"Add product"</span>
                <select
                    prop:value=""
                    on:change=move |ev| add_product(event_target_value(&ev))
                >
                    <option value="">"Select..."</option>
                    {move || {
                        products
                            .get()
                            .into_iter()
                            .map(|p| {
                                let label = format!("{} - ({} EGP)", p.title, p.price.unwrap_or(0.0));
                                view! { <option value=p.document_id>{label}</option> }
                            })
                            .collect_view()
                    }}
                </select>
            </label>
            <Show when=move || kind == DraftKind::Purchase>
                <QuickProductDialog on_created=Callback::new(move |created: ProductOption| {
                    draft.update(|d| {
                        d.add_product(&created);
                    });
                    products.update(|all| all.push(created));
                })/>
            </Show>
            <div class="order-form__lines">{line_rows}</div>
            <p class="order-form__total">{move || format!("Total: {:.2} EGP", draft.with(OrderDraft::total))}</p>
            <Show when=move || error.get().is_some()>
                <p class="page-error">{move || error.get().unwrap_or_default()}</p>
            </Show>
            <div class="entry-form__actions">
                <a class="btn" href=back>"Cancel"</a>
                <button class="btn btn--primary" type="submit" disabled=move || busy.get()>
                    "Save"
                </button>
            </div>
        </form>
    }
}

/// Inline "new product" panel of the purchase form.
#[component]
fn QuickProductDialog(on_created: Callback<ProductOption>) -> impl IntoView {
    let ctx = expect_context::<SessionContext>();
    let open = RwSignal::new(false);
    let fields = RwSignal::new(QuickProduct::default());
    let busy = RwSignal::new(false);
    let error = RwSignal::new(None::<String>);

    let api = ctx.api();
    let create = Callback::new(move |()| {
        if busy.get_untracked() {
            return;
        }
        let snapshot = fields.get_untracked();
        busy.set(true);
        error.set(None);
        let api = api.clone();
        spawn(async move {
            match quick_create_product(&api, &snapshot).await {
                Ok(created) => {
                    on_created.run(created);
                    fields.set(QuickProduct::default());
                    open.set(false);
                }
                Err(e) => {
                    tracing::warn!(error = %e, code = e.error_code(), "quick product creation failed");
                    error.set(Some(e.to_string()));
                }
            }
            busy.set(false);
        });
    });

    let text_input = move |label: &'static str, read: fn(&QuickProduct) -> String, write: fn(&mut QuickProduct, String)| {
        view! {
            <label class="entry-form__field">
                <span>{label}</span>
                <input
                    type="text"
                    prop:value=move || fields.with(read)
                    on:input=move |ev| fields.update(|f| write(f, event_target_value(&ev)))
                />
            </label>
        }
    };

    view! {
        <div class="quick-product">
            <button type="button" class="btn" on:click=move |_| open.update(|o| *o = !*o)>
                "New product"
            </button>
            <Show when=move || open.get()>
                <div class="quick-product__panel">
                    {text_input("Title *", |f| f.title.clone(), |f, v| f.title = v)}
                    <label class="entry-form__field">
                        <span>"Price"</span>
                        <input
                            type="number"
                            step="0.01"
                            min="0"
                            prop:value=move || fields.with(|f| f.price.to_string())
                            on:input=move |ev| {
                                if let Ok(price) = event_target_value(&ev).parse::<f64>() {
                                    fields.update(|f| f.price = price);
                                }
                            }
                        />
                    </label>
                    {text_input("Description", |f| f.description.clone(), |f, v| f.description = v)}
                    {text_input("Barcode", |f| f.barcode.clone(), |f, v| f.barcode = v)}
                    <Show when=move || error.get().is_some()>
                        <p class="page-error">{move || error.get().unwrap_or_default()}</p>
                    </Show>
                    <button type="button" class="btn btn--primary" disabled=move || busy.get() on:click=move |_| create.run(())>
                        "Create and add"
                    </button>
                </div>
            </Show>
        </div>
    }
}
