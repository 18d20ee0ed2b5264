//! Product create wizard and product edit screen.
//!
//! The wizard holds a [`ProductWizard`] in a signal. Picking the first
//! category fires the draft request; stock steppers and image uploads stay
//! disabled until the draft exists.
//!
//! The edit screen holds a [`ProductEdit`]. Details, categories and images
//! are saved by the form; each warehouse row writes its stock on its own
//! button and refreshes every row from the server.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_navigate, use_params_map};
use storefront::api::{Resource, UploadTarget, UploadedFile};
use storefront::listing::FetchScope;
use storefront::workflow::WorkflowError;
use storefront::workflow::forms::{Choice, choices};
use storefront::workflow::product::{
    CategoryPick, DraftState, ProductDetails, ProductEdit, ProductWizard, create_draft, set_stock, update_product,
};

use crate::components::image_uploader::{ImageUploader, uploaded_from_entry};
use crate::components::loading::Loading;
use crate::state::session::SessionContext;
use crate::util::task::{now_millis, spawn};

const BACK: &str = "/dashboard/products";

/// Inputs for the shared detail fields, bound to a `ProductDetails` inside
/// any signal.
fn detail_fields<T: Send + Sync + 'static>(
    state: RwSignal<T>,
    get: fn(&T) -> &ProductDetails,
    get_mut: fn(&mut T) -> &mut ProductDetails,
) -> impl IntoView {
    let text_input = move |label: &'static str, read: fn(&ProductDetails) -> String, write: fn(&mut ProductDetails, String)| {
        view! {
            <label class="entry-form__field">
                <span>{label}</span>
                <input
                    type="text"
                    prop:value=move || state.with(|s| read(get(s)))
                    on:input=move |ev| state.update(|s| write(get_mut(s), event_target_value(&ev)))
                />
            </label>
        }
    };

    view! {
        {text_input("Title *", |d| d.title.clone(), |d, v| d.title = v)}
        {text_input("Brand", |d| d.brand.clone(), |d, v| d.brand = v)}
        {text_input("Barcode", |d| d.barcode.clone(), |d, v| d.barcode = v)}
        <label class="entry-form__field">
            <span>"Description"</span>
            <textarea
                prop:value=move || state.with(|s| get(s).description.clone())
                on:input=move |ev| state.update(|s| get_mut(s).description = event_target_value(&ev))
            ></textarea>
        </label>
        <label class="entry-form__field">
            <span>"Price"</span>
            <input
                type="number"
                step="0.01"
                min="0"
                prop:value=move || state.with(|s| get(s).price.to_string())
                on:input=move |ev| {
                    if let Ok(price) = event_target_value(&ev).parse::<f64>() {
                        state.update(|s| get_mut(s).price = price.max(0.0));
                    }
                }
            />
        </label>
        <label class="entry-form__check">
            <input
                type="checkbox"
                prop:checked=move || state.with(|s| get(s).show_on_website)
                on:change=move |ev| state.update(|s| get_mut(s).show_on_website = event_target_checked(&ev))
            />
            "Show on website"
        </label>
    }
}

/// Load category and warehouse choices into the given signals.
fn load_options(
    ctx: &SessionContext,
    scope: &FetchScope,
    categories: RwSignal<Vec<Choice>>,
    warehouses: RwSignal<Vec<Choice>>,
    error: RwSignal<Option<String>>,
) {
    let api = ctx.api();
    let ticket = scope.begin();
    let scope = scope.clone();
    spawn(async move {
        let loaded: Result<(Vec<Choice>, Vec<Choice>), WorkflowError> = async {
            Ok((choices(&api, Resource::Categories).await?, choices(&api, Resource::Warehouses).await?))
        }
        .await;
        scope.commit(ticket, loaded, |loaded| match loaded {
            Ok((cats, stores)) => {
                categories.set(cats);
                warehouses.set(stores);
            }
            Err(e) => {
                tracing::warn!(error = %e, "product form options fetch failed");
                error.set(Some(e.to_string()));
            }
        });
    });
}

/// Category select plus the chips of the selected ones.
fn category_picker(
    categories: RwSignal<Vec<Choice>>,
    selected: Signal<Vec<i64>>,
    on_pick: impl Fn(i64) + 'static,
    on_remove: Callback<i64>,
) -> impl IntoView {
    let label = move |id: i64| {
        categories.with(|all| all.iter().find(|c| c.id == Some(id)).map_or_else(|| id.to_string(), |c| c.label.clone()))
    };
    view! {
        <label class="entry-form__field">
            <span>"Categories *"</span>
            <select
                prop:value=""
                on:change=move |ev| {
                    if let Ok(id) = event_target_value(&ev).parse::<i64>() {
                        on_pick(id);
                    }
                }
            >
                <option value="">"Select..."</option>
                {move || {
                    categories
                        .get()
                        .into_iter()
                        .filter_map(|c| c.id.map(|id| (id, c.label)))
                        .map(|(id, label)| view! { <option value=id.to_string()>{label}</option> })
                        .collect_view()
                }}
            </select>
        </label>
        <ul class="product-form__categories">
            {move || {
                selected
                    .get()
                    .into_iter()
                    .map(|id| {
                        view! {
                            <li>
                                {label(id)}
                                <button type="button" on:click=move |_| on_remove.run(id)>"x"</button>
                            </li>
                        }
                    })
                    .collect_view()
            }}
        </ul>
    }
}

#[component]
pub fn ProductCreatePage() -> impl IntoView {
    let ctx = expect_context::<SessionContext>();
    let navigate = use_navigate();
    let wizard = RwSignal::new(ProductWizard::new());
    let categories = RwSignal::new(Vec::<Choice>::new());
    let warehouses = RwSignal::new(Vec::<Choice>::new());
    let error = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    let scope = FetchScope::new();
    on_cleanup({
        let scope = scope.clone();
        move || scope.close()
    });
    load_options(&ctx, &scope, categories, warehouses, error);
    let images = RwSignal::new(Vec::<UploadedFile>::new());

    let api = ctx.api();
    let pick_category = {
        let scope = scope.clone();
        move |id: i64| {
            let mut pick = CategoryPick::AlreadySelected;
            wizard.update(|w| pick = w.select_category(id));
            let CategoryPick::AddedNeedsDraft(category) = pick else {
                return;
            };
            let api = api.clone();
            let scope = scope.clone();
            let ticket = scope.begin();
            spawn(async move {
                let outcome = create_draft(&api, category, now_millis()).await;
                scope.commit(ticket, outcome, |outcome| match outcome {
                    Ok(document_id) => wizard.update(|w| w.draft_created(document_id)),
                    Err(e) => {
                        tracing::warn!(error = %e, category, "draft product creation failed");
                        wizard.update(ProductWizard::draft_failed);
                        error.set(Some(e.to_string()));
                    }
                });
            });
        }
    };

    let api = ctx.api();
    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let snapshot = wizard.get();
        busy.set(true);
        error.set(None);
        let api = api.clone();
        let navigate = navigate.clone();
        spawn(async move {
            match snapshot.finalize(&api).await {
                Ok(()) => navigate(BACK, NavigateOptions::default()),
                Err(e) => {
                    tracing::warn!(error = %e, code = e.error_code(), "product publish failed");
                    error.set(Some(e.to_string()));
                }
            }
            busy.set(false);
        });
    };

    view! {
        <form class="product-form" on:submit=on_submit>
            <h1>"New product"</h1>
            {category_picker(
                categories,
                Signal::derive(move || wizard.with(|w| w.categories().to_vec())),
                pick_category,
                Callback::new(move |id| wizard.update(|w| w.remove_category(id))),
            )}
            <p class="product-form__draft">
                {move || match wizard.with(|w| w.draft().clone()) {
                    DraftState::None => "Pick a category to start.",
                    DraftState::Pending => "Preparing draft...",
                    DraftState::Ready(_) => "Draft ready.",
                }}
            </p>
            {detail_fields(wizard, |w| &w.details, |w| &mut w.details)}
            <fieldset class="product-form__stock" disabled=move || wizard.with(|w| w.draft_id().is_none())>
                <legend>"Stock"</legend>
                {move || {
                    warehouses
                        .get()
                        .into_iter()
                        .map(|w| {
                            let store = w.document_id.clone();
                            let inc = store.clone();
                            let dec = store.clone();
                            view! {
                                <div class="stock-row">
                                    <span>{w.label}</span>
                                    <button type="button" on:click=move |_| wizard.update(|wz| wz.adjust_stock(&dec, -1))>"-"</button>
                                    <span>{move || wizard.with(|wz| wz.stock(&store))}</span>
                                    <button type="button" on:click=move |_| wizard.update(|wz| wz.adjust_stock(&inc, 1))>"+"</button>
                                </div>
                            }
                        })
                        .collect_view()
                }}
            </fieldset>
            <fieldset class="product-form__images">
                <legend>"Images"</legend>
                <ImageUploader
                    images=images
                    on_change=Callback::new(move |ids: Vec<i64>| wizard.update(|w| w.set_images(&ids)))
                    disabled=Signal::derive(move || wizard.with(|w| w.draft_id().is_none()))
                />
            </fieldset>
            <Show when=move || error.get().is_some()>
                <p class="page-error">{move || error.get().unwrap_or_default()}</p>
            </Show>
            <div class="entry-form__actions">
                <a class="btn" href=BACK>"Cancel"</a>
                <button
                    class="btn btn--primary"
                    type="submit"
                    disabled=move || busy.get() || !wizard.with(ProductWizard::can_publish)
                >
                    "Publish"
                </button>
            </div>
        </form>
    }
}

#[component]
pub fn ProductEditPage() -> impl IntoView {
    let ctx = expect_context::<SessionContext>();
    let navigate = use_navigate();
    let id = use_params_map().with_untracked(|p| p.get("id").unwrap_or_default());
    let edit = RwSignal::new(ProductEdit::default());
    let images = RwSignal::new(Vec::<UploadedFile>::new());
    let categories = RwSignal::new(Vec::<Choice>::new());
    let warehouses = RwSignal::new(Vec::<Choice>::new());
    let loaded = RwSignal::new(false);
    let error = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    let scope = FetchScope::new();
    on_cleanup({
        let scope = scope.clone();
        move || scope.close()
    });
    load_options(&ctx, &scope, categories, warehouses, error);
    {
        let api = ctx.api();
        let id = id.clone();
        let ticket = scope.begin();
        let scope = scope.clone();
        spawn(async move {
            let outcome: Result<serde_json::Value, _> = api.get_entry(Resource::Products, &id, &ProductEdit::query()).await;
            scope.commit(ticket, outcome, |outcome| match outcome {
                Ok(entry) => {
                    images.set(uploaded_from_entry(&entry["images"]));
                    edit.set(ProductEdit::from_entry(&entry));
                    loaded.set(true);
                }
                Err(e) => {
                    tracing::warn!(error = %e, %id, "product fetch failed");
                    error.set(Some(e.to_string()));
                }
            });
        });
    }

    let api = ctx.api();
    let product = id.clone();
    let save_stock = Callback::new(move |(warehouse, quantity): (String, u32)| {
        if busy.get_untracked() {
            return;
        }
        let current = edit.with_untracked(|e| e.stock(&warehouse));
        busy.set(true);
        let api = api.clone();
        let product = product.clone();
        spawn(async move {
            match set_stock(&api, &product, &warehouse, &current, quantity).await {
                Ok(levels) => edit.update(|e| e.replace_stock(levels)),
                Err(e) => {
                    tracing::warn!(error = %e, %warehouse, "stock update failed");
                    error.set(Some(e.to_string()));
                }
            }
            busy.set(false);
        });
    });

    let api = ctx.api();
    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() || !loaded.get() {
            return;
        }
        let snapshot = edit.get();
        busy.set(true);
        error.set(None);
        let api = api.clone();
        let id = id.clone();
        let navigate = navigate.clone();
        spawn(async move {
            match update_product(&api, &id, &snapshot).await {
                Ok(()) => navigate(BACK, NavigateOptions::default()),
                Err(e) => {
                    tracing::warn!(error = %e, code = e.error_code(), %id, "product update failed");
                    error.set(Some(e.to_string()));
                }
            }
            busy.set(false);
        });
    };

    let stock_rows = move || {
        loaded.track();
        warehouses
            .get()
            .into_iter()
            .map(|w| {
                let store = w.document_id;
                let typed = RwSignal::new(edit.with_untracked(|e| e.stock(&store).quantity).to_string());
                let shown = store.clone();
                view! {
                    <div class="stock-row">
                        <span>{w.label}</span>
                        <span class="stock-row__current">{move || edit.with(|e| e.stock(&shown).quantity)}</span>
                        <input
                            type="number"
                            min="0"
                            prop:value=move || typed.get()
                            on:input=move |ev| typed.set(event_target_value(&ev))
                        />
                        <button
                            type="button"
                            disabled=move || busy.get()
                            on:click=move |_| {
                                if let Ok(quantity) = typed.get_untracked().trim().parse::<u32>() {
                                    save_stock.run((store.clone(), quantity));
                                }
                            }
                        >
                            "Update"
                        </button>
                    </div>
                }
            })
            .collect_view()
    };

    view! {
        <form class="product-form" on:submit=on_submit>
            <h1>"Edit product"</h1>
            <Show when=move || loaded.get() fallback=move || error.get().is_none().then(|| view! { <Loading/> })>
                {category_picker(
                    categories,
                    Signal::derive(move || edit.with(|e| e.categories().to_vec())),
                    move |id| {
                        edit.update(|e| {
                            e.select_category(id);
                        });
                    },
                    Callback::new(move |id| edit.update(|e| e.remove_category(id))),
                )}
                {detail_fields(edit, |e| &e.details, |e| &mut e.details)}
                <fieldset class="product-form__stock">
                    <legend>"Stock"</legend>
                    {stock_rows}
                </fieldset>
                <fieldset class="product-form__images">
                    <legend>"Images"</legend>
                    <ImageUploader
                        images=images
                        target=edit.with_untracked(|e| e.entry_id.map(UploadTarget::product_images))
                        on_change=Callback::new(move |ids: Vec<i64>| edit.update(|e| e.set_images(&ids)))
                    />
                </fieldset>
            </Show>
            <Show when=move || error.get().is_some()>
                <p class="page-error">{move || error.get().unwrap_or_default()}</p>
            </Show>
            <div class="entry-form__actions">
                <a class="btn" href=BACK>"Cancel"</a>
                <button class="btn btn--primary" type="submit" disabled=move || busy.get() || !loaded.get()>
                    "Save"
                </button>
            </div>
        </form>
    }
}
