//! Create and edit screens for the flat collections (customers, traders,
//! categories, users). Categories also pick their products from a searchable
//! checklist and carry one uploaded image.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_navigate, use_params_map};
use storefront::api::{Resource, UploadedFile};
use storefront::listing::{FetchScope, search_debounce};
use storefront::workflow::forms::{Choice, EntryForm, product_choices};

use crate::components::image_uploader::ImageUploader;
use crate::components::loading::Loading;
use crate::pages::errors::NotFoundPage;
use crate::pages::resource_list::list_spec;
use crate::state::session::SessionContext;
use crate::util::task::{sleep, spawn};

#[component]
pub fn EntryCreatePage(resource: Resource) -> impl IntoView {
    match EntryForm::new(resource) {
        Some(form) => view! { <EntryFormView form=RwSignal::new(form) target=None/> }.into_any(),
        None => view! { <NotFoundPage/> }.into_any(),
    }
}

#[component]
pub fn EntryEditPage(resource: Resource) -> impl IntoView {
    let ctx = expect_context::<SessionContext>();
    let key = use_params_map().with_untracked(|p| p.get("id").unwrap_or_default());
    let form = RwSignal::new(None::<EntryForm>);
    let error = RwSignal::new(None::<String>);

    let scope = FetchScope::new();
    on_cleanup({
        let scope = scope.clone();
        move || scope.close()
    });

    {
        let api = ctx.api();
        let key = key.clone();
        let ticket = scope.begin();
        spawn(async move {
            let outcome = EntryForm::load(&api, resource, &key).await;
            scope.commit(ticket, outcome, |outcome| match outcome {
                Ok(loaded) => form.set(Some(loaded)),
                Err(e) => {
                    tracing::warn!(error = %e, resource = resource.path(), %key, "entry fetch failed");
                    error.set(Some(e.to_string()));
                }
            });
        });
    }

    move || {
        if let Some(message) = error.get() {
            return view! { <p class="page-error">{message}</p> }.into_any();
        }
        match form.get() {
            Some(loaded) => view! { <EntryFormView form=RwSignal::new(loaded) target=Some(key.clone())/> }.into_any(),
            None => view! { <Loading/> }.into_any(),
        }
    }
}

/// The form itself; `target` is `None` when creating.
#[component]
fn EntryFormView(form: RwSignal<EntryForm>, target: Option<String>) -> impl IntoView {
    let ctx = expect_context::<SessionContext>();
    let navigate = use_navigate();
    let error = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    let resource = form.with_untracked(EntryForm::resource);
    let back = list_spec(resource).map_or("/dashboard", |spec| spec.base);
    let heading = if target.is_some() { "Edit" } else { "Add" };

    let api = ctx.api();
    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let snapshot = form.get();
        if let Err(e) = snapshot.validate() {
            error.set(Some(e.to_string()));
            return;
        }
        busy.set(true);
        error.set(None);
        let api = api.clone();
        let target = target.clone();
        let navigate = navigate.clone();
        spawn(async move {
            let outcome = match target.as_deref() {
                Some(key) => snapshot.update(&api, key).await,
                None => snapshot.create(&api).await,
            };
            match outcome {
                Ok(()) => navigate(back, NavigateOptions::default()),
                Err(e) => {
                    tracing::warn!(error = %e, code = e.error_code(), resource = resource.path(), "save failed");
                    error.set(Some(e.to_string()));
                }
            }
            busy.set(false);
        });
    };

    let specs = form.with_untracked(EntryForm::specs);

    view! {
        <form class="entry-form" on:submit=on_submit>
            <h1>{heading}</h1>
            {specs
                .iter()
                .map(|spec| {
                    let field = spec.key;
                    view! {
                        <label class="entry-form__field">
                            <span>{spec.label}{if spec.required { " *" } else { "" }}</span>
                            <input
                                type=if spec.secret { "password" } else { "text" }
                                prop:value=move || form.with(|f| f.get(field).to_owned())
                                on:input=move |ev| form.update(|f| f.set(field, &event_target_value(&ev)))
                            />
                        </label>
                    }
                })
                .collect_view()}
            {form.with_untracked(EntryForm::has_relations).then(|| view! { <CategoryRelations form=form/> })}
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

/// Product checklist and image for a category form.
#[component]
fn CategoryRelations(form: RwSignal<EntryForm>) -> impl IntoView {
    let ctx = expect_context::<SessionContext>();
    let search = RwSignal::new(String::new());
    let products = RwSignal::new(Vec::<Choice>::new());
    let images = RwSignal::new(form.with_untracked(|f| f.image().cloned().into_iter().collect::<Vec<UploadedFile>>()));

    let scope = FetchScope::new();
    on_cleanup({
        let scope = scope.clone();
        move || scope.close()
    });
    let api = ctx.api();
    Effect::new(move || {
        let text = search.get();
        let ticket = scope.begin();
        let scope = scope.clone();
        let api = api.clone();
        spawn(async move {
            sleep(search_debounce(&text)).await;
            if !scope.is_current(ticket) {
                return;
            }
            let outcome = product_choices(&api, &text).await;
            scope.commit(ticket, outcome, |outcome| match outcome {
                Ok(found) => products.set(found),
                Err(e) => tracing::warn!(error = %e, "category product search failed"),
            });
        });
    });

    let on_image = Callback::new(move |_ids: Vec<i64>| {
        let newest = images.with_untracked(|all| all.last().cloned());
        form.update(|f| f.set_image(newest));
    });

    view! {
        <fieldset class="entry-form__products">
            <legend>"Products"</legend>
            <input
                class="search-box"
                type="search"
                placeholder="Search products..."
                prop:value=move || search.get()
                on:input=move |ev| search.set(event_target_value(&ev))
            />
            {move || {
                products
                    .get()
                    .into_iter()
                    .filter_map(|p| p.id.map(|id| (id, p.label)))
                    .map(|(id, label)| {
                        view! {
                            <label class="entry-form__check">
                                <input
                                    type="checkbox"
                                    prop:checked=move || form.with(|f| f.products().contains(&id))
                                    on:change=move |_| form.update(|f| f.toggle_product(id))
                                />
                                {label}
                            </label>
                        }
                    })
                    .collect_view()
            }}
        </fieldset>
        <fieldset class="entry-form__image">
            <legend>"Image"</legend>
            <ImageUploader images=images on_change=on_image single=true/>
        </fieldset>
    }
}
