//! Full notification list: mark read and delete.

use leptos::prelude::*;
use storefront::listing::FetchScope;
use storefront::workflow::notifications::{self, Notification};

use crate::components::loading::Loading;
use crate::state::session::SessionContext;
use crate::util::task::spawn;

#[component]
pub fn NotificationsPage() -> impl IntoView {
    let ctx = expect_context::<SessionContext>();
    let items = RwSignal::new(None::<Vec<Notification>>);
    let error = RwSignal::new(None::<String>);

    let scope = FetchScope::new();
    on_cleanup({
        let scope = scope.clone();
        move || scope.close()
    });
    {
        let api = ctx.api();
        let scope = scope.clone();
        let ticket = scope.begin();
        spawn(async move {
            let outcome = notifications::all(&api).await;
            scope.commit(ticket, outcome, |outcome| match outcome {
                Ok(list) => items.set(Some(list)),
                Err(e) => {
                    tracing::warn!(error = %e, "notifications fetch failed");
                    error.set(Some(e.to_string()));
                }
            });
        });
    }

    let api = ctx.api();
    let mark_read = {
        let scope = scope.clone();
        move |document_id: String| {
            let api = api.clone();
            let scope = scope.clone();
            spawn(async move {
                match notifications::mark_read(&api, &document_id).await {
                    Ok(()) if !scope.is_closed() => items.update(|list| {
                        if let Some(list) = list {
                            notifications::apply_read(list, &document_id);
                        }
                    }),
                    Ok(()) => {}
                    Err(e) => {
                        tracing::warn!(error = %e, %document_id, "mark notification read failed");
                        error.set(Some(e.to_string()));
                    }
                }
            });
        }
    };

    let api = ctx.api();
    let remove = move |document_id: String| {
        let api = api.clone();
        let scope = scope.clone();
        spawn(async move {
            match notifications::remove(&api, &document_id).await {
                Ok(()) if !scope.is_closed() => items.update(|list| {
                    if let Some(list) = list {
                        list.retain(|n| n.document_id != document_id);
                    }
                }),
                Ok(()) => {}
                Err(e) => {
                    tracing::warn!(error = %e, %document_id, "notification delete failed");
                    error.set(Some(e.to_string()));
                }
            }
        });
    };

    view! {
        <section class="notifications">
            <h1>"Notifications"</h1>
            <Show when=move || error.get().is_some()>
                <p class="page-error">{move || error.get().unwrap_or_default()}</p>
            </Show>
            <Show when=move || items.with(Option::is_some) fallback=|| view! { <Loading/> }>
                {
                    let mark_read = mark_read.clone();
                    let remove = remove.clone();
                    view! {
                        <Show
                            when=move || items.with(|list| list.as_ref().is_some_and(|l| !l.is_empty()))
                            fallback=|| view! { <p class="notifications__empty">"No notifications."</p> }
                        >
                            <ul class="notifications__list">
                                <For
                                    each=move || items.get().unwrap_or_default()
                                    key=|n| (n.document_id.clone(), n.is_read)
                                    children={
                                        let mark_read = mark_read.clone();
                                        let remove = remove.clone();
                                        move |n: Notification| {
                                            let mark_read = mark_read.clone();
                                            let remove = remove.clone();
                                            let read_id = n.document_id.clone();
                                            let remove_id = n.document_id.clone();
                                            let when = n.created_at.clone().unwrap_or_default();
                                            view! {
                                                <li class=if n.is_read { "notification" } else { "notification notification--unread" }>
                                                    <strong>{n.title}</strong>
                                                    <p>{n.message}</p>
                                                    <time>{when}</time>
                                                    {(!n.is_read).then(|| view! {
                                                        <button class="btn" on:click=move |_| mark_read(read_id.clone())>"Mark read"</button>
                                                    })}
                                                    <button class="btn btn--danger" on:click=move |_| remove(remove_id.clone())>"Delete"</button>
                                                </li>
                                            }
                                        }
                                    }
                                />
                            </ul>
                        </Show>
                    }
                }
            </Show>
        </section>
    }
}
