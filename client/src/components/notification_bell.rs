//! Header bell with the newest unread notifications, refreshed on a timer
//! until the dashboard unmounts.

use leptos::prelude::*;
use storefront::listing::FetchScope;
use storefront::workflow::notifications::{self, Notification, UNREAD_POLL_INTERVAL};

use crate::state::session::SessionContext;
use crate::util::task::{sleep, spawn};

#[component]
pub fn NotificationBell() -> impl IntoView {
    let ctx = expect_context::<SessionContext>();
    let items = RwSignal::new(Vec::<Notification>::new());
    let open = RwSignal::new(false);

    let scope = FetchScope::new();
    on_cleanup({
        let scope = scope.clone();
        move || scope.close()
    });

    {
        let api = ctx.api();
        let scope = scope.clone();
        spawn(async move {
            loop {
                let ticket = scope.begin();
                match notifications::unread(&api).await {
                    Ok(unread) => {
                        scope.commit(ticket, unread, |unread| items.set(unread));
                    }
                    Err(e) => tracing::warn!(error = %e, "unread notifications fetch failed"),
                }
                sleep(UNREAD_POLL_INTERVAL).await;
                if scope.is_closed() {
                    break;
                }
            }
        });
    }

    let api = ctx.api();
    let mark_read = move |document_id: String| {
        let api = api.clone();
        let scope = scope.clone();
        spawn(async move {
            match notifications::mark_read(&api, &document_id).await {
                Ok(()) if !scope.is_closed() => items.update(|list| list.retain(|n| n.document_id != document_id)),
                Ok(()) => {}
                Err(e) => tracing::warn!(error = %e, %document_id, "mark notification read failed"),
            }
        });
    };

    view! {
        <div class="bell">
            <button class="bell__button" on:click=move |_| open.update(|o| *o = !*o) aria-label="Notifications">
                "🔔"
                <Show when=move || !items.with(Vec::is_empty)>
                    <span class="bell__count">{move || items.with(|list| notifications::unread_count(list))}</span>
                </Show>
            </button>
            <Show when=move || open.get()>
                <ul class="bell__menu">
                    <For
                        each=move || items.get()
                        key=|n| n.document_id.clone()
                        children={
                            let mark_read = mark_read.clone();
                            move |n: Notification| {
                                let mark_read = mark_read.clone();
                                let id = n.document_id.clone();
                                view! {
                                    <li class="bell__item" on:click=move |_| mark_read(id.clone())>
                                        <strong>{n.title}</strong>
                                        <span>{n.message}</span>
                                    </li>
                                }
                            }
                        }
                    />
                    <li class="bell__all">
                        <a href="/dashboard/notifications">"All notifications"</a>
                    </li>
                </ul>
            </Show>
        </div>
    }
}
