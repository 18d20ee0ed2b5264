//! Page navigation and page-size controls for dashboard lists.

#[cfg(test)]
#[path = "pagination_test.rs"]
mod pagination_test;

use leptos::prelude::*;
use storefront::listing::LIMIT_OPTIONS;

/// Page buttons shown on each side of the current page.
const PAGE_SPAN: u32 = 2;

/// Page numbers to render: a window around `page`, clamped to `1..=count`.
pub fn page_window(page: u32, count: u32, span: u32) -> Vec<u32> {
    let count = count.max(1);
    let page = page.clamp(1, count);
    let first = page.saturating_sub(span).max(1);
    let last = page.saturating_add(span).min(count);
    (first..=last).collect()
}

#[component]
pub fn Pagination(
    #[prop(into)] page: Signal<u32>,
    #[prop(into)] count: Signal<u32>,
    on_select: Callback<u32>,
) -> impl IntoView {
    let window = move || page_window(page.get(), count.get(), PAGE_SPAN);

    view! {
        <nav class="pagination" aria-label="Pagination">
            <button
                class="pagination__step"
                disabled=move || page.get() <= 1
                on:click=move |_| on_select.run(page.get_untracked().saturating_sub(1).max(1))
            >
                "‹"
            </button>
            <For
                each=window
                key=|n| *n
                children=move |n| {
                    view! {
                        <button
                            class="pagination__page"
                            class:pagination__page--active=move || page.get() == n
                            on:click=move |_| on_select.run(n)
                        >
                            {n}
                        </button>
                    }
                }
            />
            <button
                class="pagination__step"
                disabled=move || page.get() >= count.get()
                on:click=move |_| on_select.run((page.get_untracked() + 1).min(count.get_untracked()))
            >
                "›"
            </button>
        </nav>
    }
}

#[component]
pub fn PageSizeSelect(#[prop(into)] limit: Signal<u32>, on_change: Callback<u32>) -> impl IntoView {
    view! {
        <select
            class="page-size"
            prop:value=move || limit.get().to_string()
            on:change=move |ev| {
                if let Ok(size) = event_target_value(&ev).parse::<u32>() {
                    on_change.run(size);
                }
            }
        >
            {LIMIT_OPTIONS
                .iter()
                .map(|size| view! { <option value=size.to_string()>{*size}</option> })
                .collect_view()}
        </select>
    }
}
