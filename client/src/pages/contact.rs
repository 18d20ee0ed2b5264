//! Static contact page.

use leptos::prelude::*;

#[component]
pub fn ContactPage() -> impl IntoView {
    view! {
        <section class="contact-page">
            <h1>"Contact us"</h1>
            <dl class="contact-page__details">
                <dt>"Address"</dt>
                <dd>"5 El-Moalem Ghaly St., off Abi El-Dardaa St., El-Manshia El-Soghra, Alexandria, Egypt"</dd>
                <dt>"Opening hours"</dt>
                <dd>"Daily 9:00-21:00; Friday 14:00-21:00; closed on Sunday"</dd>
                <dt>"Phone"</dt>
                <dd>"03 481 0245 / +20 100 6658220"</dd>
            </dl>
        </section>
    }
}
