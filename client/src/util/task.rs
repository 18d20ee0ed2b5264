//! Spawning and timing for page-level async work.
//!
//! Pages hand their fetch futures to [`spawn`]; in the browser build they run
//! on the Leptos local executor, natively they are dropped unpolled.

use std::future::Future;
use std::time::Duration;

pub fn spawn<F>(future: F)
where
    F: Future<Output = ()> + 'static,
{
    #[cfg(feature = "csr")]
    leptos::task::spawn_local(future);
    #[cfg(not(feature = "csr"))]
    drop(future);
}

/// Wait `duration`; returns immediately for a zero duration.
pub async fn sleep(duration: Duration) {
    if duration.is_zero() {
        return;
    }
    #[cfg(feature = "csr")]
    gloo_timers::future::sleep(duration).await;
}

/// Milliseconds since the Unix epoch, from the browser clock.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn now_millis() -> u64 {
    #[cfg(feature = "csr")]
    {
        js_sys::Date::now() as u64
    }
    #[cfg(not(feature = "csr"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
    }
}
