//! Image picker that uploads to the media library as soon as files are
//! chosen and reports the resulting id list to its owner.

#[cfg(test)]
#[path = "image_uploader_test.rs"]
mod image_uploader_test;

use leptos::prelude::*;
use storefront::api::{UploadTarget, UploadedFile};

use crate::state::session::SessionContext;
use crate::util::files::{picked_files, read};
use crate::util::task::spawn;

/// Add a freshly uploaded file. A single-image field keeps only the newest.
pub fn add_upload(images: &mut Vec<UploadedFile>, file: UploadedFile, single: bool) {
    if single {
        images.clear();
    }
    if !images.iter().any(|i| i.id == file.id) {
        images.push(file);
    }
}

pub fn image_ids(images: &[UploadedFile]) -> Vec<i64> {
    images.iter().map(|i| i.id).collect()
}

/// Uploaded files listed on a fetched entry's media field (`images` array or
/// a single `image` object).
pub fn uploaded_from_entry(media: &serde_json::Value) -> Vec<UploadedFile> {
    let one = |v: &serde_json::Value| {
        Some(UploadedFile {
            id: v["id"].as_i64()?,
            name: v["name"].as_str().unwrap_or_default().to_owned(),
            url: v["url"].as_str().unwrap_or_default().to_owned(),
        })
    };
    match media {
        serde_json::Value::Array(items) => items.iter().filter_map(one).collect(),
        serde_json::Value::Object(_) => one(media).into_iter().collect(),
        _ => Vec::new(),
    }
}

#[component]
pub fn ImageUploader(
    images: RwSignal<Vec<UploadedFile>>,
    on_change: Callback<Vec<i64>>,
    /// Entry media field uploads attach to directly.
    #[prop(optional_no_strip)]
    target: Option<UploadTarget>,
    #[prop(optional)] single: bool,
    #[prop(optional, into)] disabled: Signal<bool>,
) -> impl IntoView {
    let ctx = expect_context::<SessionContext>();
    let uploading = RwSignal::new(0_usize);
    let error = RwSignal::new(None::<String>);

    let api = ctx.api();
    let on_pick = move |ev: leptos::ev::Event| {
        let files = picked_files(&ev);
        if files.is_empty() {
            return;
        }
        error.set(None);
        uploading.update(|n| *n += files.len());
        let api = api.clone();
        let target = target.clone();
        spawn(async move {
            for file in files {
                let stored = match read(file).await {
                    Ok(upload) => api.upload(upload, target.as_ref()).await.map_err(|e| e.to_string()),
                    Err(e) => Err(e),
                };
                match stored {
                    Ok(stored) => {
                        images.update(|all| add_upload(all, stored, single));
                        on_change.run(image_ids(&images.get_untracked()));
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "image upload failed");
                        error.set(Some(e));
                    }
                }
                uploading.update(|n| *n = n.saturating_sub(1));
            }
        });
    };

    let api = ctx.api();
    let remove = Callback::new(move |id: i64| {
        let api = api.clone();
        spawn(async move {
            match api.delete_upload(id).await {
                Ok(()) => {
                    images.update(|all| all.retain(|i| i.id != id));
                    on_change.run(image_ids(&images.get_untracked()));
                }
                Err(e) => {
                    tracing::warn!(error = %e, id, "image delete failed");
                    error.set(Some(e.to_string()));
                }
            }
        });
    });

    view! {
        <div class="image-uploader">
            <input
                type="file"
                accept="image/*"
                multiple=!single
                disabled=move || { disabled.get() || uploading.get() > 0 }
                on:change=on_pick
            />
            <Show when=move || { uploading.get() > 0 }>
                <p class="image-uploader__status">"Uploading..."</p>
            </Show>
            <ul class="image-uploader__list">
                {move || {
                    images
                        .get()
                        .into_iter()
                        .map(|image| {
                            let id = image.id;
                            view! {
                                <li>
                                    <img src=image.url alt=image.name/>
                                    <button type="button" on:click=move |_| remove.run(id)>"x"</button>
                                </li>
                            }
                        })
                        .collect_view()
                }}
            </ul>
            <Show when=move || error.get().is_some()>
                <p class="page-error">{move || error.get().unwrap_or_default()}</p>
            </Show>
        </div>
    }
}
