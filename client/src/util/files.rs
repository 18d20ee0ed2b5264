//! Files picked in an `<input type="file">`, read into memory for upload.
//!
//! Natively there is no file input, so [`picked_files`] finds nothing and
//! [`PickedFile`] has no values.

use leptos::ev::Event;
use storefront::api::UploadFile;

/// Used when the browser reports no type for a file.
#[cfg_attr(not(feature = "csr"), allow(dead_code))]
const FALLBACK_MIME: &str = "application/octet-stream";

#[cfg(feature = "csr")]
pub struct PickedFile(web_sys::File);

#[cfg(not(feature = "csr"))]
pub enum PickedFile {}

/// Files selected by the change event of a file input.
pub fn picked_files(ev: &Event) -> Vec<PickedFile> {
    #[cfg(feature = "csr")]
    {
        use wasm_bindgen::JsCast;

        let Some(list) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
            .and_then(|input| input.files())
        else {
            return Vec::new();
        };
        (0..list.length()).filter_map(|i| list.get(i)).map(PickedFile).collect()
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = ev;
        Vec::new()
    }
}

/// Read a picked file's bytes.
///
/// # Errors
///
/// The browser's read failure, rendered as text.
pub async fn read(file: PickedFile) -> Result<UploadFile, String> {
    #[cfg(feature = "csr")]
    {
        let buffer = wasm_bindgen_futures::JsFuture::from(file.0.array_buffer())
            .await
            .map_err(|e| format!("could not read {}: {e:?}", file.0.name()))?;
        let mime = file.0.type_();
        Ok(UploadFile {
            name: file.0.name(),
            mime: if mime.is_empty() { FALLBACK_MIME.to_owned() } else { mime },
            bytes: js_sys::Uint8Array::new(&buffer).to_vec(),
        })
    }
    #[cfg(not(feature = "csr"))]
    {
        match file {}
    }
}
