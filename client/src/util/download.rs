//! Browser file glue: reading picked files and saving downloaded blobs.
//!
//! SYSTEM CONTEXT
//! ==============
//! Only compiled for hydrate builds. Pages call these helpers so the
//! web-sys plumbing stays out of page and state logic.

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;

/// Wrap bytes in a `Blob` with the given MIME type.
///
/// # Errors
///
/// Returns the JS exception if the blob cannot be constructed.
pub fn blob_from_bytes(bytes: &[u8], content_type: &str) -> Result<web_sys::Blob, JsValue> {
    let array = js_sys::Uint8Array::from(bytes);
    let parts = js_sys::Array::new();
    parts.push(&array.buffer());
    let options = web_sys::BlobPropertyBag::new();
    options.set_type(content_type);
    web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
}

/// Read a picked `File` into memory as `(name, mime, bytes)`.
///
/// # Errors
///
/// Returns the JS exception if the read promise rejects.
pub async fn read_file(file: web_sys::File) -> Result<(String, String, Vec<u8>), JsValue> {
    let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer()).await?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    Ok((file.name(), file.type_(), bytes))
}

/// Save bytes as a file via a temporary object URL and anchor click.
///
/// # Errors
///
/// Returns the JS exception if any DOM step fails.
pub fn save_bytes(bytes: &[u8], content_type: &str, file_name: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;
    let blob = blob_from_bytes(bytes, content_type)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)?;

    let anchor: web_sys::HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();

    web_sys::Url::revoke_object_url(&url)
}
