use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use esistatus_core::refresh::{FetchFuture, Fragment, FragmentSource};
use esistatus_core::{EsiStatusError, Result};

/// [`FragmentSource`] over the browser's `fetch`.
pub struct HttpFragmentSource {
    url: String,
}

impl HttpFragmentSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl FragmentSource for HttpFragmentSource {
    fn fetch(&self) -> FetchFuture<'_> {
        Box::pin(async move {
            match fetch_text(&self.url).await {
                Ok(body) => Ok(Fragment::new(body)),
                Err(err) => {
                    // Mirror the failure to the diagnostic console; the
                    // refresher swallows it and keeps the current content.
                    web_sys::console::error_1(&JsValue::from_str(&err.to_string()));
                    Err(err)
                }
            }
        })
    }
}

async fn fetch_text(url: &str) -> Result<String> {
    let window =
        web_sys::window().ok_or_else(|| EsiStatusError::request_failed(url, "no window"))?;

    let response: Response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| EsiStatusError::request_failed(url, js_reason(&e)))?
        .dyn_into()
        .map_err(|_| EsiStatusError::request_failed(url, "not a Response"))?;

    if !response.ok() {
        return Err(EsiStatusError::request_failed(
            url,
            format!("{} - {}", response.status(), response.status_text()),
        ));
    }

    let text = JsFuture::from(
        response
            .text()
            .map_err(|e| EsiStatusError::request_failed(url, js_reason(&e)))?,
    )
    .await
    .map_err(|e| EsiStatusError::request_failed(url, js_reason(&e)))?;

    Ok(text.as_string().unwrap_or_default())
}

fn js_reason(value: &JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}
