//! HTTP API client.
//!
//! Wraps `fetch` for requests to the storefront backend and implements
//! [`StoreApi`] on top of it. Requests are same-origin unless the page sets
//! `<body data-api-base="...">`.

use crate::dom;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use sf_api_types::{
    AddToCartForm, CartResponse, LineId, MutationResponse, ProductDetail, ProductId,
};
use sf_store_client::{
    CART_PATH, CLEAR_CART_PATH, CSRF_COOKIE, CSRF_HEADER, StoreApi, StoreError, StoreResult,
    add_to_cart_path, cookie_value, product_path, remove_line_path,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, HtmlDocument, Request, RequestCredentials, RequestInit, Response, UrlSearchParams};

/// Determine the API base URL.
///
/// Priority: `data-api-base` on `<body>` → same origin (empty prefix).
pub fn base_url() -> String {
    dom::body()
        .get_attribute("data-api-base")
        .map(|v| v.trim().trim_end_matches('/').to_string())
        .unwrap_or_default()
}

/// Current value of the CSRF cookie, if the backend has set one.
pub fn csrf_token() -> Option<String> {
    let doc: HtmlDocument = dom::document().dyn_into().ok()?;
    let cookies = doc.cookie().ok()?;
    cookie_value(&cookies, CSRF_COOKIE)
}

fn js_error(context: &str, err: JsValue) -> StoreError {
    let detail = err
        .as_string()
        .or_else(|| err.dyn_ref::<js_sys::Error>().map(|e| String::from(e.message())))
        .unwrap_or_else(|| format!("{err:?}"));
    StoreError::Browser(format!("{context}: {detail}"))
}

/// `fetch`-backed store client.
pub struct FetchStoreClient {
    base_url: String,
}

impl FetchStoreClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn from_page() -> Self {
        Self::new(base_url())
    }

    /// Perform a fetch request and decode the JSON body into `T`.
    async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        method: &str,
        form: Option<&AddToCartForm>,
    ) -> StoreResult<T> {
        let url = format!("{}{}", self.base_url, path);

        let opts = RequestInit::new();
        opts.set_method(method);
        opts.set_credentials(RequestCredentials::SameOrigin);

        let headers = Headers::new().map_err(|e| js_error("headers", e))?;
        if method != "GET" {
            if let Some(token) = csrf_token() {
                headers
                    .set(CSRF_HEADER, &token)
                    .map_err(|e| js_error("headers", e))?;
            }
        }

        if let Some(form) = form {
            let params = UrlSearchParams::new().map_err(|e| js_error("form", e))?;
            for (key, value) in form.pairs() {
                params.append(key, &value);
            }
            headers
                .set("Content-Type", "application/x-www-form-urlencoded")
                .map_err(|e| js_error("headers", e))?;
            opts.set_body(&params);
        }

        opts.set_headers(&headers);

        let request =
            Request::new_with_str_and_init(&url, &opts).map_err(|e| js_error("request", e))?;

        let resp_value = JsFuture::from(dom::window().fetch_with_request(&request))
            .await
            .map_err(|e| StoreError::Transport(format!("{method} {path}: {e:?}")))?;

        let resp: Response = resp_value
            .dyn_into()
            .map_err(|_| StoreError::Browser("response is not a Response".to_string()))?;

        let text_promise = resp.text().map_err(|e| js_error("body", e))?;
        let text = JsFuture::from(text_promise)
            .await
            .map_err(|e| StoreError::Transport(format!("{method} {path}: reading body: {e:?}")))?
            .as_string()
            .unwrap_or_default();

        if !resp.ok() {
            return Err(StoreError::Status {
                status: resp.status(),
                body: text,
            });
        }

        let body = if text.trim().is_empty() { "{}" } else { text.as_str() };
        serde_json::from_str(body)
            .map_err(|e| StoreError::Decode(format!("{path}: {e}")))
    }
}

#[async_trait(?Send)]
impl StoreApi for FetchStoreClient {
    async fn fetch_cart(&self) -> StoreResult<CartResponse> {
        self.request(CART_PATH, "GET", None).await
    }

    async fn remove_line(&self, line_id: LineId) -> StoreResult<MutationResponse> {
        self.request(&remove_line_path(line_id), "POST", None).await
    }

    async fn clear_cart(&self) -> StoreResult<MutationResponse> {
        self.request(CLEAR_CART_PATH, "POST", None).await
    }

    async fn add_to_cart(
        &self,
        product_id: ProductId,
        form: &AddToCartForm,
    ) -> StoreResult<MutationResponse> {
        self.request(&add_to_cart_path(product_id), "POST", Some(form)).await
    }

    async fn fetch_product(&self, product_id: ProductId) -> StoreResult<ProductDetail> {
        self.request(&product_path(product_id), "GET", None).await
    }
}
