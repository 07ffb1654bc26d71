use async_trait::async_trait;
use percent_encoding::percent_decode_str;
use sf_api_types::{
    AddToCartForm, CartResponse, LineId, MutationResponse, ProductDetail, ProductId,
};
use thiserror::Error;

pub const CSRF_COOKIE: &str = "csrftoken";
pub const CSRF_HEADER: &str = "X-CSRFToken";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("browser error: {0}")]
    Browser(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Backend operations the storefront front end depends on.
///
/// Futures are not required to be `Send`: the browser implementation runs on
/// the single UI thread.
#[async_trait(?Send)]
pub trait StoreApi {
    async fn fetch_cart(&self) -> StoreResult<CartResponse>;
    async fn remove_line(&self, line_id: LineId) -> StoreResult<MutationResponse>;
    async fn clear_cart(&self) -> StoreResult<MutationResponse>;
    async fn add_to_cart(
        &self,
        product_id: ProductId,
        form: &AddToCartForm,
    ) -> StoreResult<MutationResponse>;
    async fn fetch_product(&self, product_id: ProductId) -> StoreResult<ProductDetail>;
}

// ── Endpoint paths ──

pub const CART_PATH: &str = "/cart/";
pub const CLEAR_CART_PATH: &str = "/cart/clear/";

pub fn remove_line_path(line_id: LineId) -> String {
    format!("/cart/remove/{line_id}/")
}

pub fn add_to_cart_path(product_id: ProductId) -> String {
    format!("/cart/add/{product_id}/")
}

pub fn product_path(product_id: ProductId) -> String {
    format!("/product/{product_id}/")
}

/// Find `name` in a `Cookie`-style header (`a=1; b=2`) and percent-decode it.
pub fn cookie_value(cookies: &str, name: &str) -> Option<String> {
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            (key == name).then_some(value)
        })
        .map(|raw| percent_decode_str(raw).decode_utf8_lossy().into_owned())
}
