use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use sf_api_types::{
    AddToCartForm, CartResponse, LineId, MutationResponse, ProductDetail, ProductId,
};
use sf_store_client::{
    CART_PATH, CLEAR_CART_PATH, CSRF_COOKIE, CSRF_HEADER, StoreApi, StoreError, StoreResult,
    add_to_cart_path, cookie_value, product_path, remove_line_path,
};
use std::sync::Arc;
use tracing::{debug, warn};

pub const DEFAULT_STOREFRONT_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpStoreConfig {
    pub base_url: String,
    /// Sent as `X-CSRFToken` instead of the cookie value when set.
    pub csrf_token: Option<String>,
}

impl HttpStoreConfig {
    /// Reads `STOREFRONT_URL` (default `http://localhost:8000`) and
    /// `STOREFRONT_CSRF_TOKEN`.
    pub fn from_env() -> Self {
        let base_url = std::env::var("STOREFRONT_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_STOREFRONT_URL.to_owned());
        let csrf_token = std::env::var("STOREFRONT_CSRF_TOKEN")
            .ok()
            .filter(|v| !v.trim().is_empty());
        Self::new(base_url, csrf_token)
    }

    pub fn new(base_url: impl Into<String>, csrf_token: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            csrf_token,
        }
    }
}

/// Storefront backend client over HTTP.
///
/// Keeps the session and CSRF cookies the backend hands out in a cookie jar
/// and echoes the CSRF cookie in the `X-CSRFToken` header on every POST.
pub struct HttpStoreClient {
    base_url: Url,
    http: reqwest::Client,
    jar: Arc<Jar>,
    csrf_override: Option<String>,
}

impl HttpStoreClient {
    pub fn new(config: HttpStoreConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("invalid storefront URL '{}'", config.base_url))?;
        let jar = Arc::new(Jar::default());
        let http = reqwest::Client::builder()
            .cookie_provider(jar.clone())
            .build()
            .context("building storefront HTTP client")?;

        Ok(Self {
            base_url,
            http,
            jar,
            csrf_override: config.csrf_token,
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(HttpStoreConfig::from_env())
    }

    fn url(&self, path: &str) -> StoreResult<Url> {
        self.base_url
            .join(path)
            .map_err(|err| StoreError::Transport(format!("bad path {path}: {err}")))
    }

    fn csrf_token(&self) -> Option<String> {
        if let Some(token) = &self.csrf_override {
            return Some(token.clone());
        }
        let header = self.jar.cookies(&self.base_url)?;
        let cookies = header.to_str().ok()?;
        cookie_value(cookies, CSRF_COOKIE)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> StoreResult<T> {
        let url = self.url(path)?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| StoreError::Transport(format!("GET {path}: {err}")))?;
        read_json(path, response).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Option<&AddToCartForm>,
    ) -> StoreResult<T> {
        let url = self.url(path)?;
        let mut request = self.http.post(url);

        match self.csrf_token() {
            Some(token) => request = request.header(CSRF_HEADER, token),
            None => warn!("no {CSRF_COOKIE} cookie yet; POST {path} is sent without a CSRF token"),
        }
        if let Some(form) = form {
            request = request.form(&form.pairs());
        }

        let response = request
            .send()
            .await
            .map_err(|err| StoreError::Transport(format!("POST {path}: {err}")))?;
        read_json(path, response).await
    }
}

async fn read_json<T: DeserializeOwned>(path: &str, response: reqwest::Response) -> StoreResult<T> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|err| StoreError::Transport(format!("{path}: reading body: {err}")))?;

    if !status.is_success() {
        return Err(StoreError::Status {
            status: status.as_u16(),
            body: text,
        });
    }
    if status == StatusCode::NO_CONTENT || text.trim().is_empty() {
        debug!("{path} answered with an empty body");
        return serde_json::from_str("{}").map_err(|err| StoreError::Decode(format!("{path}: {err}")));
    }

    serde_json::from_str(&text).map_err(|err| StoreError::Decode(format!("{path}: {err}")))
}

#[async_trait(?Send)]
impl StoreApi for HttpStoreClient {
    async fn fetch_cart(&self) -> StoreResult<CartResponse> {
        self.get_json(CART_PATH).await
    }

    async fn remove_line(&self, line_id: LineId) -> StoreResult<MutationResponse> {
        self.post_json(&remove_line_path(line_id), None).await
    }

    async fn clear_cart(&self) -> StoreResult<MutationResponse> {
        self.post_json(CLEAR_CART_PATH, None).await
    }

    async fn add_to_cart(
        &self,
        product_id: ProductId,
        form: &AddToCartForm,
    ) -> StoreResult<MutationResponse> {
        self.post_json(&add_to_cart_path(product_id), Some(form)).await
    }

    async fn fetch_product(&self, product_id: ProductId) -> StoreResult<ProductDetail> {
        self.get_json(&product_path(product_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Form, Json, Router,
        extract::{Path, State},
        http::{HeaderMap, StatusCode, header},
        response::IntoResponse,
        routing::{get, post},
    };
    use rust_decimal::Decimal;
    use serde::Deserialize;
    use sf_api_types::{AdditiveId, CartLine, ProductAdditive, ProductVariant, VariantId};
    use sf_cart_core::{
        CartClient, CartStore, CartView, ProductModal, StorefrontConfig, SubmitOutcome,
    };
    use std::rc::Rc;
    use std::str::FromStr;
    use std::sync::Mutex;

    /// Minimal in-process stand-in for the storefront backend.
    #[derive(Default)]
    struct FakeBackend {
        lines: Vec<CartLine>,
        next_line: u64,
        csrf_seen: Vec<Option<String>>,
        broken_cart: bool,
    }

    type Shared = Arc<Mutex<FakeBackend>>;

    #[derive(Debug, Deserialize)]
    struct AddForm {
        variant_id: u64,
        additive_ids: String,
        quantity: u32,
    }

    fn dec(raw: &str) -> Decimal {
        Decimal::from_str(raw).unwrap()
    }

    fn latte() -> ProductDetail {
        ProductDetail {
            name: "Latte".to_owned(),
            description: "Espresso and milk".to_owned(),
            currency: "USD".to_owned(),
            images: vec![],
            variants: vec![
                ProductVariant { id: VariantId(1), code: "S".to_owned(), price: dec("5.00") },
                ProductVariant { id: VariantId(2), code: "L".to_owned(), price: dec("8.00") },
            ],
            additives: vec![ProductAdditive {
                id: AdditiveId(10),
                name: "Vanilla".to_owned(),
                price: dec("1.50"),
                image: None,
            }],
        }
    }

    fn record_csrf(state: &Shared, headers: &HeaderMap) {
        let token = headers
            .get(CSRF_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        state.lock().unwrap().csrf_seen.push(token);
    }

    async fn cart(State(state): State<Shared>) -> impl IntoResponse {
        let backend = state.lock().unwrap();
        let body = if backend.broken_cart {
            "<html>oops</html>".to_owned()
        } else {
            serde_json::json!({ "cart": backend.lines }).to_string()
        };
        (
            [
                (header::SET_COOKIE, "csrftoken=abc%2F123; Path=/"),
                (header::CONTENT_TYPE, "application/json"),
            ],
            body,
        )
    }

    async fn product(Path(id): Path<u64>) -> impl IntoResponse {
        if id == 1 {
            Json(latte()).into_response()
        } else {
            (StatusCode::NOT_FOUND, Json(serde_json::json!({ "error": "not found" }))).into_response()
        }
    }

    async fn add(
        State(state): State<Shared>,
        Path(product_id): Path<u64>,
        headers: HeaderMap,
        Form(form): Form<AddForm>,
    ) -> impl IntoResponse {
        record_csrf(&state, &headers);
        let detail = latte();
        let Some(variant) = detail.variant(VariantId(form.variant_id)).cloned() else {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": "Invalid product or variant" })),
            );
        };
        let additives: Vec<&ProductAdditive> = form
            .additive_ids
            .split(',')
            .filter_map(|raw| raw.parse::<u64>().ok())
            .filter_map(|id| detail.additive(AdditiveId(id)))
            .collect();
        let extras: Decimal = additives.iter().map(|a| a.price).sum();

        let mut backend = state.lock().unwrap();
        backend.next_line += 1;
        let line = CartLine {
            id: LineId(backend.next_line),
            name: format!("{} #{product_id}", detail.name),
            size: variant.code.clone(),
            quantity: form.quantity,
            additives: additives.iter().map(|a| a.name.clone()).collect(),
            total_price: (variant.price + extras) * Decimal::from(form.quantity),
        };
        backend.lines.push(line);
        (StatusCode::OK, Json(serde_json::json!({ "message": "Product added to cart" })))
    }

    async fn remove(
        State(state): State<Shared>,
        Path(line_id): Path<u64>,
        headers: HeaderMap,
    ) -> Json<serde_json::Value> {
        record_csrf(&state, &headers);
        state.lock().unwrap().lines.retain(|l| l.id != LineId(line_id));
        Json(serde_json::json!({ "message": "Product removed from cart" }))
    }

    async fn clear(State(state): State<Shared>, headers: HeaderMap) -> Json<serde_json::Value> {
        record_csrf(&state, &headers);
        state.lock().unwrap().lines.clear();
        Json(serde_json::json!({ "message": "Cart cleared" }))
    }

    async fn spawn_backend() -> anyhow::Result<(String, Shared)> {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let state: Shared = Arc::default();
        let app = Router::new()
            .route("/cart/", get(cart))
            .route("/cart/add/{id}/", post(add))
            .route("/cart/remove/{id}/", post(remove))
            .route("/cart/clear/", post(clear))
            .route("/product/{id}/", get(product))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Ok((format!("http://{addr}"), state))
    }

    #[test]
    fn config_trims_trailing_slash() {
        let config = HttpStoreConfig::new("http://shop.test/", None);
        assert_eq!(config.base_url, "http://shop.test");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(HttpStoreClient::new(HttpStoreConfig::new("not a url", None)).is_err());
    }

    #[tokio::test]
    async fn fetches_cart_and_product() -> anyhow::Result<()> {
        let (base, _) = spawn_backend().await?;
        let client = HttpStoreClient::new(HttpStoreConfig::new(base, None))?;

        assert!(client.fetch_cart().await?.into_lines().is_empty());
        let detail = client.fetch_product(ProductId(1)).await?;
        assert_eq!(detail.variants.len(), 2);
        assert_eq!(detail.variants[1].price, dec("8.00"));

        Ok(())
    }

    #[tokio::test]
    async fn missing_product_is_a_status_error() -> anyhow::Result<()> {
        let (base, _) = spawn_backend().await?;
        let client = HttpStoreClient::new(HttpStoreConfig::new(base, None))?;

        let err = client.fetch_product(ProductId(9)).await.unwrap_err();
        assert!(matches!(err, StoreError::Status { status: 404, .. }));

        Ok(())
    }

    #[tokio::test]
    async fn non_json_cart_is_a_decode_error() -> anyhow::Result<()> {
        let (base, state) = spawn_backend().await?;
        state.lock().unwrap().broken_cart = true;
        let client = HttpStoreClient::new(HttpStoreConfig::new(base, None))?;

        assert!(matches!(client.fetch_cart().await, Err(StoreError::Decode(_))));

        Ok(())
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        drop(listener);
        let client = HttpStoreClient::new(HttpStoreConfig::new(format!("http://{addr}"), None))?;

        assert!(matches!(client.fetch_cart().await, Err(StoreError::Transport(_))));

        Ok(())
    }

    #[tokio::test]
    async fn posts_echo_the_csrf_cookie() -> anyhow::Result<()> {
        let (base, state) = spawn_backend().await?;
        let client = HttpStoreClient::new(HttpStoreConfig::new(base, None))?;

        client.fetch_cart().await?;
        client.clear_cart().await?;

        let seen = state.lock().unwrap().csrf_seen.clone();
        assert_eq!(seen, vec![Some("abc/123".to_owned())]);

        Ok(())
    }

    #[tokio::test]
    async fn configured_csrf_token_wins() -> anyhow::Result<()> {
        let (base, state) = spawn_backend().await?;
        let client = HttpStoreClient::new(HttpStoreConfig::new(base, Some("fixed".to_owned())))?;

        client.remove_line(LineId(1)).await?;

        let seen = state.lock().unwrap().csrf_seen.clone();
        assert_eq!(seen, vec![Some("fixed".to_owned())]);

        Ok(())
    }

    #[tokio::test]
    async fn modal_to_cart_flow_against_backend() -> anyhow::Result<()> {
        let (base, _) = spawn_backend().await?;
        let api = Rc::new(HttpStoreClient::new(HttpStoreConfig::new(base, None))?);
        let config = Rc::new(StorefrontConfig::default());
        let cart = CartClient::new(api.clone(), CartStore::new(), config.clone());
        let modal = ProductModal::new(api, cart.clone(), config);

        cart.load_cart().await?;
        assert_eq!(cart.view().count(), "0");

        modal.open(ProductId(1)).await?;
        modal.select_variant(VariantId(2))?;
        modal.toggle_additive(AdditiveId(10))?;
        assert_eq!(modal.price_text().as_deref(), Some("9.50 USD"));
        assert_eq!(modal.add_to_cart().await?, SubmitOutcome::Added);
        cart.reveal().await?;

        assert!(cart.store().is_open());
        let CartView::Lines { lines, count, total } = cart.view() else {
            panic!("expected a rendered cart line");
        };
        assert_eq!(count, "1");
        assert_eq!(total, "9.50 USD");
        assert_eq!(lines[0].additives, "Additives: Vanilla");

        cart.remove_line(lines[0].id).await?;
        assert_eq!(cart.view().total(), "0.00 USD");

        Ok(())
    }
}
