//! Storefront WASM frontend
//!
//! Drives the cart sidebar, the product detail modal and the admin image
//! lightbox. Each concern lives in its own module; state and business rules
//! come from `sf-cart-core`.

pub mod api;
pub mod cart_sidebar;
pub mod dom;
pub mod events;
pub mod lightbox;
pub mod product_modal;
pub mod state;

use sf_cart_core::StorefrontConfig;
use wasm_bindgen::prelude::*;

/// WASM entry point, called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    init().await
}

async fn init() -> Result<(), JsValue> {
    state::install(state::Storefront::new(
        api::FetchStoreClient::from_page(),
        StorefrontConfig::default(),
    ));

    let els = dom::Elements::bind()?;

    events::bind_events(&els)?;
    lightbox::bind_previews(&els.image_previews);

    // Initial render of the sidebar.
    if let Some(cart) = &els.cart {
        cart_sidebar::apply_visibility(cart);
        cart_sidebar::load_cart(cart).await;
    }

    Ok(())
}
