//! Product detail modal.
//!
//! Renders the [`ModalSession`] produced by the core controller into the
//! Bootstrap modal and keeps highlights and price in step with the
//! selection. Picker clicks are delegated from the containers, so the
//! per-product buttons carry no listeners of their own.

use crate::cart_sidebar;
use crate::dom::{self, CartElements, ModalElements};
use crate::state;
use sf_api_types::{AdditiveId, ProductId, VariantId};
use sf_cart_core::{ModalSession, OpenOutcome, SubmitOutcome};
use wasm_bindgen::prelude::*;
use web_sys::Element;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = bootstrap, js_name = Modal)]
    type BootstrapModal;

    #[wasm_bindgen(catch, static_method_of = BootstrapModal, js_namespace = bootstrap, js_class = "Modal", js_name = getOrCreateInstance)]
    fn get_or_create_instance(element: &Element) -> Result<BootstrapModal, JsValue>;

    #[wasm_bindgen(method)]
    fn show(this: &BootstrapModal);

    #[wasm_bindgen(method)]
    fn hide(this: &BootstrapModal);
}

fn show_modal(els: &ModalElements) {
    match BootstrapModal::get_or_create_instance(&els.product_modal) {
        Ok(modal) => modal.show(),
        Err(e) => gloo_console::error!("Bootstrap modal unavailable:", e),
    }
}

/// Hide the modal and drop any backdrop Bootstrap left behind.
fn dismiss_modal(els: &ModalElements) {
    if let Ok(modal) = BootstrapModal::get_or_create_instance(&els.product_modal) {
        modal.hide();
    }
    for backdrop in dom::query_all(".modal-backdrop") {
        backdrop.remove();
    }
}

/// Product card click: load the product and show the modal once it is ready.
pub async fn open_product(els: &ModalElements, product_id: ProductId) {
    let modal = state::modal();
    match modal.open(product_id).await {
        Ok(OpenOutcome::Ready) => {
            let Some(session) = modal.session() else {
                return;
            };
            if let Err(e) = render(els, &session) {
                gloo_console::error!("Error rendering product:", e);
                return;
            }
            show_modal(els);
        }
        Ok(OpenOutcome::Superseded) => {}
        Err(e) => gloo_console::error!("Error fetching product data:", e.to_string()),
    }
}

pub fn on_variant_click(els: &ModalElements, variant_id: VariantId) {
    if let Err(e) = state::modal().select_variant(variant_id) {
        gloo_console::warn!("Ignoring variant click:", e.to_string());
        return;
    }
    refresh_selection(els);
}

pub fn on_additive_click(els: &ModalElements, additive_id: AdditiveId) {
    if let Err(e) = state::modal().toggle_additive(additive_id) {
        gloo_console::warn!("Ignoring additive click:", e.to_string());
        return;
    }
    refresh_selection(els);
}

/// "Add to Cart": submit, dismiss, then reveal the refreshed cart after the
/// dismiss animation. A response that lands after the shopper moved on
/// leaves the current modal alone and only refreshes the cart contents.
pub async fn on_add_to_cart(els: &ModalElements, cart_els: Option<&CartElements>) {
    let modal = state::modal();
    match modal.add_to_cart().await {
        Ok(SubmitOutcome::Added) => {}
        Ok(SubmitOutcome::Superseded) => {
            if let Some(cart_els) = cart_els {
                cart_sidebar::load_cart(cart_els).await;
            }
            return;
        }
        Err(e) => {
            gloo_console::error!("Error adding to cart:", e.to_string());
            return;
        }
    }

    dismiss_modal(els);
    gloo_timers::future::sleep(modal.config().reveal_delay).await;

    match cart_els {
        Some(cart_els) => cart_sidebar::reveal(cart_els).await,
        None => {
            let cart = modal.cart();
            cart.open();
            if let Err(e) = cart.load_cart().await {
                gloo_console::error!("Error fetching cart:", e.to_string());
            }
        }
    }
}

/// Bootstrap finished hiding the modal (close button, backdrop, Esc).
pub fn on_hidden() {
    state::modal().close();
}

// ── Rendering ──

fn render(els: &ModalElements, session: &ModalSession) -> Result<(), JsValue> {
    let modal = state::modal();
    let config = modal.config();
    let detail = &session.detail;

    dom::set_text(&els.modal_label, &detail.name);
    dom::set_text(&els.product_name, &detail.name);
    dom::set_text(&els.product_description, &detail.description);

    dom::set_text(&els.product_price, &session.price_text());
    dom::remove_class(&els.product_price, "text-secondary");
    dom::add_class(&els.product_price, "text-primary");

    dom::clear(&els.carousel_inner);
    for slide in session.carousel(config) {
        let class = if slide.active { "carousel-item active" } else { "carousel-item" };
        let item = dom::element_with("div", class, None)?;
        let img = dom::element_with("img", "d-block w-100 rounded", None)?;
        img.set_attribute("src", &slide.src)?;
        img.set_attribute("alt", &slide.alt)?;
        item.append_child(&img)?;
        els.carousel_inner.append_child(&item)?;
    }

    dom::clear(&els.product_sizes);
    for control in session.variant_controls() {
        let button = dom::element_with(
            "button",
            "btn btn-outline-primary size-btn",
            Some(control.label.as_str()),
        )?;
        button.set_attribute("type", "button")?;
        button.set_attribute("data-variant-id", &control.id.to_string())?;
        dom::toggle_class(&button, "active", control.active);
        els.product_sizes.append_child(&button)?;
    }

    dom::clear(&els.product_additives);
    for control in session.additive_controls(config) {
        let tile = dom::element_with("div", "additive", None)?;
        tile.set_attribute("data-additive-id", &control.id.to_string())?;

        let img = dom::element_with("img", "img-thumbnail", None)?;
        img.set_attribute("src", &control.image)?;
        img.set_attribute("alt", &control.name)?;
        tile.append_child(&img)?;
        tile.append_child(&dom::element_with("p", "small", Some(control.name.as_str()))?.into())?;
        tile.append_child(&dom::element_with(
            "span",
            "price-badge btn btn-outline-primary",
            Some(control.badge.as_str()),
        )?.into())?;

        paint_additive(&tile, control.selected);
        els.product_additives.append_child(&tile)?;
    }

    Ok(())
}

/// Re-apply highlights and price after a selection change.
fn refresh_selection(els: &ModalElements) {
    let Some(session) = state::modal().session() else {
        return;
    };

    dom::set_text(&els.product_price, &session.price_text());

    let active = session.selection.variant();
    for button in dom::query_all_within(&els.product_sizes, ".size-btn") {
        let id = dom::data_u64(&button, "data-variant-id").map(VariantId);
        dom::toggle_class(&button, "active", id.is_some() && id == active);
    }

    for tile in dom::query_all_within(&els.product_additives, ".additive") {
        let selected = dom::data_u64(&tile, "data-additive-id")
            .map(|id| session.selection.has_additive(AdditiveId(id)))
            .unwrap_or(false);
        paint_additive(&tile, selected);
    }
}

fn paint_additive(tile: &Element, selected: bool) {
    dom::toggle_class(tile, "selected", selected);
    for badge in dom::query_all_within(tile, ".price-badge") {
        dom::toggle_class(&badge, "btn-primary", selected);
        dom::toggle_class(&badge, "text-white", selected);
        dom::toggle_class(&badge, "btn-outline-primary", !selected);
    }
}
