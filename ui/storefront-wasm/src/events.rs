//! Event binding.
//!
//! Wires every page listener once at startup. Async handlers are spawned via
//! `wasm_bindgen_futures::spawn_local`. Lists that are re-rendered (cart
//! lines, variant buttons, additive tiles) are handled by a single delegated
//! listener on their container.

use crate::cart_sidebar;
use crate::dom::{self, CartElements, Elements, ModalElements};
use crate::product_modal;
use sf_api_types::{AdditiveId, LineId, ProductId, VariantId};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Element;

/// Attach an async click handler that receives a clone of `$els`.
macro_rules! on_click_async {
    ($el:expr, $els:expr, $handler:expr) => {{
        let els = $els.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            let els2 = els.clone();
            wasm_bindgen_futures::spawn_local(async move {
                $handler(&els2).await;
            });
        }) as Box<dyn FnMut(_)>);
        $el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }};
}

/// Attach a sync click handler.
macro_rules! on_click {
    ($el:expr, $cb:expr) => {{
        let cb = Closure::wrap(Box::new($cb) as Box<dyn FnMut(web_sys::MouseEvent)>);
        $el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }};
}

/// Bind all listeners for whichever element groups the page has.
pub fn bind_events(els: &Elements) -> Result<(), JsValue> {
    if let Some(cart) = &els.cart {
        bind_cart(cart)?;
    }
    if let Some(modal) = &els.modal {
        bind_modal(modal, els.cart.as_ref())?;
        bind_product_cards(&els.product_cards, modal)?;
    }
    Ok(())
}

fn bind_cart(cart: &CartElements) -> Result<(), JsValue> {
    {
        let cart2 = cart.clone();
        on_click!(cart.cart_icon, move |_: web_sys::MouseEvent| {
            cart_sidebar::toggle(&cart2);
        });
    }
    {
        let cart2 = cart.clone();
        on_click!(cart.close_cart, move |_: web_sys::MouseEvent| {
            cart_sidebar::close(&cart2);
        });
    }
    if let Some(clear) = &cart.clear_cart {
        on_click_async!(clear, cart, cart_sidebar::clear_cart);
    }

    // ── Remove buttons (delegated) ──
    {
        let cart2 = cart.clone();
        on_click!(cart.cart_items, move |event: web_sys::MouseEvent| {
            let Some(button) = dom::closest_from_event(&event, ".remove-item") else {
                return;
            };
            let Some(id) = dom::data_u64(&button, "data-id") else {
                return;
            };
            let cart3 = cart2.clone();
            wasm_bindgen_futures::spawn_local(async move {
                cart_sidebar::remove_line(&cart3, LineId(id)).await;
            });
        });
    }
    Ok(())
}

fn bind_modal(modal: &ModalElements, cart: Option<&CartElements>) -> Result<(), JsValue> {
    // ── Variant buttons (delegated) ──
    {
        let modal2 = modal.clone();
        on_click!(modal.product_sizes, move |event: web_sys::MouseEvent| {
            if let Some(id) = delegated_id(&event, ".size-btn", "data-variant-id") {
                product_modal::on_variant_click(&modal2, VariantId(id));
            }
        });
    }

    // ── Additive tiles (delegated) ──
    {
        let modal2 = modal.clone();
        on_click!(modal.product_additives, move |event: web_sys::MouseEvent| {
            if let Some(id) = delegated_id(&event, ".additive", "data-additive-id") {
                product_modal::on_additive_click(&modal2, AdditiveId(id));
            }
        });
    }

    {
        let modal2 = modal.clone();
        let cart2 = cart.cloned();
        on_click!(modal.add_to_cart_btn, move |_: web_sys::MouseEvent| {
            let modal3 = modal2.clone();
            let cart3 = cart2.clone();
            wasm_bindgen_futures::spawn_local(async move {
                product_modal::on_add_to_cart(&modal3, cart3.as_ref()).await;
            });
        });
    }

    // Bootstrap fires this for every dismissal path.
    let cb = Closure::wrap(Box::new(move |_: web_sys::Event| {
        product_modal::on_hidden();
    }) as Box<dyn FnMut(_)>);
    modal
        .product_modal
        .add_event_listener_with_callback("hidden.bs.modal", cb.as_ref().unchecked_ref())?;
    cb.forget();

    Ok(())
}

fn bind_product_cards(cards: &[Element], modal: &ModalElements) -> Result<(), JsValue> {
    for card in cards {
        let card2 = card.clone();
        let modal2 = modal.clone();
        on_click!(card, move |event: web_sys::MouseEvent| {
            event.prevent_default();
            let Some(id) = product_id_for(&card2) else {
                gloo_console::warn!("Product card has no data-id");
                return;
            };
            let modal3 = modal2.clone();
            wasm_bindgen_futures::spawn_local(async move {
                product_modal::open_product(&modal3, id).await;
            });
        });
    }
    Ok(())
}

/// The product id lives on the enclosing `<a data-id>`.
fn product_id_for(card: &Element) -> Option<ProductId> {
    let link = card.closest("a").ok().flatten()?;
    dom::data_u64(&link, "data-id").map(ProductId)
}

fn delegated_id(event: &web_sys::MouseEvent, selector: &str, attr: &str) -> Option<u64> {
    let target = dom::closest_from_event(event, selector)?;
    dom::data_u64(&target, attr)
}
