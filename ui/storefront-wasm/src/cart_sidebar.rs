//! Cart sidebar rendering and actions.
//!
//! The sidebar only ever shows the last snapshot the server confirmed; a
//! failed refresh leaves whatever is on screen untouched.

use crate::dom::{self, CartElements};
use crate::state;
use sf_api_types::LineId;
use sf_cart_core::CartView;
use wasm_bindgen::prelude::*;

/// Fetch the cart and re-render on success.
pub async fn load_cart(els: &CartElements) {
    let cart = state::cart();
    match cart.load_cart().await {
        Ok(_) => render_or_log(els, &cart.view()),
        Err(e) => gloo_console::error!("Error fetching cart:", e.to_string()),
    }
}

pub async fn remove_line(els: &CartElements, line_id: LineId) {
    let cart = state::cart();
    match cart.remove_line(line_id).await {
        Ok(_) => render_or_log(els, &cart.view()),
        Err(e) => gloo_console::error!("Error fetching cart:", e.to_string()),
    }
}

pub async fn clear_cart(els: &CartElements) {
    let cart = state::cart();
    match cart.clear_cart().await {
        Ok(_) => render_or_log(els, &cart.view()),
        Err(e) => gloo_console::error!("Error fetching cart:", e.to_string()),
    }
}

/// Open the sidebar and refresh it (used after a product is added).
pub async fn reveal(els: &CartElements) {
    let cart = state::cart();
    cart.open();
    apply_visibility(els);
    load_cart(els).await;
}

pub fn toggle(els: &CartElements) {
    state::cart().toggle();
    apply_visibility(els);
}

pub fn close(els: &CartElements) {
    state::cart().close();
    apply_visibility(els);
}

pub fn apply_visibility(els: &CartElements) {
    let open = state::cart().store().is_open();
    dom::toggle_class(&els.cart_sidebar, "open", open);
}

fn render_or_log(els: &CartElements, view: &CartView) {
    if let Err(e) = render(els, view) {
        gloo_console::error!("Error rendering cart:", e);
    }
}

/// Replace the line list, count and total with `view`.
pub fn render(els: &CartElements, view: &CartView) -> Result<(), JsValue> {
    dom::clear(&els.cart_items);

    match view {
        CartView::Empty { message, .. } => {
            let placeholder = dom::element_with("p", "text-center text-muted", Some(message.as_str()))?;
            els.cart_items.append_child(&placeholder)?;
        }
        CartView::Lines { lines, .. } => {
            for line in lines {
                let item = dom::element_with("div", "cart-item", None)?;
                item.append_child(&dom::element_with("h6", "", Some(line.heading.as_str()))?.into())?;
                item.append_child(&dom::element_with("p", "", Some(line.additives.as_str()))?.into())?;
                item.append_child(&dom::element_with("p", "", Some(line.quantity.as_str()))?.into())?;
                item.append_child(&dom::element_with("p", "", Some(line.price.as_str()))?.into())?;

                let controls = dom::element_with("div", "cart-controls", None)?;
                let remove = dom::element_with(
                    "button",
                    "btn btn-sm btn-outline-danger remove-item",
                    Some("\u{00d7}"),
                )?;
                remove.set_attribute("data-id", &line.id.to_string())?;
                remove.set_attribute("title", "Remove")?;
                controls.append_child(&remove)?;
                item.append_child(&controls)?;

                els.cart_items.append_child(&item)?;
            }
        }
    }

    dom::set_text(&els.cart_count, view.count());
    dom::set_text(&els.cart_total, view.total());
    Ok(())
}
