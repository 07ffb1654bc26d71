//! DOM element bindings.
//!
//! Element groups are resolved once at startup. A page carries the cart
//! sidebar, the product modal, both, or neither (the admin pages only have
//! lightbox previews), so each group is optional as a whole but complete when
//! present.

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement};

// ── Helpers ──

pub fn document() -> Document {
    gloo_utils::document()
}

pub fn window() -> web_sys::Window {
    gloo_utils::window()
}

pub fn body() -> HtmlElement {
    gloo_utils::body()
}

pub fn by_id(id: &str) -> Option<Element> {
    document().get_element_by_id(id)
}

pub fn query(selector: &str) -> Option<Element> {
    document().query_selector(selector).ok()?
}

pub fn query_all(selector: &str) -> Vec<Element> {
    match document().query_selector_all(selector) {
        Ok(list) => collect_elements(&list),
        Err(_) => Vec::new(),
    }
}

/// Query all matching elements within a parent element.
pub fn query_all_within(parent: &Element, selector: &str) -> Vec<Element> {
    match parent.query_selector_all(selector) {
        Ok(list) => collect_elements(&list),
        Err(_) => Vec::new(),
    }
}

fn collect_elements(list: &web_sys::NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn clear(el: &Element) {
    el.set_inner_html("");
}

pub fn add_class(el: &Element, cls: &str) {
    let _ = el.class_list().add_1(cls);
}

pub fn remove_class(el: &Element, cls: &str) {
    let _ = el.class_list().remove_1(cls);
}

pub fn toggle_class(el: &Element, cls: &str, force: bool) {
    let _ = el.class_list().toggle_with_force(cls, force);
}

pub fn create_element(tag: &str) -> Result<Element, JsValue> {
    document().create_element(tag)
}

/// Create an element with a class attribute and optional text.
pub fn element_with(tag: &str, class: &str, text: Option<&str>) -> Result<Element, JsValue> {
    let el = create_element(tag)?;
    if !class.is_empty() {
        el.set_class_name(class);
    }
    if let Some(text) = text {
        el.set_text_content(Some(text));
    }
    Ok(el)
}

/// Walk up from an event target to the nearest element matching `selector`.
pub fn closest_from_event(event: &web_sys::Event, selector: &str) -> Option<Element> {
    let target = event.target()?;
    let el = target.dyn_ref::<Element>()?;
    el.closest(selector).ok().flatten()
}

/// Read a numeric `data-*` attribute.
pub fn data_u64(el: &Element, attr: &str) -> Option<u64> {
    el.get_attribute(attr)?.trim().parse().ok()
}

// ── Element groups ──

/// Cart sidebar (`#cartSidebar` and its parts).
#[derive(Clone)]
pub struct CartElements {
    pub cart_icon: Element,
    pub cart_sidebar: Element,
    pub close_cart: Element,
    pub cart_items: Element,
    pub cart_count: Element,
    pub cart_total: Element,
    /// Optional "clear cart" control.
    pub clear_cart: Option<Element>,
}

/// Product detail modal (`#productModal` and its parts).
#[derive(Clone)]
pub struct ModalElements {
    pub product_modal: Element,
    pub modal_label: Element,
    pub product_name: Element,
    pub product_description: Element,
    pub product_price: Element,
    pub carousel_inner: Element,
    pub product_sizes: Element,
    pub product_additives: Element,
    pub add_to_cart_btn: Element,
}

/// All DOM element references used by the storefront scripts.
/// Clone-friendly (all inner types are reference-counted via JS GC).
#[derive(Clone)]
pub struct Elements {
    pub cart: Option<CartElements>,
    pub modal: Option<ModalElements>,
    pub product_cards: Vec<Element>,
    pub image_previews: Vec<Element>,
}

macro_rules! get_el {
    ($id:expr) => {
        by_id($id).ok_or_else(|| JsValue::from_str(&format!("missing element #{}", $id)))?
    };
}

impl CartElements {
    fn bind() -> Result<Option<CartElements>, JsValue> {
        if by_id("cartSidebar").is_none() {
            return Ok(None);
        }
        Ok(Some(CartElements {
            cart_icon: get_el!("cartIcon"),
            cart_sidebar: get_el!("cartSidebar"),
            close_cart: get_el!("closeCart"),
            cart_items: get_el!("cartItems"),
            cart_count: get_el!("cartCount"),
            cart_total: get_el!("cartTotal"),
            clear_cart: by_id("clearCart"),
        }))
    }
}

impl ModalElements {
    fn bind() -> Result<Option<ModalElements>, JsValue> {
        if by_id("productModal").is_none() {
            return Ok(None);
        }
        Ok(Some(ModalElements {
            product_modal: get_el!("productModal"),
            modal_label: get_el!("productModalLabel"),
            product_name: get_el!("productName"),
            product_description: get_el!("productDescription"),
            product_price: get_el!("productPrice"),
            carousel_inner: query("#productModal .carousel-inner")
                .ok_or_else(|| JsValue::from_str("missing #productModal .carousel-inner"))?,
            product_sizes: get_el!("productSizes"),
            product_additives: get_el!("productAdditives"),
            add_to_cart_btn: get_el!("addToCartBtn"),
        }))
    }
}

impl Elements {
    /// Resolve all DOM references. Call once after the document is parsed.
    pub fn bind() -> Result<Elements, JsValue> {
        Ok(Elements {
            cart: CartElements::bind()?,
            modal: ModalElements::bind()?,
            product_cards: query_all(".card"),
            image_previews: query_all(".image-preview"),
        })
    }
}
