//! Click-to-enlarge overlay for admin image previews.

use crate::dom;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement};

type ClickHandler = Closure<dyn FnMut(web_sys::MouseEvent)>;

pub const OVERLAY_CLASS: &str = "lightbox-overlay";
pub const POPUP_CLASS: &str = "lightbox-popup";
pub const CLOSE_CLASS: &str = "lightbox-close";

/// One open lightbox: the dim overlay and the centred popup.
///
/// The click listeners of an opening belong to it and are released on
/// `close`, so nothing outlives the removed nodes.
#[derive(Clone)]
pub struct Lightbox {
    pub overlay: Element,
    pub popup: Element,
    listeners: Rc<RefCell<Vec<(Element, ClickHandler)>>>,
}

impl Lightbox {
    /// Remove both elements. Safe to call more than once.
    pub fn close(&self) {
        self.popup.remove();
        self.overlay.remove();

        let listeners = std::mem::take(&mut *self.listeners.borrow_mut());
        if listeners.is_empty() {
            return;
        }
        // close() may be running inside one of these handlers; drop them
        // once it has returned.
        wasm_bindgen_futures::spawn_local(async move {
            for (target, handler) in listeners {
                let _ = target
                    .remove_event_listener_with_callback("click", handler.as_ref().unchecked_ref());
            }
        });
    }

    /// Click listeners still attached to this opening.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

fn style(el: &Element, props: &[(&str, &str)]) {
    let Some(html) = el.dyn_ref::<HtmlElement>() else {
        return;
    };
    let css = html.style();
    for (name, value) in props {
        let _ = css.set_property(name, value);
    }
}

fn on_click_close(target: &Element, lightbox: &Lightbox) -> Result<(), JsValue> {
    let owner = lightbox.clone();
    let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
        owner.close();
    }) as Box<dyn FnMut(_)>);
    target.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
    lightbox.listeners.borrow_mut().push((target.clone(), cb));
    Ok(())
}

/// Show `src` enlarged above a dimmed page.
pub fn open(src: &str) -> Result<Lightbox, JsValue> {
    let overlay = dom::element_with("div", OVERLAY_CLASS, None)?;
    style(
        &overlay,
        &[
            ("position", "fixed"),
            ("top", "0"),
            ("left", "0"),
            ("width", "100%"),
            ("height", "100%"),
            ("background", "rgba(0, 0, 0, 0.5)"),
            ("z-index", "9998"),
        ],
    );

    let popup = dom::element_with("div", POPUP_CLASS, None)?;
    style(
        &popup,
        &[
            ("position", "fixed"),
            ("top", "50%"),
            ("left", "50%"),
            ("transform", "translate(-50%, -50%)"),
            ("z-index", "9999"),
            ("border", "1px solid #aaa"),
            ("background", "#fff"),
            ("padding", "10px"),
            ("box-shadow", "0 4px 8px rgba(0, 0, 0, 0.2)"),
            ("text-align", "center"),
        ],
    );

    let close_btn = dom::element_with("span", CLOSE_CLASS, Some("\u{00d7}"))?;
    style(
        &close_btn,
        &[
            ("position", "absolute"),
            ("top", "5px"),
            ("right", "10px"),
            ("font-size", "20px"),
            ("cursor", "pointer"),
            ("color", "#333"),
        ],
    );

    let img = dom::create_element("img")?;
    img.set_attribute("src", src)?;
    style(
        &img,
        &[("max-width", "90vw"), ("max-height", "90vh"), ("border-radius", "4px")],
    );

    popup.append_child(&close_btn)?;
    popup.append_child(&img)?;

    let body = dom::body();
    body.append_child(&overlay)?;
    body.append_child(&popup)?;

    let lightbox = Lightbox {
        overlay,
        popup,
        listeners: Rc::default(),
    };
    on_click_close(&close_btn, &lightbox)?;
    on_click_close(&lightbox.overlay, &lightbox)?;
    Ok(lightbox)
}

/// Bind every preview image found at page load.
pub fn bind_previews(previews: &[Element]) {
    for preview in previews {
        let source = preview.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            let src = source
                .dyn_ref::<web_sys::HtmlImageElement>()
                .map(|img| img.src())
                .or_else(|| source.get_attribute("src"))
                .unwrap_or_default();
            if let Err(e) = open(&src) {
                gloo_console::error!("Error opening image preview:", e);
            }
        }) as Box<dyn FnMut(_)>);
        if preview
            .add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
            .is_ok()
        {
            cb.forget();
        }
    }
}
