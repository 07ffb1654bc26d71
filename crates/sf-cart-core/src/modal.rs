//! Product modal controller.
//!
//! States: `Closed` → `Loading` → `Ready` → `Closed`.
//! Every `open` and `close` bumps a generation counter; a detail response
//! that arrives for an older generation is dropped instead of replacing the
//! current session.

use crate::cart::CartClient;
use crate::config::StorefrontConfig;
use crate::error::ModalError;
use crate::format_money;
use crate::selection::Selection;
use rust_decimal::Decimal;
use sf_api_types::{AdditiveId, ProductDetail, ProductId, VariantId};
use sf_store_client::StoreApi;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::{debug, error};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantControl {
    pub id: VariantId,
    pub label: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdditiveControl {
    pub id: AdditiveId,
    pub name: String,
    pub image: String,
    pub badge: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarouselSlide {
    pub src: String,
    pub alt: String,
    pub active: bool,
}

/// A loaded product together with the shopper's current choice.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalSession {
    pub product_id: ProductId,
    pub detail: ProductDetail,
    pub selection: Selection,
}

impl ModalSession {
    pub fn new(product_id: ProductId, detail: ProductDetail) -> Self {
        let selection = Selection::for_product(&detail);
        Self {
            product_id,
            detail,
            selection,
        }
    }

    pub fn price(&self) -> Decimal {
        self.selection.price(&self.detail)
    }

    pub fn price_text(&self) -> String {
        format_money(self.price(), &self.detail.currency)
    }

    pub fn variant_controls(&self) -> Vec<VariantControl> {
        let active = self.selection.variant();
        self.detail
            .variants
            .iter()
            .map(|v| VariantControl {
                id: v.id,
                label: v.code.clone(),
                active: Some(v.id) == active,
            })
            .collect()
    }

    pub fn additive_controls(&self, config: &StorefrontConfig) -> Vec<AdditiveControl> {
        self.detail
            .additives
            .iter()
            .map(|a| AdditiveControl {
                id: a.id,
                name: a.name.clone(),
                image: a
                    .image
                    .clone()
                    .filter(|src| !src.is_empty())
                    .unwrap_or_else(|| config.additive_placeholder.clone()),
                badge: format!("+{}", format_money(a.price, &self.detail.currency)),
                selected: self.selection.has_additive(a.id),
            })
            .collect()
    }

    /// One slide per image, first active; a lone placeholder when there are none.
    pub fn carousel(&self, config: &StorefrontConfig) -> Vec<CarouselSlide> {
        if self.detail.images.is_empty() {
            return vec![CarouselSlide {
                src: config.image_placeholder.clone(),
                alt: "No Image Available".to_owned(),
                active: true,
            }];
        }
        self.detail
            .images
            .iter()
            .enumerate()
            .map(|(index, src)| CarouselSlide {
                src: src.clone(),
                alt: "Product Image".to_owned(),
                active: index == 0,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ModalState {
    #[default]
    Closed,
    Loading {
        product_id: ProductId,
        generation: u64,
    },
    Ready(ModalSession),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    Ready,
    /// Another `open` or a `close` happened while the detail was loading.
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The line was added and the modal closed.
    Added,
    /// The line was added, but the modal was dismissed or reopened while the
    /// request was in flight; the newer state is left alone.
    Superseded,
}

pub struct ProductModal<A> {
    api: Rc<A>,
    cart: CartClient<A>,
    config: Rc<StorefrontConfig>,
    state: Rc<RefCell<ModalState>>,
    generation: Rc<Cell<u64>>,
}

impl<A> Clone for ProductModal<A> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            cart: self.cart.clone(),
            config: self.config.clone(),
            state: self.state.clone(),
            generation: self.generation.clone(),
        }
    }
}

impl<A: StoreApi> ProductModal<A> {
    pub fn new(api: Rc<A>, cart: CartClient<A>, config: Rc<StorefrontConfig>) -> Self {
        Self {
            api,
            cart,
            config,
            state: Rc::new(RefCell::new(ModalState::Closed)),
            generation: Rc::new(Cell::new(0)),
        }
    }

    pub fn cart(&self) -> &CartClient<A> {
        &self.cart
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    pub fn state(&self) -> ModalState {
        self.state.borrow().clone()
    }

    pub fn session(&self) -> Option<ModalSession> {
        match &*self.state.borrow() {
            ModalState::Ready(session) => Some(session.clone()),
            _ => None,
        }
    }

    fn next_generation(&self) -> u64 {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        generation
    }

    /// Load `product_id` and start a fresh selection.
    ///
    /// On a fetch failure the modal returns to `Closed`, unless a newer
    /// request already owns it.
    pub async fn open(&self, product_id: ProductId) -> Result<OpenOutcome, ModalError> {
        let generation = self.next_generation();
        *self.state.borrow_mut() = ModalState::Loading {
            product_id,
            generation,
        };

        let result = self.api.fetch_product(product_id).await;

        if self.generation.get() != generation {
            debug!("discarding stale detail for product {product_id} (generation {generation})");
            return Ok(OpenOutcome::Superseded);
        }

        match result {
            Ok(detail) => {
                *self.state.borrow_mut() = ModalState::Ready(ModalSession::new(product_id, detail));
                Ok(OpenOutcome::Ready)
            }
            Err(err) => {
                error!("error fetching product {product_id}: {err}");
                *self.state.borrow_mut() = ModalState::Closed;
                Err(err.into())
            }
        }
    }

    pub fn close(&self) {
        self.next_generation();
        *self.state.borrow_mut() = ModalState::Closed;
    }

    fn with_session<R>(
        &self,
        f: impl FnOnce(&mut ModalSession) -> Result<R, ModalError>,
    ) -> Result<R, ModalError> {
        match &mut *self.state.borrow_mut() {
            ModalState::Ready(session) => f(session),
            _ => Err(ModalError::NotReady),
        }
    }

    /// Make `id` the single active variant and return the new total price.
    pub fn select_variant(&self, id: VariantId) -> Result<Decimal, ModalError> {
        self.with_session(|session| {
            session.selection.select_variant(&session.detail, id)?;
            Ok(session.price())
        })
    }

    /// Returns whether the additive is selected after the toggle.
    pub fn toggle_additive(&self, id: AdditiveId) -> Result<bool, ModalError> {
        self.with_session(|session| session.selection.toggle_additive(&session.detail, id))
    }

    pub fn price_text(&self) -> Option<String> {
        self.session().map(|session| session.price_text())
    }

    /// Submit the current selection as a new cart line.
    ///
    /// Success closes the modal, unless it was dismissed or reopened while
    /// the request was in flight. Any failure is logged and leaves the modal
    /// and its selection as they were so the shopper can retry.
    pub async fn add_to_cart(&self) -> Result<SubmitOutcome, ModalError> {
        let session = self.session().ok_or(ModalError::NotReady)?;
        let form = session
            .selection
            .to_form(self.config.submit_quantity)
            .ok_or(ModalError::NoVariant(session.product_id))?;
        let generation = self.generation.get();

        if let Err(err) = self.api.add_to_cart(session.product_id, &form).await {
            error!("error adding product {} to cart: {err}", session.product_id);
            return Err(err.into());
        }

        if self.generation.get() != generation {
            debug!(
                "product {} added after the modal moved on (generation {generation})",
                session.product_id
            );
            return Ok(SubmitOutcome::Superseded);
        }

        self.close();
        Ok(SubmitOutcome::Added)
    }
}
