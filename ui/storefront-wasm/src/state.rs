//! Global application state.
//!
//! One [`Storefront`] per page, kept in `thread_local!` storage (WASM is
//! single-threaded). The cart client and the product modal share the same
//! API client and cart store.

use crate::api::FetchStoreClient;
use sf_cart_core::{CartClient, CartStore, ProductModal, StorefrontConfig};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone)]
pub struct Storefront {
    pub cart: CartClient<FetchStoreClient>,
    pub modal: ProductModal<FetchStoreClient>,
}

impl Storefront {
    pub fn new(api: FetchStoreClient, config: StorefrontConfig) -> Self {
        let api = Rc::new(api);
        let config = Rc::new(config);
        let cart = CartClient::new(api.clone(), CartStore::new(), config.clone());
        let modal = ProductModal::new(api, cart.clone(), config);
        Self { cart, modal }
    }
}

thread_local! {
    static STOREFRONT: RefCell<Option<Storefront>> = const { RefCell::new(None) };
}

pub fn install(storefront: Storefront) {
    STOREFRONT.with(|s| *s.borrow_mut() = Some(storefront));
}

/// The installed storefront, or a fresh same-origin one if `install` was
/// never called.
pub fn storefront() -> Storefront {
    STOREFRONT.with(|s| {
        s.borrow_mut()
            .get_or_insert_with(|| {
                Storefront::new(FetchStoreClient::from_page(), StorefrontConfig::default())
            })
            .clone()
    })
}

pub fn cart() -> CartClient<FetchStoreClient> {
    storefront().cart
}

pub fn modal() -> ProductModal<FetchStoreClient> {
    storefront().modal
}
