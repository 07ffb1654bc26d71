//! In-memory `StoreApi` double for controller tests.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sf_api_types::{
    AddToCartForm, AdditiveId, CartLine, CartResponse, LineId, MutationResponse, ProductAdditive,
    ProductDetail, ProductId, ProductVariant, VariantId,
};
use sf_store_client::{StoreApi, StoreError, StoreResult};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::str::FromStr;
use tokio::sync::Notify;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FetchCart,
    RemoveLine(LineId),
    ClearCart,
    AddToCart(ProductId, AddToCartForm),
    FetchProduct(ProductId),
}

#[derive(Default)]
pub struct FakeStore {
    pub calls: RefCell<Vec<Call>>,
    /// Queued cart responses; when empty, `fetch_cart` answers with `cart`.
    pub cart_responses: RefCell<VecDeque<StoreResult<CartResponse>>>,
    pub cart: RefCell<CartResponse>,
    pub products: RefCell<HashMap<ProductId, ProductDetail>>,
    /// Product fetches that wait for a notification before answering.
    pub gates: RefCell<HashMap<ProductId, Rc<Notify>>>,
    /// Add-to-cart calls wait on this before answering when set.
    pub submit_gate: RefCell<Option<Rc<Notify>>>,
    pub fail_mutations: Cell<bool>,
}

impl FakeStore {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls.borrow().iter().filter(|c| *c == call).count()
    }

    pub fn with_product(self, id: u64, detail: ProductDetail) -> Self {
        self.products.borrow_mut().insert(ProductId(id), detail);
        self
    }

    pub fn gate(&self, id: u64) -> Rc<Notify> {
        let notify = Rc::new(Notify::new());
        self.gates.borrow_mut().insert(ProductId(id), notify.clone());
        notify
    }

    pub fn gate_submissions(&self) -> Rc<Notify> {
        let notify = Rc::new(Notify::new());
        *self.submit_gate.borrow_mut() = Some(notify.clone());
        notify
    }

    fn mutation(&self) -> StoreResult<MutationResponse> {
        if self.fail_mutations.get() {
            Err(StoreError::Transport("connection reset".to_owned()))
        } else {
            Ok(MutationResponse {
                message: Some("ok".to_owned()),
                error: None,
            })
        }
    }
}

#[async_trait(?Send)]
impl StoreApi for FakeStore {
    async fn fetch_cart(&self) -> StoreResult<CartResponse> {
        self.calls.borrow_mut().push(Call::FetchCart);
        let queued = self.cart_responses.borrow_mut().pop_front();
        match queued {
            Some(response) => response,
            None => Ok(self.cart.borrow().clone()),
        }
    }

    async fn remove_line(&self, line_id: LineId) -> StoreResult<MutationResponse> {
        self.calls.borrow_mut().push(Call::RemoveLine(line_id));
        self.mutation()
    }

    async fn clear_cart(&self) -> StoreResult<MutationResponse> {
        self.calls.borrow_mut().push(Call::ClearCart);
        self.mutation()
    }

    async fn add_to_cart(
        &self,
        product_id: ProductId,
        form: &AddToCartForm,
    ) -> StoreResult<MutationResponse> {
        self.calls
            .borrow_mut()
            .push(Call::AddToCart(product_id, form.clone()));
        let gate = self.submit_gate.borrow().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.mutation()
    }

    async fn fetch_product(&self, product_id: ProductId) -> StoreResult<ProductDetail> {
        self.calls.borrow_mut().push(Call::FetchProduct(product_id));
        let gate = self.gates.borrow().get(&product_id).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.products
            .borrow()
            .get(&product_id)
            .cloned()
            .ok_or_else(|| StoreError::Status {
                status: 404,
                body: "not found".to_owned(),
            })
    }
}

pub fn dec(raw: &str) -> Decimal {
    Decimal::from_str(raw).unwrap()
}

pub fn line(id: u64, name: &str, total: &str) -> CartLine {
    CartLine {
        id: LineId(id),
        name: name.to_owned(),
        size: "M".to_owned(),
        quantity: 1,
        additives: Vec::new(),
        total_price: dec(total),
    }
}

/// Two sizes (S 5.00, L 8.00) and one additive (10, 1.50).
pub fn coffee() -> ProductDetail {
    ProductDetail {
        name: "Coffee".to_owned(),
        description: "Freshly brewed".to_owned(),
        currency: "USD".to_owned(),
        images: vec!["/media/coffee-1.jpg".to_owned(), "/media/coffee-2.jpg".to_owned()],
        variants: vec![
            ProductVariant {
                id: VariantId(1),
                code: "S".to_owned(),
                price: dec("5.00"),
            },
            ProductVariant {
                id: VariantId(2),
                code: "L".to_owned(),
                price: dec("8.00"),
            },
        ],
        additives: vec![ProductAdditive {
            id: AdditiveId(10),
            name: "Vanilla".to_owned(),
            price: dec("1.50"),
            image: None,
        }],
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}
