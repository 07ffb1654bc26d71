use crate::config::StorefrontConfig;
use crate::format_money;
use rust_decimal::Decimal;
use sf_api_types::{CartLine, LineId};
use sf_store_client::{StoreApi, StoreResult};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartSummary {
    /// Number of distinct lines, not the sum of quantities.
    pub count: usize,
    pub total: Decimal,
}

impl CartSummary {
    pub fn of(lines: &[CartLine]) -> Self {
        Self {
            count: lines.len(),
            total: lines.iter().map(|line| line.total_price).sum(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineView {
    pub id: LineId,
    pub heading: String,
    pub additives: String,
    pub quantity: String,
    pub price: String,
}

/// What the sidebar shows for the current snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartView {
    Empty {
        message: String,
        count: String,
        total: String,
    },
    Lines {
        lines: Vec<CartLineView>,
        count: String,
        total: String,
    },
}

impl CartView {
    pub fn count(&self) -> &str {
        match self {
            CartView::Empty { count, .. } | CartView::Lines { count, .. } => count,
        }
    }

    pub fn total(&self) -> &str {
        match self {
            CartView::Empty { total, .. } | CartView::Lines { total, .. } => total,
        }
    }
}

#[derive(Debug, Default)]
struct CartState {
    lines: Vec<CartLine>,
    generation: u64,
    open: bool,
}

/// Read-only snapshot of the server cart plus sidebar visibility.
///
/// Cloning shares the same state, so the cart client and the product modal
/// observe one source of truth.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    inner: Rc<RefCell<CartState>>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<CartLine> {
        self.inner.borrow().lines.clone()
    }

    pub fn summary(&self) -> CartSummary {
        CartSummary::of(&self.inner.borrow().lines)
    }

    pub fn view(&self, config: &StorefrontConfig) -> CartView {
        let state = self.inner.borrow();
        let summary = CartSummary::of(&state.lines);
        let total = format_money(summary.total, &config.cart_currency);

        if state.lines.is_empty() {
            return CartView::Empty {
                message: config.empty_cart_message.clone(),
                count: "0".to_owned(),
                total,
            };
        }

        let lines = state
            .lines
            .iter()
            .map(|line| CartLineView {
                id: line.id,
                heading: format!("{} ({})", line.name, line.size),
                additives: if line.additives.is_empty() {
                    "Additives: None".to_owned()
                } else {
                    format!("Additives: {}", line.additives.join(", "))
                },
                quantity: format!("Quantity: {}", line.quantity),
                price: format!(
                    "Price: {}",
                    format_money(line.total_price, &config.cart_currency)
                ),
            })
            .collect();

        CartView::Lines {
            lines,
            count: summary.count.to_string(),
            total,
        }
    }

    pub fn is_open(&self) -> bool {
        self.inner.borrow().open
    }

    pub fn set_open(&self, open: bool) {
        self.inner.borrow_mut().open = open;
    }

    /// Flip sidebar visibility and return the new value.
    pub fn toggle_open(&self) -> bool {
        let mut state = self.inner.borrow_mut();
        state.open = !state.open;
        state.open
    }

    fn begin_load(&self) -> u64 {
        let mut state = self.inner.borrow_mut();
        state.generation += 1;
        state.generation
    }

    /// Replace the lines unless a newer load has started since `generation`.
    fn finish_load(&self, generation: u64, lines: Vec<CartLine>) -> bool {
        let mut state = self.inner.borrow_mut();
        if state.generation != generation {
            return false;
        }
        state.lines = lines;
        true
    }
}

/// Keeps the [`CartStore`] in sync with the server cart.
///
/// Mutations never patch the snapshot locally: every one is followed by a
/// full reload.
pub struct CartClient<A> {
    api: Rc<A>,
    store: CartStore,
    config: Rc<StorefrontConfig>,
}

impl<A> Clone for CartClient<A> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            store: self.store.clone(),
            config: self.config.clone(),
        }
    }
}

impl<A: StoreApi> CartClient<A> {
    pub fn new(api: Rc<A>, store: CartStore, config: Rc<StorefrontConfig>) -> Self {
        Self { api, store, config }
    }

    pub fn store(&self) -> &CartStore {
        &self.store
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    pub fn view(&self) -> CartView {
        self.store.view(&self.config)
    }

    /// Fetch the server cart and replace the snapshot.
    ///
    /// On failure the error is logged and the previous snapshot stays. A
    /// response overtaken by a newer load is dropped.
    pub async fn load_cart(&self) -> StoreResult<CartSummary> {
        let generation = self.store.begin_load();
        let response = match self.api.fetch_cart().await {
            Ok(response) => response,
            Err(err) => {
                error!("error fetching cart: {err}");
                return Err(err);
            }
        };

        let lines = response.into_lines();
        if !self.store.finish_load(generation, lines) {
            debug!("discarding stale cart response (generation {generation})");
        }
        Ok(self.store.summary())
    }

    pub async fn remove_line(&self, line_id: LineId) -> StoreResult<CartSummary> {
        if let Err(err) = self.api.remove_line(line_id).await {
            warn!("error removing cart line {line_id}: {err}");
        }
        self.load_cart().await
    }

    pub async fn clear_cart(&self) -> StoreResult<CartSummary> {
        if let Err(err) = self.api.clear_cart().await {
            warn!("error clearing cart: {err}");
        }
        self.load_cart().await
    }

    pub fn toggle(&self) -> bool {
        self.store.toggle_open()
    }

    pub fn open(&self) {
        self.store.set_open(true);
    }

    pub fn close(&self) {
        self.store.set_open(false);
    }

    /// Open the sidebar and refresh its contents.
    pub async fn reveal(&self) -> StoreResult<CartSummary> {
        self.open();
        self.load_cart().await
    }
}
