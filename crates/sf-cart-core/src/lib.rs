//! Storefront cart and product-modal logic.
//!
//! Everything here is platform-neutral: the browser front end and native
//! consumers inject a [`StoreApi`] implementation and render the view models
//! this crate produces. State is single-threaded (`Rc`/`RefCell`).

mod cart;
mod config;
mod error;
mod modal;
mod selection;

#[cfg(test)]
mod testing;

pub use cart::{CartClient, CartLineView, CartStore, CartSummary, CartView};
pub use config::StorefrontConfig;
pub use error::ModalError;
pub use modal::{
    AdditiveControl, CarouselSlide, ModalSession, ModalState, OpenOutcome, ProductModal,
    SubmitOutcome, VariantControl,
};
pub use selection::Selection;
pub use sf_store_client::{StoreApi, StoreError, StoreResult};

use rust_decimal::{Decimal, RoundingStrategy};

/// Format an amount the way every price in the storefront is shown: two
/// decimals followed by the currency code. Halves round away from zero.
pub fn format_money(amount: Decimal, currency: &str) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if currency.is_empty() {
        format!("{rounded:.2}")
    } else {
        format!("{rounded:.2} {currency}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn money_is_shown_with_two_decimals() {
        assert_eq!(format_money(Decimal::ZERO, "USD"), "0.00 USD");
        assert_eq!(format_money(Decimal::from_str("9.5").unwrap(), "EUR"), "9.50 EUR");
        assert_eq!(format_money(Decimal::from_str("1.004").unwrap(), "USD"), "1.00 USD");
        assert_eq!(format_money(Decimal::from(12), ""), "12.00");
    }

    #[test]
    fn halves_round_away_from_zero() {
        assert_eq!(format_money(Decimal::from_str("2.665").unwrap(), "USD"), "2.67 USD");
        assert_eq!(format_money(Decimal::from_str("1.005").unwrap(), "USD"), "1.01 USD");
        assert_eq!(format_money(Decimal::from_str("-2.665").unwrap(), "USD"), "-2.67 USD");
    }
}
