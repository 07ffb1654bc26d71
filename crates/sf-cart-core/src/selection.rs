use crate::error::ModalError;
use rust_decimal::Decimal;
use sf_api_types::{AddToCartForm, AdditiveId, ProductDetail, VariantId};
use std::collections::BTreeSet;

/// The shopper's unsaved choice for one modal session.
///
/// Holds at most one variant and a set of additives, always drawn from the
/// product the selection was created for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    variant: Option<VariantId>,
    additives: BTreeSet<AdditiveId>,
}

impl Selection {
    /// First variant selected, no additives.
    pub fn for_product(detail: &ProductDetail) -> Self {
        Self {
            variant: detail.variants.first().map(|v| v.id),
            additives: BTreeSet::new(),
        }
    }

    pub fn variant(&self) -> Option<VariantId> {
        self.variant
    }

    pub fn additives(&self) -> impl Iterator<Item = AdditiveId> + '_ {
        self.additives.iter().copied()
    }

    pub fn has_additive(&self, id: AdditiveId) -> bool {
        self.additives.contains(&id)
    }

    pub fn select_variant(&mut self, detail: &ProductDetail, id: VariantId) -> Result<(), ModalError> {
        if detail.variant(id).is_none() {
            return Err(ModalError::UnknownVariant(id));
        }
        self.variant = Some(id);
        Ok(())
    }

    /// Add or remove an additive. Returns whether it is selected afterwards.
    pub fn toggle_additive(&mut self, detail: &ProductDetail, id: AdditiveId) -> Result<bool, ModalError> {
        if detail.additive(id).is_none() {
            return Err(ModalError::UnknownAdditive(id));
        }
        if self.additives.remove(&id) {
            Ok(false)
        } else {
            self.additives.insert(id);
            Ok(true)
        }
    }

    pub fn base_price(&self, detail: &ProductDetail) -> Decimal {
        self.variant
            .and_then(|id| detail.variant(id))
            .map(|v| v.price)
            .unwrap_or_default()
    }

    /// Variant price plus every selected additive.
    pub fn price(&self, detail: &ProductDetail) -> Decimal {
        let extras: Decimal = self
            .additives
            .iter()
            .filter_map(|id| detail.additive(*id))
            .map(|a| a.price)
            .sum();
        self.base_price(detail) + extras
    }

    pub fn to_form(&self, quantity: u32) -> Option<AddToCartForm> {
        let variant = self.variant?;
        let ids = self.additives.iter().map(|id| id.to_string());
        Some(AddToCartForm::new(variant, ids, quantity))
    }
}
