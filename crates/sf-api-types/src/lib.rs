use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId(pub u64);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductId(pub u64);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariantId(pub u64);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AdditiveId(pub u64);

macro_rules! display_id {
    ($($ty:ident),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }
        )*
    };
}

display_id!(LineId, ProductId, VariantId, AdditiveId);

/// One entry of the server-side cart. Prices are computed by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    pub id: LineId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub additives: Vec<String>,
    #[serde(default)]
    pub total_price: Decimal,
}

/// `GET /cart/`. A missing or `null` cart is the empty cart.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CartResponse {
    #[serde(default)]
    pub cart: Option<Vec<CartLine>>,
}

impl CartResponse {
    pub fn into_lines(self) -> Vec<CartLine> {
        self.cart.unwrap_or_default()
    }
}

/// Body of the cart mutation endpoints. Only success matters to the client.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MutationResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductVariant {
    pub id: VariantId,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductAdditive {
    pub id: AdditiveId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub image: Option<String>,
}

/// `GET /product/{id}/`. Absent fields default to empty values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProductDetail {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
    #[serde(default, alias = "ingredients")]
    pub additives: Vec<ProductAdditive>,
}

impl ProductDetail {
    pub fn variant(&self, id: VariantId) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| v.id == id)
    }

    pub fn additive(&self, id: AdditiveId) -> Option<&ProductAdditive> {
        self.additives.iter().find(|a| a.id == id)
    }
}

/// Url-encoded body of `POST /cart/add/{product_id}/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddToCartForm {
    pub variant_id: VariantId,
    pub additive_ids: String,
    pub quantity: u32,
}

impl AddToCartForm {
    pub fn new<I, S>(variant_id: VariantId, additive_ids: I, quantity: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            variant_id,
            additive_ids: encode_additive_ids(additive_ids),
            quantity,
        }
    }

    /// Field pairs in wire order, for transports that build the body by hand.
    pub fn pairs(&self) -> [(&'static str, String); 3] {
        [
            ("variant_id", self.variant_id.to_string()),
            ("additive_ids", self.additive_ids.clone()),
            ("quantity", self.quantity.to_string()),
        ]
    }
}

/// Comma-join additive ids for the add-to-cart form.
///
/// Ids that are not unsigned integers are dropped and repeats collapse to
/// their first occurrence. No ids yields the empty string.
pub fn encode_additive_ids<I, S>(ids: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut kept: Vec<u64> = Vec::new();
    for raw in ids {
        if let Ok(id) = raw.as_ref().trim().parse::<u64>() {
            if !kept.contains(&id) {
                kept.push(id);
            }
        }
    }
    kept.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
