use std::time::Duration;

/// Presentation constants shared by the cart sidebar and the product modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Currency used for cart totals (the cart payload carries none).
    pub cart_currency: String,
    pub submit_quantity: u32,
    /// Pause between dismissing the product modal and revealing the cart,
    /// so the dismiss animation can finish.
    pub reveal_delay: Duration,
    pub empty_cart_message: String,
    pub image_placeholder: String,
    pub additive_placeholder: String,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            cart_currency: "USD".to_owned(),
            submit_quantity: 1,
            reveal_delay: Duration::from_millis(300),
            empty_cart_message: "Your cart is empty.".to_owned(),
            image_placeholder: "https://via.placeholder.com/300".to_owned(),
            additive_placeholder: "https://via.placeholder.com/80".to_owned(),
        }
    }
}
