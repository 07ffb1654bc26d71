use sf_api_types::{AdditiveId, ProductId, VariantId};
use sf_store_client::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModalError {
    #[error("no product is loaded in the modal")]
    NotReady,
    #[error("variant {0} does not belong to the open product")]
    UnknownVariant(VariantId),
    #[error("additive {0} does not belong to the open product")]
    UnknownAdditive(AdditiveId),
    #[error("product {0} has no variants to add")]
    NoVariant(ProductId),
    #[error(transparent)]
    Store(#[from] StoreError),
}
