use crate::{domain::entities::purchase::Purchase, errors::PurchaseBridgeError};

pub trait PurchaseRepository: Send + Sync {
    /// Decodes a single purchase map received from the host application.
    fn decode_purchase(
        &self,
        value: &serde_json::Value,
    ) -> Result<Purchase, PurchaseBridgeError>;

    /// Decodes a JSON array of purchase maps.
    fn decode_purchases(&self, body: &str) -> Result<Vec<Purchase>, PurchaseBridgeError>;

    /// Fails with `InvalidTimestamp` for non-finite dates, which JSON cannot
    /// carry.
    fn encode_purchase(
        &self,
        purchase: &Purchase,
    ) -> Result<serde_json::Value, PurchaseBridgeError>;

    fn encode_purchases(&self, purchases: &[Purchase]) -> Result<String, PurchaseBridgeError>;
}
