use tracing::{debug, trace, warn};

use crate::{
    config::PurchaseBridgeConfig,
    data::models::host_channel::purchase_map_model::PurchaseMapModel,
    domain::{entities::purchase::Purchase, repositories::purchase_repository::PurchaseRepository},
    errors::PurchaseBridgeError,
};

/// Default [`PurchaseRepository`], backed by JSON maps on the host channel.
pub struct PurchaseRepositoryImpl {
    config: PurchaseBridgeConfig,
}

impl PurchaseRepository for PurchaseRepositoryImpl {
    fn decode_purchase(&self, value: &serde_json::Value) -> Result<Purchase, PurchaseBridgeError> {
        let m = PurchaseMapModel::deserialize_value(value)?;
        Purchase::from_host_map(m, &self.config)
    }

    fn decode_purchases(&self, body: &str) -> Result<Vec<Purchase>, PurchaseBridgeError> {
        let maps: Vec<PurchaseMapModel> =
            serde_json::from_str(body).map_err(PurchaseBridgeError::MalformedPayload)?;
        let purchases = maps
            .into_iter()
            .map(|m| Purchase::from_host_map(m, &self.config))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = purchases.len(), "decoded purchases from host channel");
        Ok(purchases)
    }

    fn encode_purchase(
        &self,
        purchase: &Purchase,
    ) -> Result<serde_json::Value, PurchaseBridgeError> {
        serde_json::to_value(PurchaseMapModel::try_from(purchase)?)
            .map_err(PurchaseBridgeError::MalformedPayload)
    }

    fn encode_purchases(&self, purchases: &[Purchase]) -> Result<String, PurchaseBridgeError> {
        let maps = purchases
            .iter()
            .map(PurchaseMapModel::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        serde_json::to_string(&maps).map_err(PurchaseBridgeError::MalformedPayload)
    }
}

impl PurchaseRepositoryImpl {
    pub fn new(config: PurchaseBridgeConfig) -> Self {
        Self { config }
    }
}

// Model conversions:
// ----------------------------

impl PurchaseMapModel {
    fn deserialize_value(value: &serde_json::Value) -> Result<Self, PurchaseBridgeError> {
        serde::Deserialize::deserialize(value).map_err(PurchaseBridgeError::MalformedPayload)
    }
}

impl TryFrom<&Purchase> for PurchaseMapModel {
    type Error = PurchaseBridgeError;

    /// JSON has no representation for non-finite numbers, so those records
    /// cannot be sent to the host.
    fn try_from(purchase: &Purchase) -> Result<Self, Self::Error> {
        ensure_finite("purchaseDate", purchase.purchase_date())?;
        ensure_finite("expiresDate", purchase.expires_date())?;
        Ok(PurchaseMapModel {
            product_id: purchase.product_id().map(str::to_owned),
            purchase_date: Some(purchase.purchase_date()),
            expires_date: Some(purchase.expires_date()),
        })
    }
}

impl Purchase {
    fn from_host_map(
        m: PurchaseMapModel,
        config: &PurchaseBridgeConfig,
    ) -> Result<Self, PurchaseBridgeError> {
        let purchase_date = m
            .purchase_date
            .ok_or(PurchaseBridgeError::MissingField("purchaseDate"))?;
        let expires_date = match (m.expires_date, config.no_expiry_sentinel) {
            (Some(expires_date), _) => expires_date,
            (None, Some(sentinel)) => {
                warn!(
                    product_id = m.product_id.as_deref().unwrap_or("-"),
                    sentinel, "purchase has no expiry, substituting sentinel"
                );
                sentinel
            }
            (None, None) => return Err(PurchaseBridgeError::MissingField("expiresDate")),
        };
        ensure_finite("purchaseDate", purchase_date)?;
        ensure_finite("expiresDate", expires_date)?;

        let purchase = Purchase::new(m.product_id, purchase_date, expires_date);
        trace!(%purchase, "decoded purchase");
        Ok(purchase)
    }
}

fn ensure_finite(field: &'static str, value: f64) -> Result<(), PurchaseBridgeError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(PurchaseBridgeError::InvalidTimestamp { field, value })
    }
}
