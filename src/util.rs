use std::collections::{HashMap, HashSet};

use crate::{
    config::PurchaseBridgeConfig,
    domain::{entities::purchase::Purchase, repositories::purchase_repository::PurchaseRepository},
    errors::PurchaseBridgeError,
};

pub use crate::data::repositories::purchase_repository_impl::PurchaseRepositoryImpl;

/// The facade wired to the JSON host-channel repository.
pub type DefaultPurchaseUtil = PurchaseUtil<PurchaseRepositoryImpl>;

/// A product whose record differs between two fetches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiryChange {
    pub product_id: Option<String>,
    pub previous: Purchase,
    pub current: Purchase,
}

pub struct PurchaseUtil<R: PurchaseRepository> {
    purchase_repository: R,
}

impl<R: PurchaseRepository> PurchaseUtil<R> {
    pub fn decode_purchase(
        &self,
        value: &serde_json::Value,
    ) -> Result<Purchase, PurchaseBridgeError> {
        self.purchase_repository.decode_purchase(value)
    }

    pub fn decode_purchases(&self, body: &str) -> Result<Vec<Purchase>, PurchaseBridgeError> {
        self.purchase_repository.decode_purchases(body)
    }

    pub fn encode_purchase(
        &self,
        purchase: &Purchase,
    ) -> Result<serde_json::Value, PurchaseBridgeError> {
        self.purchase_repository.encode_purchase(purchase)
    }

    pub fn encode_purchases(
        &self,
        purchases: &[Purchase],
    ) -> Result<String, PurchaseBridgeError> {
        self.purchase_repository.encode_purchases(purchases)
    }
}

impl DefaultPurchaseUtil {
    pub fn new(config: PurchaseBridgeConfig) -> Self {
        Self {
            purchase_repository: PurchaseRepositoryImpl::new(config),
        }
    }
}

/// Drops structurally identical records, keeping the first occurrence of
/// each.
pub fn dedup_purchases(purchases: Vec<Purchase>) -> Vec<Purchase> {
    let mut seen = HashSet::with_capacity(purchases.len());
    purchases
        .into_iter()
        .filter(|p| seen.insert(p.clone()))
        .collect()
}

/// Pairs up records by product id and reports every product whose record
/// is no longer equal to the previous fetch. Products present in only one
/// of the fetches are ignored. If a fetch holds several records for one
/// product, the last one wins.
pub fn expiry_changes(previous: &[Purchase], current: &[Purchase]) -> Vec<ExpiryChange> {
    let previous_by_id: HashMap<Option<&str>, &Purchase> =
        previous.iter().map(|p| (p.product_id(), p)).collect();
    let current_by_id: HashMap<Option<&str>, &Purchase> =
        current.iter().map(|p| (p.product_id(), p)).collect();

    let mut changes: Vec<ExpiryChange> = current_by_id
        .into_iter()
        .filter_map(|(id, current)| {
            let previous = *previous_by_id.get(&id)?;
            (previous != current).then(|| ExpiryChange {
                product_id: id.map(str::to_owned),
                previous: previous.clone(),
                current: current.clone(),
            })
        })
        .collect();
    changes.sort_by(|a, b| a.product_id.cmp(&b.product_id));
    changes
}
