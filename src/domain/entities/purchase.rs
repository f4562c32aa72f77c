use std::{
    any::Any,
    collections::hash_map::DefaultHasher,
    fmt,
    hash::{Hash, Hasher},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::TimestampContract;

/// A completed in-app purchase or subscription, as decoded from a store
/// receipt.
///
/// Records are immutable once built and compare structurally: two records
/// holding the same product id and timestamps are interchangeable, and hash
/// identically, so they can be used directly as `HashSet` members or
/// `HashMap` keys.
///
/// The epoch and unit of both timestamps are defined by whichever receipt
/// source produced the record. For non-subscription purchases the expiry may
/// hold a source-specific sentinel (see
/// [`PurchaseBridgeConfig`](crate::config::PurchaseBridgeConfig)).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    #[serde(default, alias = "identifier", skip_serializing_if = "Option::is_none")]
    product_id: Option<String>,
    purchase_date: f64,
    expires_date: f64,
}

impl Purchase {
    /// Builds a record from its three fields, stored as given.
    pub fn new(product_id: Option<String>, purchase_date: f64, expires_date: f64) -> Self {
        Self {
            product_id,
            purchase_date,
            expires_date,
        }
    }

    /// Shorthand for [`Purchase::new`] when the product id is known.
    pub fn with_product_id(
        product_id: impl Into<String>,
        purchase_date: f64,
        expires_date: f64,
    ) -> Self {
        Self::new(Some(product_id.into()), purchase_date, expires_date)
    }

    pub fn product_id(&self) -> Option<&str> {
        self.product_id.as_deref()
    }

    pub fn purchase_date(&self) -> f64 {
        self.purchase_date
    }

    pub fn expires_date(&self) -> f64 {
        self.expires_date
    }

    /// Interprets the purchase date under the source's timestamp contract.
    /// Returns `None` if the stored value is not a representable instant.
    pub fn purchase_time(&self, contract: TimestampContract) -> Option<DateTime<Utc>> {
        contract.to_date_time(self.purchase_date)
    }

    /// Interprets the expiry date under the source's timestamp contract.
    /// Sentinel values are converted like any other number; check
    /// [`PurchaseBridgeConfig::is_no_expiry`](crate::config::PurchaseBridgeConfig::is_no_expiry)
    /// first if the source uses one.
    pub fn expiration_time(&self, contract: TimestampContract) -> Option<DateTime<Utc>> {
        contract.to_date_time(self.expires_date)
    }

    /// Dynamic equality against a value of unknown type.
    ///
    /// Accepts a `Purchase` or an `Option<Purchase>`; anything else, including
    /// `None` and references to purchases, is simply not equal. Compare
    /// borrowed records with `==` instead.
    pub fn equals(&self, other: &dyn Any) -> bool {
        if let Some(other) = other.downcast_ref::<Purchase>() {
            return std::ptr::eq(self, other) || self == other;
        }
        if let Some(other) = other.downcast_ref::<Option<Purchase>>() {
            return other.as_ref().is_some_and(|other| self == other);
        }
        false
    }

    /// Integer digest consistent with `==`. Uses a fixed-key hasher, so the
    /// value does not change between runs of the same build.
    pub fn hash_code(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

/// Bit pattern used for both equality and hashing of timestamps. Collapses
/// `-0.0` onto `0.0` and every NaN onto a single NaN, which keeps `Eq`
/// reflexive and `Hash` in agreement with it.
fn canonical_bits(value: f64) -> u64 {
    if value.is_nan() {
        f64::NAN.to_bits()
    } else if value == 0.0 {
        0
    } else {
        value.to_bits()
    }
}

impl PartialEq for Purchase {
    fn eq(&self, other: &Self) -> bool {
        self.product_id == other.product_id
            && canonical_bits(self.purchase_date) == canonical_bits(other.purchase_date)
            && canonical_bits(self.expires_date) == canonical_bits(other.expires_date)
    }
}

impl Eq for Purchase {}

impl Hash for Purchase {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.product_id.hash(state);
        canonical_bits(self.purchase_date).hash(state);
        canonical_bits(self.expires_date).hash(state);
    }
}

impl fmt::Display for Purchase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} purchased={} expires={}",
            self.product_id.as_deref().unwrap_or("-"),
            self.purchase_date,
            self.expires_date
        )
    }
}
