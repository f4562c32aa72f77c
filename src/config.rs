use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{domain::entities::purchase::Purchase, errors::PurchaseBridgeError};

/// Unit of the numeric timestamps delivered by the receipt source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampUnit {
    Seconds,
    Milliseconds,
}

/// Zero point the receipt source counts its timestamps from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimestampEpoch {
    /// 1970-01-01T00:00:00Z.
    Unix,
    /// 2001-01-01T00:00:00Z, as used by Foundation's
    /// `timeIntervalSinceReferenceDate`.
    ReferenceDate2001,
}

impl TimestampEpoch {
    fn unix_offset_millis(self) -> f64 {
        match self {
            TimestampEpoch::Unix => 0.0,
            TimestampEpoch::ReferenceDate2001 => 978_307_200_000.0,
        }
    }
}

/// How a receipt source encodes its timestamps. Has no default: the
/// collaborator producing the records must state it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimestampContract {
    pub unit: TimestampUnit,
    pub epoch: TimestampEpoch,
}

impl TimestampContract {
    pub fn new(unit: TimestampUnit, epoch: TimestampEpoch) -> Self {
        Self { unit, epoch }
    }

    pub(crate) fn to_date_time(self, value: f64) -> Option<DateTime<Utc>> {
        if !value.is_finite() {
            return None;
        }
        let millis = match self.unit {
            TimestampUnit::Seconds => value * 1000.0,
            TimestampUnit::Milliseconds => value,
        };
        let millis = (millis + self.epoch.unix_offset_millis()).round();
        if millis < i64::MIN as f64 || millis > i64::MAX as f64 {
            return None;
        }
        DateTime::from_timestamp_millis(millis as i64)
    }
}

/// Contract agreed with the receipt-decoding layer.
///
/// Nothing about the timestamps is assumed. A source that omits expiry dates
/// for one-time purchases must name its sentinel here, otherwise such records
/// are rejected when decoded. Date conversions need `timestamp_contract`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PurchaseBridgeConfig {
    pub timestamp_contract: Option<TimestampContract>,
    pub no_expiry_sentinel: Option<f64>,
}

impl PurchaseBridgeConfig {
    pub fn from_json(json: &str) -> Result<Self, PurchaseBridgeError> {
        serde_json::from_str(json).map_err(PurchaseBridgeError::InvalidConfig)
    }

    pub fn timestamp_contract(&self) -> Result<TimestampContract, PurchaseBridgeError> {
        self.timestamp_contract
            .ok_or(PurchaseBridgeError::MissingTimestampContract)
    }

    /// Whether the purchase carries the configured sentinel instead of a real
    /// expiry. Always false when no sentinel is configured.
    pub fn is_no_expiry(&self, purchase: &Purchase) -> bool {
        self.no_expiry_sentinel
            .is_some_and(|sentinel| purchase.expires_date() == sentinel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_assumes_nothing() {
        let config = PurchaseBridgeConfig::from_json("{}").unwrap();
        assert_eq!(config, PurchaseBridgeConfig::default());
        assert_eq!(config.no_expiry_sentinel, None);
        assert!(matches!(
            config.timestamp_contract(),
            Err(PurchaseBridgeError::MissingTimestampContract)
        ));
    }

    #[test]
    fn parses_full_config() {
        let config = PurchaseBridgeConfig::from_json(
            r#"{
                "timestampContract": { "unit": "seconds", "epoch": "referenceDate2001" },
                "noExpirySentinel": 0
            }"#,
        )
        .unwrap();
        assert_eq!(
            config.timestamp_contract().unwrap(),
            TimestampContract::new(TimestampUnit::Seconds, TimestampEpoch::ReferenceDate2001)
        );
        assert_eq!(config.no_expiry_sentinel, Some(0.0));
    }

    #[test]
    fn contract_needs_both_parts() {
        let err =
            PurchaseBridgeConfig::from_json(r#"{ "timestampContract": { "unit": "seconds" } }"#)
                .unwrap_err();
        assert!(matches!(err, PurchaseBridgeError::InvalidConfig(_)));

        let err = PurchaseBridgeConfig::from_json(
            r#"{ "timestampContract": { "unit": "minutes", "epoch": "unix" } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, PurchaseBridgeError::InvalidConfig(_)));
    }

    #[test]
    fn sentinel_detection() {
        let config = PurchaseBridgeConfig {
            no_expiry_sentinel: Some(0.0),
            ..Default::default()
        };
        assert!(config.is_no_expiry(&Purchase::with_product_id("coins", 10.0, 0.0)));
        assert!(!config.is_no_expiry(&Purchase::with_product_id("sub", 10.0, 20.0)));
        assert!(!PurchaseBridgeConfig::default()
            .is_no_expiry(&Purchase::with_product_id("coins", 10.0, 0.0)));
    }

    #[test]
    fn reference_date_epoch_is_offset_from_unix() {
        let contract =
            TimestampContract::new(TimestampUnit::Seconds, TimestampEpoch::ReferenceDate2001);
        assert_eq!(contract.to_date_time(0.0).unwrap().timestamp(), 978_307_200);
        assert_eq!(
            contract.to_date_time(86_400.0).unwrap().to_rfc3339(),
            "2001-01-02T00:00:00+00:00"
        );

        let unix = TimestampContract::new(TimestampUnit::Milliseconds, TimestampEpoch::Unix);
        assert_eq!(unix.to_date_time(0.0).unwrap().timestamp(), 0);
    }

    #[test]
    fn out_of_range_timestamps_are_none() {
        let contract = TimestampContract::new(TimestampUnit::Seconds, TimestampEpoch::Unix);
        assert!(contract.to_date_time(f64::NAN).is_none());
        assert!(contract.to_date_time(1e300).is_none());
    }
}
