use serde::{Deserialize, Serialize};

/// A purchase as exchanged with the host application over the plugin
/// channel: one flat map per record.
///
/// Encoded with the same spelling as [`Purchase`](crate::domain::entities::purchase::Purchase)
/// (`productId`, `purchaseDate`, `expiresDate`). On decode the Android plugin's
/// `identifier` and `purchaseTime` keys are also accepted; its store
/// bookkeeping keys (`orderId`, `purchaseToken`, ...) are ignored.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PurchaseMapModel {
    /// The store SKU of the purchased product.
    #[serde(alias = "identifier", skip_serializing_if = "Option::is_none")]
    pub(crate) product_id: Option<String>,
    /// When the purchase was made, in the unit configured for the source.
    #[serde(alias = "purchaseTime")]
    pub(crate) purchase_date: Option<f64>,
    /// When the subscription lapses. Absent for one-time purchases on some
    /// platforms.
    pub(crate) expires_date: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_android_map() {
        let m: PurchaseMapModel = serde_json::from_str(
            r#"{
                "orderId": "GPA.1234",
                "packageName": "com.example.app",
                "identifier": "coins_100",
                "purchaseToken": "tok",
                "purchaseTime": 1527243000000,
                "autorenewal": "false"
            }"#,
        )
        .unwrap();
        assert_eq!(m.product_id.as_deref(), Some("coins_100"));
        assert_eq!(m.purchase_date, Some(1527243000000.0));
        assert_eq!(m.expires_date, None);
    }

    #[test]
    fn parses_ios_map() {
        let m: PurchaseMapModel = serde_json::from_str(
            r#"{ "productId": "com.app.sub", "purchaseDate": 1000.5, "expiresDate": 2000 }"#,
        )
        .unwrap();
        assert_eq!(m.product_id.as_deref(), Some("com.app.sub"));
        assert_eq!(m.purchase_date, Some(1000.5));
        assert_eq!(m.expires_date, Some(2000.0));
    }

    #[test]
    fn serializes_only_the_record_fields() {
        let m = PurchaseMapModel {
            product_id: None,
            purchase_date: Some(1.0),
            expires_date: Some(2.0),
        };
        assert_eq!(
            serde_json::to_value(&m).unwrap(),
            serde_json::json!({ "purchaseDate": 1.0, "expiresDate": 2.0 })
        );
    }
}
