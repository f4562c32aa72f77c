use thiserror::Error;

/// Errors raised while moving purchase records across the host channel.
///
/// The [`Purchase`](crate::domain::entities::purchase::Purchase) value type
/// itself has no failure modes; these all originate in decoding or
/// configuration.
#[derive(Debug, Error)]
pub enum PurchaseBridgeError {
    #[error("malformed purchase payload: {0}")]
    MalformedPayload(#[source] serde_json::Error),

    #[error("purchase record is missing '{0}'")]
    MissingField(&'static str),

    #[error("purchase record has invalid '{field}': {value}")]
    InvalidTimestamp { field: &'static str, value: f64 },

    #[error("no timestamp contract configured for the receipt source")]
    MissingTimestampContract,

    #[error("invalid purchase bridge config: {0}")]
    InvalidConfig(#[source] serde_json::Error),
}
