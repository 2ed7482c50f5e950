use crate::config::OrderData;
use chrono::{DateTime, Utc};
use rand::Rng;

/// Static field values sent with every order unless the caller overrides them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDefaults {
    /// ISO 4217 numeric code, `978` is EUR.
    pub currency: String,
    pub action_mode: String,
    pub page_action: String,
    pub version: String,
    pub payment_config: String,
}

impl Default for OrderDefaults {
    fn default() -> Self {
        Self {
            currency: String::from("978"),
            action_mode: String::from("INTERACTIVE"),
            page_action: String::from("PAYMENT"),
            version: String::from("V2"),
            payment_config: String::from("SINGLE"),
        }
    }
}

/// Random transaction id in `000001..=999999`.
pub fn trans_id() -> String {
    let id: u32 = rand::rng().random_range(1..=999_999);
    format!("{id:06}")
}

/// Transaction date as `YYYYMMDDHHmmss` in UTC.
pub fn trans_date_at(at: DateTime<Utc>) -> String {
    at.format("%Y%m%d%H%M%S").to_string()
}

pub fn trans_date() -> String {
    trans_date_at(Utc::now())
}

/// Fresh defaults: a new transaction id and timestamp on every call.
pub fn default_order_data(defaults: &OrderDefaults) -> OrderData {
    OrderData::from([
        ("vads_trans_id".to_string(), trans_id()),
        ("vads_trans_date".to_string(), trans_date()),
        ("vads_currency".to_string(), defaults.currency.clone()),
        ("vads_action_mode".to_string(), defaults.action_mode.clone()),
        ("vads_page_action".to_string(), defaults.page_action.clone()),
        ("vads_version".to_string(), defaults.version.clone()),
        (
            "vads_payment_config".to_string(),
            defaults.payment_config.clone(),
        ),
    ])
}

/// Merges `overrides` over `defaults`; on a key collision the override wins.
pub fn merge_order_data(defaults: &OrderData, overrides: &OrderData) -> OrderData {
    let mut merged = defaults.clone();
    merged.extend(
        overrides
            .iter()
            .map(|(key, value)| (key.clone(), value.clone())),
    );
    merged
}
