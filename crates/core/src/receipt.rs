use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Untrusted structured output of the vision-model extraction call.
///
/// The model is not contractually guaranteed to populate every field, so each
/// one is optional or defaulted and unknown fields are tolerated. Consumers
/// must presence-check everything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawExtraction {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub store: Option<String>,
    #[serde(default)]
    pub items: Vec<RawItem>,
}

/// A single line item as the model reported it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawItem {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub price: f64,
}

/// A cleaned line item. `category` is always non-empty after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReceiptItem {
    pub category: String,
    pub name: String,
    pub price: f64,
}

/// The final schema-valid record emitted once per receipt image.
///
/// Serializes to exactly `date` (ISO 8601 or null), `store`, and `items` —
/// no additional fields are permitted on either side of the round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NormalizedReceipt {
    pub date: Option<NaiveDate>,
    pub store: String,
    pub items: Vec<ReceiptItem>,
}
